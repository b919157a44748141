//! Domain model for dictionaries and their records.
//!
//! # Responsibility
//! - Define the schema description types (`DictionaryStructure`) and the
//!   typed values produced by payload validation.
//! - Keep validation rules next to the types they constrain.
//!
//! # Invariants
//! - A dictionary is identified by its globally unique name.
//! - Record payloads are validated against a structure before persistence,
//!   never after (structures are immutable once created).

pub mod dictionary;
