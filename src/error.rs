//! Error types for the enigma library.
//!
//! Every failure is fail-fast: the operation that detects it aborts without
//! committing partial state and reports the specific reason.

use thiserror::Error;

/// Coarse classification of an [`EnigmaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad machine description, rotor placement, setting string or cycle text.
    Config,
    /// A symbol outside the configured alphabet.
    Alphabet,
    /// An integer index outside `[0, size)`.
    Index,
    /// Failure reading or writing a message stream.
    Io,
}

/// Errors produced by the enigma library.
#[derive(Debug, Error)]
pub enum EnigmaError {
    /// Machine dimensions are unusable.
    #[error("invalid machine: {0}")]
    InvalidMachine(String),

    /// Number of rotor names differs from the number of slots.
    #[error("wrong slot count: expected {expected} rotors, found {found}")]
    WrongSlotCount { expected: usize, found: usize },

    /// Rotor name not present in the pool.
    #[error("unknown rotor: {0}")]
    UnknownRotor(String),

    /// A reflector outside slot 0, or a non-reflector in slot 0.
    #[error("reflector placement: rotor {name} cannot occupy slot {slot}")]
    ReflectorPlacement { slot: usize, name: String },

    /// A fixed rotor placed to the right of a moving rotor.
    #[error("rotor ordering: fixed rotor {name} in slot {slot} follows a moving rotor")]
    RotorOrdering { slot: usize, name: String },

    /// The same rotor named in two slots.
    #[error("duplicate rotor: {0}")]
    DuplicateRotor(String),

    /// Number of moving rotors differs from the number of pawls.
    #[error("moving-rotor count mismatch: expected {expected}, found {found}")]
    MovingRotorCount { expected: usize, found: usize },

    /// Setting string has the wrong number of symbols.
    #[error("wrong setting length: expected {expected} symbols, found {found}")]
    WrongSettingLength { expected: usize, found: usize },

    /// Cycle text is not a well-formed disjoint cycle specification.
    #[error("malformed cycle specification: {0}")]
    MalformedCycles(String),

    /// A reflector whose permutation has a fixed point.
    #[error("reflector {0} is not a derangement")]
    NotDerangement(String),

    /// A moving rotor without notches.
    #[error("moving rotor {0} has no notches")]
    InvalidNotches(String),

    /// Attempt to rotate a reflector away from position 0.
    #[error("reflector {0} has a single position")]
    ReflectorPosition(String),

    /// Two rotors registered under one name.
    #[error("rotor name registered twice: {0}")]
    DuplicateName(String),

    /// Conversion requested before any rotors were inserted.
    #[error("machine has no rotors inserted")]
    NotConfigured,

    /// Malformed machine description or settings line.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Alphabet construction received a repeated symbol.
    #[error("duplicate symbol in alphabet: {0:?}")]
    DuplicateSymbol(char),

    /// Alphabet construction received no symbols.
    #[error("alphabet is empty")]
    EmptyAlphabet,

    /// Symbol is not a member of the alphabet.
    #[error("symbol not in alphabet: {0:?}")]
    SymbolNotInAlphabet(char),

    /// Index outside `[0, size)`.
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Message stream failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl EnigmaError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnigmaError::DuplicateSymbol(_)
            | EnigmaError::EmptyAlphabet
            | EnigmaError::SymbolNotInAlphabet(_) => ErrorKind::Alphabet,
            EnigmaError::IndexOutOfRange { .. } => ErrorKind::Index,
            EnigmaError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Config,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;
