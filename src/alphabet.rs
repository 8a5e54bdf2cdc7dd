//! Alphabet: the ordered symbol set a machine operates over.
//!
//! Maps each symbol to its index in `[0, size)` and back. Immutable once
//! built and shared (via `Arc`) by every permutation and rotor of a machine.

use crate::error::{EnigmaError, Result};

/// Symbols that cannot appear in an alphabet because the cycle and settings
/// syntax reserves them.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Ordered, duplicate-free set of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Default for Alphabet {
    /// The 26 upper-case Latin letters.
    fn default() -> Self {
        Alphabet {
            symbols: ('A'..='Z').collect(),
        }
    }
}

impl Alphabet {
    /// Builds an alphabet from the symbols of `chars`, in order.
    ///
    /// # Errors
    /// - [`EnigmaError::EmptyAlphabet`] if `chars` is empty.
    /// - [`EnigmaError::DuplicateSymbol`] if a symbol repeats.
    /// - [`EnigmaError::SymbolNotInAlphabet`] if a symbol is whitespace or
    ///   one of the reserved characters `(`, `)`, `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols: Vec<char> = Vec::with_capacity(chars.len());
        for c in chars.chars() {
            if c.is_whitespace() || RESERVED.contains(&c) {
                return Err(EnigmaError::SymbolNotInAlphabet(c));
            }
            if symbols.contains(&c) {
                return Err(EnigmaError::DuplicateSymbol(c));
            }
            symbols.push(c);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        Ok(Alphabet { symbols })
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true iff `c` is a member.
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Returns the symbol at `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] if `index >= size()`.
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotInAlphabet`] if `c` is not a member.
    pub fn to_int(&self, c: char) -> Result<usize> {
        self.symbols
            .iter()
            .position(|&s| s == c)
            .ok_or(EnigmaError::SymbolNotInAlphabet(c))
    }

    /// Returns the symbols as a string, in index order.
    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }

    pub(crate) fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }
}
