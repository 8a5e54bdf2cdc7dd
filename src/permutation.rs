//! Permutation: an invertible mapping over an alphabet's index space.
//!
//! Built from cycle notation such as `"(AELTPHQXRU) (BKNW) (S)"`. Symbols
//! absent from every cycle map to themselves. The cycles are parsed once
//! into forward and inverse lookup tables, so `permute` and `invert` are
//! constant-time.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// Permutation of `[0, alphabet.size())` defined by disjoint cycles.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parses `cycles` over `alphabet`.
    ///
    /// `cycles` has the form `"(cccc) (cc) ..."`; whitespace is ignored and
    /// `"()"` contributes nothing.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycles`] on unbalanced or nested
    ///   parentheses, symbols outside a cycle, or a symbol appearing twice.
    /// - [`EnigmaError::SymbolNotInAlphabet`] if a cycle names a symbol the
    ///   alphabet does not contain.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(BACD)", alpha).unwrap();
    /// assert_eq!(perm.permute_char('B').unwrap(), 'A');
    /// assert_eq!(perm.invert_char('B').unwrap(), 'D');
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let parsed = parse_cycles(cycles, &alphabet)?;
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse: Vec<usize> = (0..size).collect();
        for cycle in &parsed {
            for (k, &from) in cycle.iter().enumerate() {
                let to = cycle[(k + 1) % cycle.len()];
                forward[from] = to;
                inverse[to] = from;
            }
        }
        Ok(Permutation {
            alphabet,
            cycles: parsed,
            forward,
            inverse,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Returns the size of the alphabet permuted.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Returns the alphabet this permutation is defined over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns `p` modulo the alphabet size, always non-negative.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Applies the permutation to `p`, wrapped modulo the alphabet size.
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Applies the inverse permutation to `c`, wrapped modulo the alphabet size.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Symbol-level [`permute`](Self::permute).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotInAlphabet`] if `p` is not a member.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        Ok(self.alphabet.symbol(self.permute(index)))
    }

    /// Symbol-level [`invert`](Self::invert).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotInAlphabet`] if `c` is not a member.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        Ok(self.alphabet.symbol(self.invert(index)))
    }

    /// Returns true iff no index maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }

    /// Returns the cycles in normalised text form, e.g. `"(AB) (CDE)"`.
    pub fn cycles(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            f.write_str("(")?;
            for &i in cycle {
                write!(f, "{}", self.alphabet.symbol(i))?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Splits cycle text into index cycles, validating disjointness.
fn parse_cycles(text: &str, alphabet: &Alphabet) -> Result<Vec<Vec<usize>>> {
    let mut seen = vec![false; alphabet.size()];
    let mut cycles = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for c in text.chars() {
        match c {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "nested '(' in {:?}",
                        text
                    )));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) if !cycle.is_empty() => cycles.push(cycle),
                Some(_) => {}
                None => {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "unmatched ')' in {:?}",
                        text
                    )));
                }
            },
            c if c.is_whitespace() => {}
            c => {
                let Some(cycle) = current.as_mut() else {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "symbol {:?} outside any cycle",
                        c
                    )));
                };
                let index = alphabet.to_int(c)?;
                if seen[index] {
                    return Err(EnigmaError::MalformedCycles(format!(
                        "symbol {:?} appears more than once",
                        c
                    )));
                }
                seen[index] = true;
                cycle.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::MalformedCycles(format!(
            "unterminated cycle in {:?}",
            text
        )));
    }
    Ok(cycles)
}
