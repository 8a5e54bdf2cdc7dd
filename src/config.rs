//! Machine description loader.
//!
//! A description is a whitespace-separated token stream:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//!  I MQ      (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  Beta N    (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//!  B R       (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
//!            (RX) (SZ) (TV)
//! ```
//!
//! The alphabet, then `num_rotors pawls`, then one entry per rotor: a name,
//! a type (`M<notches>`, `N` or `R`) and its cycles. Cycles may wrap onto
//! following lines; the next token not starting with `(` begins a new rotor.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorPool};

/// A parsed machine description.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    rotors: Vec<Rotor>,
}

/// A token and the 1-based line it came from.
struct Token<'a> {
    line: usize,
    text: &'a str,
}

impl MachineConfig {
    /// Parses a machine description.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Parse`] naming the offending line.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    ///
    /// let config = MachineConfig::parse("ABCD 2 1\n R R (AC) (BD)\n M MA (ABCD)\n").unwrap();
    /// assert_eq!(config.num_rotors(), 2);
    /// assert_eq!(config.rotors().len(), 2);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let tokens: Vec<Token<'_>> = text
            .lines()
            .enumerate()
            .flat_map(|(n, line)| {
                line.split_whitespace().map(move |text| Token { line: n + 1, text })
            })
            .collect();
        let last_line = text.lines().count().max(1);
        let mut tokens = tokens.into_iter().peekable();

        let alpha_token = tokens.next().ok_or_else(|| EnigmaError::Parse {
            line: 1,
            reason: "missing alphabet".to_string(),
        })?;
        let alphabet = Arc::new(
            Alphabet::new(alpha_token.text).map_err(|e| parse_error(alpha_token.line, e))?,
        );

        let num_rotors = parse_count(tokens.next(), "rotor slot count", last_line)?;
        let pawls = parse_count(tokens.next(), "pawl count", last_line)?;

        let mut rotors: Vec<Rotor> = Vec::new();
        while let Some(name) = tokens.next() {
            if name.text.starts_with('(') {
                return Err(EnigmaError::Parse {
                    line: name.line,
                    reason: format!("expected a rotor name, found {:?}", name.text),
                });
            }
            let kind = tokens.next().ok_or_else(|| EnigmaError::Parse {
                line: name.line,
                reason: format!("rotor {} has no type", name.text),
            })?;
            let mut cycles = String::new();
            while let Some(cycle) = tokens.next_if(|t| t.text.starts_with('(')) {
                cycles.push_str(cycle.text);
                cycles.push(' ');
            }

            let rotor = build_rotor(name.text, kind.text, &cycles, &alphabet)
                .map_err(|e| parse_error(name.line, e))?;
            if rotors.iter().any(|r| r.name() == rotor.name()) {
                return Err(EnigmaError::Parse {
                    line: name.line,
                    reason: format!("rotor {} described twice", name.text),
                });
            }
            rotors.push(rotor);
        }

        debug!(
            alphabet = %alphabet.as_string(),
            num_rotors,
            pawls,
            rotors = rotors.len(),
            "machine description parsed"
        );
        Ok(MachineConfig {
            alphabet,
            num_rotors,
            pawls,
            rotors,
        })
    }

    /// Reads and parses a description from `reader`.
    ///
    /// # Errors
    /// [`EnigmaError::Io`] if reading fails, otherwise as [`parse`](Self::parse).
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Reads and parses the description stored at `path`.
    ///
    /// # Errors
    /// As [`from_reader`](Self::from_reader).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading machine description");
        Self::parse(&text)
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls.
    pub fn pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the described rotors, in file order.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// Builds a machine with every described rotor available.
    ///
    /// # Errors
    /// As [`Machine::new`].
    pub fn into_machine(self) -> Result<Machine> {
        let pool = RotorPool::from_rotors(self.rotors)?;
        Machine::new(self.alphabet, self.num_rotors, self.pawls, pool)
    }
}

fn build_rotor(name: &str, kind: &str, cycles: &str, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
    let permutation = Permutation::new(cycles, Arc::clone(alphabet))?;
    let mut chars = kind.chars();
    match chars.next() {
        Some('M') => Rotor::moving(name, permutation, chars.as_str()),
        Some('N') if kind.len() == 1 => Ok(Rotor::fixed(name, permutation)),
        Some('R') if kind.len() == 1 => Rotor::reflector(name, permutation),
        _ => Err(EnigmaError::MalformedCycles(format!(
            "unknown rotor type {:?}",
            kind
        ))),
    }
}

fn parse_count(token: Option<Token<'_>>, what: &str, last_line: usize) -> Result<usize> {
    let token = token.ok_or_else(|| EnigmaError::Parse {
        line: last_line,
        reason: format!("missing {}", what),
    })?;
    token.text.parse().map_err(|_| EnigmaError::Parse {
        line: token.line,
        reason: format!("{} must be a non-negative integer, found {:?}", what, token.text),
    })
}

fn parse_error(line: usize, err: EnigmaError) -> EnigmaError {
    EnigmaError::Parse {
        line,
        reason: err.to_string(),
    }
}
