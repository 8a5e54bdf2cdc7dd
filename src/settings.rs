//! Settings line parser.
//!
//! A settings line selects rotors, positions, optional ring settings and the
//! plugboard for the messages that follow it:
//!
//! ```text
//! * B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
//! * B Beta III IV I AXLE BCDE (HQ) (EX)
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Marker that opens a settings line.
pub const SETTINGS_MARKER: char = '*';

/// One parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    rotors: Vec<String>,
    positions: String,
    rings: Option<String>,
    plugboard: String,
}

impl Settings {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// Only the token structure is checked here; rotor names, symbols and
    /// cycles are validated when the settings are applied.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Parse`] (reported as line 1) when the marker,
    /// rotor names or position token are missing, or when stray tokens
    /// follow the plugboard cycles.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::settings::Settings;
    ///
    /// let s = Settings::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(s.rotors(), ["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(s.positions(), "AXLE");
    /// assert_eq!(s.plugboard(), "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let rest = line
            .trim_start()
            .strip_prefix(SETTINGS_MARKER)
            .ok_or_else(|| {
                settings_error(format!("settings must start with '{}'", SETTINGS_MARKER))
            })?;
        let mut tokens = rest.split_whitespace().peekable();

        let rotors: Vec<String> = tokens
            .by_ref()
            .take(num_rotors)
            .map(str::to_string)
            .collect();
        if rotors.len() != num_rotors {
            return Err(settings_error(format!(
                "expected {} rotor names, found {}",
                num_rotors,
                rotors.len()
            )));
        }

        let positions = tokens
            .next()
            .filter(|t| !t.starts_with('('))
            .ok_or_else(|| settings_error("missing rotor positions".to_string()))?
            .to_string();
        let rings = tokens
            .next_if(|t| !t.starts_with('('))
            .map(str::to_string);

        let cycles: Vec<&str> = tokens.collect();
        if let Some(stray) = cycles.iter().find(|t| !t.starts_with('(')) {
            return Err(settings_error(format!(
                "unexpected token {:?} in plugboard",
                stray
            )));
        }

        Ok(Settings {
            rotors,
            positions,
            rings,
            plugboard: cycles.join(" "),
        })
    }

    /// Returns true iff `line` opens with the settings marker.
    pub fn is_settings_line(line: &str) -> bool {
        line.trim_start().starts_with(SETTINGS_MARKER)
    }

    /// Rotor names, reflector first.
    pub fn rotors(&self) -> &[String] {
        &self.rotors
    }

    /// Initial rotor positions.
    pub fn positions(&self) -> &str {
        &self.positions
    }

    /// Ring settings, if given.
    pub fn rings(&self) -> Option<&str> {
        self.rings.as_deref()
    }

    /// Plugboard cycle text; empty for no plugboard.
    pub fn plugboard(&self) -> &str {
        &self.plugboard
    }

    /// Configures `machine`: inserts rotors, sets positions and rings, and
    /// replaces the plugboard.
    ///
    /// The settings are applied to a copy of `machine` that replaces it only
    /// once every step has succeeded. On error `machine` is unchanged.
    ///
    /// # Errors
    /// Whatever [`Machine::insert_rotors`], [`Machine::set_rotors`],
    /// [`Machine::set_rings`], [`Machine::set_plugboard`] or
    /// [`Permutation::new`] report.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let plugboard = Permutation::new(&self.plugboard, Arc::clone(machine.alphabet()))?;
        let mut staged = machine.clone();
        staged.insert_rotors(self.rotors.as_slice())?;
        staged.set_rotors(&self.positions)?;
        if let Some(rings) = &self.rings {
            staged.set_rings(rings)?;
        }
        staged.set_plugboard(plugboard)?;
        *machine = staged;
        debug!(
            rotors = ?self.rotors,
            positions = %self.positions,
            rings = ?self.rings,
            plugboard = %self.plugboard,
            "settings applied"
        );
        Ok(())
    }
}

fn settings_error(reason: String) -> EnigmaError {
    EnigmaError::Parse { line: 1, reason }
}
