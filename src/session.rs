//! Session: drives a machine over a stream of settings and message lines.
//!
//! Lines starting with `*` reconfigure the machine; blank lines are echoed;
//! every other line is a message converted with the current rotor state.

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;
use crate::utils::converter::{group_by_five, strip_whitespace};

/// Layout of converted message lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Whitespace dropped, output in five-symbol groups.
    #[default]
    Grouped,
    /// Spaces kept where they appeared in the input.
    Preserve,
}

/// A machine plus the output format used for its messages.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    format: OutputFormat,
}

impl Session {
    /// Creates a session with [`OutputFormat::Grouped`] output.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            format: OutputFormat::default(),
        }
    }

    /// Replaces the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the machine.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Consumes the session, returning the machine.
    pub fn into_machine(self) -> Machine {
        self.machine
    }

    /// Processes every line of `reader`, writing results to `writer`.
    ///
    /// # Errors
    /// - [`EnigmaError::Parse`] for a malformed settings line, or a message
    ///   before the machine is configured, naming the 1-based input line.
    /// - Errors from [`Settings::apply`] unchanged, such as an unknown rotor
    ///   or a foreign position symbol. The machine keeps its previous
    ///   configuration.
    /// - Conversion errors from [`Machine::convert_message`].
    /// - [`EnigmaError::Io`] on read or write failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::MachineConfig;
    /// use enigma::session::Session;
    ///
    /// let config = MachineConfig::parse("ABCD 2 1 R R (AC) (BD) M MA (ABCD)").unwrap();
    /// let mut session = Session::new(config.into_machine().unwrap());
    ///
    /// let mut out = Vec::new();
    /// session.run("* R M A\nAB CD\n".as_bytes(), &mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    /// ```
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<()> {
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            let output = self.process_line(&line).map_err(|e| {
                warn!(line = n + 1, error = %e, "input rejected");
                match e {
                    EnigmaError::Parse { reason, .. } => EnigmaError::Parse { line: n + 1, reason },
                    other => other,
                }
            })?;
            if let Some(output) = output {
                writeln!(writer, "{}", output)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Processes one input line, returning the line to write, if any.
    ///
    /// # Errors
    /// As [`run`](Self::run), with parse errors reported at line 1.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        if line.trim().is_empty() {
            return Ok(Some(String::new()));
        }
        if Settings::is_settings_line(line) {
            let settings = Settings::parse(line, self.machine.num_rotors())?;
            settings.apply(&mut self.machine)?;
            return Ok(None);
        }
        if !self.machine.is_configured() {
            return Err(EnigmaError::Parse {
                line: 1,
                reason: "message before any settings line".to_string(),
            });
        }

        let converted = match self.format {
            OutputFormat::Grouped => {
                group_by_five(&self.machine.convert_message(&strip_whitespace(line))?)
            }
            OutputFormat::Preserve => self.machine.convert_message(line)?,
        };
        debug!(symbols = converted.len(), positions = %self.machine.positions(), "message converted");
        Ok(Some(converted))
    }
}
