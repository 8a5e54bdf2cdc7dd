//! Rotor cipher machine simulator.
//!
//! Simulates an electromechanical rotor machine: a reflector, a stack of
//! fixed and moving rotors, and a plugboard, together performing a
//! self-inverse substitution that changes after every symbol.
//!
//! # Architecture
//!
//! ```text
//! Alphabet      (symbol <-> index bijection)
//!     ↑ shared
//! Permutation   (cycle notation, precomputed forward/inverse tables)
//!     ↑ wired into
//! Rotor         (Reflector | Fixed | Moving{notches}, setting, ring)
//!     ↑ owned by RotorPool, referenced by RotorId
//! Machine       (slot order, stepping with double step, plugboard)
//! ```
//!
//! [`config`], [`settings`] and [`session`] read the textual machine
//! description, settings lines and message streams around the core.
//!
//! # Examples
//!
//! Encrypt and decrypt with an Enigma I (reflector B, rotors I, II, III):
//!
//! ```
//! use enigma::config::MachineConfig;
//!
//! let description = "\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 4 3
//!  I MQ   (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!  II ME  (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//!  III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//!  B R    (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
//! ";
//! let mut machine = MachineConfig::parse(description)
//!     .unwrap()
//!     .into_machine()
//!     .unwrap();
//! machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
//!
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert_message("HELLO WORLD").unwrap(), "ILBDA AMTAZ");
//!
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert_message("ILBDA AMTAZ").unwrap(), "HELLO WORLD");
//! ```

#![deny(clippy::all)]

pub mod config;
pub mod error;
pub mod session;
pub mod settings;
pub mod utils;

mod alphabet;
mod machine;
mod permutation;
mod rotor;

pub use alphabet::Alphabet;
pub use error::{EnigmaError, ErrorKind, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorId, RotorKind, RotorPool};
