//! Rotor: a permutation with a rotational setting.
//!
//! A rotor is one of three kinds (reflector, fixed, moving) sharing a name,
//! a wiring permutation, a setting and a ring offset. Conversion shifts the
//! contact by the current offset, applies the wiring, and shifts back.
//!
//! Rotors live in a [`RotorPool`] and are referenced by [`RotorId`], so a
//! machine's slots never duplicate a rotor's identity or state.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// Per-kind behaviour of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Stationary, derangement wiring; only valid in slot 0.
    Reflector,
    /// Stationary rotor.
    Fixed,
    /// Stepping rotor with one or more notch positions.
    Moving { notches: Vec<usize> },
}

/// A named rotor and its mutable position.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    setting: usize,
    ring: usize,
}

impl Rotor {
    /// Creates a reflector named `name` wired by `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotDerangement`] if the wiring has a fixed point.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self> {
        let name = name.into();
        if !permutation.derangement() {
            return Err(EnigmaError::NotDerangement(name));
        }
        Ok(Self::build(name, permutation, RotorKind::Reflector))
    }

    /// Creates a non-moving, non-reflecting rotor.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::build(name.into(), permutation, RotorKind::Fixed)
    }

    /// Creates a moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Errors
    /// - [`EnigmaError::InvalidNotches`] if `notches` is empty.
    /// - [`EnigmaError::SymbolNotInAlphabet`] if a notch is not a member.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)", alpha).unwrap();
    /// let mut rotor = Rotor::moving("III", perm, "V").unwrap();
    /// rotor.set_char('U').unwrap();
    /// assert!(!rotor.at_notch());
    /// rotor.advance();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self> {
        let name = name.into();
        let mut positions = Vec::with_capacity(notches.len());
        for c in notches.chars() {
            let index = permutation.alphabet().to_int(c)?;
            if !positions.contains(&index) {
                positions.push(index);
            }
        }
        if positions.is_empty() {
            return Err(EnigmaError::InvalidNotches(name));
        }
        Ok(Self::build(
            name,
            permutation,
            RotorKind::Moving { notches: positions },
        ))
    }

    fn build(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Rotor {
            name,
            permutation,
            kind,
            setting: 0,
            ring: 0,
        }
    }

    /// Returns the rotor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rotor's kind.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns the wiring permutation.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    /// Returns the alphabet size.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True iff this rotor steps.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True iff this rotor is a reflector.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns the notch positions; empty for non-moving rotors.
    pub fn notches(&self) -> &[usize] {
        match &self.kind {
            RotorKind::Moving { notches } => notches.as_slice(),
            _ => &[],
        }
    }

    /// Returns the current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Returns the ring offset.
    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Sets the rotor to position `posn` without stepping side effects.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] if `posn >= size()`.
    /// - [`EnigmaError::ReflectorPosition`] if a reflector is set away from 0.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        self.set_checked(posn)?;
        self.setting = posn;
        Ok(())
    }

    /// Sets the rotor to the position named by symbol `c`.
    ///
    /// # Errors
    /// As [`set`](Self::set), plus [`EnigmaError::SymbolNotInAlphabet`].
    pub fn set_char(&mut self, c: char) -> Result<()> {
        let posn = self.alphabet().to_int(c)?;
        self.set(posn)
    }

    /// Sets the ring offset.
    ///
    /// # Errors
    /// As [`set`](Self::set).
    pub fn set_ring(&mut self, ring: usize) -> Result<()> {
        self.set_checked(ring)?;
        self.ring = ring;
        Ok(())
    }

    /// Sets the ring offset to the position named by symbol `c`.
    ///
    /// # Errors
    /// As [`set_char`](Self::set_char).
    pub fn set_ring_char(&mut self, c: char) -> Result<()> {
        let ring = self.alphabet().to_int(c)?;
        self.set_ring(ring)
    }

    fn set_checked(&self, posn: usize) -> Result<()> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorPosition(self.name.clone()));
        }
        Ok(())
    }

    /// Returns the conversion of contact `p` entering from the right.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.offset();
        let shifted = self.permutation.wrap(p as i64 + offset);
        self.permutation
            .wrap(self.permutation.permute(shifted) as i64 - offset)
    }

    /// Returns the conversion of contact `e` entering from the left.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.offset();
        let shifted = self.permutation.wrap(e as i64 + offset);
        self.permutation
            .wrap(self.permutation.invert(shifted) as i64 - offset)
    }

    /// Wiring displacement: setting minus ring.
    fn offset(&self) -> i64 {
        self.setting as i64 - self.ring as i64
    }

    /// True iff a moving rotor's setting sits on a notch.
    pub fn at_notch(&self) -> bool {
        self.notches().contains(&self.setting)
    }

    /// Steps a moving rotor by one position. No-op for other kinds.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Returns setting and ring to 0.
    pub(crate) fn reset(&mut self) {
        self.setting = 0;
        self.ring = 0;
    }
}

/// Handle to a rotor within a [`RotorPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub(crate) usize);

/// Registry of the rotors available to a machine.
///
/// Stores rotors in a `Vec` and hands out [`RotorId`]s; names are unique.
#[derive(Debug, Clone, Default)]
pub struct RotorPool {
    rotors: Vec<Rotor>,
}

impl RotorPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        RotorPool { rotors: Vec::new() }
    }

    /// Creates a pool from `rotors`, in order.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateName`] if two rotors share a name.
    pub fn from_rotors(rotors: impl IntoIterator<Item = Rotor>) -> Result<Self> {
        let mut pool = RotorPool::new();
        for rotor in rotors {
            pool.insert(rotor)?;
        }
        Ok(pool)
    }

    /// Registers `rotor` and returns its handle.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateName`] if the name is taken.
    pub fn insert(&mut self, rotor: Rotor) -> Result<RotorId> {
        if self.find(rotor.name()).is_some() {
            return Err(EnigmaError::DuplicateName(rotor.name));
        }
        let id = RotorId(self.rotors.len());
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor by name.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.rotors
            .iter()
            .position(|r| r.name == name)
            .map(RotorId)
    }

    /// Returns the rotor for `id`, if it belongs to this pool.
    pub fn get(&self, id: RotorId) -> Option<&Rotor> {
        self.rotors.get(id.0)
    }

    /// Returns the number of registered rotors.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true iff no rotors are registered.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates rotors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }

    pub(crate) fn rotor(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    pub(crate) fn rotor_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }
}
