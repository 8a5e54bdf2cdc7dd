//! Machine: reflector, rotor stack and plugboard wired together.
//!
//! Each keypress first steps the rotors, then sends the contact through the
//! plugboard, right-to-left through the rotors into the reflector, back
//! left-to-right through the rotors, and out through the plugboard again.
//!
//! # Stepping
//!
//! The rightmost rotor steps on every keypress. A moving rotor sitting on a
//! notch steps its moving left neighbour, and also steps itself. All notch
//! tests use the positions from before the keypress, and a rotor steps at
//! most once per keypress. This reproduces the double step of the middle
//! rotor (`ADU -> ADV -> AEW -> BFX` for rotors I, II, III).

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorId, RotorPool};

/// A complete rotor cipher machine.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    pool: RotorPool,
    slots: Vec<RotorId>,
    plugboard: Option<Permutation>,
}

impl Machine {
    /// Creates a machine with `num_rotors` slots and `pawls` moving rotors,
    /// drawing rotors from `pool`.
    ///
    /// No rotors are inserted; call [`insert_rotors`](Self::insert_rotors)
    /// before converting.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidMachine`] unless `1 < num_rotors`,
    /// `pawls < num_rotors`, and every pooled rotor uses `alphabet`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        pool: RotorPool,
    ) -> Result<Self> {
        if num_rotors <= 1 {
            return Err(EnigmaError::InvalidMachine(format!(
                "need at least 2 rotor slots, got {}",
                num_rotors
            )));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::InvalidMachine(format!(
                "{} pawls do not fit {} rotor slots",
                pawls, num_rotors
            )));
        }
        if let Some(rotor) = pool.iter().find(|r| **r.alphabet() != *alphabet) {
            return Err(EnigmaError::InvalidMachine(format!(
                "rotor {} uses a different alphabet",
                rotor.name()
            )));
        }
        debug!(
            num_rotors,
            pawls,
            available = pool.len(),
            "machine constructed"
        );
        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            pool,
            slots: Vec::new(),
            plugboard: None,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    /// Returns the machine's alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the pool of available rotors.
    pub fn pool(&self) -> &RotorPool {
        &self.pool
    }

    /// Returns the plugboard, if one is set.
    pub fn plugboard(&self) -> Option<&Permutation> {
        self.plugboard.as_ref()
    }

    /// True once rotors have been inserted.
    pub fn is_configured(&self) -> bool {
        !self.slots.is_empty()
    }

    /// Iterates the inserted rotors, reflector first.
    pub fn rotors(&self) -> impl Iterator<Item = &Rotor> + '_ {
        self.slots.iter().map(|&id| self.pool.rotor(id))
    }

    /// Returns the inserted rotor names, reflector first.
    pub fn slot_names(&self) -> Vec<&str> {
        self.rotors().map(Rotor::name).collect()
    }

    /// Returns the current settings of the non-reflector slots, left to right.
    pub fn positions(&self) -> String {
        self.rotors()
            .skip(1)
            .map(|r| self.alphabet.symbol(r.setting()))
            .collect()
    }

    /// Returns the ring settings of the non-reflector slots, left to right.
    pub fn rings(&self) -> String {
        self.rotors()
            .skip(1)
            .map(|r| self.alphabet.symbol(r.ring()))
            .collect()
    }

    /// Inserts the rotors named by `names`, reflector first.
    ///
    /// Empty names are ignored. Inserted rotors start at setting 0 and
    /// ring 0. The plugboard is left unchanged. On error the previous slot
    /// list is kept.
    ///
    /// # Errors
    /// Checked in this order:
    /// 1. [`EnigmaError::WrongSlotCount`]
    /// 2. [`EnigmaError::UnknownRotor`]
    /// 3. [`EnigmaError::ReflectorPlacement`]
    /// 4. [`EnigmaError::RotorOrdering`]
    /// 5. [`EnigmaError::DuplicateRotor`]
    /// 6. [`EnigmaError::MovingRotorCount`]
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| !n.is_empty())
            .collect();
        if names.len() != self.num_rotors {
            return Err(EnigmaError::WrongSlotCount {
                expected: self.num_rotors,
                found: names.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        let mut moving_found = false;
        let mut moving = 0;
        for (slot, &name) in names.iter().enumerate() {
            let id = self
                .pool
                .find(name)
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            let rotor = self.pool.rotor(id);
            if (slot == 0) != rotor.reflecting() {
                return Err(EnigmaError::ReflectorPlacement {
                    slot,
                    name: name.to_string(),
                });
            }
            if moving_found && !rotor.rotates() {
                return Err(EnigmaError::RotorOrdering {
                    slot,
                    name: name.to_string(),
                });
            }
            if slots.contains(&id) {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
            if rotor.rotates() {
                moving_found = true;
                moving += 1;
            }
            slots.push(id);
        }
        if moving != self.pawls {
            return Err(EnigmaError::MovingRotorCount {
                expected: self.pawls,
                found: moving,
            });
        }

        for &id in &slots {
            self.pool.rotor_mut(id).reset();
        }
        self.slots = slots;
        debug!(rotors = ?self.slot_names(), "rotors inserted");
        Ok(())
    }

    /// Sets the non-reflector rotors, left to right, to the symbols of
    /// `setting`.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] before rotors are inserted.
    /// - [`EnigmaError::WrongSettingLength`] unless `setting` has
    ///   `num_rotors() - 1` symbols.
    /// - [`EnigmaError::SymbolNotInAlphabet`] for a foreign symbol; no rotor
    ///   is changed in that case.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.parse_setting(setting)?;
        for (&id, posn) in self.slots[1..].iter().zip(positions) {
            self.pool.rotor_mut(id).set(posn)?;
        }
        debug!(positions = %self.positions(), "rotor positions set");
        Ok(())
    }

    /// Sets the ring offsets of the non-reflector rotors, left to right.
    ///
    /// # Errors
    /// As [`set_rotors`](Self::set_rotors).
    pub fn set_rings(&mut self, rings: &str) -> Result<()> {
        let offsets = self.parse_setting(rings)?;
        for (&id, ring) in self.slots[1..].iter().zip(offsets) {
            self.pool.rotor_mut(id).set_ring(ring)?;
        }
        debug!(rings = %self.rings(), "ring settings applied");
        Ok(())
    }

    fn parse_setting(&self, setting: &str) -> Result<Vec<usize>> {
        if !self.is_configured() {
            return Err(EnigmaError::NotConfigured);
        }
        let expected = self.num_rotors - 1;
        let found = setting.chars().count();
        if found != expected {
            return Err(EnigmaError::WrongSettingLength { expected, found });
        }
        setting.chars().map(|c| self.alphabet.to_int(c)).collect()
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidMachine`] if `plugboard` is over a
    /// different alphabet; the current plugboard is kept.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::InvalidMachine(
                "plugboard uses a different alphabet".to_string(),
            ));
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = Some(plugboard);
        Ok(())
    }

    /// Removes the plugboard, leaving the identity.
    pub fn clear_plugboard(&mut self) {
        self.plugboard = None;
    }

    /// Advances the machine, then converts contact `c`.
    ///
    /// # Errors
    /// - [`EnigmaError::NotConfigured`] before rotors are inserted.
    /// - [`EnigmaError::IndexOutOfRange`] if `c` is outside the alphabet;
    ///   the rotors are not stepped in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorPool};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let pool = RotorPool::from_rotors([
    ///     Rotor::reflector("R", Permutation::new("(AC) (BD)", alpha.clone()).unwrap()).unwrap(),
    ///     Rotor::moving("M", Permutation::new("(ABCD)", alpha.clone()).unwrap(), "A").unwrap(),
    /// ])
    /// .unwrap();
    /// let mut machine = Machine::new(alpha, 2, 1, pool).unwrap();
    /// machine.insert_rotors(&["R", "M"]).unwrap();
    ///
    /// let out = machine.convert(0).unwrap();
    /// machine.set_rotors("A").unwrap();
    /// assert_eq!(machine.convert(out).unwrap(), 0);
    /// ```
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        if !self.is_configured() {
            return Err(EnigmaError::NotConfigured);
        }
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.step();

        let mut result = match &self.plugboard {
            Some(plugboard) => plugboard.permute(c),
            None => c,
        };
        for &id in self.slots.iter().rev() {
            result = self.pool.rotor(id).convert_forward(result);
        }
        for &id in &self.slots[1..] {
            result = self.pool.rotor(id).convert_backward(result);
        }
        if let Some(plugboard) = &self.plugboard {
            result = plugboard.invert(result);
        }
        trace!(input = c, output = result, positions = %self.positions(), "keypress");
        Ok(result)
    }

    /// Symbol-level [`convert`](Self::convert).
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotInAlphabet`] for a foreign symbol,
    /// before any rotor steps.
    pub fn convert_char(&mut self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        let out = self.convert(index)?;
        self.alphabet.to_char(out)
    }

    /// Converts every symbol of `msg`, passing spaces through untouched.
    ///
    /// Rotor state carries across the whole message. If a foreign symbol is
    /// met, the symbols before it keep their stepping effects and the error
    /// is returned.
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        let mut out = String::with_capacity(msg.len());
        for c in msg.chars() {
            if c == ' ' {
                out.push(c);
            } else {
                out.push(self.convert_char(c)?);
            }
        }
        Ok(out)
    }

    /// Steps the rotors for one keypress.
    fn step(&mut self) {
        let rotors: Vec<&Rotor> = self.rotors().collect();
        let mut advance = vec![false; rotors.len()];
        for (i, pair) in rotors.windows(2).enumerate() {
            if pair[1].at_notch() && pair[0].rotates() && pair[1].rotates() {
                advance[i] = true;
                advance[i + 1] = true;
            }
        }
        if let Some(last) = advance.last_mut() {
            *last = true;
        }

        for (slot, &id) in self.slots.iter().enumerate() {
            if advance[slot] {
                self.pool.rotor_mut(id).advance();
            }
        }
        trace!(stepped = ?advance, "rotors stepped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE_B: &str = "(AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn perm(cycles: &str) -> Permutation {
        Permutation::new(cycles, upper()).unwrap()
    }

    /// Enigma I rotors plus a fixed rotor and a second reflector.
    fn enigma_i_pool() -> RotorPool {
        RotorPool::from_rotors([
            Rotor::reflector("B", perm(WIDE_B)).unwrap(),
            Rotor::reflector(
                "C",
                perm("(AF) (BV) (CP) (DJ) (EI) (GO) (HY) (KR) (LZ) (MX) (NW) (QT) (SU)"),
            )
            .unwrap(),
            Rotor::moving(
                "I",
                perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)"),
                "Q",
            )
            .unwrap(),
            Rotor::moving(
                "II",
                perm("(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)"),
                "E",
            )
            .unwrap(),
            Rotor::moving("III", perm("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)"), "V").unwrap(),
            Rotor::fixed("Beta", perm("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)")),
        ])
        .unwrap()
    }

    fn enigma_i(setting: &str) -> Machine {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        machine.set_rotors(setting).unwrap();
        machine
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(
            Machine::new(upper(), 1, 0, RotorPool::new()),
            Err(EnigmaError::InvalidMachine(_))
        ));
        assert!(matches!(
            Machine::new(upper(), 4, 4, RotorPool::new()),
            Err(EnigmaError::InvalidMachine(_))
        ));
    }

    #[test]
    fn test_new_rejects_foreign_alphabet_rotor() {
        let small = Arc::new(Alphabet::new("ABCD").unwrap());
        let pool = RotorPool::from_rotors([Rotor::fixed(
            "F",
            Permutation::identity(small),
        )])
        .unwrap();
        assert!(matches!(
            Machine::new(upper(), 3, 1, pool),
            Err(EnigmaError::InvalidMachine(_))
        ));
    }

    #[test]
    fn test_introspection() {
        let machine = enigma_i("ADU");
        assert_eq!(machine.num_rotors(), 4);
        assert_eq!(machine.num_pawls(), 3);
        assert_eq!(machine.slot_names(), vec!["B", "I", "II", "III"]);
        assert_eq!(machine.positions(), "ADU");
        assert_eq!(machine.rings(), "AAA");
        assert!(machine.plugboard().is_none());
    }

    #[test]
    fn test_insert_rejects_wrong_slot_count() {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "I", "II"]),
            Err(EnigmaError::WrongSlotCount {
                expected: 4,
                found: 3
            })
        ));
        // Empty names do not count.
        assert!(machine.insert_rotors(&["B", "", "I", "II", "III"]).is_ok());
    }

    #[test]
    fn test_insert_rejects_unknown_rotor() {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "I", "II", "IX"]),
            Err(EnigmaError::UnknownRotor(name)) if name == "IX"
        ));
    }

    #[test]
    fn test_insert_rejects_reflector_placement() {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "C", "II", "III"]),
            Err(EnigmaError::ReflectorPlacement { slot: 1, .. })
        ));
        assert!(matches!(
            machine.insert_rotors(&["I", "B", "II", "III"]),
            Err(EnigmaError::ReflectorPlacement { slot: 0, .. })
        ));
    }

    #[test]
    fn test_insert_rejects_fixed_after_moving() {
        let mut machine = Machine::new(upper(), 5, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "I", "Beta", "II", "III"]),
            Err(EnigmaError::RotorOrdering { slot: 2, .. })
        ));
        assert!(machine.insert_rotors(&["B", "Beta", "I", "II", "III"]).is_ok());
    }

    #[test]
    fn test_insert_rejects_duplicate_rotor() {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "I", "I", "III"]),
            Err(EnigmaError::DuplicateRotor(name)) if name == "I"
        ));
    }

    #[test]
    fn test_insert_rejects_pawl_mismatch() {
        let mut machine = Machine::new(upper(), 4, 2, enigma_i_pool()).unwrap();
        assert!(matches!(
            machine.insert_rotors(&["B", "I", "II", "III"]),
            Err(EnigmaError::MovingRotorCount {
                expected: 2,
                found: 3
            })
        ));
        assert!(machine.insert_rotors(&["B", "Beta", "II", "III"]).is_ok());
    }

    #[test]
    fn test_failed_insert_keeps_previous_slots() {
        let mut machine = enigma_i("ABC");
        assert!(machine.insert_rotors(&["B", "I", "I", "III"]).is_err());
        assert_eq!(machine.slot_names(), vec!["B", "I", "II", "III"]);
        assert_eq!(machine.positions(), "ABC");
    }

    #[test]
    fn test_reinsert_resets_settings() {
        let mut machine = enigma_i("XYZ");
        machine.set_rings("BCD").unwrap();
        machine.insert_rotors(&["B", "III", "II", "I"]).unwrap();
        assert_eq!(machine.positions(), "AAA");
        assert_eq!(machine.rings(), "AAA");
    }

    #[test]
    fn test_set_rotors_validation() {
        let mut machine = enigma_i("AAA");
        assert!(matches!(
            machine.set_rotors("AAAA"),
            Err(EnigmaError::WrongSettingLength {
                expected: 3,
                found: 4
            })
        ));
        assert!(matches!(
            machine.set_rotors("Aa!"),
            Err(EnigmaError::SymbolNotInAlphabet('a'))
        ));
        assert_eq!(machine.positions(), "AAA");

        let mut bare = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(
            bare.set_rotors("AAA"),
            Err(EnigmaError::NotConfigured)
        ));
    }

    #[test]
    fn test_sequential_stepping_with_double_step() {
        let mut machine = enigma_i("ADU");
        let mut seen = Vec::new();
        for _ in 0..3 {
            machine.convert(0).unwrap();
            seen.push(machine.positions());
        }
        assert_eq!(seen, vec!["ADV", "AEW", "BFX"]);
    }

    #[test]
    fn test_every_moving_rotor_steps_once_when_two_notches_align() {
        // II at its notch E, III at its notch V.
        let mut machine = enigma_i("AEV");
        machine.convert(0).unwrap();
        assert_eq!(machine.positions(), "BFW");
    }

    #[test]
    fn test_leftmost_notch_does_not_step_reflector() {
        // I at its notch Q has no moving left neighbour.
        let mut machine = enigma_i("QAA");
        machine.convert(0).unwrap();
        assert_eq!(machine.positions(), "QAB");
    }

    #[test]
    fn test_fixed_rotor_blocks_notch_carry() {
        let mut machine = Machine::new(upper(), 4, 2, enigma_i_pool()).unwrap();
        machine.insert_rotors(&["B", "Beta", "II", "III"]).unwrap();
        machine.set_rotors("AEV").unwrap();
        machine.convert(0).unwrap();
        // II steps from III's notch; Beta never moves even though II was on E.
        assert_eq!(machine.positions(), "AFW");
    }

    #[test]
    fn test_known_enigma_i_vector() {
        let mut machine = enigma_i("AAA");
        assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
    }

    #[test]
    fn test_spaces_pass_through_without_stepping() {
        let mut machine = enigma_i("AAA");
        assert_eq!(
            machine.convert_message("HELLO WORLD").unwrap(),
            "ILBDA AMTAZ"
        );
        assert_eq!(machine.positions(), "AAK");
    }

    #[test]
    fn test_plugboard_applies_on_both_sides() {
        let mut machine = enigma_i("AAA");
        machine.set_plugboard(perm("(AB) (CD)")).unwrap();
        assert_eq!(machine.convert_message("HELLO").unwrap(), "ILACB");
        machine.clear_plugboard();
        machine.set_rotors("AAA").unwrap();
        assert_eq!(machine.convert_message("HELLO").unwrap(), "ILBDA");
    }

    #[test]
    fn test_plugboard_over_other_alphabet_is_rejected() {
        let mut machine = enigma_i("AAA");
        machine.set_plugboard(perm("(AB)")).unwrap();
        let lower = Arc::new(Alphabet::new("abcdefghijklmnopqrstuvwxyz").unwrap());
        let foreign = Permutation::new("(ab)", lower).unwrap();
        assert!(matches!(
            machine.set_plugboard(foreign),
            Err(EnigmaError::InvalidMachine(_))
        ));
        assert_eq!(machine.plugboard().unwrap().cycles(), "(AB)");
    }

    #[test]
    fn test_ring_settings_shift_output() {
        let mut machine = enigma_i("AAA");
        machine.set_rings("BBB").unwrap();
        assert_eq!(machine.convert_message("AAAAA").unwrap(), "EWTYX");
    }

    #[test]
    fn test_decrypt_restores_plaintext() {
        let mut machine = enigma_i("QEV");
        machine.set_plugboard(perm("(AZ) (HQ) (MT)")).unwrap();
        let cipher = machine.convert_message("ATTACK AT DAWN").unwrap();
        machine.set_rotors("QEV").unwrap();
        assert_eq!(machine.convert_message(&cipher).unwrap(), "ATTACK AT DAWN");
    }

    #[test]
    fn test_no_symbol_maps_to_itself() {
        let mut machine = enigma_i("AAA");
        for _ in 0..100 {
            for c in 0..26 {
                assert_ne!(machine.convert(c).unwrap(), c);
            }
        }
    }

    #[test]
    fn test_invalid_symbol_does_not_step() {
        let mut machine = enigma_i("AAA");
        assert!(matches!(
            machine.convert_message("AB?C"),
            Err(EnigmaError::SymbolNotInAlphabet('?'))
        ));
        // A and B stepped; '?' did not.
        assert_eq!(machine.positions(), "AAC");
        assert!(matches!(
            machine.convert(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        ));
        assert_eq!(machine.positions(), "AAC");
    }

    #[test]
    fn test_convert_before_insert_fails() {
        let mut machine = Machine::new(upper(), 4, 3, enigma_i_pool()).unwrap();
        assert!(matches!(machine.convert(0), Err(EnigmaError::NotConfigured)));
    }
}
