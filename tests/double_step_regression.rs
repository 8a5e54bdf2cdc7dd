//! Regression tests for rotor stepping and the middle-rotor double step.
//!
//! A rotor on its notch steps its left neighbour and itself on the next
//! keypress, so the middle rotor of a three-rotor machine moves on two
//! consecutive keypresses. Every notch test reads the positions from
//! before the keypress.

use enigma::config::MachineConfig;
use enigma::Machine;

const ENIGMA_I_CONF: &str = include_str!("fixtures/enigma_i.conf");
const M4_CONF: &str = include_str!("fixtures/m4.conf");

fn machine(conf: &str, rotors: &[&str], positions: &str) -> Machine {
    let mut machine = MachineConfig::parse(conf).unwrap().into_machine().unwrap();
    machine.insert_rotors(rotors).unwrap();
    machine.set_rotors(positions).unwrap();
    machine
}

fn press(machine: &mut Machine) -> String {
    machine.convert(0).unwrap();
    machine.positions()
}

// ═══════════════════════════════════════════════════════════════════════
// Double step
// ═══════════════════════════════════════════════════════════════════════

/// The classic sequence: III turns II at V, II then turns I and itself at E.
#[test]
fn double_step_sequence_adu() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "ADU");
    let seen: Vec<String> = (0..4).map(|_| press(&mut m)).collect();
    assert_eq!(seen, vec!["ADV", "AEW", "BFX", "BFY"]);
}

/// Middle and right rotors both on their notches: all three move once.
#[test]
fn aligned_notches_step_each_rotor_once() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "AEV");
    assert_eq!(press(&mut m), "BFW");
}

/// Right rotor one step before its notch: only it moves, then the carry.
#[test]
fn carry_happens_on_the_keypress_after_the_notch_is_reached() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "ADV");
    assert_eq!(press(&mut m), "AEW");
    assert_eq!(press(&mut m), "BFX");
}

/// The leftmost moving rotor's notch has nothing to drive.
#[test]
fn leftmost_notch_is_inert() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "QDV");
    assert_eq!(press(&mut m), "QEW");
    assert_eq!(press(&mut m), "RFX");
}

// ═══════════════════════════════════════════════════════════════════════
// Period and long runs
// ═══════════════════════════════════════════════════════════════════════

/// Double stepping shortens the period to 26 * 25 * 26.
#[test]
fn period_of_three_rotor_stack() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "AAA");
    let mut count = 0;
    loop {
        count += 1;
        if press(&mut m) == "AAA" {
            break;
        }
        assert!(count < 26 * 26 * 26, "stepping never returned to AAA");
    }
    assert_eq!(count, 16_900);
}

#[test]
fn positions_after_676_presses() {
    let mut m = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "AAA");
    for _ in 0..676 {
        m.convert(0).unwrap();
    }
    assert_eq!(m.positions(), "BBA");
}

// ═══════════════════════════════════════════════════════════════════════
// Fixed rotors and two-notch rotors
// ═══════════════════════════════════════════════════════════════════════

/// The fixed fourth rotor of an M4 never turns, even when its right
/// neighbour sits on a notch.
#[test]
fn fixed_rotor_ignores_notch() {
    let mut m = machine(M4_CONF, &["B", "Beta", "I", "II", "III"], "AQEV");
    assert_eq!(press(&mut m), "ARFW");
}

/// VI, VII and VIII turn over at both Z and M.
#[test]
fn two_notch_rotor_carries_at_each_notch() {
    let mut m = machine(M4_CONF, &["B", "Beta", "I", "II", "VI"], "AAAL");
    assert_eq!(press(&mut m), "AAAM");
    assert_eq!(press(&mut m), "AABN");
    m.set_rotors("AAAZ").unwrap();
    assert_eq!(press(&mut m), "AABA");
}

/// Stepping runs before substitution: the first symbol is enciphered at
/// the stepped position.
#[test]
fn step_precedes_substitution() {
    let mut from_aaa = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "AAA");
    let mut from_aaz = machine(ENIGMA_I_CONF, &["B", "I", "II", "III"], "AAZ");
    from_aaz.convert_char('A').unwrap();
    assert_eq!(from_aaz.positions(), "AAA");

    // Both now step to AAB before converting.
    assert_eq!(from_aaa.convert_char('A').unwrap(), 'B');
    assert_eq!(from_aaz.convert_char('A').unwrap(), 'B');
    assert_eq!(from_aaa.positions(), "AAB");
}
