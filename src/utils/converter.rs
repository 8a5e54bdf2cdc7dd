//! Message text conversion helpers.
//!
//! Ciphertext is conventionally written in five-symbol groups; these helpers
//! strip and regroup message text around [`Machine`](crate::Machine)
//! conversion.

/// Number of symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Removes every whitespace character from `msg`.
///
/// # Examples
///
/// ```
/// use enigma::utils::converter::strip_whitespace;
///
/// assert_eq!(strip_whitespace(" HELLO\tWOR LD "), "HELLOWORLD");
/// ```
pub fn strip_whitespace(msg: &str) -> String {
    msg.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits `msg` into groups of [`GROUP_SIZE`] symbols separated by single
/// spaces. The last group may be shorter.
///
/// # Examples
///
/// ```
/// use enigma::utils::converter::group_by_five;
///
/// assert_eq!(group_by_five("QVPQSOKOILPUBKJ"), "QVPQS OKOIL PUBKJ");
/// assert_eq!(group_by_five("ABCDEFG"), "ABCDE FG");
/// ```
pub fn group_by_five(msg: &str) -> String {
    let mut output = String::with_capacity(msg.len() + msg.len() / GROUP_SIZE);
    for (i, c) in msg.chars().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            output.push(' ');
        }
        output.push(c);
    }
    output
}
