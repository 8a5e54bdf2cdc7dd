//! Text utilities shared by the session driver and the binary.

pub mod converter;
