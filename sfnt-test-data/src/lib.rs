//! Shared data and helpers for testing the sfnt crates.

#![forbid(unsafe_code)]

mod bebuffer;
pub mod test_fonts;

pub use bebuffer::BeBuffer;
