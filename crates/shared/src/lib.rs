//! Types shared by the deck library and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
