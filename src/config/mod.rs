//! JSON runtime configuration for the demo tooling.

pub mod tracks;
