//! eyesfree CLI library.
//!
//! Command implementations for the `eyesfree` binary: batch package
//! installation, speech clip generation and a dependency check.

pub mod commands;
