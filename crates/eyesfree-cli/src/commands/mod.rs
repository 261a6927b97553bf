//! CLI command implementations

pub mod doctor;
pub mod install;
pub mod lexicon;

mod reporting;
