//! eyesfree audio lexicon builder
//!
//! Produces one spoken audio clip per entry of a fixed vocabulary: a list of
//! phrases, then the letters `a`..`z`, then the digits `0`..`9`.
//!
//! # Pipeline
//!
//! For each entry whose output file does not exist yet:
//!
//! 1. `say` synthesizes the text (with a `[[rate N]]` directive on stdin)
//! 2. `sox` converts the result to raw 16-bit mono little-endian samples
//! 3. A 1024-byte NIST SPHERE header is written declaring
//!    `raw bytes / 2 + padding` samples
//! 4. Header, samples and a silence buffer are concatenated
//! 5. `sox` converts the SPHERE file to the output format inside the
//!    scratch directory; only a successful result is moved to the output path
//! 6. Intermediate files are removed
//!
//! An existing output file means the entry is done, so an interrupted build
//! can simply be run again. The first command that exits non-zero aborts
//! the whole build; [`LexiconError::exit_code`] carries its status.
//!
//! # File names
//!
//! Spaces become underscores (`caps lock` -> `caps_lock.wav`) and digits are
//! prefixed (`5` -> `num_5.wav`) so they never clash with other names.
//!
//! # Crate Structure
//!
//! - [`lexicon`] - The vocabulary and file naming
//! - [`sphere`] - SPHERE header encoding and silence
//! - [`builder`] - Configuration and the per-entry pipeline
//! - [`scratch`] - Intermediate file handling
//! - [`error`] - Error types

pub mod builder;
pub mod error;
pub mod lexicon;
pub mod scratch;
pub mod sphere;

pub use builder::{
    BuildEvent, BuildReport, ClipResult, ClipStatus, LexiconBuilder, LexiconConfig, PlannedClip,
};
pub use error::{LexiconError, LexiconResult};
pub use lexicon::{EntryKind, Lexicon, LexiconEntry};
pub use sphere::{SphereHeader, HEADER_SIZE};
