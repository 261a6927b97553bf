//! Intermediate files for one build.
//!
//! Intermediates live in a private temporary directory. The per-entry files
//! are removed after each entry; the directory itself, silence buffer
//! included, is removed when [`Scratch`] is dropped, whether the build
//! finished or failed.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LexiconError, LexiconResult};

/// Names of the intermediate files under a scratch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    root: PathBuf,
}

impl ScratchPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Synthesizer output.
    pub fn synth(&self) -> PathBuf {
        self.root.join("synth.aiff")
    }

    /// Headerless samples converted from the synthesizer output.
    pub fn raw(&self) -> PathBuf {
        self.root.join("synth.raw")
    }

    /// Silence appended to every clip; written once per build.
    pub fn silence(&self) -> PathBuf {
        self.root.join("silence.raw")
    }

    /// Header, samples and silence, ready for the final conversion.
    pub fn combined(&self) -> PathBuf {
        self.root.join("combined.sph")
    }

    /// Output of the final conversion, before it is moved into place.
    pub fn converted(&self, extension: &str) -> PathBuf {
        self.root.join(format!("converted.{}", extension))
    }

    /// Files that belong to a single entry.
    pub fn per_entry(&self) -> [PathBuf; 3] {
        [self.synth(), self.raw(), self.combined()]
    }
}

/// Owns the scratch directory for one build.
#[derive(Debug)]
pub struct Scratch {
    dir: tempfile::TempDir,
    paths: ScratchPaths,
}

impl Scratch {
    /// Creates a fresh scratch directory, under `parent` if given.
    pub fn create(parent: Option<&Path>) -> LexiconResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("eyesfree-lexicon-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(LexiconError::ScratchFailed)?;

        let paths = ScratchPaths::new(dir.path());
        Ok(Self { dir, paths })
    }

    pub fn paths(&self) -> &ScratchPaths {
        &self.paths
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes the silence buffer.
    pub fn write_silence(&self, bytes: &[u8]) -> LexiconResult<()> {
        let path = self.paths.silence();
        fs::write(&path, bytes).map_err(|e| LexiconError::io(path, e))
    }

    /// Removes the per-entry intermediates. Missing files are fine.
    pub fn clear_entry(&self) -> LexiconResult<()> {
        for path in self.paths.per_entry() {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(LexiconError::io(path, e)),
            }
        }
        Ok(())
    }
}
