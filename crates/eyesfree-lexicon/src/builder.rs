//! The per-entry synthesis pipeline.

use eyesfree_exec::{CommandRunner, Invocation};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{LexiconError, LexiconResult};
use crate::lexicon::{Lexicon, LexiconEntry};
use crate::scratch::{Scratch, ScratchPaths};
use crate::sphere::{self, SphereHeader};

/// Default speaking rate, in words per minute.
pub const DEFAULT_RATE: u32 = 200;

/// Default sample rate of the raw stream.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Default silence appended to every clip, in samples.
pub const DEFAULT_PADDING_SAMPLES: u64 = 4410;

/// Default output file extension; the final conversion picks its format from it.
pub const DEFAULT_EXTENSION: &str = "wav";

/// Configuration for a lexicon build.
#[derive(Debug, Clone)]
pub struct LexiconConfig {
    /// Directory the finished clips are written to.
    pub out_dir: PathBuf,
    /// Output file extension.
    pub extension: String,
    /// Speaking rate passed to the synthesizer.
    pub rate: u32,
    /// Sample rate of the raw stream and header.
    pub sample_rate: u32,
    /// Silence appended after each clip, in samples.
    pub padding_samples: u64,
    /// Regenerate clips whose output file already exists.
    pub force: bool,
    /// Only build these entries (by text). Empty means all.
    pub only: Vec<String>,
    /// Parent directory for the scratch directory (system temp if unset).
    pub scratch_parent: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            rate: DEFAULT_RATE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            padding_samples: DEFAULT_PADDING_SAMPLES,
            force: false,
            only: Vec::new(),
            scratch_parent: None,
        }
    }
}

impl LexiconConfig {
    /// Creates a config writing to `out_dir`.
    pub fn with_out_dir(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the output extension.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the speaking rate.
    pub fn rate(mut self, rate: u32) -> Self {
        self.rate = rate;
        self
    }

    /// Sets whether existing clips are regenerated.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Restricts the build to the given entries.
    pub fn only<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = texts.into_iter().map(Into::into).collect();
        self
    }

    /// Sets where the scratch directory is created.
    pub fn scratch_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scratch_parent = Some(parent.into());
        self
    }

    fn validate(&self) -> LexiconResult<()> {
        if self.rate == 0 {
            return Err(LexiconError::invalid_config("rate must be greater than 0"));
        }
        if self.sample_rate == 0 {
            return Err(LexiconError::invalid_config(
                "sample rate must be greater than 0",
            ));
        }
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains(['/', '\\']) {
            return Err(LexiconError::invalid_config(format!(
                "invalid output extension '{}'",
                self.extension
            )));
        }
        Ok(())
    }
}

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipStatus {
    /// The output already existed; nothing was run.
    Skipped,
    /// The clip was synthesized.
    Generated,
}

/// Result for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipResult {
    /// Entry text.
    pub text: String,
    /// Output file path.
    pub path: PathBuf,
    pub status: ClipStatus,
    /// Samples declared in the header, for generated clips.
    pub sample_count: Option<u64>,
}

/// Summary of a lexicon build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Output directory.
    pub out_dir: PathBuf,
    /// Per-entry results, in lexicon order.
    pub clips: Vec<ClipResult>,
    pub generated: usize,
    pub skipped: usize,
}

impl BuildReport {
    fn push(&mut self, clip: ClipResult) {
        match clip.status {
            ClipStatus::Generated => self.generated += 1,
            ClipStatus::Skipped => self.skipped += 1,
        }
        self.clips.push(clip);
    }
}

/// Progress notifications emitted during [`LexiconBuilder::build_with`].
#[derive(Debug, Clone, Copy)]
pub enum BuildEvent<'a> {
    /// Output exists; the entry is skipped.
    Skipped {
        entry: &'a LexiconEntry,
        output: &'a Path,
    },
    /// Starting the pipeline for an entry.
    Generating {
        index: usize,
        total: usize,
        entry: &'a LexiconEntry,
        output: &'a Path,
    },
    /// Finished the pipeline for an entry.
    Generated {
        entry: &'a LexiconEntry,
        output: &'a Path,
        sample_count: u64,
    },
}

/// One entry of a build plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedClip {
    pub entry: LexiconEntry,
    pub output: PathBuf,
    /// Commands that would run; empty if the entry would be skipped.
    pub invocations: Vec<Invocation>,
}

/// Builds the lexicon's clips with `say` and `sox`.
#[derive(Debug, Clone)]
pub struct LexiconBuilder {
    config: LexiconConfig,
    lexicon: Lexicon,
    say: PathBuf,
    sox: PathBuf,
}

impl LexiconBuilder {
    /// Creates a builder for the standard lexicon.
    pub fn new(
        config: LexiconConfig,
        say: impl Into<PathBuf>,
        sox: impl Into<PathBuf>,
    ) -> LexiconResult<Self> {
        Self::with_lexicon(config, Lexicon::standard(), say, sox)
    }

    /// Creates a builder for a custom lexicon.
    pub fn with_lexicon(
        config: LexiconConfig,
        lexicon: Lexicon,
        say: impl Into<PathBuf>,
        sox: impl Into<PathBuf>,
    ) -> LexiconResult<Self> {
        config.validate()?;
        let lexicon = if config.only.is_empty() {
            lexicon
        } else {
            lexicon
                .restrict(&config.only)
                .map_err(|text| LexiconError::UnknownEntry { text })?
        };

        Ok(Self {
            config,
            lexicon,
            say: say.into(),
            sox: sox.into(),
        })
    }

    pub fn config(&self) -> &LexiconConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Output path for `entry`.
    pub fn output_path(&self, entry: &LexiconEntry) -> PathBuf {
        self.config.out_dir.join(entry.file_name(self.extension()))
    }

    fn needs_generation(&self, output: &Path) -> bool {
        self.config.force || !output.exists()
    }

    /// `say -o <synth>` with the rate directive and text on stdin.
    pub fn synth_invocation(&self, entry: &LexiconEntry, paths: &ScratchPaths) -> Invocation {
        Invocation::new(&self.say)
            .arg("-o")
            .arg(paths.synth())
            .stdin(format!("[[rate {}]]{}", self.config.rate, entry.text()))
    }

    /// `sox <synth> <raw>`: 16-bit signed mono little-endian at the configured rate.
    pub fn raw_invocation(&self, paths: &ScratchPaths) -> Invocation {
        Invocation::new(&self.sox)
            .arg(paths.synth())
            .args(["-t", "raw", "-r"])
            .arg(self.config.sample_rate.to_string())
            .args(["-c", "1", "-b", "16", "-e", "signed-integer", "-L"])
            .arg(paths.raw())
    }

    fn extension(&self) -> &str {
        self.config.extension.trim_start_matches('.')
    }

    /// `sox <combined> <scratch>/converted.<ext>`.
    ///
    /// The result is moved to the output path only once sox has succeeded.
    pub fn final_invocation(&self, paths: &ScratchPaths) -> Invocation {
        Invocation::new(&self.sox)
            .arg(paths.combined())
            .arg(paths.converted(self.extension()))
    }

    /// Lists what a build would do, without running anything.
    ///
    /// Scratch paths are shown under `scratch_root`.
    pub fn plan(&self, scratch_root: &Path) -> Vec<PlannedClip> {
        let paths = ScratchPaths::new(scratch_root);
        self.lexicon
            .entries()
            .iter()
            .map(|entry| {
                let output = self.output_path(entry);
                let invocations = if self.needs_generation(&output) {
                    vec![
                        self.synth_invocation(entry, &paths),
                        self.raw_invocation(&paths),
                        self.final_invocation(&paths),
                    ]
                } else {
                    Vec::new()
                };
                PlannedClip {
                    entry: entry.clone(),
                    output,
                    invocations,
                }
            })
            .collect()
    }

    /// Builds every missing clip.
    pub fn build<R: CommandRunner>(&self, runner: &R) -> LexiconResult<BuildReport> {
        self.build_with(runner, |_| {})
    }

    /// Builds every missing clip, reporting progress to `on_event`.
    ///
    /// The first command that exits non-zero aborts the build with
    /// [`LexiconError::CommandFailed`]. Intermediate files are removed after
    /// each entry and, on any exit path, when the scratch directory drops.
    pub fn build_with<R, F>(&self, runner: &R, mut on_event: F) -> LexiconResult<BuildReport>
    where
        R: CommandRunner,
        F: FnMut(BuildEvent<'_>),
    {
        fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| LexiconError::io(&self.config.out_dir, e))?;

        let scratch = Scratch::create(self.config.scratch_parent.as_deref())?;
        scratch.write_silence(&sphere::silence(self.config.padding_samples))?;

        let entries = self.lexicon.entries();
        let total = entries.len();
        let mut report = BuildReport {
            out_dir: self.config.out_dir.clone(),
            ..Default::default()
        };

        for (index, entry) in entries.iter().enumerate() {
            let output = self.output_path(entry);

            if !self.needs_generation(&output) {
                on_event(BuildEvent::Skipped {
                    entry,
                    output: &output,
                });
                report.push(ClipResult {
                    text: entry.text().to_string(),
                    path: output,
                    status: ClipStatus::Skipped,
                    sample_count: None,
                });
                continue;
            }

            on_event(BuildEvent::Generating {
                index,
                total,
                entry,
                output: &output,
            });

            let sample_count = self.generate(runner, &scratch, entry, &output)?;

            on_event(BuildEvent::Generated {
                entry,
                output: &output,
                sample_count,
            });
            report.push(ClipResult {
                text: entry.text().to_string(),
                path: output,
                status: ClipStatus::Generated,
                sample_count: Some(sample_count),
            });
        }

        Ok(report)
    }

    /// Runs the pipeline for one entry; returns the header sample count.
    fn generate<R: CommandRunner>(
        &self,
        runner: &R,
        scratch: &Scratch,
        entry: &LexiconEntry,
        output: &Path,
    ) -> LexiconResult<u64> {
        let paths = scratch.paths();

        run_checked(runner, &self.synth_invocation(entry, paths))?;
        run_checked(runner, &self.raw_invocation(paths))?;

        let raw = paths.raw();
        let raw_len = fs::metadata(&raw)
            .map_err(|e| LexiconError::io(&raw, e))?
            .len();
        let sample_count = sphere::sample_count(raw_len) + self.config.padding_samples;
        let header = SphereHeader::pcm16_mono(self.config.sample_rate, sample_count).encode()?;

        let combined = paths.combined();
        concatenate(&combined, &header, &[raw.as_path(), paths.silence().as_path()])
            .map_err(|e| LexiconError::io(&combined, e))?;

        run_checked(runner, &self.final_invocation(paths))?;
        let converted = paths.converted(self.extension());
        publish(&converted, output).map_err(|e| LexiconError::io(output, e))?;
        scratch.clear_entry()?;

        Ok(sample_count)
    }
}

fn run_checked<R: CommandRunner>(runner: &R, invocation: &Invocation) -> LexiconResult<()> {
    let outcome = runner.run(invocation)?;
    if outcome.is_success() {
        Ok(())
    } else {
        Err(LexiconError::command_failed(
            invocation.program_name(),
            outcome.code(),
        ))
    }
}

/// Moves a finished clip into place.
///
/// `dest` only ever appears complete: a cross-device move is staged next to
/// it and renamed over it.
fn publish(src: &Path, dest: &Path) -> io::Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut File::open(src)?, staged.as_file_mut())?;
    staged.persist(dest).map_err(|e| e.error)?;
    fs::remove_file(src)
}

/// Writes `head` followed by the contents of each file in `parts`.
fn concatenate(dest: &Path, head: &[u8], parts: &[&Path]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(dest)?);
    out.write_all(head)?;
    for part in parts {
        let mut input = File::open(part)?;
        io::copy(&mut input, &mut out)?;
    }
    out.flush()
}
