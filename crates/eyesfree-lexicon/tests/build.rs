//! Lexicon builds against fake `say` and `sox`.
//!
//! The fake `say` writes its stdin text as the "audio"; the fake `sox` turns
//! every byte of that into one 16-bit sample for the raw stream, and copies
//! the SPHERE file unchanged for the final conversion. That makes the header
//! sample count predictable from the entry text.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use eyesfree_exec::testing::RecordingRunner;
use eyesfree_exec::{Invocation, Outcome};
use eyesfree_lexicon::sphere::parse_sample_count;
use eyesfree_lexicon::{
    ClipStatus, EntryKind, LexiconBuilder, LexiconConfig, LexiconEntry, LexiconError, HEADER_SIZE,
};
use pretty_assertions::assert_eq;

const PADDING: u64 = 4410;

fn fake_tool(inv: &Invocation) -> Outcome {
    let args = inv.args_lossy();
    match inv.program_name().as_str() {
        "say" => {
            let text = inv.stdin_text().unwrap_or_default();
            fs::write(&args[1], text.as_bytes()).unwrap();
        }
        "sox" => {
            let src = &args[0];
            let dst = args.last().unwrap();
            if dst.ends_with(".raw") {
                let synth = fs::read(src).unwrap();
                let raw: Vec<u8> = synth.iter().flat_map(|b| [*b, 0]).collect();
                fs::write(dst, raw).unwrap();
            } else {
                fs::copy(src, dst).unwrap();
            }
        }
        _ => return Outcome::from_code(127),
    }
    Outcome::success()
}

fn fake_tools() -> RecordingRunner {
    RecordingRunner::with_handler(fake_tool)
}

/// Fake tools where call `n` (zero-based) exits with `code` and does nothing.
fn fake_tools_failing_at(n: usize, code: i32) -> RecordingRunner {
    let counter = Cell::new(0usize);
    RecordingRunner::with_handler(move |inv| {
        let index = counter.get();
        counter.set(index + 1);
        if index == n {
            Outcome::from_code(code)
        } else {
            fake_tool(inv)
        }
    })
}

struct Dirs {
    out: tempfile::TempDir,
    scratch: tempfile::TempDir,
}

impl Dirs {
    fn new() -> Self {
        Self {
            out: tempfile::tempdir().unwrap(),
            scratch: tempfile::tempdir().unwrap(),
        }
    }

    fn config(&self) -> LexiconConfig {
        LexiconConfig::with_out_dir(self.out.path()).scratch_parent(self.scratch.path())
    }

    fn output(&self, name: &str) -> PathBuf {
        self.out.path().join(name)
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.scratch.path()).unwrap().count() == 0
    }
}

fn expected_samples(text: &str, rate: u32) -> u64 {
    format!("[[rate {}]]{}", rate, text).len() as u64
}

#[test]
fn test_full_build_runs_three_commands_per_entry() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    let runner = fake_tools();

    let report = builder.build(&runner).unwrap();

    let total = builder.lexicon().len();
    assert_eq!(report.generated, total);
    assert_eq!(report.skipped, 0);
    assert_eq!(runner.call_count(), total * 3);

    let names = runner.program_names();
    for chunk in names.chunks(3) {
        assert_eq!(chunk, ["say", "sox", "sox"]);
    }

    for entry in builder.lexicon().entries() {
        assert!(builder.output_path(entry).exists(), "{}", entry.text());
    }
    assert!(dirs.scratch_is_empty());
}

#[test]
fn test_header_declares_raw_samples_plus_padding() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(
        dirs.config().only(["caps lock", "you are about to call", "x"]),
        "say",
        "sox",
    )
    .unwrap();

    let report = builder.build(&fake_tools()).unwrap();

    for clip in &report.clips {
        let bytes = fs::read(&clip.path).unwrap();
        let raw_samples = expected_samples(&clip.text, 200);

        assert_eq!(parse_sample_count(&bytes), Some(raw_samples + PADDING));
        assert_eq!(clip.sample_count, Some(raw_samples + PADDING));
        assert_eq!(
            bytes.len() as u64,
            HEADER_SIZE as u64 + raw_samples * 2 + PADDING * 2
        );
        assert!(bytes[bytes.len() - (PADDING as usize * 2)..]
            .iter()
            .all(|&b| b == 0));
        assert!(bytes.starts_with(b"NIST_1A\n   1024\n"));
    }
}

#[test]
fn test_header_size_independent_of_text_length() {
    let dirs = Dirs::new();
    let builder =
        LexiconBuilder::new(dirs.config().only(["a", "press call to dial"]), "say", "sox").unwrap();
    builder.build(&fake_tools()).unwrap();

    for name in ["a.wav", "press_call_to_dial.wav"] {
        let bytes = fs::read(dirs.output(name)).unwrap();
        let end = bytes
            .windows(b"end_head\n".len())
            .position(|w| w == b"end_head\n")
            .unwrap();
        assert!(end < HEADER_SIZE);
        assert!(bytes[end + 9..HEADER_SIZE].iter().all(|&b| b == 0));
    }
}

#[test]
fn test_rerun_runs_nothing() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    builder.build(&fake_tools()).unwrap();

    let runner = fake_tools();
    let report = builder.build(&runner).unwrap();

    assert_eq!(runner.call_count(), 0);
    assert_eq!(report.generated, 0);
    assert_eq!(report.skipped, builder.lexicon().len());
    assert!(report.clips.iter().all(|c| c.status == ClipStatus::Skipped));
}

#[test]
fn test_existing_outputs_are_skipped() {
    let dirs = Dirs::new();
    fs::write(dirs.output("a.wav"), b"existing").unwrap();
    fs::write(dirs.output("num_5.wav"), b"existing").unwrap();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    let runner = fake_tools();

    let report = builder.build(&runner).unwrap();

    assert_eq!(report.skipped, 2);
    assert_eq!(runner.call_count(), (builder.lexicon().len() - 2) * 3);
    for call in runner.calls() {
        let stdin = call.stdin_text().unwrap_or("");
        assert_ne!(stdin, "[[rate 200]]a");
        assert_ne!(stdin, "[[rate 200]]5");
    }
    assert_eq!(fs::read(dirs.output("a.wav")).unwrap(), b"existing");
}

#[test]
fn test_force_regenerates_existing() {
    let dirs = Dirs::new();
    fs::write(dirs.output("a.wav"), b"existing").unwrap();
    let builder = LexiconBuilder::new(dirs.config().only(["a"]).force(true), "say", "sox").unwrap();
    let runner = fake_tools();

    builder.build(&runner).unwrap();

    assert_eq!(runner.call_count(), 3);
    assert_ne!(fs::read(dirs.output("a.wav")).unwrap(), b"existing");
}

#[test]
fn test_failure_aborts_with_exit_status() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    // Second entry's raw conversion.
    let runner = fake_tools_failing_at(4, 3);

    let err = builder.build(&runner).unwrap_err();

    assert!(matches!(err, LexiconError::CommandFailed { ref program, .. } if program == "sox"));
    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(runner.call_count(), 5);

    let entries = builder.lexicon().entries();
    assert!(builder.output_path(&entries[0]).exists());
    assert!(!builder.output_path(&entries[1]).exists());
    assert!(dirs.scratch_is_empty());
}

#[test]
fn test_failed_final_conversion_leaves_no_output() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config().only(["a"]), "say", "sox").unwrap();
    // The final conversion writes part of its output, then fails.
    let runner = RecordingRunner::with_handler(|inv| {
        let args = inv.args_lossy();
        if inv.program_name() == "sox" && args[0].ends_with(".sph") {
            fs::write(args.last().unwrap(), b"trunc").unwrap();
            return Outcome::from_code(2);
        }
        fake_tool(inv)
    });

    let err = builder.build(&runner).unwrap_err();

    assert_eq!(err.exit_code(), Some(2));
    assert!(!dirs.output("a.wav").exists());
    assert!(dirs.scratch_is_empty());

    let rerun = fake_tools();
    let report = builder.build(&rerun).unwrap();
    assert_eq!(rerun.call_count(), 3);
    assert_eq!(report.generated, 1);
    assert_ne!(fs::read(dirs.output("a.wav")).unwrap(), b"trunc");
}

#[test]
fn test_synth_failure_stops_before_conversion() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    let runner = fake_tools_failing_at(0, 1);

    let err = builder.build(&runner).unwrap_err();

    assert_eq!(err.exit_code(), Some(1));
    assert_eq!(runner.program_names(), vec!["say"]);
    assert!(dirs.scratch_is_empty());
}

#[test]
fn test_intermediates_removed_between_entries() {
    let dirs = Dirs::new();
    let leftovers: Rc<RefCell<Vec<Vec<String>>>> = Rc::default();
    let seen = Rc::clone(&leftovers);

    let runner = RecordingRunner::with_handler(move |inv| {
        if inv.program_name() == "say" {
            let synth = PathBuf::from(&inv.args_lossy()[1]);
            let mut names: Vec<String> = fs::read_dir(synth.parent().unwrap())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            seen.borrow_mut().push(names);
        }
        fake_tool(inv)
    });

    let builder = LexiconBuilder::new(dirs.config().only(["a", "b", "c"]), "say", "sox").unwrap();
    builder.build(&runner).unwrap();

    let leftovers = leftovers.borrow();
    assert_eq!(leftovers.len(), 3);
    for names in leftovers.iter() {
        assert_eq!(names, &vec!["silence.raw".to_string()]);
    }
}

#[test]
fn test_digit_outputs_are_prefixed() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config(), "say", "sox").unwrap();
    builder.build(&fake_tools()).unwrap();

    for entry in builder
        .lexicon()
        .entries()
        .iter()
        .filter(|e| e.kind() == EntryKind::Digit)
    {
        let bare = dirs.output(&format!("{}.wav", entry.text()));
        let prefixed = dirs.output(&format!("num_{}.wav", entry.text()));
        assert!(!bare.exists());
        assert!(prefixed.exists());
    }
}

#[test]
fn test_rate_and_extension_flow_through() {
    let dirs = Dirs::new();
    let config = dirs.config().only(["delete"]).rate(150).extension("ogg");
    let builder = LexiconBuilder::new(config, "say", "sox").unwrap();
    let runner = fake_tools();

    let report = builder.build(&runner).unwrap();

    let calls = runner.calls();
    assert_eq!(calls[0].stdin_text(), Some("[[rate 150]]delete"));
    assert!(Path::new(calls[2].arguments().last().unwrap()).ends_with("converted.ogg"));
    assert!(dirs.output("delete.ogg").is_file());
    assert_eq!(
        report.clips[0].sample_count,
        Some(expected_samples("delete", 150) + PADDING)
    );
}

#[test]
fn test_plan_matches_build() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config().only(["period", "z"]), "say", "sox").unwrap();

    let plan = builder.plan(Path::new("<scratch>"));
    let runner = fake_tools();
    builder.build(&runner).unwrap();

    let planned: Vec<(String, String)> = plan
        .iter()
        .flat_map(|p| p.invocations.iter())
        .map(|i| (i.program_name(), i.stdin_text().unwrap_or("").to_string()))
        .collect();
    let ran: Vec<(String, String)> = runner
        .calls()
        .iter()
        .map(|i| (i.program_name(), i.stdin_text().unwrap_or("").to_string()))
        .collect();
    assert_eq!(planned, ran);
    assert_eq!(plan[0].entry, LexiconEntry::new("period"));
}

#[test]
fn test_report_serializes() {
    let dirs = Dirs::new();
    let builder = LexiconBuilder::new(dirs.config().only(["q"]), "say", "sox").unwrap();
    let report = builder.build(&fake_tools()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["generated"], 1);
    assert_eq!(json["clips"][0]["text"], "q");
    assert_eq!(json["clips"][0]["status"], "generated");
}
