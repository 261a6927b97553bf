//! Synchronous process invocation.
//!
//! Every invocation is spawned and waited on before the caller continues.
//! The child's stdout and stderr are inherited, so failure output is whatever
//! the tool itself prints.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{ExecError, ExecResult};

/// A single external command: program, arguments, optional stdin text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    stdin: Option<String>,
    current_dir: Option<PathBuf>,
}

impl Invocation {
    /// Creates an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            current_dir: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Sets text to feed on standard input. The pipe is closed afterwards.
    pub fn stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    /// Sets the working directory of the child.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    pub fn stdin_text(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// Returns the bare file name of the program, e.g. `sox`.
    pub fn program_name(&self) -> String {
        self.program
            .file_stem()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .to_string()
    }

    /// Returns the arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    /// Builds the `std::process::Command` for this invocation.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.current_dir {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        if let Some(ref text) = self.stdin {
            write!(f, " <<< {}", quote(text))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    code: Option<i32>,
}

impl Outcome {
    /// An outcome with exit code 0.
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    /// An outcome with the given exit code.
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// An outcome with no exit code (terminated by a signal).
    pub fn killed() -> Self {
        Self { code: None }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

/// Runs invocations to completion, one at a time.
pub trait CommandRunner {
    /// Runs `invocation` and blocks until it exits.
    ///
    /// A non-zero exit is reported through [`Outcome`], not as an error;
    /// errors mean the process could not be run at all.
    fn run(&self, invocation: &Invocation) -> ExecResult<Outcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> ExecResult<Outcome> {
        (**self).run(invocation)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, invocation: &Invocation) -> ExecResult<Outcome> {
        (**self).run(invocation)
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends the child's stdout to our stderr, keeping our stdout clean for
    /// machine-readable output.
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> ExecResult<Outcome> {
        let mut cmd = invocation.to_command();

        if invocation.stdin_text().is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }
        if self.stdout_to_stderr {
            cmd.stdout(Stdio::from(std::io::stderr()));
        } else {
            cmd.stdout(Stdio::inherit());
        }
        cmd.stderr(Stdio::inherit());

        let mut child = cmd
            .spawn()
            .map_err(|e| ExecError::spawn_failed(invocation.program(), e))?;

        // Dropping the handle closes the pipe so the child sees EOF.
        let fed = match (invocation.stdin_text(), child.stdin.take()) {
            (Some(text), Some(mut stdin)) => stdin.write_all(text.as_bytes()),
            _ => Ok(()),
        };

        let status = child
            .wait()
            .map_err(|e| ExecError::wait_failed(invocation.program(), e))?;
        let outcome = Outcome::from_status(status);

        // A tool that exits early may close stdin first; its exit status is
        // the more useful report in that case.
        if outcome.is_success() {
            fed.map_err(|e| ExecError::stdin_failed(invocation.program(), e))?;
        }

        Ok(outcome)
    }
}
