//! External tool discovery.
//!
//! Each tool is resolved in this order:
//!
//! 1. An explicit override path (from the command line)
//! 2. The tool's environment variable (`ADB_PATH`, `SAY_PATH`, `SOX_PATH`)
//! 3. System PATH
//! 4. Common installation locations (platform-specific)

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ExecError, ExecResult};

/// An external tool the eyesfree utilities shell out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Android device bridge.
    Adb,
    /// Text-to-speech synthesizer.
    Say,
    /// Audio format converter.
    Sox,
}

impl Tool {
    /// Every known tool, in the order `doctor` reports them.
    pub const ALL: [Tool; 3] = [Tool::Adb, Tool::Say, Tool::Sox];

    /// Returns the bare executable name.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Adb => "adb",
            Tool::Say => "say",
            Tool::Sox => "sox",
        }
    }

    /// Returns the environment variable that overrides the tool location.
    pub fn env_var(&self) -> &'static str {
        match self {
            Tool::Adb => "ADB_PATH",
            Tool::Say => "SAY_PATH",
            Tool::Sox => "SOX_PATH",
        }
    }

    /// Short description of what the tool is needed for.
    pub fn purpose(&self) -> &'static str {
        match self {
            Tool::Adb => "Required by `install` to push packages to a device.",
            Tool::Say => "Required by `lexicon` to synthesize speech.",
            Tool::Sox => "Required by `lexicon` to convert audio formats.",
        }
    }

    fn executable_names(&self) -> Vec<String> {
        if cfg!(windows) {
            vec![format!("{}.exe", self.name()), self.name().to_string()]
        } else {
            vec![self.name().to_string()]
        }
    }

    /// Usual install directories on Windows. `say` is macOS-only.
    fn windows_dirs(&self) -> &'static [&'static str] {
        match self {
            Tool::Adb => &[
                "C:\\Android\\platform-tools",
                "C:\\Program Files (x86)\\Android\\android-sdk\\platform-tools",
            ],
            Tool::Say => &[],
            Tool::Sox => &[
                "C:\\Program Files\\sox",
                "C:\\Program Files (x86)\\sox-14-4-2",
            ],
        }
    }

    fn common_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if *self == Tool::Adb {
            for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
                if let Ok(sdk) = std::env::var(var) {
                    for name in self.executable_names() {
                        paths.push(Path::new(&sdk).join("platform-tools").join(name));
                    }
                }
            }
        }

        let dirs: &[&str] = if cfg!(windows) {
            self.windows_dirs()
        } else if cfg!(target_os = "macos") {
            &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"]
        } else {
            &["/usr/bin", "/usr/local/bin", "/snap/bin"]
        };

        for dir in dirs {
            for name in self.executable_names() {
                paths.push(Path::new(dir).join(name));
            }
        }

        paths
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves tool executables, honouring per-tool overrides.
#[derive(Debug, Clone, Default)]
pub struct ToolLocator {
    overrides: HashMap<Tool, PathBuf>,
}

impl ToolLocator {
    /// Creates a locator with no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit path for a tool.
    pub fn with_override(mut self, tool: Tool, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(tool, path.into());
        self
    }

    /// Sets an explicit path for a tool when one is given.
    pub fn with_optional_override(self, tool: Tool, path: Option<impl Into<PathBuf>>) -> Self {
        match path {
            Some(path) => self.with_override(tool, path),
            None => self,
        }
    }

    /// Finds the executable for `tool`.
    pub fn locate(&self, tool: Tool) -> ExecResult<PathBuf> {
        if let Some(path) = self.overrides.get(&tool) {
            if path.exists() {
                return Ok(path.clone());
            }
        }

        if let Ok(path) = std::env::var(tool.env_var()) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        for name in tool.executable_names() {
            if let Ok(path) = which::which(&name) {
                return Ok(path);
            }
        }

        tool.common_paths()
            .into_iter()
            .find(|path| path.exists())
            .ok_or(ExecError::ToolNotFound {
                tool: tool.name(),
                env_var: tool.env_var(),
            })
    }

    /// Finds the executable for `tool`, falling back to its bare name.
    ///
    /// Used when printing invocations that will not be run.
    pub fn locate_or_name(&self, tool: Tool) -> PathBuf {
        self.locate(tool)
            .unwrap_or_else(|_| PathBuf::from(tool.name()))
    }
}
