//! Sequential, best-effort package installation.

use eyesfree_exec::{CommandRunner, Invocation};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::discover::discover_packages;
use crate::error::InstallResult;

/// Default directory holding the packages, relative to the working directory.
pub const DEFAULT_SOURCE_DIR: &str = "apks";

/// Configuration for a batch install.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    /// Directory containing the package files.
    pub source_dir: PathBuf,
    /// Pass `-r` so already-installed packages are replaced.
    pub reinstall: bool,
    /// Target device serial (`adb -s`), when more than one is attached.
    pub serial: Option<String>,
    /// Only install files with this extension.
    pub extension: Option<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            reinstall: true,
            serial: None,
            extension: None,
        }
    }
}

impl InstallerConfig {
    /// Creates a config for the given package directory.
    pub fn with_source_dir(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            ..Default::default()
        }
    }

    /// Sets whether to pass the reinstall flag.
    pub fn reinstall(mut self, reinstall: bool) -> Self {
        self.reinstall = reinstall;
        self
    }

    /// Sets the target device serial.
    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Restricts installation to files with `extension`.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

/// Outcome of installing one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageResult {
    /// Path to the package file.
    pub path: PathBuf,
    /// Exit code of the install command (`None` if killed by a signal).
    pub exit_code: Option<i32>,
    /// Whether the install command exited with status 0.
    pub success: bool,
}

/// Summary of a batch install.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    /// Directory the packages were read from.
    pub source_dir: PathBuf,
    /// Per-package results, in install order.
    pub packages: Vec<PackageResult>,
    /// Number of install commands run.
    pub attempted: usize,
    /// Number that exited with status 0.
    pub succeeded: usize,
    /// Number that exited non-zero.
    pub failed: usize,
}

impl InstallReport {
    fn push(&mut self, result: PackageResult) {
        self.attempted += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.packages.push(result);
    }
}

/// Progress notifications emitted during [`Installer::install_all_with`].
#[derive(Debug, Clone, Copy)]
pub enum InstallEvent<'a> {
    /// About to run the install command for a package.
    Started {
        index: usize,
        total: usize,
        package: &'a Path,
    },
    /// The install command for a package has exited.
    Finished(&'a PackageResult),
}

/// Installs every package in a directory, one at a time.
#[derive(Debug, Clone)]
pub struct Installer {
    config: InstallerConfig,
    adb: PathBuf,
}

impl Installer {
    /// Creates an installer that runs the device bridge at `adb`.
    pub fn new(config: InstallerConfig, adb: impl Into<PathBuf>) -> Self {
        Self {
            config,
            adb: adb.into(),
        }
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    /// Path of the device bridge executable.
    pub fn adb(&self) -> &Path {
        &self.adb
    }

    /// Lists the packages that would be installed.
    pub fn packages(&self) -> InstallResult<Vec<PathBuf>> {
        discover_packages(&self.config.source_dir, self.config.extension.as_deref())
    }

    /// Builds `adb [-s serial] install [-r] <package>`.
    pub fn invocation_for(&self, package: &Path) -> Invocation {
        let mut inv = Invocation::new(&self.adb);
        if let Some(ref serial) = self.config.serial {
            inv = inv.args(["-s", serial.as_str()]);
        }
        inv = inv.arg("install");
        if self.config.reinstall {
            inv = inv.arg("-r");
        }
        inv.arg(package)
    }

    /// Returns every invocation a batch install would run, in order.
    pub fn plan(&self) -> InstallResult<Vec<Invocation>> {
        Ok(self
            .packages()?
            .iter()
            .map(|p| self.invocation_for(p))
            .collect())
    }

    /// Installs every package.
    pub fn install_all<R: CommandRunner>(&self, runner: &R) -> InstallResult<InstallReport> {
        self.install_all_with(runner, |_| {})
    }

    /// Installs every package, reporting progress to `on_event`.
    ///
    /// Each install command is waited on before the next starts. A non-zero
    /// exit is recorded and the batch moves on; only failure to run the
    /// command at all stops it.
    pub fn install_all_with<R, F>(&self, runner: &R, mut on_event: F) -> InstallResult<InstallReport>
    where
        R: CommandRunner,
        F: FnMut(InstallEvent<'_>),
    {
        let packages = self.packages()?;
        let total = packages.len();
        let mut report = InstallReport {
            source_dir: self.config.source_dir.clone(),
            ..Default::default()
        };

        for (index, package) in packages.iter().enumerate() {
            on_event(InstallEvent::Started {
                index,
                total,
                package,
            });

            let outcome = runner.run(&self.invocation_for(package))?;
            let result = PackageResult {
                path: package.clone(),
                exit_code: outcome.code(),
                success: outcome.is_success(),
            };

            on_event(InstallEvent::Finished(&result));
            report.push(result);
        }

        Ok(report)
    }
}
