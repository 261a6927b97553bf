//! eyesfree batch installer
//!
//! Installs every package file found in a directory onto a connected Android
//! device by running `adb install -r <package>` once per file.
//!
//! - Packages are installed in directory-listing order, one at a time; each
//!   install command is waited on before the next starts.
//! - Installation is best-effort: a package whose install command exits
//!   non-zero is recorded in the [`InstallReport`] and the batch continues.
//!   There are no retries.
//! - Only failure to list the directory or to run `adb` at all stops the batch.
//!
//! # Example
//!
//! ```ignore
//! use eyesfree_exec::{SystemRunner, Tool, ToolLocator};
//! use eyesfree_installer::{Installer, InstallerConfig};
//!
//! let adb = ToolLocator::new().locate(Tool::Adb)?;
//! let installer = Installer::new(InstallerConfig::with_source_dir("apks"), adb);
//! let report = installer.install_all(&SystemRunner::new())?;
//! println!("{} of {} installed", report.succeeded, report.attempted);
//! ```

pub mod discover;
pub mod error;
pub mod install;

pub use discover::discover_packages;
pub use error::{InstallError, InstallResult};
pub use install::{
    InstallEvent, InstallReport, Installer, InstallerConfig, PackageResult, DEFAULT_SOURCE_DIR,
};
