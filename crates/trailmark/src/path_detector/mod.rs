//! Detection of system include paths.
//!
//! A [`PathDetector`] looks for a toolchain installation and reports the
//! header search paths it provides. Detectors are grouped in a
//! [`CombinedPathDetector`] so the settings dialog can list the working ones
//! and fill in their paths on request.

mod combined;
mod registry;
mod vs_header;
mod windows_sdk;

use std::path::PathBuf;

pub use combined::CombinedPathDetector;
pub use registry::{RegistryReader, SystemRegistry};
pub use vs_header::{VisualStudioVersion, VsHeaderPathDetector};
pub use windows_sdk::windows_sdk_header_paths;

/// Finds paths provided by one toolchain installation.
pub trait PathDetector: Send + Sync {
    /// Display name, unique within a [`CombinedPathDetector`].
    fn name(&self) -> &str;

    /// The detected paths; empty when the toolchain is not installed.
    fn paths(&self) -> Vec<PathBuf>;

    /// Whether this detector finds anything on this machine.
    fn is_working(&self) -> bool {
        !self.paths().is_empty()
    }
}
