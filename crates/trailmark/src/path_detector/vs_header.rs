//! Visual Studio 2010 to 2015 header detection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use trailmark_core::ApplicationArchitecture;
use trailmark_core::logging::targets;

use super::{PathDetector, RegistryReader, SystemRegistry, windows_sdk_header_paths};

/// Visual Studio releases that register their install directory in the
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualStudioVersion {
    Vs2010,
    Vs2012,
    Vs2013,
    Vs2015,
}

impl VisualStudioVersion {
    pub const ALL: [Self; 4] = [Self::Vs2010, Self::Vs2012, Self::Vs2013, Self::Vs2015];

    /// Internal version number used in registry keys.
    pub const fn number(&self) -> u32 {
        match self {
            Self::Vs2010 => 10,
            Self::Vs2012 => 11,
            Self::Vs2013 => 12,
            Self::Vs2015 => 14,
        }
    }

    pub const fn year(&self) -> u32 {
        match self {
            Self::Vs2010 => 2010,
            Self::Vs2012 => 2012,
            Self::Vs2013 => 2013,
            Self::Vs2015 => 2015,
        }
    }
}

impl fmt::Display for VisualStudioVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visual Studio {}", self.year())
    }
}

/// Finds the C++ and ATL/MFC headers of a Visual Studio installation, plus the
/// Windows SDK headers that go with them.
pub struct VsHeaderPathDetector {
    name: String,
    version: VisualStudioVersion,
    express: bool,
    architecture: ApplicationArchitecture,
    registry: Arc<dyn RegistryReader>,
}

impl VsHeaderPathDetector {
    /// A detector reading the system registry.
    pub fn new(version: VisualStudioVersion, express: bool, architecture: ApplicationArchitecture) -> Self {
        Self::with_registry(version, express, architecture, Arc::new(SystemRegistry))
    }

    /// A detector reading `registry`.
    pub fn with_registry(
        version: VisualStudioVersion,
        express: bool,
        architecture: ApplicationArchitecture,
        registry: Arc<dyn RegistryReader>,
    ) -> Self {
        let mut name = version.to_string();
        if express {
            name.push_str(" Express");
        }
        if architecture == ApplicationArchitecture::X86_64 {
            name.push_str(" 64 Bit");
        }

        Self {
            name,
            version,
            express,
            architecture,
            registry,
        }
    }

    fn registry_key(&self) -> String {
        let node = match self.architecture {
            ApplicationArchitecture::X86_32 => r"Wow6432Node\",
            ApplicationArchitecture::X86_64 => "",
        };
        let product = if self.express { "VCExpress" } else { "VisualStudio" };
        format!(
            r"HKEY_LOCAL_MACHINE\SOFTWARE\{node}Microsoft\{product}\{}.0",
            self.version.number()
        )
    }

    /// The installation root: two levels above the registered `InstallDir`
    /// (which points at `Common7/IDE`).
    fn install_path(&self) -> Option<PathBuf> {
        let install_dir = self.registry.read_string(&self.registry_key(), "InstallDir")?;
        if install_dir.is_empty() {
            return None;
        }
        let path = Path::new(&install_dir).join("..").join("..");
        path.exists().then_some(path)
    }
}

impl PathDetector for VsHeaderPathDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn paths(&self) -> Vec<PathBuf> {
        let Some(install_path) = self.install_path() else {
            return Vec::new();
        };

        let mut paths: Vec<PathBuf> = ["vc/include", "vc/atlmfc/include"]
            .iter()
            .map(|sub| install_path.join(sub))
            .filter(|path| path.exists())
            .filter_map(|path| path.canonicalize().ok())
            .collect();

        if !paths.is_empty() {
            paths.extend(windows_sdk_header_paths(self.registry.as_ref(), self.architecture));
        }
        tracing::debug!(target: targets::PATH_DETECTOR, detector = %self.name, paths = paths.len(), "detected header paths");
        paths
    }
}

impl fmt::Debug for VsHeaderPathDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VsHeaderPathDetector")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("express", &self.express)
            .field("architecture", &self.architecture)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_detector::registry::fake::FakeRegistry;
    use std::fs;

    fn detector(registry: FakeRegistry, express: bool, arch: ApplicationArchitecture) -> VsHeaderPathDetector {
        VsHeaderPathDetector::with_registry(VisualStudioVersion::Vs2015, express, arch, Arc::new(registry))
    }

    #[test]
    fn names() {
        let names: Vec<String> = VisualStudioVersion::ALL
            .iter()
            .map(|v| VsHeaderPathDetector::new(*v, false, ApplicationArchitecture::X86_32).name().to_string())
            .collect();
        assert_eq!(
            names,
            ["Visual Studio 2010", "Visual Studio 2012", "Visual Studio 2013", "Visual Studio 2015"]
        );

        let d = VsHeaderPathDetector::new(VisualStudioVersion::Vs2013, true, ApplicationArchitecture::X86_64);
        assert_eq!(d.name(), "Visual Studio 2013 Express 64 Bit");
    }

    #[test]
    fn registry_keys() {
        let d = detector(FakeRegistry::default(), false, ApplicationArchitecture::X86_32);
        assert_eq!(d.registry_key(), r"HKEY_LOCAL_MACHINE\SOFTWARE\Wow6432Node\Microsoft\VisualStudio\14.0");

        let d = detector(FakeRegistry::default(), true, ApplicationArchitecture::X86_64);
        assert_eq!(d.registry_key(), r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\VCExpress\14.0");
    }

    #[test]
    fn finds_existing_header_directories() {
        let dir = tempfile::tempdir().unwrap();
        let ide = dir.path().join("Common7/IDE");
        fs::create_dir_all(&ide).unwrap();
        fs::create_dir_all(dir.path().join("vc/include")).unwrap();

        let registry = FakeRegistry::default().with(
            r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\VisualStudio\14.0",
            "InstallDir",
            ide.to_string_lossy(),
        );
        let d = detector(registry, false, ApplicationArchitecture::X86_64);

        let paths = d.paths();
        assert_eq!(paths, vec![dir.path().join("vc/include").canonicalize().unwrap()]);
        assert!(d.is_working());
    }

    #[test]
    fn not_installed() {
        let d = detector(FakeRegistry::default(), false, ApplicationArchitecture::X86_64);
        assert!(d.paths().is_empty());
        assert!(!d.is_working());
    }
}
