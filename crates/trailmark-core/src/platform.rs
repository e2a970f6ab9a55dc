//! Coarse platform identification.
//!
//! Stylesheet templates and path detectors only care about which operating
//! system family the application runs on and whether it is a 32 or 64 bit
//! build. Both are fixed at compile time.

use std::fmt;

/// The operating system family the application was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsType {
    /// Microsoft Windows.
    Windows,
    /// Apple macOS.
    Mac,
    /// Linux distributions.
    Linux,
    /// Any other target (BSDs, wasm, ...).
    Unknown,
}

impl OsType {
    /// Returns the operating system of the current build target.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Mac
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }

    /// Short lowercase identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Mac => "mac",
            Self::Linux => "linux",
            Self::Unknown => "unknown",
        }
    }
}

impl Default for OsType {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer width of an application build.
///
/// Used when probing installations that keep separate registry views or
/// library directories per architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationArchitecture {
    /// 32 bit x86.
    X86_32,
    /// 64 bit x86.
    X86_64,
}

impl ApplicationArchitecture {
    /// Returns the architecture of the current build.
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X86_64
        } else {
            Self::X86_32
        }
    }

    /// Whether this is a 64 bit architecture.
    pub const fn is_64_bit(&self) -> bool {
        matches!(self, Self::X86_64)
    }
}

impl Default for ApplicationArchitecture {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_os_matches_target() {
        let os = OsType::current();
        #[cfg(target_os = "linux")]
        assert_eq!(os, OsType::Linux);
        #[cfg(target_os = "windows")]
        assert_eq!(os, OsType::Windows);
        #[cfg(target_os = "macos")]
        assert_eq!(os, OsType::Mac);
        assert_eq!(OsType::default(), os);
    }

    #[test]
    fn os_display() {
        assert_eq!(OsType::Windows.to_string(), "windows");
        assert_eq!(OsType::Mac.to_string(), "mac");
        assert_eq!(OsType::Linux.to_string(), "linux");
        assert_eq!(OsType::Unknown.to_string(), "unknown");
    }

    #[test]
    fn architecture_matches_pointer_width() {
        let arch = ApplicationArchitecture::current();
        assert_eq!(arch.is_64_bit(), cfg!(target_pointer_width = "64"));
    }
}
