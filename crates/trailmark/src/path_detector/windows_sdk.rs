//! Windows SDK header locations.

use std::path::{Path, PathBuf};

use trailmark_core::ApplicationArchitecture;
use trailmark_core::logging::targets;

use super::RegistryReader;

const INSTALLATION_FOLDER: &str = "InstallationFolder";

/// SDK releases in the order they are tried, newest first.
const SDK_VERSIONS: [&str; 6] = ["v10.0", "v8.1", "v7.1A", "v7.1", "v7.0A", "v7.0"];

/// Header search paths of the newest installed Windows SDK.
///
/// Windows 10 SDKs keep their headers in versioned directories below
/// `Include`; the newest one with `ucrt`, `um`, `shared` and `winrt` present
/// is used. 8.1 SDKs provide `um`, `shared` and `winrt` directly below
/// `Include`, older ones just `Include`. Only existing directories are
/// returned.
pub fn windows_sdk_header_paths(
    registry: &dyn RegistryReader,
    architecture: ApplicationArchitecture,
) -> Vec<PathBuf> {
    for version in SDK_VERSIONS {
        let key = sdk_key(version, architecture);
        let Some(folder) = registry.read_string(&key, INSTALLATION_FOLDER) else {
            continue;
        };

        let include = Path::new(&folder).join("Include");
        let paths = match version {
            "v10.0" => newest_versioned_include(&include)
                .map(|dir| existing(&dir, &["ucrt", "um", "shared", "winrt"]))
                .unwrap_or_default(),
            "v8.1" => existing(&include, &["um", "shared", "winrt"]),
            _ => existing(&include, &[""]),
        };

        if !paths.is_empty() {
            tracing::debug!(target: targets::PATH_DETECTOR, sdk = version, paths = paths.len(), "found Windows SDK");
            return paths;
        }
    }
    Vec::new()
}

fn sdk_key(version: &str, architecture: ApplicationArchitecture) -> String {
    let node = match architecture {
        ApplicationArchitecture::X86_32 => r"Wow6432Node\",
        ApplicationArchitecture::X86_64 => "",
    };
    format!(r"HKEY_LOCAL_MACHINE\SOFTWARE\{node}Microsoft\Microsoft SDKs\Windows\{version}")
}

/// The `Include/<major.minor.build.rev>` directory with the highest version.
fn newest_versioned_include(include: &Path) -> Option<PathBuf> {
    std::fs::read_dir(include)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let version = parse_version(&path.file_name()?.to_string_lossy())?;
            Some((version, path))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
}

fn parse_version(name: &str) -> Option<Vec<u32>> {
    name.split('.').map(|part| part.parse().ok()).collect()
}

fn existing(base: &Path, subdirectories: &[&str]) -> Vec<PathBuf> {
    subdirectories
        .iter()
        .map(|sub| if sub.is_empty() { base.to_path_buf() } else { base.join(sub) })
        .filter(|path| path.is_dir())
        .filter_map(|path| path.canonicalize().ok())
        .collect()
}
