//! Ordered groups of detectors.

use std::path::PathBuf;

use super::PathDetector;

/// Detectors queried by name, in the order they were added.
#[derive(Default)]
pub struct CombinedPathDetector {
    detectors: Vec<Box<dyn PathDetector>>,
}

impl CombinedPathDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_detector(&mut self, detector: impl PathDetector + 'static) {
        self.detectors.push(Box::new(detector));
    }

    /// Names of all detectors.
    pub fn detector_names(&self) -> Vec<String> {
        self.detectors.iter().map(|d| d.name().to_string()).collect()
    }

    /// Names of the detectors that find something on this machine.
    pub fn working_detector_names(&self) -> Vec<String> {
        self.detectors
            .iter()
            .filter(|d| d.is_working())
            .map(|d| d.name().to_string())
            .collect()
    }

    /// Paths found by the detector called `name`; empty for unknown names.
    pub fn paths_for(&self, name: &str) -> Vec<PathBuf> {
        self.detectors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.paths())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl std::fmt::Debug for CombinedPathDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.detectors.iter().map(|d| d.name())).finish()
    }
}
