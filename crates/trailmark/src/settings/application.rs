//! Typed application settings.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use trailmark_core::LogLevelMask;
use trailmark_core::logging::targets;

use super::Settings;
use crate::file::FileResult;

const VERSION_KEY: &str = "version";
const MAX_RECENT_PROJECTS: usize = 7;

/// The application's settings, backed by a [`Settings`] store.
///
/// Every getter falls back to a default when its key is missing, so a fresh
/// instance behaves like a first start.
#[derive(Debug, Default)]
pub struct ApplicationSettings {
    settings: Settings,
}

impl ApplicationSettings {
    /// Schema version written by [`save`](Self::save).
    pub const VERSION: i64 = 1;

    /// Settings with every value at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying store, for change notifications and raw access.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the current values with those stored in `path`.
    ///
    /// Files written by a newer version are loaded anyway; unknown keys are
    /// kept but ignored.
    pub fn load(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        self.settings.reload_from(path)?;

        let version = self.settings.get_or(VERSION_KEY, 0i64);
        if version > Self::VERSION {
            tracing::warn!(
                target: targets::SETTINGS,
                path = %path.display(),
                "settings file version {} is newer than supported version {}",
                version,
                Self::VERSION
            );
        }
        tracing::info!(target: targets::SETTINGS, "Loaded settings: {}", path.display());
        Ok(())
    }

    /// Write all values, stamped with the current schema version.
    pub fn save(&self, path: impl AsRef<Path>) -> FileResult<()> {
        self.settings.set(VERSION_KEY, Self::VERSION);
        self.settings.save(path)
    }

    /// The schema version of the loaded file, 0 if it has none.
    pub fn version(&self) -> i64 {
        self.settings.get_or(VERSION_KEY, 0)
    }

    pub fn max_recent_projects_count(&self) -> usize {
        MAX_RECENT_PROJECTS
    }

    // ========================================================================
    // Application
    // ========================================================================

    pub fn font_name(&self) -> String {
        self.settings.get_or("application/font_name", "Source Code Pro".to_string())
    }

    pub fn set_font_name(&self, font_name: &str) {
        self.settings.set("application/font_name", font_name);
    }

    /// Base font size in points.
    pub fn font_size(&self) -> i32 {
        self.settings.get_or("application/font_size", 14)
    }

    pub fn set_font_size(&self, font_size: i32) {
        self.settings.set("application/font_size", font_size);
    }

    pub fn font_size_max(&self) -> i32 {
        self.settings.get_or("application/font_size_max", 24)
    }

    pub fn set_font_size_max(&self, font_size_max: i32) {
        self.settings.set("application/font_size_max", font_size_max);
    }

    pub fn font_size_min(&self) -> i32 {
        self.settings.get_or("application/font_size_min", 5)
    }

    pub fn set_font_size_min(&self, font_size_min: i32) {
        self.settings.set("application/font_size_min", font_size_min);
    }

    /// Size restored by "reset font size".
    pub fn font_size_std(&self) -> i32 {
        self.settings.get_or("application/font_size_std", 12)
    }

    pub fn set_font_size_std(&self, font_size_std: i32) {
        self.settings.set("application/font_size_std", font_size_std);
    }

    pub fn text_encoding(&self) -> String {
        self.settings.get_or("application/text_encoding", "UTF-8".to_string())
    }

    pub fn set_text_encoding(&self, text_encoding: &str) {
        self.settings.set("application/text_encoding", text_encoding);
    }

    /// Color scheme file, relative to the color scheme directory unless
    /// absolute.
    pub fn color_scheme_path(&self) -> PathBuf {
        self.settings
            .get_or("application/color_scheme", PathBuf::from("bright.toml"))
    }

    pub fn set_color_scheme_path(&self, path: &Path) {
        self.settings.set("application/color_scheme", path);
    }

    pub fn use_animations(&self) -> bool {
        self.settings.get_or("application/use_animations", true)
    }

    pub fn set_use_animations(&self, use_animations: bool) {
        self.settings.set("application/use_animations", use_animations);
    }

    pub fn scroll_speed(&self) -> f32 {
        self.settings.get_or("application/scroll_speed", 1.0)
    }

    pub fn set_scroll_speed(&self, scroll_speed: f32) {
        self.settings.set("application/scroll_speed", scroll_speed);
    }

    // ========================================================================
    // Screen
    // ========================================================================

    /// -1 follows the system, 0 disables and 1 enables automatic scaling.
    pub fn screen_auto_scaling(&self) -> i32 {
        self.settings.get_or("screen/auto_scaling", -1)
    }

    pub fn set_screen_auto_scaling(&self, auto_scaling: i32) {
        self.settings.set("screen/auto_scaling", auto_scaling);
    }

    pub fn screen_scale_factor(&self) -> f32 {
        self.settings.get_or("screen/scale_factor", -1.0)
    }

    pub fn set_screen_scale_factor(&self, scale_factor: f32) {
        self.settings.set("screen/scale_factor", scale_factor);
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_enabled(&self) -> bool {
        self.settings.get_or("logging/logging_enabled", false)
    }

    pub fn set_logging_enabled(&self, enabled: bool) {
        self.settings.set("logging/logging_enabled", enabled);
    }

    pub fn verbose_indexer_logging_enabled(&self) -> bool {
        self.settings.get_or("logging/verbose_indexer_logging_enabled", false)
    }

    pub fn set_verbose_indexer_logging_enabled(&self, enabled: bool) {
        self.settings.set("logging/verbose_indexer_logging_enabled", enabled);
    }

    /// Levels shown in the log view.
    pub fn log_filter(&self) -> LogLevelMask {
        self.mask_or("logging/log_filter", LogLevelMask::ALL)
    }

    pub fn set_log_filter(&self, mask: LogLevelMask) {
        self.settings.set("logging/log_filter", i64::from(mask.bits()));
    }

    /// Levels shown in the status bar.
    pub fn status_filter(&self) -> LogLevelMask {
        self.mask_or("logging/status_filter", LogLevelMask::ALL)
    }

    pub fn set_status_filter(&self, mask: LogLevelMask) {
        self.settings.set("logging/status_filter", i64::from(mask.bits()));
    }

    fn mask_or(&self, key: &str, default: LogLevelMask) -> LogLevelMask {
        self.settings
            .get::<i64>(key)
            .and_then(|bits| u8::try_from(bits).ok())
            .map(LogLevelMask::from_bits)
            .unwrap_or(default)
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    /// Indexer threads; 0 picks one per logical core.
    pub fn indexer_thread_count(&self) -> usize {
        self.settings.get_or("indexing/indexer_thread_count", 0)
    }

    pub fn set_indexer_thread_count(&self, count: usize) {
        self.settings.set("indexing/indexer_thread_count", count);
    }

    pub fn multi_process_indexing_enabled(&self) -> bool {
        self.settings.get_or("indexing/multi_process", true)
    }

    pub fn set_multi_process_indexing_enabled(&self, enabled: bool) {
        self.settings.set("indexing/multi_process", enabled);
    }

    pub fn header_search_paths(&self) -> Vec<PathBuf> {
        self.path_list("indexing/header_search_paths")
    }

    /// Header search paths with environment variables and `~` expanded.
    pub fn header_search_paths_expanded(&self) -> Vec<PathBuf> {
        expand_all(self.header_search_paths())
    }

    pub fn set_header_search_paths(&self, paths: &[PathBuf]) {
        self.set_path_list("indexing/header_search_paths", paths);
    }

    pub fn framework_search_paths(&self) -> Vec<PathBuf> {
        self.path_list("indexing/framework_search_paths")
    }

    /// Framework search paths with environment variables and `~` expanded.
    pub fn framework_search_paths_expanded(&self) -> Vec<PathBuf> {
        expand_all(self.framework_search_paths())
    }

    pub fn set_framework_search_paths(&self, paths: &[PathBuf]) {
        self.set_path_list("indexing/framework_search_paths", paths);
    }

    // ========================================================================
    // Code
    // ========================================================================

    pub fn code_tab_width(&self) -> i32 {
        self.settings.get_or("code/tab_width", 4)
    }

    pub fn set_code_tab_width(&self, tab_width: i32) {
        self.settings.set("code/tab_width", tab_width);
    }

    pub fn code_snippet_snap_range(&self) -> i32 {
        self.settings.get_or("code/snippet/snap_range", 4)
    }

    pub fn set_code_snippet_snap_range(&self, range: i32) {
        self.settings.set("code/snippet/snap_range", range);
    }

    pub fn code_snippet_expand_range(&self) -> i32 {
        self.settings.get_or("code/snippet/expand_range", 2)
    }

    pub fn set_code_snippet_expand_range(&self, range: i32) {
        self.settings.set("code/snippet/expand_range", range);
    }

    // ========================================================================
    // User
    // ========================================================================

    /// Recently opened projects, most recent first.
    pub fn recent_projects(&self) -> Vec<PathBuf> {
        let mut projects = self.path_list("user/recent_projects");
        projects.truncate(MAX_RECENT_PROJECTS);
        projects
    }

    /// Store the recent project list, keeping at most
    /// [`max_recent_projects_count`](Self::max_recent_projects_count) entries.
    pub fn set_recent_projects(&self, projects: &[PathBuf]) {
        let kept = &projects[..projects.len().min(MAX_RECENT_PROJECTS)];
        self.set_path_list("user/recent_projects", kept);
    }

    /// Move `project` to the front of the recent project list.
    pub fn add_recent_project(&self, project: &Path) {
        let mut projects = self.recent_projects();
        projects.retain(|p| p != project);
        projects.insert(0, project.to_path_buf());
        self.set_recent_projects(&projects);
    }

    pub fn accepted_eula_version(&self) -> i32 {
        self.settings.get_or("user/accepted_eula_version", 0)
    }

    pub fn set_accepted_eula_version(&self, version: i32) {
        self.settings.set("user/accepted_eula_version", version);
    }

    fn path_list(&self, key: &str) -> Vec<PathBuf> {
        self.settings.get_or(key, Vec::new())
    }

    fn set_path_list(&self, key: &str, paths: &[PathBuf]) {
        let values: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        self.settings.set(key, values);
    }
}

fn expand_all(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .map(|p| PathBuf::from(expand_environment(&p.to_string_lossy())))
        .collect()
}

/// Expand a leading `~` and `$VAR`, `${VAR}` and `%VAR%` references.
///
/// References to unset variables are left as written.
fn expand_environment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    if let Some(after) = rest.strip_prefix('~') {
        if after.is_empty() || after.starts_with(['/', '\\']) {
            if let Some(dirs) = BaseDirs::new() {
                out.push_str(&dirs.home_dir().to_string_lossy());
                rest = after;
            }
        }
    }

    while let Some(pos) = rest.find(['$', '%']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let expanded = variable_reference(tail)
            .and_then(|(name, len)| std::env::var(name).ok().map(|value| (value, len)));
        match expanded {
            Some((value, len)) => {
                out.push_str(&value);
                rest = &tail[len..];
            }
            None => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// The variable name referenced at the start of `text` and the length of the
/// whole reference.
fn variable_reference(text: &str) -> Option<(&str, usize)> {
    let is_name = |c: char| c.is_ascii_alphanumeric() || c == '_';

    if let Some(braced) = text.strip_prefix("${") {
        let close = braced.find('}')?;
        let name = &braced[..close];
        return (!name.is_empty() && name.chars().all(is_name)).then_some((name, close + 3));
    }
    if let Some(plain) = text.strip_prefix('$') {
        let len = plain.find(|c: char| !is_name(c)).unwrap_or(plain.len());
        return (len > 0).then_some((&plain[..len], len + 1));
    }
    if let Some(percent) = text.strip_prefix('%') {
        let close = percent.find('%')?;
        let name = &percent[..close];
        return (!name.is_empty() && name.chars().all(is_name)).then_some((name, close + 2));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ApplicationSettings::new();
        assert_eq!(settings.font_name(), "Source Code Pro");
        assert_eq!(settings.font_size(), 14);
        assert_eq!(settings.font_size_max(), 24);
        assert_eq!(settings.font_size_min(), 5);
        assert_eq!(settings.font_size_std(), 12);
        assert_eq!(settings.text_encoding(), "UTF-8");
        assert!(!settings.logging_enabled());
        assert_eq!(settings.log_filter(), LogLevelMask::ALL);
        assert_eq!(settings.code_tab_width(), 4);
        assert!(settings.recent_projects().is_empty());
        assert_eq!(settings.max_recent_projects_count(), 7);
    }

    #[test]
    fn setters_round_trip() {
        let settings = ApplicationSettings::new();
        settings.set_font_size(16);
        settings.set_font_name("Fira Mono");
        settings.set_scroll_speed(2.5);
        settings.set_status_filter(LogLevelMask::ERROR);
        settings.set_indexer_thread_count(3);

        assert_eq!(settings.font_size(), 16);
        assert_eq!(settings.font_name(), "Fira Mono");
        assert_eq!(settings.scroll_speed(), 2.5);
        assert_eq!(settings.status_filter(), LogLevelMask::ERROR);
        assert_eq!(settings.indexer_thread_count(), 3);
    }

    #[test]
    fn recent_projects_are_bounded() {
        let settings = ApplicationSettings::new();
        let projects: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("p{i}.srctrlprj"))).collect();
        settings.set_recent_projects(&projects);
        assert_eq!(settings.recent_projects(), projects[..7].to_vec());

        settings.add_recent_project(Path::new("p3.srctrlprj"));
        let recent = settings.recent_projects();
        assert_eq!(recent[0], PathBuf::from("p3.srctrlprj"));
        assert_eq!(recent.len(), 7);
        assert_eq!(recent.iter().filter(|p| p.ends_with("p3.srctrlprj")).count(), 1);
    }

    #[test]
    fn save_stamps_version_and_load_restores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let settings = ApplicationSettings::new();
        settings.set_font_size(11);
        settings.save(&path).unwrap();

        let loaded = ApplicationSettings::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.font_size(), 11);
        assert_eq!(loaded.version(), ApplicationSettings::VERSION);
    }

    #[test]
    fn newer_version_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "version = 99\n[application]\nfont_size = 9\n").unwrap();

        let settings = ApplicationSettings::new();
        settings.load(&path).unwrap();
        assert_eq!(settings.version(), 99);
        assert_eq!(settings.font_size(), 9);
    }

    #[test]
    fn expands_environment_references() {
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_environment("$PATH/x"), format!("{path}/x"));
        assert_eq!(expand_environment("${PATH}x"), format!("{path}x"));
        assert_eq!(expand_environment("%PATH%/x"), format!("{path}/x"));
    }

    #[test]
    fn unset_variables_stay_literal() {
        let text = "$TRAILMARK_SURELY_UNSET_VAR/include 100% ${} $";
        assert_eq!(expand_environment(text), text);
    }

    #[test]
    fn expands_home() {
        let home = BaseDirs::new().unwrap().home_dir().to_string_lossy().into_owned();
        assert_eq!(expand_environment("~/include"), format!("{home}/include"));
        assert_eq!(expand_environment("a/~/b"), "a/~/b");
    }

    #[test]
    fn expanded_search_paths() {
        let settings = ApplicationSettings::new();
        settings.set_header_search_paths(&[PathBuf::from("/usr/include"), PathBuf::from("$PATH")]);
        let expanded = settings.header_search_paths_expanded();
        assert_eq!(expanded[0], PathBuf::from("/usr/include"));
        assert_eq!(expanded[1], PathBuf::from(std::env::var("PATH").unwrap()));
    }
}
