//! The application context.
//!
//! [`AppContext`] owns the services the GUI needs while it runs: the log
//! manager, the settings, the active color scheme and the resource locations.
//! It is created once at start-up and handed to whoever needs it, and it is
//! what stylesheet templates read their settings from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use trailmark_core::logging::targets;
use trailmark_core::{FileLogger, LogManager, OsType, TracingLogger, trail_error, trail_info, trail_warn};
use trailmark_style::{ButtonIcon, ColorScheme, StyleSettings, StyleSheet, StyleTemplateResolver};

use crate::file::copy_new_files;
use crate::fonts::load_fonts_from_directory;
use crate::resources::{ResourcePaths, UserPaths};
use crate::settings::ApplicationSettings;
use crate::Result;

/// Application name reported by the log manager.
pub const APPLICATION_NAME: &str = "Trailmark";

/// Extensions of the bundled font files.
const FONT_EXTENSIONS: [&str; 2] = ["otf", "ttf"];

/// Services shared by the whole application.
pub struct AppContext {
    log_manager: Arc<LogManager>,
    settings: ApplicationSettings,
    color_scheme: ColorScheme,
    resources: ResourcePaths,
    user_paths: UserPaths,
    platform: OsType,
}

impl AppContext {
    /// Start the application services.
    ///
    /// Copies bundled user data that the user does not have yet, loads the
    /// settings (defaults when the file is missing or unreadable), applies
    /// the logging switch and loads the configured color scheme (an empty
    /// scheme if that fails).
    pub fn init(resources: ResourcePaths, user_paths: UserPaths) -> Result<Self> {
        let log_manager = Arc::new(LogManager::new(APPLICATION_NAME, env!("CARGO_PKG_VERSION")));
        log_manager.add_logger(Arc::new(TracingLogger::new()));

        copy_new_files(resources.user_data_path(), user_paths.data_path())?;

        let settings = ApplicationSettings::new();
        let settings_file = user_paths.settings_file();
        if settings_file.exists() {
            if let Err(e) = settings.load(&settings_file) {
                tracing::warn!(target: targets::SETTINGS, "Failed to load settings, using defaults: {}", e);
            }
        }

        let mut context = Self {
            log_manager,
            settings,
            color_scheme: ColorScheme::new(),
            resources,
            user_paths,
            platform: OsType::current(),
        };

        context.apply_logging_settings()?;
        context.reload_color_scheme();
        trail_info!(context.log_manager, "Started with resources in {}", context.resources.root().display());
        Ok(context)
    }

    /// Resolve `platform_wml` directives for another platform.
    pub fn with_platform(mut self, platform: OsType) -> Self {
        self.platform = platform;
        self
    }

    pub fn log_manager(&self) -> &Arc<LogManager> {
        &self.log_manager
    }

    pub fn settings(&self) -> &ApplicationSettings {
        &self.settings
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.color_scheme
    }

    pub fn resources(&self) -> &ResourcePaths {
        &self.resources
    }

    pub fn user_paths(&self) -> &UserPaths {
        &self.user_paths
    }

    pub fn platform(&self) -> OsType {
        self.platform
    }

    /// Turn logging on or off as the settings say. Enabling it also starts a
    /// log file in the user's log directory.
    pub fn apply_logging_settings(&self) -> Result<()> {
        let enabled = self.settings.logging_enabled();
        self.log_manager.remove_loggers_by_type(FileLogger::TYPE);
        if enabled {
            let logger = FileLogger::in_directory(self.user_paths.log_path())?
                .with_level_mask(self.settings.log_filter());
            self.log_manager.add_logger(Arc::new(logger));
        }
        self.log_manager.set_logging_enabled(enabled);
        Ok(())
    }

    /// Load the color scheme named in the settings.
    ///
    /// On failure the error is logged and an empty scheme takes its place,
    /// so every color falls back to the default.
    pub fn reload_color_scheme(&mut self) {
        let path = self.resources.color_scheme_file(&self.settings.color_scheme_path());
        self.color_scheme = match ColorScheme::load(&path) {
            Ok(scheme) => scheme,
            Err(e) => {
                trail_warn!(self.log_manager, "Failed to load color scheme: {}", e);
                ColorScheme::new()
            }
        };
    }

    /// A resolver reading settings from this context and colors from the
    /// active scheme.
    pub fn style_resolver(&self) -> StyleTemplateResolver<'_> {
        StyleTemplateResolver::new(self, &self.color_scheme).with_platform(self.platform)
    }

    /// Paths relative to the GUI resource directory are resolved against it.
    fn gui_file(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.resources.gui_path().join(path)
        }
    }

    /// Load and resolve a stylesheet template.
    pub fn try_load_style_sheet(&self, path: impl AsRef<Path>) -> Result<StyleSheet> {
        let path = self.gui_file(path.as_ref());
        Ok(StyleSheet::from_file(path, &self.style_resolver())?)
    }

    /// Load and resolve a stylesheet template, or log the error and return
    /// an empty stylesheet.
    pub fn load_style_sheet(&self, path: impl AsRef<Path>) -> String {
        match self.try_load_style_sheet(path) {
            Ok(sheet) => sheet.into_text(),
            Err(e) => {
                trail_error!(self.log_manager, "{}", e);
                String::new()
            }
        }
    }

    /// Load an icon mask and color it for `color_id`.
    pub fn button_icon(&self, path: impl AsRef<Path>, color_id: &str) -> Result<ButtonIcon> {
        let path = self.gui_file(path.as_ref());
        Ok(ButtonIcon::load(path, &self.color_scheme, color_id)?)
    }

    /// Load the bundled fonts into `db`, returning the new family names.
    pub fn load_fonts(&self, db: &mut fontdb::Database) -> Result<Vec<String>> {
        let dir = self.resources.fonts_path();
        if !dir.is_dir() {
            trail_warn!(self.log_manager, "No font directory at {}", dir.display());
            return Ok(Vec::new());
        }

        let mut families = Vec::new();
        for extension in FONT_EXTENSIONS {
            families.extend(load_fonts_from_directory(db, &dir, extension)?);
        }
        families.sort();
        families.dedup();
        Ok(families)
    }

    /// Write the settings to the user's settings file.
    pub fn save_settings(&self) -> Result<()> {
        Ok(self.settings.save(self.user_paths.settings_file())?)
    }

    /// Save the settings and detach every logger.
    pub fn teardown(self) -> Result<()> {
        let saved = self.save_settings();
        if let Err(e) = &saved {
            trail_error!(self.log_manager, "Failed to save settings: {}", e);
        }
        self.log_manager.clear_loggers();
        saved
    }
}

impl StyleSettings for AppContext {
    fn font_size(&self) -> i32 {
        self.settings.font_size()
    }

    fn font_name(&self) -> String {
        self.settings.font_name()
    }

    fn gui_path(&self) -> PathBuf {
        self.resources.gui_path()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("resources", &self.resources)
            .field("user_paths", &self.user_paths)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}
