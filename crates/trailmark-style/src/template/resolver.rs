//! Template resolution.

use std::path::Path;

use trailmark_core::logging::targets;
use trailmark_core::OsType;

use super::directive::{Directive, SettingKey};
use super::{ColorSource, StyleSettings};
use crate::{Error, Result, SyntaxReason};

/// Document name used for templates that do not come from a file.
const INLINE_DOCUMENT: &str = "<inline>";

/// Resolves `<category:argument>` directives in stylesheet templates.
///
/// The resolver only borrows its collaborators and never mutates them, so one
/// resolver can serve several threads if the collaborators can.
pub struct StyleTemplateResolver<'a> {
    settings: &'a dyn StyleSettings,
    colors: &'a dyn ColorSource,
    platform: OsType,
}

impl<'a> StyleTemplateResolver<'a> {
    /// Create a resolver for the current platform.
    pub fn new(settings: &'a dyn StyleSettings, colors: &'a dyn ColorSource) -> Self {
        Self {
            settings,
            colors,
            platform: OsType::current(),
        }
    }

    /// Resolve `platform_wml` directives for another platform.
    pub fn with_platform(mut self, platform: OsType) -> Self {
        self.platform = platform;
        self
    }

    /// The platform used for `platform_wml` directives.
    pub fn platform(&self) -> OsType {
        self.platform
    }

    /// Resolve a template that has no source file.
    pub fn resolve(&self, document: &str) -> Result<String> {
        self.resolve_named(INLINE_DOCUMENT, document)
    }

    /// Read a template file and resolve it. Errors name the file.
    pub fn resolve_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.resolve_named(&path.display().to_string(), &document)
    }

    /// Resolve a template; `name` identifies it in errors.
    ///
    /// Directives are replaced left to right. Scanning resumes right after
    /// each inserted value, so values are never scanned for directives. A `<`
    /// without a later `>` ends scanning and the rest of the text is kept.
    /// Any invalid directive fails the whole call.
    pub fn resolve_named(&self, name: &str, document: &str) -> Result<String> {
        let mut text = document.to_string();
        let mut cursor = 0;
        // Byte offset between `text` and `document`, for error positions.
        let mut shift: isize = 0;
        let mut count = 0usize;

        while let Some(open) = text[cursor..].find('<').map(|i| cursor + i) {
            let Some(close) = text[open + 1..].find('>').map(|i| open + 1 + i) else {
                break;
            };

            let body = &text[open + 1..close];
            let value = self.resolve_directive(body).map_err(|reason| {
                let offset = (open as isize - shift) as usize;
                tracing::error!(target: targets::TEMPLATE, document = name, offset, %reason, "syntax error in stylesheet template");
                Error::syntax(name, body, offset, reason)
            })?;

            let directive_len = close + 1 - open;
            text.replace_range(open..=close, &value);
            cursor = open + value.len();
            shift += value.len() as isize - directive_len as isize;
            count += 1;
        }

        tracing::debug!(target: targets::TEMPLATE, document = name, directives = count, "resolved stylesheet template");
        Ok(text)
    }

    fn resolve_directive(&self, body: &str) -> std::result::Result<String, SyntaxReason> {
        match Directive::parse(body)? {
            Directive::Setting(key) => self.resolve_setting(key),
            Directive::Color(key) => Ok(self.colors.color(key)),
            Directive::Platform(values) => Ok(self.select_platform(values)),
        }
    }

    fn resolve_setting(&self, key: SettingKey) -> std::result::Result<String, SyntaxReason> {
        match key {
            SettingKey::FontSize(modifier) => {
                let base = self.settings.font_size();
                let size = match modifier {
                    Some(modifier) => modifier.apply(base)?,
                    None => base,
                };
                Ok(size.to_string())
            }
            SettingKey::FontName => Ok(self.settings.font_name()),
            SettingKey::GuiPath => Ok(self.settings.gui_path().to_string_lossy().replace('\\', "/")),
        }
    }

    fn select_platform(&self, [windows, mac, linux]: [&str; 3]) -> String {
        match self.platform {
            OsType::Windows => windows.to_string(),
            OsType::Mac => mac.to_string(),
            OsType::Linux => linux.to_string(),
            OsType::Unknown => {
                tracing::warn!(target: targets::TEMPLATE, "no platform_wml value for this platform, substituting nothing");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FixedStyleSettings;
    use crate::ColorScheme;

    fn settings() -> FixedStyleSettings {
        FixedStyleSettings::new(12, "Fira Sans", "/opt/trailmark/data/gui/")
    }

    fn colors() -> ColorScheme {
        let mut scheme = ColorScheme::new();
        scheme.set("text/primary", "#202020");
        scheme.set("window/background", "#F0F0F0");
        scheme
    }

    fn resolve(document: &str) -> Result<String> {
        let settings = settings();
        let colors = colors();
        StyleTemplateResolver::new(&settings, &colors)
            .with_platform(OsType::Linux)
            .resolve(document)
    }

    #[test]
    fn text_without_directives_is_unchanged() {
        let css = "QWidget { margin: 0; }\n/* a > b */";
        assert_eq!(resolve(css).unwrap(), css);
        assert_eq!(resolve("").unwrap(), "");
    }

    #[test]
    fn font_size_arithmetic() {
        assert_eq!(resolve("<setting:font_size>").unwrap(), "12");
        assert_eq!(resolve("<setting:font_size+3>").unwrap(), "15");
        assert_eq!(resolve("<setting:font_size-3>").unwrap(), "9");
        assert_eq!(resolve("<setting:font_size*2>").unwrap(), "24");
        assert_eq!(resolve("<setting:font_size/3>").unwrap(), "4");
    }

    #[test]
    fn font_name_and_colors() {
        assert_eq!(
            resolve("font-family: <setting:font_name>; color: <color:text/primary>;").unwrap(),
            "font-family: Fira Sans; color: #202020;"
        );
    }

    #[test]
    fn unknown_color_uses_scheme_default() {
        assert_eq!(resolve("<color:missing/key>").unwrap(), crate::color_scheme::DEFAULT_COLOR);
    }

    fn resolve_gui_path(gui_path: &str) -> String {
        let settings = FixedStyleSettings::new(12, "Fira Sans", gui_path);
        let colors = colors();
        StyleTemplateResolver::new(&settings, &colors)
            .resolve("<setting:gui_path>")
            .unwrap()
    }

    #[test]
    fn gui_path_normalizes_every_backslash() {
        assert_eq!(
            resolve_gui_path(r"C:\Program Files\Trailmark\data\gui\"),
            "C:/Program Files/Trailmark/data/gui/"
        );
        assert_eq!(resolve_gui_path(r"C:\a\b\c\d"), "C:/a/b/c/d");
        assert_eq!(resolve_gui_path(r"C:\a\b\\c"), "C:/a/b//c");
        assert_eq!(resolve_gui_path(r"\\\"), "///");
    }

    #[test]
    fn gui_path_is_not_otherwise_changed() {
        assert_eq!(resolve_gui_path("/opt/gui"), "/opt/gui");
        assert_eq!(resolve_gui_path("/opt/gui/"), "/opt/gui/");
        assert_eq!(resolve_gui_path(""), "");
    }

    #[test]
    fn platform_selection() {
        let settings = settings();
        let colors = colors();
        let resolve_on = |platform| {
            StyleTemplateResolver::new(&settings, &colors)
                .with_platform(platform)
                .resolve("<platform_wml:A|B|C>")
                .unwrap()
        };

        assert_eq!(resolve_on(OsType::Windows), "A");
        assert_eq!(resolve_on(OsType::Mac), "B");
        assert_eq!(resolve_on(OsType::Linux), "C");
        assert_eq!(resolve_on(OsType::Unknown), "");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let settings = settings();
        let mut colors = colors();
        colors.set("tricky", "<setting:font_size>");
        let resolver = StyleTemplateResolver::new(&settings, &colors);

        assert_eq!(
            resolver.resolve("<color:tricky> <setting:font_size>").unwrap(),
            "<setting:font_size> 12"
        );
    }

    #[test]
    fn unclosed_directive_ends_scanning() {
        assert_eq!(
            resolve("<setting:font_size> then <setting:font_name").unwrap(),
            "12 then <setting:font_name"
        );
    }

    #[test]
    fn syntax_error_reports_original_offset() {
        let err = resolve("<setting:font_size>px; <unknown:x>").unwrap_err();
        match err {
            Error::Syntax {
                document,
                directive,
                offset,
                reason,
            } => {
                assert_eq!(document, INLINE_DOCUMENT);
                assert_eq!(directive, "unknown:x");
                assert_eq!(offset, 23);
                assert_eq!(reason, SyntaxReason::UnknownCategory("unknown".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failures_produce_no_output() {
        assert!(resolve("<unknown:x>").is_err());
        assert!(resolve("<setting:font_size+abc>").is_err());
        assert!(resolve("<setting:font_size/0>").is_err());
        assert!(resolve("<platform_wml:A|B>").is_err());
        assert!(resolve("<setting:colour>").is_err());
        assert!(resolve("<nocolon>").is_err());
    }

    #[test]
    fn resolving_twice_is_a_no_op() {
        let once = resolve("QLabel { font-size: <setting:font_size>pt; }").unwrap();
        assert_eq!(resolve(&once).unwrap(), once);
    }

    #[test]
    fn resolve_file_names_the_file_in_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.css");
        std::fs::write(&path, "QWidget { color: <bogus:1>; }").unwrap();

        let settings = settings();
        let colors = colors();
        let err = StyleTemplateResolver::new(&settings, &colors)
            .resolve_file(&path)
            .unwrap_err();

        match err {
            Error::Syntax { document, .. } => assert_eq!(document, path.display().to_string()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let settings = settings();
        let colors = colors();
        let err = StyleTemplateResolver::new(&settings, &colors)
            .resolve_file("/definitely/not/here.css")
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
