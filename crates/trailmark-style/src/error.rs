//! Error types for the styling system.

use std::path::PathBuf;

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a template directive could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxReason {
    /// The directive body is not `category:argument`.
    #[error("expected exactly one ':' between category and argument")]
    MalformedDirective,

    /// Category or argument is empty.
    #[error("category and argument must not be empty")]
    EmptyPart,

    /// The category is not one of `setting`, `color`, `platform_wml`.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// The `setting` argument names no known setting.
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    /// The font size operand is not an integer.
    #[error("font size operand '{0}' is not an integer")]
    InvalidOperand(String),

    /// The font size operand is zero for a division.
    #[error("font size divided by zero")]
    DivisionByZero,

    /// The font size arithmetic left the integer range.
    #[error("font size arithmetic overflowed")]
    Overflow,

    /// `platform_wml` did not have three `|` separated values.
    #[error("expected 3 platform values separated by '|', found {0}")]
    PlatformArity(usize),
}

/// Errors that can occur in the styling system.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A stylesheet template contains an unresolvable directive.
    #[error("Syntax error in '{document}' at byte {offset} in directive '<{directive}>': {reason}")]
    Syntax {
        document: String,
        directive: String,
        offset: usize,
        reason: SyntaxReason,
    },

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A color string could not be parsed.
    #[error("Invalid color '{value}': {message}")]
    InvalidColor { value: String, message: String },

    /// A color scheme document could not be parsed.
    #[error("Invalid color scheme '{source_name}': {message}")]
    ColorScheme { source_name: String, message: String },

    /// An icon image could not be decoded.
    #[error("Failed to load image '{path}': {message}")]
    Image { path: PathBuf, message: String },

    /// Hot-reload error.
    #[cfg(feature = "hot-reload")]
    #[error("Hot-reload error: {0}")]
    HotReload(String),
}

impl Error {
    /// Create a syntax error.
    pub fn syntax(
        document: impl Into<String>,
        directive: impl Into<String>,
        offset: usize,
        reason: SyntaxReason,
    ) -> Self {
        Self::Syntax {
            document: document.into(),
            directive: directive.into(),
            offset,
            reason,
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a color error.
    pub fn invalid_color(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a color scheme error.
    pub fn color_scheme(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ColorScheme {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Whether this is a template syntax error.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// The syntax failure reason, if this is a syntax error.
    pub fn syntax_reason(&self) -> Option<&SyntaxReason> {
        match self {
            Self::Syntax { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
