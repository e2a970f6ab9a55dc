//! Settings storage.
//!
//! [`Settings`] is a hierarchical key-value store addressed by paths such as
//! `application/font_size` (either `/` or `.` separates the parts). Values are
//! persisted as JSON or TOML, chosen by file extension, and every change is
//! announced through the [`changed`](Settings::changed) signal.
//!
//! ```ignore
//! let settings = Settings::new();
//! settings.set("application/font_size", 14);
//! let size: i32 = settings.get_or("application/font_size", 12);
//!
//! settings.save("settings.toml")?;
//! let loaded = Settings::load("settings.toml")?;
//! ```
//!
//! [`ApplicationSettings`] layers typed accessors for the application's own
//! keys on top.

mod application;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use trailmark_core::Signal;
use trailmark_core::logging::targets;

use crate::file::{FileError, FileResult, atomic_write, read_text};

pub use application::ApplicationSettings;

/// A value that can be stored in settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingsValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<SettingsValue>),
    Object(HashMap<String, SettingsValue>),
}

impl SettingsValue {
    /// Returns this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingsValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingsValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a float. Integers are converted.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingsValue::Float(v) => Some(*v),
            SettingsValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Returns this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingsValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[SettingsValue]> {
        match self {
            SettingsValue::Array(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for SettingsValue {
    fn from(v: bool) -> Self {
        SettingsValue::Bool(v)
    }
}

impl From<i32> for SettingsValue {
    fn from(v: i32) -> Self {
        SettingsValue::Integer(i64::from(v))
    }
}

impl From<i64> for SettingsValue {
    fn from(v: i64) -> Self {
        SettingsValue::Integer(v)
    }
}

impl From<usize> for SettingsValue {
    fn from(v: usize) -> Self {
        SettingsValue::Integer(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f32> for SettingsValue {
    fn from(v: f32) -> Self {
        SettingsValue::Float(f64::from(v))
    }
}

impl From<f64> for SettingsValue {
    fn from(v: f64) -> Self {
        SettingsValue::Float(v)
    }
}

impl From<String> for SettingsValue {
    fn from(v: String) -> Self {
        SettingsValue::String(v)
    }
}

impl From<&str> for SettingsValue {
    fn from(v: &str) -> Self {
        SettingsValue::String(v.to_string())
    }
}

impl From<&Path> for SettingsValue {
    fn from(v: &Path) -> Self {
        SettingsValue::String(v.to_string_lossy().into_owned())
    }
}

impl<T: Into<SettingsValue>> From<Vec<T>> for SettingsValue {
    fn from(v: Vec<T>) -> Self {
        SettingsValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// Types that can be read back out of a [`SettingsValue`].
pub trait FromSettingsValue: Sized {
    fn from_settings_value(value: &SettingsValue) -> Option<Self>;
}

impl FromSettingsValue for bool {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSettingsValue for i32 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_integer().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromSettingsValue for i64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_integer()
    }
}

impl FromSettingsValue for usize {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_integer().and_then(|v| usize::try_from(v).ok())
    }
}

impl FromSettingsValue for f32 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_float().map(|v| v as f32)
    }
}

impl FromSettingsValue for f64 {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromSettingsValue for String {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromSettingsValue for PathBuf {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value.as_str().map(PathBuf::from)
    }
}

impl<T: FromSettingsValue> FromSettingsValue for Vec<T> {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        value
            .as_array()
            .and_then(|arr| arr.iter().map(T::from_settings_value).collect())
    }
}

impl FromSettingsValue for SettingsValue {
    fn from_settings_value(value: &SettingsValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// File format for settings persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Toml,
}

impl SettingsFormat {
    /// The format for a file path: `.json` is JSON, anything else TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SettingsFormat::Json,
            _ => SettingsFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
struct AutoSaveConfig {
    path: PathBuf,
    format: SettingsFormat,
}

/// A hierarchical, thread-safe key-value store.
pub struct Settings {
    data: RwLock<HashMap<String, SettingsValue>>,
    /// Emitted with the key path after every modification.
    changed: Signal<String>,
    auto_save: RwLock<Option<AutoSaveConfig>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("keys", &self.data.read().len())
            .field("auto_save", &*self.auto_save.read())
            .finish()
    }
}

impl Settings {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::from_data(HashMap::new())
    }

    fn from_data(data: HashMap<String, SettingsValue>) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Signal::new(),
            auto_save: RwLock::new(None),
        }
    }

    /// The signal emitted whenever a value changes.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Persist every change to `path` from now on.
    pub fn set_auto_save(&self, path: impl AsRef<Path>, format: SettingsFormat) {
        *self.auto_save.write() = Some(AutoSaveConfig {
            path: path.as_ref().to_path_buf(),
            format,
        });
    }

    /// Disables auto-save.
    pub fn disable_auto_save(&self) {
        *self.auto_save.write() = None;
    }

    /// Returns true if auto-save is enabled.
    pub fn is_auto_save_enabled(&self) -> bool {
        self.auto_save.read().is_some()
    }

    /// Sets a value, creating intermediate groups as needed.
    pub fn set<V: Into<SettingsValue>>(&self, path: &str, value: V) {
        let parts = parse_path(path);
        if parts.is_empty() {
            return;
        }

        set_nested(&mut self.data.write(), &parts, value.into());
        self.changed.emit(path.to_string());
        self.try_auto_save();
    }

    /// Sets any serializable value.
    pub fn set_serialized<T: Serialize>(&self, path: &str, value: &T) -> FileResult<()> {
        let json = serde_json::to_value(value).map_err(|e| FileError::invalid_data(None, e))?;
        self.set(path, json_to_settings_value(json));
        Ok(())
    }

    /// Gets a value converted to `T`.
    ///
    /// Returns `None` if the path doesn't exist or holds another type.
    pub fn get<T: FromSettingsValue>(&self, path: &str) -> Option<T> {
        let data = self.data.read();
        get_nested(&data, &parse_path(path)).and_then(T::from_settings_value)
    }

    /// Gets a value, or `default` if it is missing or of another type.
    pub fn get_or<T: FromSettingsValue>(&self, path: &str, default: T) -> T {
        self.get(path).unwrap_or(default)
    }

    /// Gets any deserializable value.
    pub fn get_deserialized<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let value = self.get::<SettingsValue>(path)?;
        serde_json::from_value(settings_value_to_json(value)).ok()
    }

    /// Returns true if a value exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        get_nested(&self.data.read(), &parse_path(path)).is_some()
    }

    /// Removes a value, returning it.
    pub fn remove(&self, path: &str) -> Option<SettingsValue> {
        let parts = parse_path(path);
        let removed = remove_nested(&mut self.data.write(), &parts);

        if removed.is_some() {
            self.changed.emit(path.to_string());
            self.try_auto_save();
        }
        removed
    }

    /// Clears all settings.
    pub fn clear(&self) {
        self.data.write().clear();
        self.changed.emit(String::new());
        self.try_auto_save();
    }

    /// Keys directly below the group at `path`.
    pub fn group_keys(&self, path: &str) -> Vec<String> {
        let data = self.data.read();
        match get_nested(&data, &parse_path(path)) {
            Some(SettingsValue::Object(obj)) => obj.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if there are no settings.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Loads a settings file, picking the format from the extension.
    pub fn load(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        Ok(Self::from_data(read_data(path, SettingsFormat::from_path(path))?))
    }

    /// Replaces the contents of this store with a settings file.
    ///
    /// Connected slots stay connected; `changed` is emitted once with an
    /// empty key.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        let data = read_data(path, SettingsFormat::from_path(path))?;
        *self.data.write() = data;
        self.changed.emit(String::new());
        Ok(())
    }

    /// Saves to a file atomically, picking the format from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        self.save_as(path, SettingsFormat::from_path(path))
    }

    /// Saves to a file atomically in the given format.
    pub fn save_as(&self, path: impl AsRef<Path>, format: SettingsFormat) -> FileResult<()> {
        let path = path.as_ref();
        let text = {
            let data = self.data.read();
            match format {
                SettingsFormat::Json => serde_json::to_string_pretty(&*data)
                    .map_err(|e| FileError::invalid_data(Some(path.to_path_buf()), e))?,
                SettingsFormat::Toml => {
                    let value = settings_to_toml(&SettingsValue::Object(data.clone()));
                    toml::to_string_pretty(&value)
                        .map_err(|e| FileError::invalid_data(Some(path.to_path_buf()), e))?
                }
            }
        };

        atomic_write(path, |writer| writer.write_all(text.as_bytes()))?;
        tracing::debug!(target: targets::SETTINGS, path = %path.display(), "saved settings");
        Ok(())
    }

    /// Saves to the auto-save file, if one is configured.
    pub fn sync(&self) -> FileResult<()> {
        let config = self.auto_save.read().clone();
        match config {
            Some(config) => self.save_as(&config.path, config.format),
            None => Ok(()),
        }
    }

    fn try_auto_save(&self) {
        if let Err(e) = self.sync() {
            tracing::error!(target: targets::SETTINGS, "Failed to auto-save settings: {}", e);
        }
    }
}

fn read_data(path: &Path, format: SettingsFormat) -> FileResult<HashMap<String, SettingsValue>> {
    let content = read_text(path)?;
    let invalid = |e: Box<dyn std::error::Error + Send + Sync>| FileError::invalid_data(Some(path.to_path_buf()), e);

    match format {
        SettingsFormat::Json => serde_json::from_str(&content).map_err(|e| invalid(e.into())),
        SettingsFormat::Toml => {
            let table: toml::Table = content.parse().map_err(|e: toml::de::Error| invalid(e.into()))?;
            Ok(table
                .into_iter()
                .map(|(k, v)| (k, toml_to_settings(v)))
                .collect())
        }
    }
}

fn parse_path(path: &str) -> Vec<&str> {
    path.split(['.', '/']).filter(|s| !s.is_empty()).collect()
}

fn get_nested<'a>(data: &'a HashMap<String, SettingsValue>, parts: &[&str]) -> Option<&'a SettingsValue> {
    let (first, rest) = parts.split_first()?;
    let value = data.get(*first)?;
    if rest.is_empty() {
        return Some(value);
    }
    match value {
        SettingsValue::Object(obj) => get_nested(obj, rest),
        _ => None,
    }
}

fn set_nested(data: &mut HashMap<String, SettingsValue>, parts: &[&str], value: SettingsValue) {
    let Some((first, rest)) = parts.split_first() else {
        return;
    };
    if rest.is_empty() {
        data.insert(first.to_string(), value);
        return;
    }

    let entry = data
        .entry(first.to_string())
        .or_insert_with(|| SettingsValue::Object(HashMap::new()));
    if !matches!(entry, SettingsValue::Object(_)) {
        *entry = SettingsValue::Object(HashMap::new());
    }
    if let SettingsValue::Object(obj) = entry {
        set_nested(obj, rest, value);
    }
}

fn remove_nested(data: &mut HashMap<String, SettingsValue>, parts: &[&str]) -> Option<SettingsValue> {
    let (first, rest) = parts.split_first()?;
    if rest.is_empty() {
        return data.remove(*first);
    }
    match data.get_mut(*first)? {
        SettingsValue::Object(obj) => remove_nested(obj, rest),
        _ => None,
    }
}

fn json_to_settings_value(json: serde_json::Value) -> SettingsValue {
    match json {
        serde_json::Value::Null => SettingsValue::Null,
        serde_json::Value::Bool(b) => SettingsValue::Bool(b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(SettingsValue::Integer)
            .or_else(|| n.as_f64().map(SettingsValue::Float))
            .unwrap_or(SettingsValue::Null),
        serde_json::Value::String(s) => SettingsValue::String(s),
        serde_json::Value::Array(arr) => {
            SettingsValue::Array(arr.into_iter().map(json_to_settings_value).collect())
        }
        serde_json::Value::Object(obj) => {
            SettingsValue::Object(obj.into_iter().map(|(k, v)| (k, json_to_settings_value(v))).collect())
        }
    }
}

fn settings_value_to_json(value: SettingsValue) -> serde_json::Value {
    match value {
        SettingsValue::Null => serde_json::Value::Null,
        SettingsValue::Bool(b) => serde_json::Value::Bool(b),
        SettingsValue::Integer(i) => serde_json::Value::Number(i.into()),
        SettingsValue::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        SettingsValue::String(s) => serde_json::Value::String(s),
        SettingsValue::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(settings_value_to_json).collect())
        }
        SettingsValue::Object(obj) => {
            serde_json::Value::Object(obj.into_iter().map(|(k, v)| (k, settings_value_to_json(v))).collect())
        }
    }
}

fn toml_to_settings(value: toml::Value) -> SettingsValue {
    match value {
        toml::Value::String(s) => SettingsValue::String(s),
        toml::Value::Integer(i) => SettingsValue::Integer(i),
        toml::Value::Float(f) => SettingsValue::Float(f),
        toml::Value::Boolean(b) => SettingsValue::Bool(b),
        toml::Value::Datetime(dt) => SettingsValue::String(dt.to_string()),
        toml::Value::Array(arr) => SettingsValue::Array(arr.into_iter().map(toml_to_settings).collect()),
        toml::Value::Table(table) => {
            SettingsValue::Object(table.into_iter().map(|(k, v)| (k, toml_to_settings(v))).collect())
        }
    }
}

// TOML has no null; empty strings stand in for it.
fn settings_to_toml(value: &SettingsValue) -> toml::Value {
    match value {
        SettingsValue::Null => toml::Value::String(String::new()),
        SettingsValue::Bool(b) => toml::Value::Boolean(*b),
        SettingsValue::Integer(i) => toml::Value::Integer(*i),
        SettingsValue::Float(f) => toml::Value::Float(*f),
        SettingsValue::String(s) => toml::Value::String(s.clone()),
        SettingsValue::Array(arr) => toml::Value::Array(arr.iter().map(settings_to_toml).collect()),
        SettingsValue::Object(obj) => {
            toml::Value::Table(obj.iter().map(|(k, v)| (k.clone(), settings_to_toml(v))).collect())
        }
    }
}
