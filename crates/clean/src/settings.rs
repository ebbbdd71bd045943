//! User settings, stored as a JSON blob addressed by dot paths such as
//! `trimSpaces.trimLeft`.

use crate::case::CaseSettings;
use crate::cleanup::CleanupSettings;
use crate::dates::DateFormatSettings;
use crate::error::SettingsError;
use crate::preview::PreviewSettings;
use crate::replace::FindReplaceSettings;
use crate::trim::TrimOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Length limit for recently used lists
pub const MAX_RECENT_ITEMS: usize = 10;

type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub preview: PreviewSettings,
    pub enable_undo: bool,
    pub show_notifications: bool,
    pub trim_spaces: TrimOptions,
    pub case_conversion: CaseSettings,
    pub date_format: DateFormatSettings,
    pub find_replace: FindReplaceSettings,
    pub one_click_cleanup: CleanupSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preview: PreviewSettings::default(),
            enable_undo: true,
            show_notifications: true,
            trim_spaces: TrimOptions::default(),
            case_conversion: CaseSettings::default(),
            date_format: DateFormatSettings::default(),
            find_replace: FindReplaceSettings::default(),
            one_click_cleanup: CleanupSettings::default(),
        }
    }
}

/// Settings backed by a JSON file. Every change is saved immediately.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// `<config dir>/cellscrub/settings.json`
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cellscrub")
            .join("settings.json")
    }

    #[must_use]
    pub fn new(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    /// Load from `path`, merging the saved values over the defaults.
    ///
    /// A missing file gives the defaults; an unreadable or invalid one is
    /// logged and also gives the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match read_settings(&path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load settings, using defaults");
                Settings::default()
            }
        };
        Self { path, settings }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    /// Value at a dot path, `None` if there is no such setting
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        let tree = serde_json::to_value(&self.settings).ok()?;
        tree.pointer(&json_pointer(path)).cloned()
    }

    /// Set the value at a dot path and save.
    ///
    /// The change is rejected, leaving the settings untouched, when the path
    /// does not name a setting or the value has the wrong shape.
    pub fn update(&mut self, path: &str, value: Value) -> Result<()> {
        let mut tree = serde_json::to_value(&self.settings)?;
        set_path(&mut tree, path, value)?;
        self.replace_checked(tree, path)
    }

    /// Restore every setting to its default and save
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();
        self.save()
    }

    /// Restore one top-level category (`trimSpaces`, `enableUndo`, ...)
    pub fn reset_category(&mut self, category: &str) -> Result<()> {
        let defaults = serde_json::to_value(Settings::default())?;
        let value = defaults
            .get(category)
            .cloned()
            .ok_or_else(|| SettingsError::UnknownCategory(category.to_string()))?;
        self.update(category, value)
    }

    /// Put `value` at the front of the list `feature.list`, removing an
    /// earlier copy and keeping at most `max_items` entries.
    pub fn add_recent_item(
        &mut self,
        feature: &str,
        list: &str,
        value: impl Into<Value>,
        max_items: usize,
    ) -> Result<()> {
        let path = format!("{feature}.{list}");
        let value = value.into();

        let mut items = match self.get(&path) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(SettingsError::UnknownSetting(path)),
            None => Vec::new(),
        };
        items.retain(|item| *item != value);
        items.insert(0, value);
        items.truncate(max_items);

        self.update(&path, Value::Array(items))
    }

    fn replace_checked(&mut self, tree: Value, path: &str) -> Result<()> {
        let settings: Settings =
            serde_json::from_value(tree).map_err(|source| SettingsError::InvalidValue {
                path: path.to_string(),
                source,
            })?;
        let stored = serde_json::to_value(&settings)?;
        if stored.pointer(&json_pointer(path)).is_none() {
            return Err(SettingsError::UnknownSetting(path.to_string()));
        }
        self.settings = settings;
        self.save()
    }
}

fn read_settings(path: &Path) -> Result<Option<Settings>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let saved: Value = serde_json::from_str(&contents)?;
    let mut merged = serde_json::to_value(Settings::default())?;
    merge_deep(&mut merged, saved);
    Ok(Some(serde_json::from_value(merged)?))
}

/// Merge `source` into `target`: objects merge key by key, anything else
/// replaces the target value.
fn merge_deep(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_deep(existing, value);
                    }
                    _ => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

fn json_pointer(path: &str) -> String {
    path.split('.').fold(String::new(), |mut pointer, part| {
        pointer.push('/');
        pointer.push_str(part);
        pointer
    })
}

/// Write `value` at a dot path, creating intermediate objects
fn set_path(tree: &mut Value, path: &str, value: Value) -> Result<()> {
    let unknown = || SettingsError::UnknownSetting(path.to_string());
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(unknown());
    }

    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };

    let mut current = tree;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = match current {
            Value::Object(map) => map
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return Err(unknown()),
        };
    }
    match current {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        _ => Err(unknown()),
    }
}
