//! Persisted user preferences.
//!
//! A key to JSON value store with last-write-wins semantics. Values that
//! are missing or no longer deserialize as the expected type fall back to
//! the caller's default.

use crate::error::Result;
use crate::smoothing::DrawAlgorithm;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Generic key to JSON value store.
pub trait PreferenceStore {
    fn get_value(&self, key: &str) -> Option<Value>;

    fn set_value(&mut self, key: &str, value: Value) -> Result<()>;

    /// Typed read; missing or mismatched values yield `default`.
    fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get_value(key) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(key, error = %e, "ignoring unreadable preference");
                default
            }),
            None => default,
        }
    }

    /// Typed write.
    fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_value(key, value)
    }
}

/// In-memory store, insertion ordered.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: IndexMap<String, Value>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON object file, rewritten on every set.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: IndexMap<String, Value>,
}

impl JsonFilePreferences {
    /// Open the store at `path`. A missing file is an empty store; a file
    /// that is not a JSON object is logged and treated as empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "preference file is corrupt; starting empty");
                IndexMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get_value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

/// Display toggles persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub show_grid: bool,
    pub show_points: bool,
    pub draw_algorithm: DrawAlgorithm,
    /// Smoothing level, see [`SmoothingPolicy`](crate::smoothing::SmoothingPolicy)
    pub curve_level: u32,
    pub crosshair: bool,
    pub axes: bool,
    pub show_controls: bool,
    pub show_measure_on_hover: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_points: true,
            draw_algorithm: DrawAlgorithm::Linear,
            curve_level: 1,
            crosshair: false,
            axes: true,
            show_controls: true,
            show_measure_on_hover: true,
        }
    }
}

impl ViewSettings {
    pub const KEY_SHOW_GRID: &'static str = "showGrid";
    pub const KEY_SHOW_POINTS: &'static str = "showPoints";
    pub const KEY_DRAW_ALGO: &'static str = "drawAlgo";
    pub const KEY_CURVE_LEVEL: &'static str = "curveLevel";
    pub const KEY_CROSSHAIR: &'static str = "crosshair";
    pub const KEY_AXES: &'static str = "axes";
    pub const KEY_SHOW_CONTROLS: &'static str = "showControls";
    pub const KEY_MEASURE_ON_HOVER: &'static str = "showMeasureOnHover";

    pub fn load<S: PreferenceStore>(store: &S) -> Self {
        let d = Self::default();
        Self {
            show_grid: store.get_or(Self::KEY_SHOW_GRID, d.show_grid),
            show_points: store.get_or(Self::KEY_SHOW_POINTS, d.show_points),
            draw_algorithm: store.get_or(Self::KEY_DRAW_ALGO, d.draw_algorithm),
            curve_level: store.get_or(Self::KEY_CURVE_LEVEL, d.curve_level),
            crosshair: store.get_or(Self::KEY_CROSSHAIR, d.crosshair),
            axes: store.get_or(Self::KEY_AXES, d.axes),
            show_controls: store.get_or(Self::KEY_SHOW_CONTROLS, d.show_controls),
            show_measure_on_hover: store.get_or(Self::KEY_MEASURE_ON_HOVER, d.show_measure_on_hover),
        }
    }

    pub fn save<S: PreferenceStore>(&self, store: &mut S) -> Result<()> {
        store.set(Self::KEY_SHOW_GRID, &self.show_grid)?;
        store.set(Self::KEY_SHOW_POINTS, &self.show_points)?;
        store.set(Self::KEY_DRAW_ALGO, &self.draw_algorithm)?;
        store.set(Self::KEY_CURVE_LEVEL, &self.curve_level)?;
        store.set(Self::KEY_CROSSHAIR, &self.crosshair)?;
        store.set(Self::KEY_AXES, &self.axes)?;
        store.set(Self::KEY_SHOW_CONTROLS, &self.show_controls)?;
        store.set(Self::KEY_MEASURE_ON_HOVER, &self.show_measure_on_hover)
    }
}
