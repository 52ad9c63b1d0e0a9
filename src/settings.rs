//! Editor preferences
//!
//! Stored as XML in the user's config directory.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_auto_compile() -> bool {
    true
}

fn default_compile_delay_ms() -> u64 {
    1500
}

fn default_animation_interval_ms() -> u64 {
    30
}

fn default_open_dir() -> String {
    ".".to_string()
}

/// Preferences shared by every editor session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "ShaderWorkbenchPreferences")]
pub struct EditorPreferences {
    /// Rebuild automatically after the user stops typing
    #[serde(rename = "autoCompile", default = "default_auto_compile")]
    pub auto_compile: bool,

    /// Inactivity before an automatic rebuild
    #[serde(rename = "compileDelayMs", default = "default_compile_delay_ms")]
    pub compile_delay_ms: u64,

    /// Redraw interval while the current effect is animated
    #[serde(rename = "animationIntervalMs", default = "default_animation_interval_ms")]
    pub animation_interval_ms: u64,

    /// Directory the open dialog starts in
    #[serde(rename = "openDir", default = "default_open_dir")]
    pub open_dir: String,

    #[serde(rename = "lastOpenedFile", default, skip_serializing_if = "Option::is_none")]
    pub last_opened_file: Option<String>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            auto_compile: default_auto_compile(),
            compile_delay_ms: default_compile_delay_ms(),
            animation_interval_ms: default_animation_interval_ms(),
            open_dir: default_open_dir(),
            last_opened_file: None,
        }
    }
}

impl EditorPreferences {
    /// Preferences file path
    fn prefs_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("ShaderWorkbench");
            p.push("preferences.xml");
            p
        })
    }

    /// Load preferences from the config directory, defaults on any failure
    pub fn load() -> Self {
        let Some(path) = Self::prefs_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save preferences to the config directory
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::prefs_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_xml(&contents)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }

    pub fn from_xml(xml: &str) -> Result<Self, SettingsError> {
        Ok(from_str(xml)?)
    }

    pub fn to_xml(&self) -> Result<String, SettingsError> {
        let xml = to_string(self)?;
        Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", xml))
    }

    pub fn compile_delay(&self) -> Duration {
        Duration::from_millis(self.compile_delay_ms)
    }

    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    /// Remember the last opened effect and save
    pub fn set_last_opened(&mut self, path: &Path) {
        self.last_opened_file = Some(path.to_string_lossy().to_string());
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.open_dir = dir.to_string_lossy().to_string();
        }
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save preferences: {}", e);
        }
    }

    /// Last opened effect, if it still exists
    pub fn last_opened(&self) -> Option<PathBuf> {
        self.last_opened_file.as_ref().map(PathBuf::from).filter(|p| p.exists())
    }
}

/// Settings-related errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::DeError),
    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),
    #[error("Could not find config directory")]
    NoConfigDir,
}
