//! Configuration management

use crate::resources::ReporterSettings;
use crate::{ReporterError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "RESREPORT_CONFIG";

/// Default CPU measurement window in milliseconds
const DEFAULT_CPU_INTERVAL_MS: i32 = 250;

/// Persistent settings for speech, gestures and sampling
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.resreport.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path, creating it if missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| ReporterError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| ReporterError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| ReporterError::Config(format!("Failed to save config: {}", e)))
    }

    /// `$RESREPORT_CONFIG`, else `~/.resreport.cfg`
    fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resreport.cfg")
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"));

        ini.with_section(Some("keys"))
            .set("cpu_cores", "alt+(")
            .set("memory", "alt+)")
            .set("average_cpu", "")
            .set("silence", "alt+x");

        ini.with_section(Some("sampling"))
            .set("cpu_interval_ms", DEFAULT_CPU_INTERVAL_MS.to_string())
            .set("include_children", "true");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value, `None` when the key is absent
    pub fn get_opt_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get_from(Some(section), key)
            .map(|v| v.trim().to_string())
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i32) -> i32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Speech rate (0-100)
    pub fn rate(&self) -> Option<u8> {
        self.get_int("speech", "rate", -1)
            .try_into()
            .ok()
            .filter(|&r| r <= 100)
    }

    /// Speech volume (0-100)
    pub fn volume(&self) -> Option<u8> {
        self.get_int("speech", "volume", -1)
            .try_into()
            .ok()
            .filter(|&v| v <= 100)
    }

    /// Voice index for TTS engine
    pub fn voice_idx(&self) -> Option<usize> {
        self.get_int("speech", "voice_idx", -1).try_into().ok()
    }

    /// Gesture bound to an action name in `[keys]`
    ///
    /// `None` means "use the built-in default"; `Some("")` means unbound.
    pub fn key_binding(&self, action: &str) -> Option<String> {
        self.get_opt_string("keys", action)
    }

    /// Sampling settings for the reporter
    ///
    /// The CPU window never drops below what sysinfo needs between two
    /// refreshes to compute a usage figure.
    pub fn reporter_settings(&self) -> ReporterSettings {
        let ms = self
            .get_int("sampling", "cpu_interval_ms", DEFAULT_CPU_INTERVAL_MS)
            .max(0) as u64;
        let cpu_interval = Duration::from_millis(ms).max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

        ReporterSettings {
            cpu_interval,
            include_children: self.get_bool("sampling", "include_children", true),
        }
    }
}
