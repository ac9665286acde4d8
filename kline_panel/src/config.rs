// kline_panel/src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::warn;

use crate::bars::DEFAULT_BAR_COUNT;
use crate::buttons::MIN_DEBOUNCE;
use crate::error::ConfigError;
use crate::feed::binance::DEFAULT_BASE_URL;
use crate::interval::{Interval, IntervalSelection};
use crate::profile::DisplayProfile;
use crate::touch::Rotation;

/// Bump on schema changes.
const CONFIG_VERSION: u32 = 1;

/// Largest accepted native display side, in pixels.
pub const MAX_DISPLAY_SIDE: u32 = 4096;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "KLINE_PANEL_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Binance,
    Dummy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub kind: FeedKind,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: FeedKind::Binance,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub version: u32,

    pub symbol: String,
    pub symbol_label: String,
    pub bar_count: usize,

    pub intervals: Vec<Interval>,
    pub default_interval: usize,

    pub refresh_secs: u64,
    pub debounce_ms: u64,

    pub feed: FeedConfig,
    pub profile: DisplayProfile,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,

            symbol: "BTCUSDT".to_string(),
            symbol_label: "BTC/USDT".to_string(),
            bar_count: DEFAULT_BAR_COUNT,

            intervals: Interval::ALL.to_vec(),
            default_interval: 3,

            refresh_secs: 60,
            debounce_ms: 200,

            feed: FeedConfig::default(),
            profile: DisplayProfile::default(),
        }
    }
}

impl PanelConfig {
    /// Reject unusable settings; raise a too-short debounce to the minimum.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.intervals.is_empty() {
            return Err(ConfigError::Invalid("interval list is empty".into()));
        }
        if self.default_interval >= self.intervals.len() {
            return Err(ConfigError::Invalid(format!(
                "default_interval {} out of range for {} intervals",
                self.default_interval,
                self.intervals.len()
            )));
        }
        if self.bar_count == 0 {
            return Err(ConfigError::Invalid("bar_count must be positive".into()));
        }
        if self.refresh_secs == 0 {
            return Err(ConfigError::Invalid("refresh_secs must be positive".into()));
        }
        if self.profile.native_width == 0 || self.profile.native_height == 0 {
            return Err(ConfigError::Invalid("display size must be positive".into()));
        }
        if self.profile.native_width > MAX_DISPLAY_SIDE || self.profile.native_height > MAX_DISPLAY_SIDE {
            return Err(ConfigError::Invalid(format!(
                "display size {}x{} exceeds {MAX_DISPLAY_SIDE}",
                self.profile.native_width, self.profile.native_height
            )));
        }
        for rotation in Rotation::ALL {
            let cal = self.profile.calibration.for_rotation(rotation);
            if cal.x.span() == 0 || cal.y.span() == 0 {
                return Err(ConfigError::Invalid(format!(
                    "{rotation:?} touch calibration has a zero-width axis"
                )));
            }
        }
        let floor = MIN_DEBOUNCE.as_millis() as u64;
        if self.debounce_ms < floor {
            warn!(debounce_ms = self.debounce_ms, floor, "debounce raised to minimum");
            self.debounce_ms = floor;
        }
        Ok(self)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn selection(&self) -> IntervalSelection {
        IntervalSelection::new(self.intervals.clone(), self.default_interval)
    }
}

pub struct ConfigStore {
    path: PathBuf,
    last_saved_json: Mutex<String>,
}

impl ConfigStore {
    /// `$KLINE_PANEL_CONFIG`, else the platform config dir.
    pub fn new() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => default_config_path()?,
        };
        Ok(Self::at(path))
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            last_saved_json: Mutex::new(String::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Missing file gives defaults; a corrupt file is archived first.
    pub fn load(&self) -> PanelConfig {
        if !self.path.exists() {
            return PanelConfig::default();
        }
        match read_json::<PanelConfig>(&self.path) {
            Ok(mut cfg) => {
                // pre-versioned files
                if cfg.version == 0 {
                    cfg.version = CONFIG_VERSION;
                }
                cfg
            }
            Err(err) => {
                archive_corrupt(&self.path, &err);
                PanelConfig::default()
            }
        }
    }

    /// Write only when the JSON differs from the last save.
    pub fn save_now(&self, cfg: &PanelConfig) -> Result<()> {
        let path = &self.path;

        let parent = path.parent().context("config path has no parent")?;
        fs::create_dir_all(parent).with_context(|| format!("create config dir {:?}", parent))?;

        let json = serde_json::to_string_pretty(cfg)?;

        {
            let mut last = self
                .last_saved_json
                .lock()
                .map_err(|_| anyhow::anyhow!("config store lock poisoned"))?;
            if *last == json {
                return Ok(());
            }
            *last = json.clone();
        }

        if path.exists() {
            let backup = path.with_extension("json.bak");
            let _ = fs::copy(path, backup);
        }

        atomic_write(path, json.as_bytes())?;
        Ok(())
    }
}

fn default_config_path() -> Result<PathBuf> {
    let proj =
        ProjectDirs::from("com", "kline", "kline_panel").context("ProjectDirs::from returned None")?;
    Ok(proj.config_dir().join("config.json"))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {:?}", path))?;
    let value = serde_json::from_slice::<T>(&bytes).with_context(|| "parse json")?;
    Ok(value)
}

fn archive_corrupt(path: &Path, err: &anyhow::Error) {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let archived = path.with_extension(format!("corrupt.{ts}.json"));
    let _ = fs::rename(path, &archived);
    warn!(error = ?err, archived = ?archived, "config corrupt; archived");
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().context("no parent dir for config path")?;
    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    {
        let mut f = fs::File::create(&tmp).with_context(|| format!("create tmp {:?}", tmp))?;
        f.write_all(bytes).with_context(|| "write tmp")?;
        let _ = f.sync_all();
    }

    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}
