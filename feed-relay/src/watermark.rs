use crate::types::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_STATE_FILE: &str = "last_timestamp.json";

/// Persists the "processed up to" timestamp between runs as a single JSON string.
#[derive(Debug, Clone)]
pub struct WatermarkStore {
    path: PathBuf,
}

impl WatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored watermark, or the Unix epoch when there is no usable state.
    pub async fn load(&self) -> DateTime<Utc> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) => {
                debug!("No watermark at {} ({}), starting from epoch", self.path.display(), e);
                return DateTime::<Utc>::UNIX_EPOCH;
            }
        };

        match serde_json::from_str::<DateTime<Utc>>(&data) {
            Ok(watermark) => watermark,
            Err(e) => {
                warn!("Ignoring corrupt watermark file {}: {}", self.path.display(), e);
                DateTime::<Utc>::UNIX_EPOCH
            }
        }
    }

    /// Best effort: a failed write is logged and the old value stays on disk.
    pub async fn save(&self, watermark: DateTime<Utc>) {
        if let Err(e) = self.try_save(watermark).await {
            warn!("Failed to persist watermark to {}: {}", self.path.display(), e);
        }
    }

    pub async fn try_save(&self, watermark: DateTime<Utc>) -> Result<()> {
        let data = serde_json::to_string_pretty(&watermark)?;

        // Readers see the old value or the new one, never a partial write
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!("Saved watermark {} to {}", watermark.to_rfc3339(), self.path.display());
        Ok(())
    }
}

impl Default for WatermarkStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_FILE)
    }
}
