use chrono::{DateTime, Utc};
use nemesis_chaos::CrashTarget;
use nemesis_core::Candle;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// One session event, tagged the way the downstream log tooling expects
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEvent {
    KlineUpdate {
        symbol: String,
        candle: Candle,
        poisoned: bool,
    },
    InjectedAttack {
        symbol: String,
        target: CrashTarget,
    },
    Verdict {
        case_id: String,
        ruling: String,
        details: String,
    },
}

#[derive(Debug, Serialize)]
struct TelemetryEntry<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a SessionEvent,
}

/// Flight recorder: append-only JSONL telemetry for one session.
///
/// Nothing in the core reads this back; it exists so a session can be
/// dissected after the fact.
pub struct BlackBox {
    path: PathBuf,
    file: File,
}

impl BlackBox {
    /// Open a fresh `session_<stamp>.jsonl` under `dir`
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let stamp = Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let path = dir.join(format!("session_{stamp}.jsonl"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::info!("recording session telemetry to {}", path.display());
        Ok(Self { path, file })
    }

    pub fn record(&mut self, event: &SessionEvent) -> Result<()> {
        let entry = TelemetryEntry {
            timestamp: Utc::now(),
            event,
        };
        serde_json::to_writer(&mut self.file, &entry)?;
        self.file.write_all(b"\n")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_events_written_as_jsonl() {
        let dir = std::env::temp_dir().join(format!("nemesis-blackbox-{}", uuid::Uuid::new_v4()));
        let mut recorder = BlackBox::create(&dir).unwrap();

        let candle = Candle::new(
            Utc::now(),
            dec!(95000),
            dec!(95100),
            dec!(94900),
            dec!(95050),
            dec!(10),
        );
        recorder
            .record(&SessionEvent::KlineUpdate {
                symbol: "BTCUSDT".to_string(),
                candle,
                poisoned: false,
            })
            .unwrap();
        recorder
            .record(&SessionEvent::Verdict {
                case_id: "CASE-1".to_string(),
                ruling: "CLEAN".to_string(),
                details: "ok".to_string(),
            })
            .unwrap();

        let raw = std::fs::read_to_string(recorder.path()).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "KLINE_UPDATE");
        assert_eq!(first["data"]["poisoned"], false);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "VERDICT");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
