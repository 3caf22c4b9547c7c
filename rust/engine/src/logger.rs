use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One answered training round, serialized as a single JSONL line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Player hand as displayed ("A♥ 7♣ (18)")
    pub hand: String,
    /// Strategy row key ("A7")
    pub hand_key: String,
    /// Dealer column used for the lookup ("2"-"10" or "A")
    pub dealer: String,
    /// One-letter action the player chose
    pub player_action: String,
    /// One-letter action the table resolved
    pub correct_action: String,
    pub is_correct: bool,
    /// Description of the exception that fired, if one did
    #[serde(default)]
    pub exception: Option<String>,
    /// Running correct count after this round
    pub correct: u32,
    /// Running total after this round
    pub total: u32,
    /// Timestamp (RFC3339 format); injected at write time when missing
    #[serde(default)]
    pub ts: Option<String>,
}

/// Appends round records to a JSONL file, one line per answered round.
#[derive(Debug)]
pub struct RoundLogger {
    writer: BufWriter<File>,
}

impl RoundLogger {
    /// Open the log for appending, creating it (and its parent
    /// directory) if missing. An existing log keeps its rounds.
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
