use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use super::lock::WriteLock;

/// Log size that triggers trimming of old entries (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this many days are prunable.
pub const PRUNE_AGE_DAYS: i64 = 30;

const LOG_FILE: &str = ".recovery.log";

const FILE_HEADER: &str = "\
<!-- pintask recovery log: append-only record of failed loads and saves.
     Unsaved task lists are kept in the entry body.
     View with: pt log
     Prune old entries: pt log prune -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Reading tasks or window state failed
    Load,
    /// Writing tasks or window state failed
    Save,
    /// A window gateway call failed
    Window,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Load => write!(f, "load"),
            RecoveryCategory::Save => write!(f, "save"),
            RecoveryCategory::Window => write!(f, "window"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "load" => Some(RecoveryCategory::Load),
            "save" => Some(RecoveryCategory::Save),
            "window" => Some(RecoveryCategory::Window),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }

    /// JSON form for `pt log --json`.
    pub fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            "category": self.category.to_string(),
            "description": self.description,
            "fields": fields,
            "body": self.body,
        })
    }

    /// Human-readable form, the same markdown the log stores.
    pub fn to_display_markdown(&self) -> String {
        self.to_markdown()
    }
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE)
}

/// Write `content` to `path` via a sibling temp file and rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append an entry to the log in `data_dir`.
pub fn log_recovery(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    std::fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);

    if let Ok(meta) = std::fs::metadata(&path)
        && meta.len() > MAX_LOG_SIZE
    {
        trim_old_entries(&path);
    }

    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

fn trim_old_entries(path: &Path) {
    let mut content = String::new();
    if File::open(path)
        .and_then(|mut f| f.read_to_string(&mut content))
        .is_err()
    {
        return;
    }
    let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
    let trimmed = prune_entries_before(&content, &cutoff);
    if trimmed.len() < content.len() {
        let _ = atomic_write(path, trimmed.as_bytes());
    }
}

/// Where runtime components send failures they swallow.
///
/// Entries go to the recovery log when a data directory is set; the latest
/// description is kept for the status row either way.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    data_dir: Option<PathBuf>,
    notice: Option<String>,
}

impl Reporter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Reporter {
            data_dir: Some(data_dir.into()),
            notice: None,
        }
    }

    /// Keeps notices in memory only.
    pub fn detached() -> Self {
        Reporter::default()
    }

    /// Never writes to the terminal; a log that cannot be written shows up
    /// in the notice instead.
    pub fn report(&mut self, entry: RecoveryEntry) {
        let mut notice = format!("{}: {}", entry.category, entry.description);
        if let Some(dir) = &self.data_dir
            && let Err(e) = log_recovery(dir, &entry)
        {
            notice.push_str(&format!(" (log unavailable: {})", e));
        }
        self.notice = Some(notice);
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Most recent entries first, at most `limit` of them.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(data_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_entry_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    body_lines.push(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }
    entries
}

/// `<rfc3339> <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp, rest) = header.split_once(' ')?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);
    let (category, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category)?;
    Some((timestamp, category, description.to_string()))
}

// ---------------------------------------------------------------------------
// Pruning
// ---------------------------------------------------------------------------

/// Remove old entries (or all of them). Returns how many were removed.
pub fn prune_recovery(data_dir: &Path, all: bool) -> Result<usize, Box<dyn std::error::Error>> {
    let path = recovery_log_path(data_dir);
    if !path.exists() {
        return Ok(0);
    }
    let _lock = WriteLock::acquire_default(data_dir)?;
    let content = std::fs::read_to_string(&path)?;
    let before = parse_entries(&content).len();

    let kept = if all {
        FILE_HEADER.to_string()
    } else {
        let cutoff = Utc::now() - chrono::Duration::days(PRUNE_AGE_DAYS);
        prune_entries_before(&content, &cutoff)
    };
    let after = parse_entries(&kept).len();
    atomic_write(&path, kept.as_bytes())?;
    Ok(before - after)
}

/// Drop entries stamped before `cutoff`, keeping the file header.
fn prune_entries_before(content: &str, cutoff: &DateTime<Utc>) -> String {
    let mut result = String::new();
    let mut current = String::new();
    let mut current_ts: Option<DateTime<Utc>> = None;
    let mut in_header = true;

    for line in content.lines() {
        if in_header {
            result.push_str(line);
            result.push('\n');
            if line == "---" {
                in_header = false;
            }
            continue;
        }
        if let Some(header) = line.strip_prefix("## ") {
            if current_ts.is_some_and(|ts| ts >= *cutoff) {
                result.push_str(&current);
            }
            current.clear();
            current_ts = parse_entry_header(header).map(|(ts, _, _)| ts);
        }
        current.push_str(line);
        current.push('\n');
    }
    if current_ts.is_some_and(|ts| ts >= *cutoff) {
        result.push_str(&current);
    }
    result
}
