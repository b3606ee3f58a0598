use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{anyhow, Context, Result};

use super::model::{Record, Schema, Table};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one restaurant per row.
/// No schema is enforced; every column is kept and typed per cell.
pub fn load_csv(path: &Path) -> Result<Table> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_table(reader)
}

fn read_table<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(Record::from_fields(record.iter()));
    }

    Ok(Table::new(Schema::new(headers), rows))
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Outcome of a load attempt shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded { rows: usize },
    Missing(DashboardError),
}

/// Result of [`TableCache::load`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Arc<Table>,
    pub status: LoadStatus,
    /// `true` when the table was served without touching the file contents.
    pub from_cache: bool,
}

/// Identity of the file contents as seen by the filesystem.
///
/// Length is part of the key so a platform without modification times
/// still gets cache hits, and an edit that changes the size is noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(meta: &std::fs::Metadata) -> Self {
        FileStamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    table: Arc<Table>,
    status: LoadStatus,
    /// Stamp of the file when it was read. `None` for a missing file.
    stamp: Option<FileStamp>,
}

impl CacheEntry {
    fn loaded(&self) -> Loaded {
        Loaded {
            table: self.table.clone(),
            status: self.status.clone(),
            from_cache: true,
        }
    }
}

/// Owns the dataset read from one CSV path.
///
/// The file is parsed once and re-read only when its stamp (modification
/// time and length) changes, so calling [`load`](Self::load) on every
/// interaction is cheap.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    entry: Option<CacheEntry>,
    /// Stamp and message of the last failed parse, so a broken file is not
    /// re-read until it changes.
    failure: Option<(FileStamp, String)>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TableCache {
            path: path.into(),
            entry: None,
            failure: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the cache at another file, dropping the cached table.
    pub fn open(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }

    /// Forget the cached table so the next `load` re-reads the file.
    pub fn invalidate(&mut self) {
        self.entry = None;
        self.failure = None;
    }

    /// Return the table for the configured path.
    ///
    /// A missing file is not an error: it yields an empty table with a
    /// [`LoadStatus::Missing`] status. Parse and I/O failures are returned
    /// as errors.
    pub fn load(&mut self) -> Result<Loaded> {
        let stamp = match std::fs::metadata(&self.path) {
            Ok(meta) => Some(FileStamp::of(&meta)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };
        self.load_stamped(stamp)
    }

    fn load_stamped(&mut self, stamp: Option<FileStamp>) -> Result<Loaded> {
        if let Some(entry) = &self.entry {
            if entry.stamp == stamp {
                return Ok(entry.loaded());
            }
        }

        let Some(stamp) = stamp else {
            return Ok(self.missing());
        };

        if let Some((failed_stamp, message)) = &self.failure {
            if *failed_stamp == stamp {
                return Err(anyhow!("{message}"));
            }
        }

        let table = match load_csv(&self.path) {
            Ok(table) => Arc::new(table),
            Err(e) => {
                self.failure = Some((stamp, format!("{e:#}")));
                return Err(e);
            }
        };
        self.failure = None;
        log::info!(
            "Loaded {} restaurants with columns {:?} from {}",
            table.len(),
            table.schema().columns(),
            self.path.display()
        );
        let status = LoadStatus::Loaded { rows: table.len() };
        self.entry = Some(CacheEntry {
            table: table.clone(),
            status: status.clone(),
            stamp: Some(stamp),
        });

        Ok(Loaded {
            table,
            status,
            from_cache: false,
        })
    }

    fn missing(&mut self) -> Loaded {
        log::warn!("Data file not found: {}", self.path.display());
        let table = Arc::new(Table::empty());
        let status = LoadStatus::Missing(DashboardError::MissingFile {
            path: self.path.clone(),
        });
        self.entry = Some(CacheEntry {
            table: table.clone(),
            status: status.clone(),
            stamp: None,
        });
        Loaded {
            table,
            status,
            from_cache: false,
        }
    }
}
