//! Append-only result log and the resume checkpoint derived from it.
//!
//! The log is the only state that survives a crash. Every record is synced to
//! disk before the next API call, so on restart the number of complete lines
//! tells how far the previous run got, and the first field of each line tells
//! which keys no longer need scoring.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bulkscore_core::LookupKey;

use crate::output::parse_key_field;

/// Result log location for `input`: `<results_dir>/<input stem>.csv`.
pub(crate) fn result_path(results_dir: &Path, input: &Path) -> io::Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("input path {} has no file name", input.display()),
        )
    })?;
    let mut path = results_dir.join(stem);
    path.set_extension("csv");
    Ok(path)
}

/// Number of records already present in the result log at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResumeCheckpoint {
    pub(crate) written_lines: u32,
}

impl ResumeCheckpoint {
    /// First source row to read: the leading-row offset plus one row per
    /// record already written.
    pub(crate) fn start_row(self, skip_offset: u32) -> u32 {
        skip_offset.saturating_add(self.written_lines)
    }
}

pub(crate) struct ResultLog {
    file: File,
    path: PathBuf,
    written_keys: HashSet<String>,
}

impl ResultLog {
    /// Opens (creating if needed) the log at `path` and reads back what a
    /// previous run left behind.
    ///
    /// Bytes after the last newline belong to a record that never finished
    /// writing; they are truncated so the next record starts on a clean line.
    pub(crate) fn open(path: &Path) -> io::Result<(Self, ResumeCheckpoint)> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        let complete_len = contents
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        if complete_len < contents.len() {
            tracing::warn!(
                path = %path.display(),
                discarded_bytes = contents.len() - complete_len,
                "discarding incomplete trailing record"
            );
            file.set_len(complete_len as u64)?;
        }

        let complete = &contents[..complete_len];
        let written_keys: HashSet<String> = complete
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| parse_key_field(&String::from_utf8_lossy(line)))
            .collect();
        let line_count = complete.iter().filter(|&&b| b == b'\n').count();
        let checkpoint = ResumeCheckpoint {
            written_lines: u32::try_from(line_count).unwrap_or(u32::MAX),
        };

        file.seek(SeekFrom::End(0))?;

        Ok((
            Self {
                file,
                path: path.to_path_buf(),
                written_keys,
            },
            checkpoint,
        ))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a record for `key` is already in the log.
    pub(crate) fn contains(&self, key: &LookupKey) -> bool {
        self.written_keys.contains(key.as_str())
    }

    /// Appends one record and syncs it to disk before returning.
    pub(crate) fn append(&mut self, key: &LookupKey, line: &str) -> io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.file.write_all(record.as_bytes())?;
        self.flush()?;
        self.written_keys.insert(key.as_str().to_string());
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_data()
    }
}
