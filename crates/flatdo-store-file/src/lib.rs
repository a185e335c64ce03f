//! Flat-file storage for flatdo task lists.
//!
//! One record per line, `active|done|text`, where the flag fields are the
//! literal characters `0` and `1` and the text is the unescaped remainder
//! of the line. Record order is file line order is collection order.

/// Error types.
pub mod error;

pub use error::StoreError;

use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use flatdo_core::{FIELD_SEPARATOR, MAX_TEXT_LEN, Task, TaskList};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Storage backed by a single line-oriented text file.
///
/// No state is cached between calls: every operation re-reads the file, so
/// each command observes the last successful save. Concurrent external
/// writers are not coordinated with.
pub struct FileStore {
    path: PathBuf,
    capacity: usize,
}

impl FileStore {
    /// Create a store for the given file path and record capacity. No I/O
    /// happens until the first operation.
    pub fn open(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted collection.
    ///
    /// An absent file yields an empty list. A line that fails the
    /// fixed-format parse stops parsing at that line: records before it are
    /// kept, the rest are dropped. Lines beyond the capacity are silently
    /// dropped.
    ///
    /// # Errors
    /// Returns [`StoreError::Read`] when the file exists but cannot be read.
    pub fn load(&self) -> Result<TaskList, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "task file absent, starting empty");
                return Ok(TaskList::with_capacity(self.capacity));
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut list = TaskList::with_capacity(self.capacity);
        for line in contents.lines() {
            if list.is_full() {
                debug!(capacity = self.capacity, "capacity reached, dropping remaining lines");
                break;
            }
            let Some(task) = parse_line(line) else {
                // Fail fast: a malformed record truncates the collection to
                // the records parsed so far.
                warn!(path = %self.path.display(), "malformed record, stopping parse");
                break;
            };
            if list.push(task).is_err() {
                break;
            }
        }
        debug!(count = list.len(), path = %self.path.display(), "loaded tasks");
        Ok(list)
    }

    /// Rewrite the whole file from the collection, one line per record, in
    /// collection order. Content is staged in a temp file in the same
    /// directory and moved into place, so a failed write never leaves
    /// partial content behind.
    ///
    /// # Errors
    /// Returns [`StoreError::Write`] when the file cannot be replaced.
    pub fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        self.write_atomic(list).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(count = list.len(), path = %self.path.display(), "saved tasks");
        Ok(())
    }

    fn write_atomic(&self, list: &TaskList) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        for task in list.tasks() {
            writeln!(staged, "{}", encode_line(task))?;
        }
        staged.flush()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    /// The file's raw lines, unparsed, for display. `None` when the file is
    /// absent, which callers report as a normal outcome.
    ///
    /// # Errors
    /// Returns [`StoreError::Read`] when the file exists but cannot be read.
    pub fn raw_lines(&self) -> Result<Option<Vec<String>>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents.lines().map(str::to_owned).collect())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Encode one record as its wire line, without the trailing newline.
#[must_use]
pub fn encode_line(task: &Task) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        u8::from(task.active),
        u8::from(task.done),
        task.text,
        sep = FIELD_SEPARATOR,
    )
}

/// Parse one wire line into a record. `None` means the line is malformed;
/// callers stop parsing there.
#[must_use]
pub fn parse_line(line: &str) -> Option<Task> {
    let (active, rest) = line.split_once(FIELD_SEPARATOR)?;
    let (done, text) = rest.split_once(FIELD_SEPARATOR)?;
    let active = parse_flag(active)?;
    let done = parse_flag(done)?;
    if text.is_empty() || text.contains(FIELD_SEPARATOR) || text.chars().count() > MAX_TEXT_LEN {
        return None;
    }
    Some(Task {
        active,
        done,
        text: text.to_owned(),
    })
}

fn parse_flag(field: &str) -> Option<bool> {
    match field {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}
