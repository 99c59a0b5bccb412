//! AOF Writer Module
//!
//! Sequential writer for the append-only command log.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use crate::persistence::LogRecord;

// == Fsync Policy ==
/// Controls whether each append is synced to stable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FsyncPolicy {
    /// `sync_data` after every record
    #[default]
    Always,
    /// Flush to the OS only and let it decide when to write back
    Never,
}

impl FromStr for FsyncPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "always" => Ok(FsyncPolicy::Always),
            "no" | "never" => Ok(FsyncPolicy::Never),
            other => Err(format!("unknown fsync policy: {}", other)),
        }
    }
}

impl fmt::Display for FsyncPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsyncPolicy::Always => f.write_str("always"),
            FsyncPolicy::Never => f.write_str("no"),
        }
    }
}

// == AOF Writer ==
/// Append-only writer. Records are never reordered, deduplicated or rewritten.
#[derive(Debug)]
pub struct AofWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    fsync: FsyncPolicy,
}

impl AofWriter {
    // == Open ==
    /// Opens the log at `path` for appending, creating it if missing.
    pub fn open(path: impl AsRef<Path>, fsync: FsyncPolicy) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        info!(path = %path.display(), fsync = %fsync, "opened append-only log");

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            fsync,
        })
    }

    // == Append ==
    /// Appends one newline-terminated record.
    ///
    /// The buffer is flushed before returning so a record is never left
    /// half-buffered in the process; any write or sync failure is returned.
    ///
    /// This is blocking file I/O and runs under the cache lock. With
    /// [`FsyncPolicy::Always`] every SET waits for the disk; use
    /// [`FsyncPolicy::Never`] when throughput matters more than durability.
    pub fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record)?;
        self.writer.flush()?;

        if self.fsync == FsyncPolicy::Always {
            self.writer.get_ref().sync_data()?;
        }

        Ok(())
    }

    // == Close ==
    /// Flushes and syncs the log, releasing the file handle.
    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        debug!(path = %self.path.display(), "closed append-only log");
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_fsync_policy_from_str() {
        assert_eq!("always".parse::<FsyncPolicy>(), Ok(FsyncPolicy::Always));
        assert_eq!("ALWAYS".parse::<FsyncPolicy>(), Ok(FsyncPolicy::Always));
        assert_eq!("no".parse::<FsyncPolicy>(), Ok(FsyncPolicy::Never));
        assert_eq!("never".parse::<FsyncPolicy>(), Ok(FsyncPolicy::Never));
        assert!("sometimes".parse::<FsyncPolicy>().is_err());
    }

    #[test]
    fn test_append_writes_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.aof");

        let mut aof = AofWriter::open(&path, FsyncPolicy::Always).unwrap();
        aof.append(&LogRecord::set("a", "1")).unwrap();
        aof.append(&LogRecord::set("b", "2")).unwrap();
        aof.append(&LogRecord::set("a", "3")).unwrap();

        // Flushed on every append, readable before close
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "SET a 1\nSET b 2\nSET a 3\n");

        aof.close().unwrap();
    }

    #[test]
    fn test_open_appends_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.aof");
        fs::write(&path, "SET old value\n").unwrap();

        let mut aof = AofWriter::open(&path, FsyncPolicy::Never).unwrap();
        aof.append(&LogRecord::set("new", "value")).unwrap();
        aof.close().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "SET old value\nSET new value\n");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cache.aof");

        assert!(AofWriter::open(&path, FsyncPolicy::Always).is_err());
    }
}
