//! Replay Module
//!
//! Reads the append-only log back into an ordered list of records.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::persistence::LogRecord;

/// Reads every recognized record from the log at `path`, in file order.
///
/// Unrecognized or malformed lines are skipped so older binaries can replay
/// logs that contain newer command kinds. A missing file replays as empty.
/// Any I/O failure while reading is returned as [`CacheError::Replay`].
pub fn replay(path: impl AsRef<Path>) -> Result<Vec<LogRecord>> {
    let path = path.as_ref();
    let replay_error = |source: io::Error| CacheError::Replay {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no append-only log to replay");
            return Ok(Vec::new());
        }
        Err(err) => return Err(replay_error(err)),
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(replay_error)?;

        match LogRecord::parse(&line) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                debug!(line = index + 1, "skipping unrecognized log record");
            }
        }
    }

    info!(
        path = %path.display(),
        records = records.len(),
        skipped,
        "read append-only log"
    );

    Ok(records)
}
