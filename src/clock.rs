//! Wall-clock helpers shared by rendering and rotation.
//!
//! Rotation names its backups after the log call that triggered them. The
//! id is computed once per call, so a main and an error stream rotated by
//! the same call end up with the same suffix.

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};

/// Layout of rendered timestamps, e.g. `2024-03-15 14:29:35.042`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Same fields as [`DATE_FORMAT`] with the punctuation stripped.
const ID_FORMAT: &str = "%Y%m%d%H%M%S%3f";

pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Millisecond-resolution id for `time`, e.g. `20240315142935042`.
pub fn timestamp_id(time: &DateTime<Local>) -> u64 {
    // Every formatted field is a digit, so the parse cannot fail.
    time.format(ID_FORMAT).to_string().parse().unwrap_or_default()
}

/// Hands out backup suffixes for one stream.
///
/// Suffixes are strictly increasing. Two rotations landing in the same
/// millisecond would otherwise share a backup name and the second rename
/// would replace the first backup.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackupSuffix {
    last: Option<u64>,
}

impl BackupSuffix {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Returns the suffix to use for a rotation requested at `id`.
    pub fn next(&mut self, id: u64) -> u64 {
        let suffix = match self.last {
            Some(last) if id <= last => last + 1,
            _ => id,
        };
        self.last = Some(suffix);
        suffix
    }

    pub fn last(&self) -> Option<u64> {
        self.last
    }
}

/// Starts at 1 so that 0 never shows up as a thread id.
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Process-unique number for the calling thread, assigned on first use.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}
