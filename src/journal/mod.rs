//! Engagement journal: command and note logging
//!
//! Both loggers append to plain text files under the engagement `logs/`
//! directory. Entries are closed by a line of 60 `#` characters followed by a
//! blank line, so a log can be split back into entries by that separator.

pub mod command;
pub mod notes;

pub use command::{CommandLogger, CommandRecord};
pub use notes::NoteLogger;

use chrono::{Local, NaiveDateTime};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Width of the `#` rule that closes every journal entry
pub const SEPARATOR_WIDTH: usize = 60;

/// Rule that closes a journal entry
pub fn separator() -> String {
    "#".repeat(SEPARATOR_WIDTH)
}

/// Source of wall-clock time for journal timestamps
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

pub(crate) fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
