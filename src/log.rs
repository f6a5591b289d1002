use std::fmt::Display;
use std::sync::Mutex;

use chrono::{Datelike, Local, Timelike};
use itertools::Itertools;
use lazy_static::lazy_static;
use ringbuffer::RingBufferWrite;
use ringbuffer::{AllocRingBuffer, RingBufferExt};

lazy_static! {
    static ref BUFFER: Mutex<AllocRingBuffer<String>> =
        Mutex::new(AllocRingBuffer::with_capacity(128));
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
        }
    }
}

/// Records a message in the in-memory log. Warnings are also echoed to stderr,
/// since they are meant for the person running the check.
pub fn write_message(level: Level, message: &str) {
    let time = Local::now();

    let human_readable = format!(
        "{:02}.{:02} {:02}:{:02}:{:02}",
        time.day(),
        time.month(),
        time.hour(),
        time.minute(),
        time.second()
    );

    if level == Level::Warn {
        eprintln!("WARN: {message}");
    }

    // a poisoned buffer only loses history
    let Ok(mut buffer) = BUFFER.lock() else {
        return;
    };

    buffer.push(format!("[{human_readable}] {level} {message}"))
}

macro_rules! log{
    ($($e:expr),+) => {
        crate::log::write_message(crate::log::Level::Info, &format!($($e),+))
    }
}

macro_rules! warning{
    ($($e:expr),+) => {
        crate::log::write_message(crate::log::Level::Warn, &format!($($e),+))
    }
}

pub(crate) use log;
pub(crate) use warning;

/// Most recent `n` log entries, oldest first.
pub fn pull_messages(n: usize) -> Vec<String> {
    let mut items = {
        let Ok(buffer) = BUFFER.lock() else {
            return vec![];
        };

        buffer.iter().rev().take(n).map(Clone::clone).collect_vec()
    };
    items.reverse();
    items
}
