//! Line transport between the network producer and the command dispatcher.
//!
//! Bytes from a client are cut into lines by [`LineFramer`] and handed to the
//! bounded command queue with [`enqueue_line`]. The producer never blocks: a full
//! queue drops the line.
use core::fmt::Display;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Sender, TrySendError};
use heapless::{String, Vec};
use log::warn;

use crate::config::COMMAND_LINE_CAPACITY;

/// One queued command line.
pub type CommandLine = String<COMMAND_LINE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueError {
    QueueFull,
    LineTooLong,
}

impl Display for EnqueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EnqueueError::QueueFull => f.write_str("command queue full"),
            EnqueueError::LineTooLong => write!(
                f,
                "line longer than {COMMAND_LINE_CAPACITY} bytes"
            ),
        }
    }
}

impl core::error::Error for EnqueueError {}

/// Queues `line` without waiting. On failure the line is dropped and logged.
pub fn enqueue_line<M: RawMutex, const N: usize>(
    sender: &Sender<'_, M, CommandLine, N>,
    line: &str,
) -> Result<(), EnqueueError> {
    let command = CommandLine::try_from(line).map_err(|_| {
        warn!("[NET_TASK] dropped line of {} bytes: too long", line.len());
        EnqueueError::LineTooLong
    })?;
    sender.try_send(command).map_err(|TrySendError::Full(dropped)| {
        warn!("[NET_TASK] queue full, dropped '{dropped}'");
        EnqueueError::QueueFull
    })
}

/// Reassembles `\n` or `\r` terminated lines from a byte stream.
///
/// Blank lines are skipped. A line longer than `N` bytes, or one that is not UTF-8,
/// is dropped whole.
#[derive(Debug, Default)]
pub struct LineFramer<const N: usize> {
    buf: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineFramer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feeds `bytes`, calling `on_line` for each complete line.
    pub fn push(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in bytes {
            if byte == b'\n' || byte == b'\r' {
                self.finish_line(&mut on_line);
            } else if !self.overflowed && self.buf.push(byte).is_err() {
                self.overflowed = true;
            }
        }
    }

    fn finish_line(&mut self, on_line: &mut impl FnMut(&str)) {
        if self.overflowed {
            warn!("[NET_TASK] dropped line longer than {N} bytes");
        } else {
            match core::str::from_utf8(&self.buf) {
                Ok(line) if !line.trim().is_empty() => on_line(line.trim()),
                Ok(_) => {}
                Err(e) => warn!("[NET_TASK] dropped line that is not UTF-8: {e}"),
            }
        }
        self.reset();
    }

    /// Discards a partial line, e.g. when the client disconnects.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    /// Bytes buffered towards the next line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
