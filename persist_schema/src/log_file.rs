//! A binary log: the descriptor of `Vec<LogEntry>`, then the entries.

use crate::{LogEntry, LOG_DESCRIPTOR};
use anyhow::{anyhow, Result};
use log::debug;
use persist_format::persist_types::serde::{Reader, Writer};
use persist_format::persist_types::types::{DateTime, TypeTraits};
use persist_format::{descriptor, read_descriptor, Fields, Persistent, Printer, Restore};

impl LogEntry {
    pub fn new<Args: Fields + TypeTraits + Persistent>(
        timestamp: DateTime,
        level: u8,
        thread_id: u32,
        format: impl Into<String>,
        args: &Args,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(args.buffer_size());
        persist_format::write(&mut data, args)?;
        Ok(Self {
            timestamp,
            level,
            thread_id,
            format: format.into(),
            args_descriptor: descriptor::<Args>(),
            args: data,
        })
    }

    /// The message, with its arguments formatted in.
    pub fn render(&self) -> Result<String> {
        let printer = Printer::new(&self.format, &self.args_descriptor)?;
        let mut r = &self.args[..];
        let message = printer.print_to_string(&mut r)?;
        if !r.is_empty() {
            return Err(anyhow!("{} argument bytes were not formatted", r.len()));
        }
        Ok(message)
    }
}

pub fn write_log<W: Writer + ?Sized>(w: &mut W, entries: &[LogEntry]) -> Result<()> {
    w.write_bytes(LOG_DESCRIPTOR)?;
    entries.write(w)
}

pub fn read_log<R: Reader + ?Sized>(r: &mut R) -> Result<Vec<LogEntry>> {
    let descriptor = read_descriptor(r)?;
    if descriptor != LOG_DESCRIPTOR {
        return Err(anyhow!(
            "Stream descriptor {:02X?} is not a log descriptor",
            descriptor
        ));
    }
    let mut entries = Vec::<LogEntry>::new();
    entries.read(r)?;
    debug!("Read {} log entries", entries.len());
    Ok(entries)
}
