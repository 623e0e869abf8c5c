//! Row keys encoded so that byte order is key order.

use crate::{RowKey, ROW_KEY_DESCRIPTOR};
use anyhow::Result;
use persist_format::persist_types::types::Ordered;
use persist_format::{Persistent, Restore};

impl RowKey {
    pub fn new(table: impl Into<String>, id: i64) -> Self {
        Self {
            table: Ordered(table.into()),
            id: Ordered(id),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.buffer_size());
        self.write(&mut buf)?;
        Ok(buf)
    }

    pub fn decode(mut bytes: &[u8]) -> Result<Self> {
        let mut key = Self::default();
        key.read(&mut bytes)?;
        Ok(key)
    }
}

/// Whether data described by `descriptor` decodes as a [`RowKey`].
pub fn is_row_key_descriptor(descriptor: &[u8]) -> bool {
    descriptor == ROW_KEY_DESCRIPTOR
}
