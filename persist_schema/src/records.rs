use persist_format::adapt;
use persist_format::persist_types::types::{DateTime, Ordered};

/// One entry of a binary log. Messages are format strings, rendered by a [`persist_format::Printer`].
#[derive(PartialEq, Clone, Default, Debug)]
pub struct LogEntry {
    pub timestamp: DateTime,
    pub level: u8,
    pub thread_id: u32,
    pub format: String,
    /// Describes `args`. Each entry may carry a different argument list.
    pub args_descriptor: Vec<u8>,
    pub args: Vec<u8>,
}
adapt!(LogEntry {
    timestamp: DateTime,
    level: u8,
    thread_id: u32,
    format: String,
    args_descriptor: Vec<u8>,
    args: Vec<u8>,
});

/// A key whose encoding sorts with memcmp by `(table, id)`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Default, Debug)]
pub struct RowKey {
    pub table: Ordered<String>,
    pub id: Ordered<i64>,
}
adapt!(RowKey {
    table: Ordered<String>,
    id: Ordered<i64>,
});
