#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Format version handed to the runtime registry alongside the three tables.
pub const FORMAT_VERSION: u32 = 0x01;

/// Every structure table record, directory or file, is 14 bytes.
pub const TREE_RECORD_LEN: usize = 14;

/// Bytes in a name record before the UTF-16BE alias: u16 length + i32 hash.
pub const NAME_HEADER_LEN: usize = 6;

pub const FLAG_FILE: u16 = 0x0000;
pub const FLAG_DIRECTORY: u16 = 0x0002;

/// Fixed fields of the root directory record.
pub const ROOT_NAME_OFFSET: u32 = 0;
pub const ROOT_CHILD_COUNT: u32 = 1;
pub const ROOT_FIRST_CHILD: u32 = 1;

/// Per-entry metadata derived while packing; also the listing view of a file record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedEntry {
    pub alias: String,
    pub source: PathBuf,
    pub data_offset: u32,
    pub size: u32,
    pub name_offset: u32,
    pub name_hash: i32,
}
