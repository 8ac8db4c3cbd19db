#![forbid(unsafe_code)]

use std::io::Cursor;

use crate::rcc::build::PackedBlob;
use crate::rcc::error::{RccError, RccResult};
use crate::rcc::format::{
    FLAG_DIRECTORY, ROOT_CHILD_COUNT, ROOT_FIRST_CHILD, ROOT_NAME_OFFSET, TREE_RECORD_LEN,
};
use crate::rcc::hash::NameHasher;
use crate::rcc::io::{read_i32, read_u16, read_u32};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameView {
    pub length: u16,
    pub hash: i32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRecord {
    Directory {
        name_offset: u32,
        child_count: u32,
        first_child: u32,
    },
    File {
        name_offset: u32,
        flags: u16,
        data_offset: u32,
        last_modified: u32,
    },
}

/// Decode the name record starting at `offset`.
pub fn read_name(names: &[u8], offset: u32) -> RccResult<NameView> {
    let start = offset as usize;
    if start >= names.len() {
        return Err(RccError::Invalid(format!("name offset {offset} outside name table")));
    }

    let mut cur = Cursor::new(&names[start..]);
    let length = read_u16(&mut cur)?;
    let hash = read_i32(&mut cur)?;

    let mut units = Vec::with_capacity(length as usize);
    for _ in 0..length {
        units.push(read_u16(&mut cur)?);
    }
    let name = String::from_utf16(&units)
        .map_err(|_| RccError::Invalid(format!("name at {offset} is not valid UTF-16")))?;

    Ok(NameView { length, hash, name })
}

pub fn read_tree(tree: &[u8]) -> RccResult<Vec<TreeRecord>> {
    if tree.len() % TREE_RECORD_LEN != 0 {
        return Err(RccError::Invalid(format!(
            "structure table length {} is not a multiple of {TREE_RECORD_LEN}",
            tree.len()
        )));
    }

    let mut cur = Cursor::new(tree);
    let mut out = Vec::with_capacity(tree.len() / TREE_RECORD_LEN);
    for _ in 0..tree.len() / TREE_RECORD_LEN {
        let name_offset = read_u32(&mut cur)?;
        let flags = read_u16(&mut cur)?;
        let rec = if flags & FLAG_DIRECTORY != 0 {
            TreeRecord::Directory {
                name_offset,
                child_count: read_u32(&mut cur)?,
                first_child: read_u32(&mut cur)?,
            }
        } else {
            TreeRecord::File {
                name_offset,
                flags,
                data_offset: read_u32(&mut cur)?,
                last_modified: read_u32(&mut cur)?,
            }
        };
        out.push(rec);
    }
    Ok(out)
}

/// A file record as the loader sees it: alias and where its bytes start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub name_offset: u32,
    pub name: NameView,
    pub data_offset: u32,
}

/// Decode and cross-check the tables of a packed blob.
pub fn verify(blob: &PackedBlob, hasher: &dyn NameHasher) -> RccResult<Vec<FileView>> {
    let records = read_tree(&blob.tree)?;
    if records.len() != blob.entries.len() + 1 {
        return Err(RccError::Invalid(format!(
            "{} structure records for {} entries",
            records.len(),
            blob.entries.len()
        )));
    }

    let mut records = records.into_iter();
    match records.next() {
        Some(TreeRecord::Directory {
            name_offset: ROOT_NAME_OFFSET,
            child_count: ROOT_CHILD_COUNT,
            first_child: ROOT_FIRST_CHILD,
        }) => {}
        other => {
            return Err(RccError::Invalid(format!("bad root record: {other:?}")));
        }
    }

    let data_len = blob.data.len() as u64;
    let mut out = Vec::with_capacity(blob.entries.len());
    for rec in records {
        let TreeRecord::File {
            name_offset,
            data_offset,
            ..
        } = rec
        else {
            return Err(RccError::Invalid("nested directory record".into()));
        };

        let name = read_name(&blob.names, name_offset)?;
        let want = hasher.stored(&name.name);
        if name.hash != want {
            return Err(RccError::Invalid(format!(
                "hash mismatch for {:?}: stored {}, computed {want}",
                name.name, name.hash
            )));
        }

        let size = blob.lookup(&name.name).map(|e| e.size as u64).unwrap_or(0);
        if data_offset as u64 + size > data_len {
            return Err(RccError::Invalid(format!(
                "data for {:?} outside data blob",
                name.name
            )));
        }

        out.push(FileView {
            name_offset,
            name,
            data_offset,
        });
    }

    Ok(out)
}
