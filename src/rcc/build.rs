#![forbid(unsafe_code)]

use blake3::Hasher;
use std::collections::HashMap;

use crate::rcc::error::{RccError, RccResult};
use crate::rcc::format::{
    PackedEntry, FLAG_DIRECTORY, FLAG_FILE, NAME_HEADER_LEN, ROOT_CHILD_COUNT, ROOT_FIRST_CHILD,
    ROOT_NAME_OFFSET, TREE_RECORD_LEN,
};
use crate::rcc::hash::NameHasher;
use crate::rcc::io::{put_i32, put_u16, put_u32};
use crate::rcc::load::ResourceEntry;

/// Bundle layout, three parallel tables:
///
/// - data: file contents concatenated in manifest order, no padding
/// - names: per entry
///   - [u16 length in UTF-16 code units]
///   - [i32 name hash]
///   - [alias as UTF-16BE, no terminator]
/// - tree: 14-byte records
///   - root: [u32 name_offset=0][u16 flags=DIRECTORY][u32 child_count=1][u32 first_child=1]
///   - per entry: [u32 name_offset][u16 flags=0][u32 data_offset][u32 last_modified=0]
///
/// All integers are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: u32,
    pub size: u32,
}

/// Alias to owning entry index. A repeated alias points at its last entry.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    by_alias: HashMap<String, usize>,
}

impl AliasIndex {
    pub fn new<'a>(aliases: impl IntoIterator<Item = &'a str>) -> Self {
        let mut by_alias = HashMap::new();
        for (i, alias) in aliases.into_iter().enumerate() {
            by_alias.insert(alias.to_string(), i);
        }
        AliasIndex { by_alias }
    }

    pub fn resolve(&self, alias: &str) -> Option<usize> {
        self.by_alias.get(alias).copied()
    }

    /// Number of distinct aliases.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataBlob {
    pub bytes: Vec<u8>,
    /// One span per entry, in manifest order.
    pub spans: Vec<Span>,
}

impl DataBlob {
    pub fn span_of(&self, index: &AliasIndex, alias: &str) -> Option<Span> {
        index.resolve(alias).and_then(|i| self.spans.get(i).copied())
    }
}

pub fn build_data_blob(entries: &[ResourceEntry]) -> RccResult<DataBlob> {
    let mut blob = DataBlob {
        bytes: Vec::with_capacity(entries.iter().map(|e| e.bytes.len()).sum()),
        spans: Vec::with_capacity(entries.len()),
    };

    for e in entries {
        let offset = table_offset(blob.bytes.len(), "data")?;
        let size = u32::try_from(e.bytes.len())
            .map_err(|_| RccError::Invalid(format!("file too large: {}", e.source.display())))?;
        blob.bytes.extend_from_slice(&e.bytes);
        table_offset(blob.bytes.len(), "data")?;
        blob.spans.push(Span { offset, size });
    }

    Ok(blob)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameRecord {
    pub offset: u32,
    pub hash: i32,
}

#[derive(Debug, Clone, Default)]
pub struct NameTable {
    pub bytes: Vec<u8>,
    /// One record per entry, in manifest order.
    pub records: Vec<NameRecord>,
}

pub fn build_name_table(
    entries: &[ResourceEntry],
    hasher: &dyn NameHasher,
) -> RccResult<NameTable> {
    let mut table = NameTable::default();

    for e in entries {
        let offset = table_offset(table.bytes.len(), "name")?;
        let units: Vec<u16> = e.alias.encode_utf16().collect();
        let len = u16::try_from(units.len())
            .map_err(|_| RccError::Invalid(format!("alias too long: {}", e.alias)))?;
        let hash = hasher.stored(&e.alias);

        table.bytes.reserve(NAME_HEADER_LEN + units.len() * 2);
        put_u16(&mut table.bytes, len);
        put_i32(&mut table.bytes, hash);
        for u in units {
            put_u16(&mut table.bytes, u);
        }
        table.records.push(NameRecord { offset, hash });
    }

    table_offset(table.bytes.len(), "name")?;
    Ok(table)
}

pub fn build_structure_table(
    entries: &[ResourceEntry],
    index: &AliasIndex,
    data: &DataBlob,
    names: &NameTable,
) -> RccResult<Vec<u8>> {
    let mut tree = Vec::with_capacity(TREE_RECORD_LEN * (entries.len() + 1));

    put_u32(&mut tree, ROOT_NAME_OFFSET);
    put_u16(&mut tree, FLAG_DIRECTORY);
    put_u32(&mut tree, ROOT_CHILD_COUNT);
    put_u32(&mut tree, ROOT_FIRST_CHILD);

    for e in entries {
        let owner = index
            .resolve(&e.alias)
            .ok_or_else(|| RccError::Invalid(format!("alias not indexed: {}", e.alias)))?;
        let (name, span) = names
            .records
            .get(owner)
            .zip(data.spans.get(owner))
            .ok_or_else(|| RccError::Invalid(format!("no records for alias: {}", e.alias)))?;

        put_u32(&mut tree, name.offset);
        put_u16(&mut tree, FLAG_FILE);
        put_u32(&mut tree, span.offset);
        put_u32(&mut tree, 0);
    }

    Ok(tree)
}

/// The three tables plus per-entry metadata, built once from loaded entries.
#[derive(Debug, Clone)]
pub struct PackedBlob {
    pub data: Vec<u8>,
    pub names: Vec<u8>,
    pub tree: Vec<u8>,
    pub entries: Vec<PackedEntry>,
    index: AliasIndex,
}

impl PackedBlob {
    /// Entry an alias resolves to; the last one declared wins.
    pub fn lookup(&self, alias: &str) -> Option<&PackedEntry> {
        self.index.resolve(alias).and_then(|i| self.entries.get(i))
    }

    /// blake3 over all three tables.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Hasher::new();
        for table in [&self.data, &self.names, &self.tree] {
            hasher.update(&(table.len() as u64).to_le_bytes());
            hasher.update(table);
        }
        hasher.finalize().into()
    }
}

pub fn pack(entries: &[ResourceEntry], hasher: &dyn NameHasher) -> RccResult<PackedBlob> {
    let index = AliasIndex::new(entries.iter().map(|e| e.alias.as_str()));
    if index.len() != entries.len() {
        tracing::warn!(
            entries = entries.len(),
            aliases = index.len(),
            "duplicate aliases; later entries shadow earlier ones"
        );
    }

    let data = build_data_blob(entries)?;
    let names = build_name_table(entries, hasher)?;
    let tree = build_structure_table(entries, &index, &data, &names)?;

    let packed = entries
        .iter()
        .zip(data.spans.iter().zip(names.records.iter()))
        .map(|(e, (span, name))| PackedEntry {
            alias: e.alias.clone(),
            source: e.source.clone(),
            data_offset: span.offset,
            size: span.size,
            name_offset: name.offset,
            name_hash: name.hash,
        })
        .collect();

    tracing::info!(
        entries = entries.len(),
        data = data.bytes.len(),
        names = names.bytes.len(),
        tree = tree.len(),
        "packed resource tables"
    );

    Ok(PackedBlob {
        data: data.bytes,
        names: names.bytes,
        tree,
        entries: packed,
        index,
    })
}

fn table_offset(len: usize, table: &str) -> RccResult<u32> {
    u32::try_from(len).map_err(|_| RccError::Invalid(format!("{table} table exceeds 4 GiB")))
}
