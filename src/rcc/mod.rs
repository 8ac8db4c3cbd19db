#![forbid(unsafe_code)]

mod build;
mod emit;
mod error;
mod format;
mod hash;
mod io;
mod load;
mod manifest;
mod ops;
mod path;
mod read;

pub use build::{
    build_data_blob, build_name_table, build_structure_table, pack, AliasIndex, DataBlob,
    NameRecord, NameTable, PackedBlob, Span,
};
pub use emit::{render, write_atomic, EmitOptions, BYTES_PER_LINE, DEFAULT_RUNTIME};
pub use error::{RccError, RccResult};
pub use format::{
    PackedEntry, FLAG_DIRECTORY, FLAG_FILE, FORMAT_VERSION, NAME_HEADER_LEN, TREE_RECORD_LEN,
};
pub use hash::{LoaderHash, NameHasher};
pub use load::{load_entries, ResourceEntry};
pub use manifest::{ResourceGroup, ResourceManifest, ResourceRef};
pub use read::{read_name, read_tree, verify, FileView, NameView, TreeRecord};

pub use ops::{check, compile, entries, list, pack_manifest};
