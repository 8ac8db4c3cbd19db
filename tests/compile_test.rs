//! End-to-end tests: manifest on disk -> packed tables -> generated artifact.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use rescc::rcc::{
    compile, pack_manifest, read_name, read_tree, LoaderHash, NameHasher, RccError,
    ResourceManifest, TreeRecord, TREE_RECORD_LEN,
};

fn write_manifest(dir: &Path, body: &str) -> PathBuf {
    let manifest = dir.join("resources.toml");
    fs::write(&manifest, body).unwrap();
    manifest
}

/// Decode one `b"\xNN..."` literal from a generated artifact.
fn decode_literal(src: &str, name: &str) -> Vec<u8> {
    let open = format!("pub static {name}: &[u8] = b\"\\");
    let mut out = Vec::new();
    for line in src
        .lines()
        .skip_while(|l| *l != open)
        .skip(1)
        .take_while(|l| *l != "\";")
    {
        let hex = line.trim_end_matches('\\');
        for esc in hex.split("\\x").filter(|s| !s.is_empty()) {
            out.push(u8::from_str_radix(esc, 16).unwrap());
        }
    }
    out
}

const TWO_ENTRIES: &str = r#"
[[group]]
[[group.entry]]
path = "icon.png"
alias = "icon"

[[group.entry]]
path = "logo.png"
alias = "logo"
"#;

#[test]
fn icon_and_logo_scenario() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("icon.png"), [0x01, 0x02, 0x03]).unwrap();
    fs::write(dir.path().join("logo.png"), b"").unwrap();
    let manifest = write_manifest(dir.path(), TWO_ENTRIES);

    let parsed = ResourceManifest::load(&manifest).unwrap();
    let blob = pack_manifest(&parsed, &LoaderHash).unwrap();

    assert_eq!(blob.data, [0x01, 0x02, 0x03]);
    assert_eq!(blob.tree.len(), 42);
    assert_eq!(blob.lookup("icon").unwrap().data_offset, 0);
    assert_eq!(blob.lookup("logo").unwrap().data_offset, 3);

    let icon = read_name(&blob.names, 0).unwrap();
    assert_eq!(icon.length, 4);
    assert_eq!(icon.name, "icon");
    assert_eq!(icon.hash, LoaderHash.stored("icon"));
    let logo = read_name(&blob.names, 14).unwrap();
    assert_eq!(logo.length, 4);
    assert_eq!(logo.name, "logo");
    assert_eq!(blob.names.len(), 28);
    assert_eq!(&blob.names[20..28], &[0, b'l', 0, b'o', 0, b'g', 0, b'o']);

    let recs = read_tree(&blob.tree).unwrap();
    assert!(matches!(recs[0], TreeRecord::Directory { .. }));
    assert!(matches!(
        recs[2],
        TreeRecord::File {
            name_offset: 14,
            data_offset: 3,
            ..
        }
    ));
}

#[test]
fn artifact_carries_the_tables() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("icon.png"), [0x01, 0x02, 0x03]).unwrap();
    fs::write(dir.path().join("logo.png"), b"").unwrap();
    let manifest = write_manifest(dir.path(), TWO_ENTRIES);
    let out = dir.path().join("resources.rs");

    compile(&manifest, &out, "rescc::runtime").unwrap();
    let src = fs::read_to_string(&out).unwrap();

    let blob = pack_manifest(&ResourceManifest::load(&manifest).unwrap(), &LoaderHash).unwrap();
    assert_eq!(decode_literal(&src, "RESOURCE_DATA"), blob.data);
    assert_eq!(decode_literal(&src, "RESOURCE_NAME"), blob.names);
    assert_eq!(decode_literal(&src, "RESOURCE_STRUCT"), blob.tree);
    assert!(src.contains("// Resource object code for resources.toml."));
    assert!(src.contains("rescc::runtime::register_resource_data("));
}

#[test]
fn compiling_twice_is_byte_identical() {
    let dir = tempdir().unwrap();
    for (name, len) in [("a.bin", 77usize), ("b.bin", 0), ("c.bin", 130)] {
        fs::write(dir.path().join(name), vec![len as u8; len]).unwrap();
    }
    let manifest = write_manifest(
        dir.path(),
        "[[group]]\n[[group.entry]]\npath = \"a.bin\"\n[[group.entry]]\npath = \"b.bin\"\n\
         [[group]]\n[[group.entry]]\npath = \"c.bin\"\n",
    );

    let first = dir.path().join("first.rs");
    let second = dir.path().join("second.rs");
    compile(&manifest, &first, "rescc::runtime").unwrap();
    compile(&manifest, &second, "rescc::runtime").unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn offsets_follow_declaration_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), [0u8; 10]).unwrap();
    fs::write(dir.path().join("b"), [0u8; 4]).unwrap();
    fs::write(dir.path().join("c"), [0u8; 1]).unwrap();
    let manifest = write_manifest(
        dir.path(),
        "[[group]]\n[[group.entry]]\npath = \"c\"\n[[group.entry]]\npath = \"a\"\n\
         [[group.entry]]\npath = \"b\"\n",
    );

    let blob = pack_manifest(&ResourceManifest::load(&manifest).unwrap(), &LoaderHash).unwrap();
    let offsets: Vec<_> = blob.entries.iter().map(|e| (e.alias.as_str(), e.data_offset)).collect();
    assert_eq!(offsets, [("c", 0), ("a", 1), ("b", 11)]);
}

// Last-write-wins is kept as-is; a repeated alias may well deserve a
// validation error instead, but that is a behavior change for the loader.
#[test]
fn duplicate_alias_resolves_to_later_entry() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small"), [1u8; 2]).unwrap();
    fs::write(dir.path().join("large"), [2u8; 20]).unwrap();
    let manifest = write_manifest(
        dir.path(),
        "[[group]]\n[[group.entry]]\npath = \"small\"\nalias = \"x\"\n\
         [[group.entry]]\npath = \"large\"\nalias = \"x\"\n",
    );

    let blob = pack_manifest(&ResourceManifest::load(&manifest).unwrap(), &LoaderHash).unwrap();
    let x = blob.lookup("x").unwrap();
    assert_eq!(x.data_offset, 2);
    assert_eq!(x.size, 20);
    assert_eq!(x.source, dir.path().join("large"));
    assert_eq!(blob.tree.len(), TREE_RECORD_LEN * 3);
}

#[test]
fn unreadable_reference_leaves_no_output() {
    let dir = tempdir().unwrap();
    let manifest = write_manifest(dir.path(), "[[group]]\n[[group.entry]]\npath = \"nope.png\"\n");
    let out = dir.path().join("resources.rs");

    let err = compile(&manifest, &out, "rescc::runtime").unwrap_err();
    assert!(matches!(err, RccError::ReferenceUnresolved { .. }), "{err}");
    assert!(err.to_string().contains("nope.png"), "{err}");
    assert!(!out.exists());
}

#[test]
fn malformed_manifest_is_reported() {
    let dir = tempdir().unwrap();
    let manifest = write_manifest(dir.path(), "<RCC><qresource/></RCC>");
    let err = compile(&manifest, &dir.path().join("out.rs"), "rescc::runtime").unwrap_err();
    assert!(matches!(err, RccError::ManifestMalformed { .. }), "{err}");
}
