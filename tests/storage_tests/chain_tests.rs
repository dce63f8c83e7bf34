//! Tests for the segment chain and segment directory
//!
//! These tests verify:
//! - The memtable always stays at the head
//! - insert_after_head keeps SSTables newest-first
//! - Head-to-tail, first-match resolution (tombstones shadow older data)
//! - Segment file naming and bootstrap listing order

use std::fs;

use sstkv::memtable::EntryMeta;
use sstkv::storage::{SSTable, Segment, SegmentChain, SegmentDirectory, SegmentHandle};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn table(name: &str, entries: &[(&str, EntryMeta)]) -> SSTable {
    let entries = entries
        .iter()
        .map(|(key, meta)| (key.to_string(), meta.clone()))
        .collect();
    SSTable::new(name, entries)
}

// =============================================================================
// Chain Shape Tests
// =============================================================================

#[test]
fn test_new_chain_holds_only_memtable() {
    let chain = SegmentChain::new();

    assert_eq!(chain.len(), 1);
    assert!(matches!(chain.iter().next(), Some(SegmentHandle::MemTable(_))));
    assert_eq!(chain.sstables().count(), 0);
}

#[test]
fn test_insert_after_head_orders_newest_first() {
    let mut chain = SegmentChain::new();

    chain.insert_after_head(table("sstable-100.json", &[]));
    chain.insert_after_head(table("sstable-200.json", &[]));
    chain.insert_after_head(table("sstable-300.json", &[]));

    let kinds: Vec<&str> = chain.iter().map(SegmentHandle::kind).collect();
    assert_eq!(kinds, vec!["memtable", "sstable", "sstable", "sstable"]);

    let paths: Vec<String> = chain
        .sstable_paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["sstable-300.json", "sstable-200.json", "sstable-100.json"]
    );
}

// =============================================================================
// Resolution Tests
// =============================================================================

#[test]
fn test_memtable_value_wins() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("old.json", &[("x", EntryMeta::live("old"))]));

    chain.memtable_mut().set("x".to_string(), "new".to_string());

    assert_eq!(chain.get("x"), Some("new"));
}

#[test]
fn test_newer_sstable_wins() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("1.json", &[("x", EntryMeta::live("old"))]));
    chain.insert_after_head(table("2.json", &[("x", EntryMeta::live("new"))]));

    assert_eq!(chain.get("x"), Some("new"));
}

#[test]
fn test_falls_through_to_older_sstable() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("1.json", &[("only-old", EntryMeta::live("here"))]));
    chain.insert_after_head(table("2.json", &[("other", EntryMeta::live("v"))]));

    assert_eq!(chain.get("only-old"), Some("here"));
    assert_eq!(chain.get("missing"), None);
}

#[test]
fn test_memtable_tombstone_shadows_sstable() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("1.json", &[("x", EntryMeta::live("old"))]));

    chain.memtable_mut().delete("x".to_string());

    assert!(chain.resolve("x").unwrap().is_deleted);
    assert_eq!(chain.get("x"), None);
}

#[test]
fn test_sstable_tombstone_shadows_older_sstable() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("1.json", &[("x", EntryMeta::live("old"))]));
    chain.insert_after_head(table("2.json", &[("x", EntryMeta::tombstone())]));

    assert_eq!(chain.get("x"), None);
}

#[test]
fn test_value_after_tombstone_generation() {
    let mut chain = SegmentChain::new();
    chain.insert_after_head(table("1.json", &[("x", EntryMeta::tombstone())]));
    chain.insert_after_head(table("2.json", &[("x", EntryMeta::live("revived"))]));

    assert_eq!(chain.get("x"), Some("revived"));
}

#[test]
fn test_segment_handle_dispatch() {
    let mut handle = SegmentHandle::SSTable(table("1.json", &[("k", EntryMeta::live("v"))]));

    assert_eq!(handle.lookup("k"), Some(&EntryMeta::live("v")));
    assert_eq!(Segment::len(&handle), 1);
    assert!(handle.set("k".to_string(), "w".to_string()).is_err());
    assert!(handle.as_sstable().is_some());
}

// =============================================================================
// Segment Directory Tests
// =============================================================================

#[test]
fn test_directory_created_when_missing() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("nested").join("data");

    let directory = SegmentDirectory::open(&dir).unwrap();

    assert!(dir.is_dir());
    assert_eq!(directory.path(), dir.as_path());
}

#[test]
fn test_segment_path_naming() {
    let temp = TempDir::new().unwrap();
    let directory = SegmentDirectory::open(temp.path()).unwrap();

    assert_eq!(
        directory.segment_path(1_700_000_000_000),
        temp.path().join("sstable-1700000000000.json")
    );
}

#[test]
fn test_list_segments_sorted_ascending() {
    let temp = TempDir::new().unwrap();
    for name in ["sstable-300.json", "sstable-100.json", "sstable-200.json"] {
        fs::write(temp.path().join(name), "[]").unwrap();
    }
    let directory = SegmentDirectory::open(temp.path()).unwrap();

    let names: Vec<String> = directory
        .list_segments()
        .unwrap()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(
        names,
        vec!["sstable-100.json", "sstable-200.json", "sstable-300.json"]
    );
}

#[test]
fn test_list_segments_skips_foreign_entries() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("sstable-100.json"), "[]").unwrap();
    fs::write(temp.path().join("README.txt"), "hello").unwrap();
    fs::create_dir(temp.path().join("sstable-200.json")).unwrap();
    let directory = SegmentDirectory::open(temp.path()).unwrap();

    let segments = directory.list_segments().unwrap();

    assert_eq!(segments, vec![temp.path().join("sstable-100.json")]);
}

#[test]
fn test_list_segments_compares_names_not_numbers() {
    let temp = TempDir::new().unwrap();
    for name in ["sstable-200.json", "sstable-1700000000000.json"] {
        fs::write(temp.path().join(name), "[]").unwrap();
    }
    let directory = SegmentDirectory::open(temp.path()).unwrap();

    assert_eq!(
        directory.list_segments().unwrap(),
        vec![
            temp.path().join("sstable-1700000000000.json"),
            temp.path().join("sstable-200.json"),
        ]
    );
}
