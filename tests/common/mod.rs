//! Shared helpers for integration tests

#![allow(dead_code)]

use flattree::{DirEntry, DirId, FileEntry, Header, TreeStore};

/// root(0) with two leaves img(1), docs(2); next id 20
pub fn three_dir_store() -> TreeStore {
    let dirs = vec![
        DirEntry::with_counts(0, "root", 2, 0),
        DirEntry::leaf(1, "img"),
        DirEntry::leaf(2, "docs"),
    ];
    TreeStore::from_parts(Header::new(3, 20), dirs, Vec::<FileEntry>::new()).unwrap()
}

/// Names of a directory's children, in listing order
pub fn child_names(store: &TreeStore, id: DirId) -> Vec<String> {
    store
        .children(id)
        .unwrap()
        .into_iter()
        .map(|d| d.name.to_string())
        .collect()
}

/// Names of a directory's files, in listing order
pub fn file_names(store: &TreeStore, id: DirId) -> Vec<String> {
    store
        .files(id)
        .unwrap()
        .into_iter()
        .map(|f| f.name.to_string())
        .collect()
}

/// Every table invariant plus: each child_count equals the number of
/// directories that resolve to it as parent
pub fn assert_encoding_holds(store: &TreeStore) {
    store.verify().unwrap();

    let dirs = store.dir_entries();
    assert_eq!(store.header().directory_count as usize, dirs.len());

    for dir in dirs {
        let resolved_children = dirs
            .iter()
            .filter(|d| store.parent_of(d.id).unwrap() == Some(dir.id))
            .count();
        assert_eq!(
            resolved_children, dir.child_count as usize,
            "child count of {} ({})",
            dir.name, dir.id
        );
    }

    let file_sum: usize = dirs.iter().map(|d| d.file_count as usize).sum();
    assert_eq!(file_sum, store.file_entries().len());
    assert_eq!(file_sum, store.total_files());
}
