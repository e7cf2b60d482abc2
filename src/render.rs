//! Render Module
//!
//! Plain-text views of a store.

use crate::error::Result;
use crate::table::{DirId, TreeStore};

/// Names of a directory's children followed by its files, one per line
pub fn list_dir(store: &TreeStore, id: DirId) -> Result<String> {
    let mut out = String::new();
    for dir in store.children(id)? {
        push_line(&mut out, 0, dir.name.as_str());
    }
    for file in store.files(id)? {
        push_line(&mut out, 0, file.name.as_str());
    }
    Ok(out)
}

/// Pending work for the tree walk
enum Visit {
    Dir { pos: usize, depth: usize },
    Files { pos: usize, depth: usize },
}

/// Whole hierarchy, two spaces of indent per level.
/// Directories end in `/`, files show their size.
///
/// A directory's children are listed before its files. The walk keeps its
/// own stack, so depth is bounded by memory rather than the thread stack.
pub fn tree(store: &TreeStore) -> String {
    let dirs = store.dir_entries();
    let files = store.file_entries();
    let runs = store.run_offsets();

    let mut out = String::new();
    let mut stack = vec![Visit::Dir { pos: 0, depth: 0 }];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Dir { pos, depth } => {
                let dir = &dirs[pos];
                push_line(&mut out, depth * 2, &format!("{}/ [{}]", dir.name, dir.id));

                // Files run after every child subtree; children pop in order
                stack.push(Visit::Files { pos, depth });
                stack.extend(
                    runs.child_range(pos, dir)
                        .rev()
                        .map(|child| Visit::Dir { pos: child, depth: depth + 1 }),
                );
            }
            Visit::Files { pos, depth } => {
                for file in &files[runs.file_range(pos, &dirs[pos])] {
                    push_line(
                        &mut out,
                        (depth + 1) * 2,
                        &format!("{} ({} bytes)", file.name, file.size),
                    );
                }
            }
        }
    }
    out
}

fn push_line(out: &mut String, indent: usize, text: &str) {
    out.extend(std::iter::repeat(' ').take(indent));
    out.push_str(text);
    out.push('\n');
}
