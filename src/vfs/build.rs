//! Namespace construction: one directory per page, one content file inside
//! it, placeholders for collections, deterministic collision-free naming.

use std::collections::HashSet;

use super::path_ops::join;
use super::*;
use crate::model::{NodeKind, ParentRef, fingerprint, slugify};
use crate::remote::Listing;

pub(super) fn build_tree(listing: &Listing, scope_root: Option<&RecordId>) -> Result<Tree, FsError> {
    let mut all: Vec<&RemoteRecord> = listing.pages.iter().chain(&listing.collections).collect();

    if let Some(root) = scope_root {
        let included = scope_closure(&all, root);
        all.retain(|r| included.contains(&r.id));
    }

    // Records parented by a collection are outside the mounted tree entirely.
    all.retain(|r| !matches!(r.parent, ParentRef::Collection { .. }));

    let mut pages: Vec<&RemoteRecord> = Vec::new();
    let mut collections: Vec<&RemoteRecord> = Vec::new();
    for &record in &all {
        match record.kind {
            crate::model::RecordKind::Page => pages.push(record),
            crate::model::RecordKind::Collection => collections.push(record),
        }
    }

    let known: HashSet<&RecordId> = pages.iter().map(|r| &r.id).collect();
    let mut roots: Vec<&RemoteRecord> = Vec::new();
    let mut children: HashMap<RecordId, Vec<&RemoteRecord>> = HashMap::new();
    for &page in &pages {
        match page.parent.id() {
            // A parent id absent from the known set is treated as a root:
            // orphaned and cross-scope references must not abort the build.
            Some(pid) if known.contains(pid) => {
                children.entry(pid.clone()).or_default().push(page);
            }
            _ => roots.push(page),
        }
    }
    roots.sort_by(sort_key);
    for siblings in children.values_mut() {
        siblings.sort_by(sort_key);
    }

    let mut tree = Tree {
        nodes: HashMap::new(),
        by_id: HashMap::new(),
        records: all.iter().map(|r| (r.id.clone(), (*r).clone())).collect(),
    };
    insert_node(&mut tree, NamespaceNode::dir("/", None))?;
    insert_node(&mut tree, NamespaceNode::dir(MOUNT_DIR, Some("/")))?;

    for root in roots {
        mount_page(&mut tree, root, MOUNT_DIR, &children)?;
    }

    collections.sort_by(sort_key);
    for collection in collections {
        let parent_dir = collection
            .parent
            .id()
            .and_then(|pid| tree.by_id.get(pid).cloned())
            .unwrap_or_else(|| MOUNT_DIR.to_string());
        let base = format!("[db:{}]", fingerprint(&collection.id));
        let name = resolve_name(&tree, &parent_dir, &base, &collection.id);
        let path = join(&parent_dir, &name);
        insert_node(
            &mut tree,
            NamespaceNode::placeholder(&path, &parent_dir, collection.id.clone()),
        )?;
        tree.by_id.insert(collection.id.clone(), path);
    }

    Ok(tree)
}

fn sort_key(a: &&RemoteRecord, b: &&RemoteRecord) -> std::cmp::Ordering {
    a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
}

/// Fixed-point expansion of the records reachable from `root` by parent
/// links, applied identically to pages and collections.
fn scope_closure(all: &[&RemoteRecord], root: &RecordId) -> HashSet<RecordId> {
    let mut included: HashSet<RecordId> = HashSet::new();
    included.insert(root.clone());
    loop {
        let mut changed = false;
        for record in all {
            if included.contains(&record.id) {
                continue;
            }
            if record.parent.id().is_some_and(|p| included.contains(p)) {
                included.insert(record.id.clone());
                changed = true;
            }
        }
        if !changed {
            return included;
        }
    }
}

fn mount_page(
    tree: &mut Tree,
    page: &RemoteRecord,
    parent_dir: &str,
    children: &HashMap<RecordId, Vec<&RemoteRecord>>,
) -> Result<(), FsError> {
    let name = resolve_name(tree, parent_dir, &slugify(&page.title), &page.id);
    let dir_path = join(parent_dir, &name);

    let mut dir = NamespaceNode::dir(&dir_path, Some(parent_dir));
    dir.backing_id = Some(page.id.clone());
    insert_node(tree, dir)?;
    tree.by_id.insert(page.id.clone(), dir_path.clone());

    let file_path = join(&dir_path, CONTENT_FILE);
    insert_node(
        tree,
        NamespaceNode::file(&file_path, &dir_path, page.id.clone()),
    )?;

    if let Some(kids) = children.get(&page.id) {
        for kid in kids {
            mount_page(tree, kid, &dir_path, children)?;
        }
    }
    Ok(())
}

/// Per-sibling-set collision ladder: slug, then slug + id fingerprint, then
/// an incrementing numeric suffix. Terminates for any finite sibling set.
fn resolve_name(tree: &Tree, dir: &str, base: &str, id: &RecordId) -> String {
    let taken = |name: &str| tree.nodes.contains_key(&join(dir, name));
    if !taken(base) {
        return base.to_string();
    }
    let fingerprinted = format!("{base}-{}", fingerprint(id));
    if !taken(&fingerprinted) {
        return fingerprinted;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{fingerprinted}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn insert_node(tree: &mut Tree, node: NamespaceNode) -> Result<(), FsError> {
    if tree.nodes.contains_key(&node.path) {
        return Err(FsError::Invariant(format!("duplicate path {}", node.path)));
    }
    if let Some(parent) = &node.parent_path {
        let parent_node = tree
            .nodes
            .get_mut(parent)
            .ok_or_else(|| FsError::Invariant(format!("missing parent directory {parent}")))?;
        if parent_node.kind != NodeKind::Directory {
            return Err(FsError::Invariant(format!("{parent} is not a directory")));
        }
        parent_node.children.insert(node.path.clone());
    }
    tree.nodes.insert(node.path.clone(), node);
    Ok(())
}

#[cfg(test)]
#[path = "../tests/vfs/build_tests.rs"]
mod tests;
