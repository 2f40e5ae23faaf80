//! Folder tree the collection is assembled in.
//!
//! Folders live in an arena and refer to each other by [`FolderId`]. Each folder keeps its
//! children in insertion order (sub-folders and request items interleaved) plus an index from
//! path segment to sub-folder, so inserting the same path twice reuses the existing folders.

use crate::collection::{CollectionItem, Folder, RequestItem};
use crate::naming::{singularize, ucfirst};
use crate::normalizer::NormalizedPath;
use log::debug;
use std::collections::HashMap;

/// Index of a folder inside a [`CollectionTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

/// A named grouping node.
#[derive(Debug)]
pub struct FolderNode {
    /// Display name (singularized, capitalized segment)
    pub name: String,
    children: Vec<Child>,
    subfolders: HashMap<String, FolderId>,
}

#[derive(Debug)]
enum Child {
    Folder(FolderId),
    Request(Box<RequestItem>),
}

impl FolderNode {
    fn new(name: String) -> Self {
        Self {
            name,
            children: Vec::new(),
            subfolders: HashMap::new(),
        }
    }
}

/// Arena-backed folder tree with an implicit, unnamed root.
#[derive(Debug)]
pub struct CollectionTree {
    folders: Vec<FolderNode>,
}

impl CollectionTree {
    /// Creates a tree holding only the root folder
    pub fn new() -> Self {
        Self {
            folders: vec![FolderNode::new(String::new())],
        }
    }

    /// The implicit root folder
    pub fn root(&self) -> FolderId {
        FolderId(0)
    }

    pub fn folder(&self, id: FolderId) -> &FolderNode {
        &self.folders[id.0]
    }

    /// Number of folders, excluding the root
    pub fn folder_count(&self) -> usize {
        self.folders.len() - 1
    }

    /// Returns the sub-folder of `parent` for `segment`, creating it if missing.
    pub fn ensure_child(&mut self, parent: FolderId, segment: &str) -> FolderId {
        if let Some(&existing) = self.folders[parent.0].subfolders.get(segment) {
            return existing;
        }

        let id = FolderId(self.folders.len());
        let name = singularize(&ucfirst(segment));
        debug!("Creating folder '{}' for segment '{}'", name, segment);

        self.folders.push(FolderNode::new(name));
        let parent_node = &mut self.folders[parent.0];
        parent_node.subfolders.insert(segment.to_string(), id);
        parent_node.children.push(Child::Folder(id));
        id
    }

    /// Walks `path` from the root, creating missing folders, and returns the leaf folder.
    ///
    /// An empty path resolves to the root.
    pub fn ensure_folder(&mut self, path: &NormalizedPath) -> FolderId {
        path.segments()
            .iter()
            .fold(self.root(), |parent, segment| self.ensure_child(parent, segment))
    }

    /// Appends `item` to the folder for `path`, after everything inserted there before.
    pub fn insert(&mut self, path: &NormalizedPath, item: RequestItem) -> FolderId {
        let leaf = self.ensure_folder(path);
        self.folders[leaf.0].children.push(Child::Request(Box::new(item)));
        leaf
    }

    /// Converts the tree into the nested `item` array of a collection, root children first.
    pub fn flatten(&self) -> Vec<CollectionItem> {
        self.flatten_folder(self.root())
    }

    fn flatten_folder(&self, id: FolderId) -> Vec<CollectionItem> {
        self.folders[id.0]
            .children
            .iter()
            .map(|child| match child {
                Child::Folder(sub) => CollectionItem::Folder(Folder {
                    name: self.folders[sub.0].name.clone(),
                    item: self.flatten_folder(*sub),
                }),
                Child::Request(request) => CollectionItem::Request(request.as_ref().clone()),
            })
            .collect()
    }

    /// Number of request items anywhere in the tree
    pub fn request_count(&self) -> usize {
        self.folders
            .iter()
            .flat_map(|folder| &folder.children)
            .filter(|child| matches!(child, Child::Request(_)))
            .count()
    }
}

impl Default for CollectionTree {
    fn default() -> Self {
        Self::new()
    }
}
