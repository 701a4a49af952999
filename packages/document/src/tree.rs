//! # Element Tree
//!
//! Arena of elements for one page, keyed by id.
//!
//! ## Design
//!
//! - Nodes are stored as `Arc<ElementNode>` and record their parent id and
//!   ordered child ids. The tree itself is the ordered list of root ids.
//! - Operations borrow `&self` and return a new tree. Cloning a tree copies
//!   `Arc` pointers only; the nodes an operation rewrites are cloned with
//!   `Arc::make_mut`, everything else stays shared with the input.
//! - Unknown ids are tolerated: `update_by_id`, `remove_by_id` and
//!   `move_by_id` return a tree equal to the input.
//!
//! ## Invariants
//!
//! - Ids are unique across the whole tree
//! - Only container types own children
//! - Parent and child links agree; there are no cycles

use crate::errors::TreeError;
use crate::model::{Element, ElementData, ElementId, ElementType};
use crate::patch::ElementPatch;
use pagebuilder_common::{now, IdGenerator};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// One element in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub data: ElementData,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl ElementNode {
    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn kind(&self) -> &ElementType {
        &self.data.kind
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

/// Element arena for a single page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Element>", into = "Vec<Element>")]
pub struct ElementTree {
    nodes: HashMap<ElementId, Arc<ElementNode>>,
    roots: Vec<ElementId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of elements, nested ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level element ids in paint order
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ElementNode> {
        self.nodes.get(id).map(Arc::as_ref)
    }

    /// Depth-first, pre-order walk over every element
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.roots.iter().rev().map(String::as_str).collect(),
        }
    }

    /// Ids of `id` and all its descendants, pre-order; empty if unknown
    pub fn subtree_ids(&self, id: &str) -> Vec<ElementId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                ids.push(node.data.id.clone());
                stack.extend(node.children.iter().rev().map(String::as_str));
            }
        }

        ids
    }

    pub fn subtree_size(&self, id: &str) -> usize {
        self.subtree_ids(id).len()
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: &str, id: &str) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == ancestor {
                return true;
            }
            current = self.nodes.get(cursor).and_then(|n| n.parent.as_deref());
        }
        false
    }

    /// True when both trees hold the very same allocation for `id`
    pub fn shares_node(&self, other: &ElementTree, id: &str) -> bool {
        match (self.nodes.get(id), other.nodes.get(id)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Shallow-merge `patch` onto the element with `id`
    pub fn update_by_id(&self, id: &str, patch: &ElementPatch) -> Self {
        let mut next = self.clone();

        match next.nodes.get_mut(id) {
            Some(slot) => {
                let node = Arc::make_mut(slot);
                let has_children = !node.children.is_empty();
                if !patch.apply_to(&mut node.data, has_children) {
                    tracing::warn!(
                        element_id = id,
                        "refusing to change type of an element that owns children"
                    );
                }
                node.data.updated_at = now();
            }
            None => tracing::debug!(element_id = id, "update_by_id: unknown element"),
        }

        next
    }

    /// Remove the element with `id` together with its whole subtree
    pub fn remove_by_id(&self, id: &str) -> Self {
        let Some(node) = self.nodes.get(id) else {
            tracing::debug!(element_id = id, "remove_by_id: unknown element");
            return self.clone();
        };

        let mut next = self.clone();
        for doomed in self.subtree_ids(id) {
            next.nodes.remove(&doomed);
        }
        next.detach(id, node.parent.as_deref());

        next
    }

    /// Insert `element` (and any nested children) under `parent`
    ///
    /// `parent == None` inserts at top level. `index == None` appends; an index
    /// past the end is clamped.
    pub fn insert(
        &self,
        parent: Option<&str>,
        index: Option<usize>,
        element: Element,
    ) -> Result<Self, TreeError> {
        if let Some(parent_id) = parent {
            let parent_node = self
                .nodes
                .get(parent_id)
                .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;
            if !parent_node.data.kind.is_container() {
                return Err(TreeError::NotAContainer(parent_id.to_string()));
            }
        }

        let mut seen = HashSet::new();
        self.validate_subtree(&element, &mut seen)?;

        let mut next = self.clone();
        let id = element.data.id.clone();
        next.attach_subtree(parent.map(str::to_string), element);
        next.link(&id, parent, index);

        Ok(next)
    }

    /// Reparent `id` under `new_parent` (top level when `None`) at `index`
    pub fn move_by_id(
        &self,
        id: &str,
        new_parent: Option<&str>,
        index: usize,
    ) -> Result<Self, TreeError> {
        let Some(node) = self.nodes.get(id) else {
            tracing::debug!(element_id = id, "move_by_id: unknown element");
            return Ok(self.clone());
        };

        if let Some(parent_id) = new_parent {
            let parent_node = self
                .nodes
                .get(parent_id)
                .ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;

            if self.is_ancestor_or_self(id, parent_id) {
                return Err(TreeError::CycleDetected {
                    node: id.to_string(),
                    parent: parent_id.to_string(),
                });
            }
            if !parent_node.data.kind.is_container() {
                return Err(TreeError::NotAContainer(parent_id.to_string()));
            }
        }

        let mut next = self.clone();
        next.detach(id, node.parent.as_deref());
        if let Some(slot) = next.nodes.get_mut(id) {
            Arc::make_mut(slot).parent = new_parent.map(str::to_string);
        }
        next.link(id, new_parent, Some(index));

        Ok(next)
    }

    /// Rebuild the nested wire shape
    pub fn to_nested(&self) -> Vec<Element> {
        self.roots.iter().filter_map(|id| self.nest(id)).collect()
    }

    /// Copy of this tree where every element got a fresh id
    ///
    /// Returns the old → new id mapping alongside the tree.
    pub fn with_fresh_ids(&self) -> (Self, HashMap<ElementId, ElementId>) {
        fn reassign(element: &mut Element, mapping: &mut HashMap<ElementId, ElementId>) {
            let fresh = IdGenerator::element();
            mapping.insert(std::mem::replace(&mut element.data.id, fresh.clone()), fresh);
            for child in element.children.iter_mut().flatten() {
                reassign(child, mapping);
            }
        }

        let mut mapping = HashMap::new();
        let mut nested = self.to_nested();
        for element in &mut nested {
            reassign(element, &mut mapping);
        }

        let mut tree = Self::new();
        for element in nested {
            let id = element.data.id.clone();
            tree.attach_subtree(None, element);
            tree.roots.push(id);
        }

        (tree, mapping)
    }

    fn nest(&self, id: &str) -> Option<Element> {
        let node = self.nodes.get(id)?;
        let children = if node.data.kind.is_container() || !node.children.is_empty() {
            Some(node.children.iter().filter_map(|c| self.nest(c)).collect())
        } else {
            None
        };

        Some(Element {
            data: node.data.clone(),
            children,
        })
    }

    fn validate_subtree(
        &self,
        element: &Element,
        seen: &mut HashSet<ElementId>,
    ) -> Result<(), TreeError> {
        let id = &element.data.id;
        if self.nodes.contains_key(id) || !seen.insert(id.clone()) {
            return Err(TreeError::DuplicateId(id.clone()));
        }

        let children = element.children.as_deref().unwrap_or_default();
        if !children.is_empty() && !element.data.kind.is_container() {
            return Err(TreeError::NotAContainer(id.clone()));
        }

        for child in children {
            self.validate_subtree(child, seen)?;
        }

        Ok(())
    }

    /// Store `element` and its descendants; the caller links the subtree root
    fn attach_subtree(&mut self, parent: Option<ElementId>, element: Element) {
        let id = element.data.id.clone();
        let children = element.children.unwrap_or_default();
        let child_ids = children.iter().map(|c| c.data.id.clone()).collect();

        self.nodes.insert(
            id.clone(),
            Arc::new(ElementNode {
                data: element.data,
                parent,
                children: child_ids,
            }),
        );

        for child in children {
            self.attach_subtree(Some(id.clone()), child);
        }
    }

    fn link(&mut self, id: &str, parent: Option<&str>, index: Option<usize>) {
        let siblings = match parent {
            Some(parent_id) => match self.nodes.get_mut(parent_id) {
                Some(slot) => &mut Arc::make_mut(slot).children,
                None => return,
            },
            None => &mut self.roots,
        };

        let at = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, id.to_string());
    }

    fn detach(&mut self, id: &str, parent: Option<&str>) {
        match parent {
            Some(parent_id) => {
                if let Some(slot) = self.nodes.get_mut(parent_id) {
                    Arc::make_mut(slot).children.retain(|c| c != id);
                }
            }
            None => self.roots.retain(|r| r != id),
        }
    }
}

impl TryFrom<Vec<Element>> for ElementTree {
    type Error = TreeError;

    fn try_from(elements: Vec<Element>) -> Result<Self, Self::Error> {
        let mut tree = Self::new();
        let mut seen = HashSet::new();

        for element in elements {
            tree.validate_subtree(&element, &mut seen)?;
            let id = element.data.id.clone();
            tree.attach_subtree(None, element);
            tree.roots.push(id);
        }

        Ok(tree)
    }
}

impl From<ElementTree> for Vec<Element> {
    fn from(tree: ElementTree) -> Self {
        tree.to_nested()
    }
}

/// Pre-order iterator over an [`ElementTree`]
pub struct Preorder<'a> {
    tree: &'a ElementTree,
    stack: Vec<&'a str>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.stack.pop() {
            if let Some(node) = tree.nodes.get(id) {
                self.stack
                    .extend(node.children.iter().rev().map(String::as_str));
                return Some(node.as_ref());
            }
        }
        None
    }
}
