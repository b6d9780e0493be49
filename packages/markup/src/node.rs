//! # Element Tree
//!
//! Arena-backed element tree used by every layer above the codec.
//!
//! Each element has a tag, an ordered attribute list and an ordered list of
//! children. Ownership flows top-down through `children`; `parent` is only a
//! navigation link. Detaching a node keeps it (and its subtree) alive in the
//! arena so callers can re-insert it elsewhere, which is how moves work.
//! [`Tree::compact`] reclaims whatever was left detached.
//!
//! ```text
//! Tree
//! ├── nodes: Vec<NodeData>   # indexed by NodeId
//! └── root: NodeId           # never has a parent
//! ```

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an element inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Scalar attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view, accepting the textual forms produced by a markup round trip
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            AttrValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Compare against the textual form of a value
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            AttrValue::Text(s) => s == expected,
            other => other.to_string() == expected,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(n: u32) -> Self {
        AttrValue::Number(f64::from(n))
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, AttrValue)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: String) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Element tree with a fixed root
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    pub fn new(root_tag: impl Into<String>) -> Self {
        Self {
            nodes: vec![NodeData::new(root_tag.into())],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of elements ever allocated, detached ones included
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements reachable from the root
    pub fn attached_len(&self) -> usize {
        1 + self.descendants(self.root).len()
    }

    /// Drop every detached element and renumber the rest in document order.
    ///
    /// Handles taken before the call are invalidated; the returned table maps
    /// each old index to its new handle, `None` for dropped elements.
    pub fn compact(&mut self) -> Vec<Option<NodeId>> {
        let mut order = vec![self.root];
        order.extend(self.descendants(self.root));

        let mut remap = vec![None; self.nodes.len()];
        for (index, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(index));
        }

        let mut old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = order
            .iter()
            .map(|old| {
                let data = std::mem::replace(&mut old_nodes[old.0], NodeData::new(String::new()));
                NodeData {
                    parent: data.parent.and_then(|p| remap[p.0]),
                    children: data.children.iter().filter_map(|c| remap[c.0]).collect(),
                    ..data
                }
            })
            .collect();
        self.root = NodeId(0);

        tracing::trace!(
            dropped = old_nodes.len() - self.nodes.len(),
            "compacted tree"
        );
        remap
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag.into()));
        id
    }

    /// Create an element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: impl Into<String>) -> NodeId {
        let child = self.create_element(tag);
        self.attach_at(parent, self.children(parent).len(), child);
        child
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.data(id).tag
    }

    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<String>) {
        self.data_mut(id).tag = tag.into();
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attributes(&self, id: NodeId) -> &[(String, AttrValue)] {
        &self.data(id).attributes
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&AttrValue> {
        self.data(id)
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// True when the attribute exists and its textual form equals `value`
    pub fn attr_is(&self, id: NodeId, name: &str, value: &str) -> bool {
        self.attr(id, name).map_or(false, |v| v.matches(value))
    }

    /// Set an attribute, keeping its position when it already exists
    pub fn set_attr(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        let attributes = &mut self.data_mut(id).attributes;
        match attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<AttrValue> {
        let attributes = &mut self.data_mut(id).attributes;
        let index = attributes.iter().position(|(key, _)| key == name)?;
        Some(attributes.remove(index).1)
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.data(id).children.is_empty()
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// Append `child` as last child of `parent`, moving it if already placed
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.children(parent).len();
        self.insert_child(parent, len, child)
    }

    /// Insert `child` right before `reference`, which must be a child of `parent`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), TreeError> {
        if child == reference {
            return Ok(());
        }
        if self.parent(reference) != Some(parent) {
            return Err(TreeError::NotAChild {
                parent,
                node: reference,
            });
        }
        self.check_insertable(parent, child)?;
        self.detach(child);
        let index = self
            .index_in_parent(reference)
            .ok_or(TreeError::NotAChild { parent, node: reference })?;
        self.attach_at(parent, index, child);
        Ok(())
    }

    /// Insert `child` at `index` (clamped) in the children of `parent`
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        self.check_insertable(parent, child)?;
        let mut index = index;
        if self.parent(child) == Some(parent) {
            if let Some(current) = self.index_in_parent(child) {
                if current < index {
                    index -= 1;
                }
            }
        }
        self.detach(child);
        let index = index.min(self.children(parent).len());
        self.attach_at(parent, index, child);
        Ok(())
    }

    /// Put `new_child` where `old_child` was; `old_child` ends up detached
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), TreeError> {
        self.insert_before(parent, new_child, old_child)?;
        if new_child != old_child {
            self.detach(old_child);
        }
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.parent(child) != Some(parent) {
            return Err(TreeError::NotAChild { parent, node: child });
        }
        self.detach(child);
        Ok(())
    }

    /// Unlink a node from its parent. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.data_mut(id).parent.take() {
            self.data_mut(parent).children.retain(|c| *c != id);
        }
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if child == self.root {
            return Err(TreeError::RootNotMovable);
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return Err(TreeError::CycleDetected { node: child });
        }
        Ok(())
    }

    fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.data_mut(parent).children.insert(index, child);
        self.data_mut(child).parent = Some(parent);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Ancestors from the parent upward
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether the node is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor_of(self.root, id)
    }

    /// All descendants in document order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn select_children(&self, id: NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| selector.matches(self, *c))
            .collect()
    }

    pub fn first_child_matching(&self, id: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| selector.matches(self, *c))
    }

    pub fn select_descendants(&self, id: NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|d| selector.matches(self, *d))
            .collect()
    }

    // ------------------------------------------------------------------
    // Comparison and copy
    // ------------------------------------------------------------------

    /// Structural equality of two subtrees, attribute values compared by text
    pub fn subtree_eq(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let (a, b) = (self.data(id), other.data(other_id));
        if a.tag != b.tag
            || a.attributes.len() != b.attributes.len()
            || a.children.len() != b.children.len()
        {
            return false;
        }
        let same_attributes = a
            .attributes
            .iter()
            .zip(&b.attributes)
            .all(|((ka, va), (kb, vb))| ka == kb && va.to_string() == vb.to_string());
        same_attributes
            && a
                .children
                .iter()
                .zip(&b.children)
                .all(|(ca, cb)| self.subtree_eq(*ca, other, *cb))
    }

    /// Deep-copy a subtree of `source` into this arena, detached
    pub fn import_subtree(&mut self, source: &Tree, source_id: NodeId) -> NodeId {
        let copy = self.create_element(source.tag(source_id));
        self.data_mut(copy).attributes = source.attributes(source_id).to_vec();
        for child in source.children(source_id) {
            let child_copy = self.import_subtree(source, *child);
            self.attach_at(copy, self.children(copy).len(), child_copy);
        }
        copy
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root, other, other.root)
    }
}

/// Iterator over the ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[derive(Debug, Clone, Copy)]
enum AttrFilter<'a> {
    Present(&'a str),
    Equals(&'a str, &'a str),
    NotEquals(&'a str, &'a str),
}

/// Tag/attribute predicate, the scoped equivalent of `tag[attr=value]`
#[derive(Debug, Clone, Copy, Default)]
pub struct Selector<'a> {
    tag: Option<&'a str>,
    attr: Option<AttrFilter<'a>>,
}

impl<'a> Selector<'a> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn tag(tag: &'a str) -> Self {
        Self {
            tag: Some(tag),
            attr: None,
        }
    }

    pub fn has_attr(mut self, name: &'a str) -> Self {
        self.attr = Some(AttrFilter::Present(name));
        self
    }

    pub fn with_attr(mut self, name: &'a str, value: &'a str) -> Self {
        self.attr = Some(AttrFilter::Equals(name, value));
        self
    }

    /// Matches when the attribute is missing or holds another value
    pub fn without_attr(mut self, name: &'a str, value: &'a str) -> Self {
        self.attr = Some(AttrFilter::NotEquals(name, value));
        self
    }

    pub fn matches(&self, tree: &Tree, id: NodeId) -> bool {
        if let Some(tag) = self.tag {
            if tree.tag(id) != tag {
                return false;
            }
        }
        match self.attr {
            None => true,
            Some(AttrFilter::Present(name)) => tree.has_attr(id, name),
            Some(AttrFilter::Equals(name, value)) => tree.attr_is(id, name, value),
            Some(AttrFilter::NotEquals(name, value)) => !tree.attr_is(id, name, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::serialize;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new("grid");
        let content = tree.create_element("content");
        let row1 = tree.create_element("row");
        let row2 = tree.create_element("row");
        tree.append_child(tree.root(), content).unwrap();
        tree.append_child(content, row1).unwrap();
        tree.append_child(content, row2).unwrap();
        (tree, content, row1, row2)
    }

    #[test]
    fn test_append_element() {
        let (mut tree, content, _, row2) = sample();
        let cell = tree.append_element(row2, "cell");
        assert_eq!(tree.parent(cell), Some(row2));
        assert_eq!(tree.children(row2), &[cell]);
        assert!(tree.is_attached(cell));
        assert_eq!(tree.children(content).len(), 2);
    }

    #[test]
    fn test_compact_drops_detached_elements() {
        let (mut tree, content, row1, row2) = sample();
        let cell = tree.append_element(row2, "cell");
        tree.set_attr(cell, "type", "module");
        let stray = tree.create_element("row");
        tree.detach(row1);
        let before = serialize(&tree);

        assert_eq!(tree.arena_len(), 6);
        assert_eq!(tree.attached_len(), 4);

        let remap = tree.compact();
        assert_eq!(tree.arena_len(), 4);
        assert_eq!(remap[row1.index()], None);
        assert_eq!(remap[stray.index()], None);
        assert_eq!(remap[tree.root().index()], Some(tree.root()));

        let content = remap[content.index()].unwrap();
        let row2 = remap[row2.index()].unwrap();
        let cell = remap[cell.index()].unwrap();
        assert_eq!(tree.children(content), &[row2]);
        assert_eq!(tree.parent(cell), Some(row2));
        assert!(tree.attr_is(cell, "type", "module"));
        assert_eq!(serialize(&tree), before);
    }

    #[test]
    fn test_set_attr_keeps_position() {
        let mut tree = Tree::new("grid");
        let root = tree.root();
        tree.set_attr(root, "name", "foo");
        tree.set_attr(root, "space", "5px");
        tree.set_attr(root, "name", "bar");

        let names: Vec<_> = tree.attributes(root).iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["name", "space"]);
        assert!(tree.attr_is(root, "name", "bar"));
        assert_eq!(tree.remove_attr(root, "name"), Some(AttrValue::from("bar")));
        assert!(!tree.has_attr(root, "name"));
    }

    #[test]
    fn test_attr_value_text_forms() {
        assert!(AttrValue::from(5u32).matches("5"));
        assert!(AttrValue::from(1.5).matches("1.5"));
        assert!(AttrValue::from(true).matches("true"));
        assert_eq!(AttrValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(AttrValue::from("nope").as_bool(), None);
    }

    #[test]
    fn test_insert_before_and_move() {
        let (mut tree, content, row1, row2) = sample();
        let row0 = tree.create_element("row");
        tree.insert_before(content, row0, row1).unwrap();
        assert_eq!(tree.children(content), &[row0, row1, row2]);

        // moving an attached node relocates it
        tree.insert_before(content, row2, row0).unwrap();
        assert_eq!(tree.children(content), &[row2, row0, row1]);
        assert_eq!(tree.parent(row2), Some(content));
    }

    #[test]
    fn test_insert_before_foreign_reference_fails() {
        let (mut tree, content, row1, _) = sample();
        let cell = tree.create_element("cell");
        tree.append_child(row1, cell).unwrap();
        let other = tree.create_element("row");

        let err = tree.insert_before(content, other, cell).unwrap_err();
        assert_eq!(err, TreeError::NotAChild { parent: content, node: cell });
        assert_eq!(tree.parent(other), None);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let (mut tree, content, row1, _) = sample();
        assert_eq!(
            tree.append_child(row1, content),
            Err(TreeError::CycleDetected { node: content })
        );
        let root = tree.root();
        assert_eq!(tree.append_child(row1, root), Err(TreeError::RootNotMovable));
    }

    #[test]
    fn test_detach_and_attachment() {
        let (mut tree, content, row1, _) = sample();
        let cell = tree.create_element("cell");
        tree.append_child(row1, cell).unwrap();
        assert!(tree.is_attached(cell));

        tree.remove_child(content, row1).unwrap();
        assert!(!tree.is_attached(cell));
        assert_eq!(tree.parent(cell), Some(row1));
        assert!(tree.remove_child(content, row1).is_err());
    }

    #[test]
    fn test_insert_child_within_same_parent() {
        let (mut tree, content, row1, row2) = sample();
        tree.insert_child(content, 2, row1).unwrap();
        assert_eq!(tree.children(content), &[row2, row1]);
    }

    #[test]
    fn test_replace_child() {
        let (mut tree, content, row1, row2) = sample();
        let fresh = tree.create_element("row");
        tree.replace_child(content, fresh, row1).unwrap();
        assert_eq!(tree.children(content), &[fresh, row2]);
        assert_eq!(tree.parent(row1), None);
    }

    #[test]
    fn test_selectors() {
        let (mut tree, content, row1, row2) = sample();
        tree.set_attr(row2, "type", "placeholder");
        let cell = tree.create_element("cell");
        tree.set_attr(cell, "type", "module");
        tree.append_child(row1, cell).unwrap();

        assert_eq!(tree.select_children(content, &Selector::tag("row")), vec![row1, row2]);
        assert_eq!(
            tree.select_children(content, &Selector::tag("row").without_attr("type", "placeholder")),
            vec![row1]
        );
        assert_eq!(
            tree.select_descendants(tree.root(), &Selector::any().with_attr("type", "module")),
            vec![cell]
        );
        assert_eq!(
            tree.select_descendants(tree.root(), &Selector::any().has_attr("type")),
            vec![cell, row2]
        );
        assert_eq!(tree.first_child_matching(tree.root(), &Selector::tag("content")), Some(content));
    }

    #[test]
    fn test_subtree_eq_and_import() {
        let (mut tree, _, row1, _) = sample();
        tree.set_attr(row1, "relativeSize", 0.5);

        let mut copy = Tree::new("grid");
        let imported = copy.import_subtree(&tree, tree.children(tree.root())[0]);
        let root = copy.root();
        copy.append_child(root, imported).unwrap();
        assert_eq!(copy, tree);

        copy.set_attr(copy.children(imported)[0], "relativeSize", "0.5");
        assert_eq!(copy, tree, "values compare by their text");

        copy.set_attr(copy.children(imported)[0], "relativeSize", "0.25");
        assert_ne!(copy, tree);
    }
}
