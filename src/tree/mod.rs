//! Arena-based document tree.
//!
//! This module implements the core tree representation using arena allocation
//! with typed indices. All nodes live in a contiguous `Vec<NodeData>` owned by
//! the [`Document`], and are referenced by [`NodeId`] — a newtype over
//! `NonZeroU32`.
//!
//! Ownership is expressed as the single parent → child edge: a node with no
//! parent is *detached* and belongs to whoever holds its id; insertion claims
//! it for the tree, removal releases it back. Navigation links (parent,
//! first/last child, siblings) are plain non-owning ids, which keeps every
//! structural operation O(1) given a direct reference while making dangling
//! links impossible.
//!
//! Each node carries a `revision` counter that is bumped exactly once per
//! structural mutation directly under it. [`NodeIter`] cursors capture the
//! revision of their root at creation and fail fast with
//! [`TreeError::IteratorInvalidated`] when the children change through any
//! other path.

mod node;

pub use node::{Doctype, NodeKind, ROOT_TAG};

use std::num::NonZeroU32;

use crate::error::{ParseError, TreeError};

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero and
/// `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
///
/// Each node stores its kind (element, text, comment, data, document root)
/// plus the link block for tree navigation. Access individual nodes via
/// [`Document::node`].
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// A non-unique display name, used for debugging only.
    pub name: Option<String>,
    /// Parent node, if any. A node without a parent is detached.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
    /// Number of direct children; always equal to the length of the
    /// `first_child` → `next_sibling` chain.
    pub n_children: u32,
    /// Tracks whenever the children of this node are changed; incremented by
    /// 1 whenever a child is added or removed. Not incremented when
    /// grandchildren change.
    pub revision: u64,
    /// Set while this node's subtree is being torn down, to guard against
    /// re-entrant destruction and mid-destruction adoption.
    pub in_destruction: bool,
    /// Set once this node has been destroyed. The arena slot stays allocated
    /// until the `Document` drops, but the node can no longer be linked.
    pub destroyed: bool,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
            n_children: 0,
            revision: 0,
            in_destruction: false,
            destroyed: false,
        }
    }
}

/// A markup document.
///
/// The `Document` owns all nodes in an arena and provides methods for tree
/// navigation and mutation. All tree operations go through `&Document`
/// (navigation) or `&mut Document` (mutation). The document root is a
/// distinguished element-like node with tag [`ROOT_TAG`] carrying the
/// [`Doctype`] classification.
///
/// The tree is exclusively owned by one thread at a time; no operation here
/// blocks or spawns concurrent work.
///
/// # Examples
///
/// ```
/// use sopa::Document;
///
/// let doc = Document::parse_str("<html><body>Hello</body></html>").unwrap();
/// let html = doc.first_child(doc.root()).unwrap();
/// assert_eq!(doc.tag(html), Some("html"));
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document root node id.
    root: NodeId,
}

impl Document {
    /// Creates a new empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document {
            doctype: Doctype::Unknown,
        }));
        nodes.push(NodeData::new(NodeKind::Document {
            doctype: Doctype::Unknown,
        }));
        let root = NodeId::from_index(1);
        Self { nodes, root }
    }

    /// Parses a markup string into a `Document`.
    ///
    /// Equivalent to [`crate::parser::Parser::parse_str`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on a mismatched closing tag or a tokenizer
    /// failure. No partial document is produced on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::Document;
    ///
    /// let doc = Document::parse_str("<root><child/></root>").unwrap();
    /// assert_eq!(doc.child_count(doc.root()), 1);
    /// ```
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        crate::parser::Parser::parse_str(input)
    }

    /// Returns the document root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a reference to the [`NodeData`] for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node of this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    /// Returns a mutable reference to the [`NodeData`] for the given node.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    // --- Node creation ---

    /// Allocates a new node in the arena and returns its id. The node starts
    /// detached.
    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Creates a detached element node. The tag is lowercased and immutable
    /// after construction.
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::Document;
    ///
    /// let mut doc = Document::new();
    /// let div = doc.create_element("DIV");
    /// assert_eq!(doc.tag(div), Some("div"));
    /// ```
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_node(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: std::collections::HashMap::new(),
        })
    }

    /// Creates a detached text node holding `content` verbatim.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Text {
            content: content.to_string(),
        })
    }

    /// Creates a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Comment {
            content: content.to_string(),
        })
    }

    /// Creates a detached raw data node.
    pub fn create_data(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Data {
            content: content.to_string(),
        })
    }

    // --- Navigation ---

    /// Returns the parent of a node, or `None` if it is detached (or is the
    /// root).
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns the number of direct children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).n_children as usize
    }

    /// Returns the current revision of a node's child list.
    #[must_use]
    pub fn revision(&self, id: NodeId) -> u64 {
        self.node(id).revision
    }

    /// Returns a borrowing iterator over the direct children of a node.
    ///
    /// This is the read-only traversal; it borrows the document and therefore
    /// cannot observe concurrent mutation. Use [`NodeIter`] when iteration
    /// and mutation interleave.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns the debug display name of a node, if one was set.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).name.as_deref()
    }

    /// Sets the debug display name of a node.
    pub fn set_node_name(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).name = Some(name.to_string());
    }

    /// Returns the concatenated text content of a node and its descendants
    /// (text and raw data payloads, in document order).
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content } | NodeKind::Data { content } => buf.push_str(content),
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    // --- Element access ---

    /// Returns the tag of an element node, or [`ROOT_TAG`] for the document
    /// root. Leaf nodes (text, comment, data) have no tag.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Document { .. } => Some(ROOT_TAG),
            _ => None,
        }
    }

    /// Sets an attribute on an element, overwriting any previous value for
    /// the same key (last write wins).
    ///
    /// Setting an attribute on a non-element node is ignored with a warning.
    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: &str) {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => {
                let _ = attributes.insert(key.to_string(), value.to_string());
            }
            _ => log::warn!("set_attribute called on a non-element node {id:?}"),
        }
    }

    /// Returns the value of an attribute, or `None` if absent (or the node is
    /// not an element).
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    /// Removes an attribute. Returns `true` if the attribute existed.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> bool {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => attributes.remove(key).is_some(),
            _ => false,
        }
    }

    /// Returns whether the element has an attribute named `key`.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, key: &str) -> bool {
        self.get_attribute(id, key).is_some()
    }

    /// Returns the number of attributes on an element (0 for non-elements).
    #[must_use]
    pub fn attribute_count(&self, id: NodeId) -> usize {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes.len(),
            _ => 0,
        }
    }

    // --- Doctype ---

    /// Returns the doctype classification of the document.
    #[must_use]
    pub fn doctype(&self) -> Doctype {
        match self.node(self.root).kind {
            NodeKind::Document { doctype } => doctype,
            // The root is constructed as a Document node and its kind is
            // never rewritten.
            _ => Doctype::Unknown,
        }
    }

    /// Stores the doctype classification on the document root.
    pub fn set_doctype(&mut self, doctype: Doctype) {
        if let NodeKind::Document { doctype: slot } = &mut self.node_mut(self.root).kind {
            *slot = doctype;
        }
    }

    // --- Mutation ---

    /// Checks the preconditions shared by every insertion operation.
    fn check_adoption(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let p = self.node(parent);
        if p.destroyed {
            return Err(TreeError::Destroyed { node: parent });
        }
        if p.in_destruction {
            return Err(TreeError::InDestruction { node: parent });
        }
        if parent == child {
            return Err(TreeError::SelfParent);
        }

        let c = self.node(child);
        if c.destroyed {
            return Err(TreeError::Destroyed { node: child });
        }
        if c.in_destruction {
            log::warn!(
                "node {child:?} is currently being destroyed and cannot be \
                 added as a child of another node"
            );
            return Err(TreeError::InDestruction { node: child });
        }
        if c.parent.is_some() {
            log::warn!(
                "node {child:?} already has a parent; it must be removed from \
                 its current parent first"
            );
            return Err(TreeError::AlreadyParented { child });
        }
        Ok(())
    }

    /// Completes an insertion: sets the parent link, fixes up the parent's
    /// first/last child pointers from the child's sibling links, and bumps
    /// the child count and revision.
    fn finish_link(&mut self, parent: NodeId, child: NodeId) {
        self.node_mut(child).parent = Some(parent);
        if self.node(child).prev_sibling.is_none() {
            self.node_mut(parent).first_child = Some(child);
        }
        if self.node(child).next_sibling.is_none() {
            self.node_mut(parent).last_child = Some(child);
        }
        let p = self.node_mut(parent);
        p.n_children += 1;
        p.revision += 1;
    }

    /// Links `child`'s sibling pointers for an append at the end.
    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let last = self.node(parent).last_child;
        if let Some(l) = last {
            self.node_mut(l).next_sibling = Some(child);
        }
        self.node_mut(child).prev_sibling = last;
        self.node_mut(child).next_sibling = None;
    }

    /// Links `child`'s sibling pointers for an insert at the front.
    fn link_first(&mut self, parent: NodeId, child: NodeId) {
        let first = self.node(parent).first_child;
        if let Some(f) = first {
            self.node_mut(f).prev_sibling = Some(child);
        }
        self.node_mut(child).prev_sibling = None;
        self.node_mut(child).next_sibling = first;
    }

    /// Links `child` immediately after `sibling` (append when `None`).
    fn link_above(&mut self, parent: NodeId, child: NodeId, sibling: Option<NodeId>) {
        let sibling = sibling.or(self.node(parent).last_child);
        self.node_mut(child).prev_sibling = sibling;
        match sibling {
            Some(s) => {
                let next = self.node(s).next_sibling;
                self.node_mut(child).next_sibling = next;
                if let Some(n) = next {
                    self.node_mut(n).prev_sibling = Some(child);
                }
                self.node_mut(s).next_sibling = Some(child);
            }
            None => self.node_mut(child).next_sibling = None,
        }
    }

    /// Links `child` immediately before `sibling` (prepend when `None`).
    fn link_below(&mut self, parent: NodeId, child: NodeId, sibling: Option<NodeId>) {
        let sibling = sibling.or(self.node(parent).first_child);
        self.node_mut(child).next_sibling = sibling;
        match sibling {
            Some(s) => {
                let prev = self.node(s).prev_sibling;
                self.node_mut(child).prev_sibling = prev;
                if let Some(p) = prev {
                    self.node_mut(p).next_sibling = Some(child);
                }
                self.node_mut(s).prev_sibling = Some(child);
            }
            None => self.node_mut(child).prev_sibling = None,
        }
    }

    /// Links `child`'s sibling pointers for an insert at `index`, walking the
    /// chain. `index` out of range (negative or past the end) appends.
    fn link_at_index(&mut self, parent: NodeId, child: NodeId, index: i32) {
        #[allow(clippy::cast_possible_wrap)]
        let count = self.node(parent).n_children as i32;
        if index == 0 {
            self.link_first(parent, child);
        } else if index < 0 || index >= count {
            self.link_last(parent, child);
        } else {
            let mut iter = self.node(parent).first_child;
            let mut i = 0;
            while let Some(cur) = iter {
                if i == index {
                    let prev = self.node(cur).prev_sibling;
                    self.node_mut(child).prev_sibling = prev;
                    self.node_mut(child).next_sibling = Some(cur);
                    self.node_mut(cur).prev_sibling = Some(child);
                    if let Some(p) = prev {
                        self.node_mut(p).next_sibling = Some(child);
                    }
                    break;
                }
                iter = self.node(cur).next_sibling;
                i += 1;
            }
        }
    }

    /// Appends `child` as the last child of `parent`, transferring ownership
    /// to the tree.
    ///
    /// # Errors
    ///
    /// Fails with a [`TreeError`] if `child` already has a parent, if
    /// `child == parent`, or if either node is being (or has been) destroyed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sopa::Document;
    ///
    /// let mut doc = Document::new();
    /// let root = doc.root();
    /// let p = doc.create_element("p");
    /// doc.add_child(root, p).unwrap();
    /// assert_eq!(doc.parent(p), Some(root));
    /// ```
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.check_adoption(parent, child)?;
        self.link_last(parent, child);
        self.finish_link(parent, child);
        Ok(())
    }

    /// Inserts `child` at position `index` (0-based) in `parent`'s child
    /// list. If `index` is negative or greater than or equal to the current
    /// child count, the child is appended.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`Document::add_child`].
    pub fn insert_child_at_index(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: i32,
    ) -> Result<(), TreeError> {
        self.check_adoption(parent, child)?;
        self.link_at_index(parent, child, index);
        self.finish_link(parent, child);
        Ok(())
    }

    /// Inserts `child` immediately after `sibling` in `parent`'s child list,
    /// or after all children when `sibling` is `None`.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`Document::add_child`], plus: `sibling`, if
    /// given, must be a child of `parent` and must differ from `child`.
    pub fn insert_child_above(
        &mut self,
        parent: NodeId,
        child: NodeId,
        sibling: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_adoption(parent, child)?;
        self.check_sibling(parent, child, sibling)?;
        self.link_above(parent, child, sibling);
        self.finish_link(parent, child);
        Ok(())
    }

    /// Inserts `child` immediately before `sibling` in `parent`'s child
    /// list, or before all children when `sibling` is `None`.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`Document::insert_child_above`].
    pub fn insert_child_below(
        &mut self,
        parent: NodeId,
        child: NodeId,
        sibling: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_adoption(parent, child)?;
        self.check_sibling(parent, child, sibling)?;
        self.link_below(parent, child, sibling);
        self.finish_link(parent, child);
        Ok(())
    }

    fn check_sibling(
        &self,
        parent: NodeId,
        child: NodeId,
        sibling: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let Some(s) = sibling else { return Ok(()) };
        if s == child {
            return Err(TreeError::ChildIsSibling);
        }
        if self.node(s).parent != Some(parent) {
            return Err(TreeError::NotAChild { child: s, parent });
        }
        Ok(())
    }

    /// Detaches `child` from `parent`'s child list and releases ownership
    /// back to the caller. The node is not destroyed and can be re-added
    /// elsewhere.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::NotAChild`] if `child` is not currently a
    /// child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.node(child).parent != Some(parent) {
            return Err(TreeError::NotAChild { child, parent });
        }
        self.detach(child);
        Ok(())
    }

    /// Detaches every child of `parent` without destroying any of them.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        while let Some(child) = self.node(parent).first_child {
            self.detach(child);
        }
    }

    /// Detaches a node from its parent. No-op for detached nodes.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        let d = self.node_mut(id);
        d.parent = None;
        d.prev_sibling = None;
        d.next_sibling = None;

        let p = self.node_mut(parent);
        p.n_children -= 1;
        p.revision += 1;
    }

    /// Appends `child` to `parent` without precondition checks.
    ///
    /// Callers must guarantee that `child` is detached, alive, and distinct
    /// from `parent`. The tree builder uses this on nodes it created itself.
    pub(crate) fn append_unchecked(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none());
        self.link_last(parent, child);
        self.finish_link(parent, child);
    }

    /// Destroys a node: detaches it from its parent (if any) and recursively
    /// tears down all of its children, severing every parent link.
    ///
    /// Destroying a node that is already destroyed, or that is currently
    /// mid-destruction, is a no-op.
    pub fn destroy(&mut self, id: NodeId) {
        {
            let d = self.node(id);
            if d.destroyed || d.in_destruction {
                return;
            }
        }
        self.node_mut(id).in_destruction = true;
        self.detach(id);
        self.destroy_all_children(id);
        let d = self.node_mut(id);
        d.in_destruction = false;
        d.destroyed = true;
    }

    /// Destroys every child of `id`, recursively. Unlike
    /// [`Document::remove_all_children`], the children are torn down rather
    /// than released to the caller.
    pub fn destroy_all_children(&mut self, id: NodeId) {
        while let Some(child) = self.node(id).first_child {
            self.destroy(child);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Borrowing iterator over the direct children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// A revision-checked cursor over the direct children of a root node.
///
/// The cursor captures the root's revision when it is created. Every call to
/// [`next`](NodeIter::next) or [`prev`](NodeIter::prev) re-checks the
/// revision and fails with [`TreeError::IteratorInvalidated`] if the root's
/// children changed through any other path. Mutating through the cursor
/// itself ([`remove_current`](NodeIter::remove_current),
/// [`destroy_current`](NodeIter::destroy_current)) re-captures the revision,
/// so the same cursor remains valid for continued iteration.
///
/// # Examples
///
/// ```
/// use sopa::tree::{Document, NodeIter};
///
/// let mut doc = Document::parse_str("<ul><li>a</li><li>b</li></ul>").unwrap();
/// let list = doc.first_child(doc.root()).unwrap();
///
/// let mut iter = NodeIter::new(&doc, list);
/// let mut tags = Vec::new();
/// while let Some(child) = iter.next(&doc).unwrap() {
///     tags.push(doc.tag(child).unwrap().to_string());
/// }
/// assert_eq!(tags, ["li", "li"]);
/// ```
#[derive(Debug, Clone)]
pub struct NodeIter {
    root: NodeId,
    current: Option<NodeId>,
    revision: u64,
}

impl NodeIter {
    /// Creates a cursor over the children of `root`, capturing its current
    /// revision.
    #[must_use]
    pub fn new(doc: &Document, root: NodeId) -> Self {
        Self {
            root,
            current: None,
            revision: doc.node(root).revision,
        }
    }

    /// Returns whether the cursor is still valid, without failing.
    #[must_use]
    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.node(self.root).revision == self.revision
    }

    fn check(&self, doc: &Document) -> Result<(), TreeError> {
        if self.is_valid(doc) {
            Ok(())
        } else {
            Err(TreeError::IteratorInvalidated)
        }
    }

    /// Advances to the next child of the root and returns it, or `Ok(None)`
    /// once the children are exhausted.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorInvalidated`] if the root's children
    /// changed outside this cursor.
    pub fn next(&mut self, doc: &Document) -> Result<Option<NodeId>, TreeError> {
        self.check(doc)?;
        self.current = match self.current {
            None => doc.node(self.root).first_child,
            Some(c) => doc.node(c).next_sibling,
        };
        Ok(self.current)
    }

    /// Steps to the previous child of the root and returns it, or `Ok(None)`
    /// once exhausted. A fresh cursor starts from the last child.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorInvalidated`] if the root's children
    /// changed outside this cursor.
    pub fn prev(&mut self, doc: &Document) -> Result<Option<NodeId>, TreeError> {
        self.check(doc)?;
        self.current = match self.current {
            None => doc.node(self.root).last_child,
            Some(c) => doc.node(c).prev_sibling,
        };
        Ok(self.current)
    }

    /// Detaches the node the cursor currently points at from the root and
    /// returns it to the caller. The cursor steps back to the preceding
    /// sibling and re-captures the revision, so it remains valid.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeError::IteratorInvalidated`] if the cursor is stale,
    /// or [`TreeError::NoCurrentNode`] if the cursor has not been advanced
    /// onto a node.
    pub fn remove_current(&mut self, doc: &mut Document) -> Result<NodeId, TreeError> {
        self.check(doc)?;
        let cur = self.current.ok_or(TreeError::NoCurrentNode)?;
        self.current = doc.node(cur).prev_sibling;
        doc.remove_child(self.root, cur)?;
        self.revision = doc.node(self.root).revision;
        Ok(cur)
    }

    /// Destroys the node the cursor currently points at (recursive
    /// teardown). The cursor steps back to the preceding sibling and
    /// re-captures the revision.
    ///
    /// # Errors
    ///
    /// Same conditions as [`NodeIter::remove_current`].
    pub fn destroy_current(&mut self, doc: &mut Document) -> Result<(), TreeError> {
        self.check(doc)?;
        let cur = self.current.ok_or(TreeError::NoCurrentNode)?;
        self.current = doc.node(cur).prev_sibling;
        doc.destroy(cur);
        self.revision = doc.node(self.root).revision;
        Ok(())
    }
}
