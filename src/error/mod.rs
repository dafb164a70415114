//! Error types for tree mutation and parsing.
//!
//! Two error families cover the crate: [`TreeError`] for structural
//! precondition violations on the node tree (and invalidated iterators), and
//! [`ParseError`] for failures while building a document from markup.
//!
//! Every error is reported synchronously to the immediate caller. There is no
//! silent recovery and no partial output: a failed parse produces no
//! document, and a rejected mutation leaves the tree untouched.

use crate::tree::NodeId;

/// An error raised by a structural mutation or an iterator on the node tree.
///
/// Each variant names the exact precondition that failed, so call sites and
/// tests can assert on it directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The node is already linked to a parent; it must be removed from that
    /// parent before it can be inserted elsewhere.
    #[error("node {child:?} already has a parent; remove it from its current parent first")]
    AlreadyParented {
        /// The node that was offered for insertion.
        child: NodeId,
    },

    /// A node cannot be inserted as a child of itself.
    #[error("a node cannot be made a child of itself")]
    SelfParent,

    /// The stated child is not actually a child of the stated parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The node that was expected to be a child.
        child: NodeId,
        /// The node that was expected to be its parent.
        parent: NodeId,
    },

    /// The reference sibling passed to a relative insertion is the same node
    /// as the child being inserted.
    #[error("the child and the reference sibling are the same node")]
    ChildIsSibling,

    /// The node is currently being torn down and cannot be adopted or
    /// mutated until destruction completes.
    #[error("node {node:?} is being destroyed and cannot be used")]
    InDestruction {
        /// The node that is mid-destruction.
        node: NodeId,
    },

    /// The node has already been destroyed.
    #[error("node {node:?} has been destroyed")]
    Destroyed {
        /// The destroyed node.
        node: NodeId,
    },

    /// A cursor was used after the children of its root changed through
    /// another path. The cursor captures the root's revision when it is
    /// created; any out-of-band structural mutation bumps that revision and
    /// invalidates the cursor.
    #[error("iterator invalidated: the root's children changed since the iterator was created")]
    IteratorInvalidated,

    /// `remove_current`/`destroy_current` was called before the cursor was
    /// advanced onto a node, or after it was exhausted.
    #[error("the iterator does not currently point at a node")]
    NoCurrentNode,
}

/// The error type returned when building a document from markup fails.
///
/// A parse failure discards all partial output; re-running the parse from the
/// start of the input is the only retry mechanism, and it belongs to the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A closing tag was seen with no matching open element on the pending
    /// stack, e.g. `</a>` in `<b></a>`.
    #[error("mismatched closing tag </{tag}>")]
    MismatchedTag {
        /// The (lowercased) tag name of the unmatched closing tag.
        tag: String,
    },

    /// The tokenizer could not scan the raw markup.
    #[error("tokenizer error at byte {offset}: {message}")]
    Tokenizer {
        /// Description of the failure.
        message: String,
        /// Byte offset into the input where scanning failed.
        offset: usize,
    },
}
