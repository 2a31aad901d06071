//! Live node snapshot with its round-robin cursor.
//!
//! A `LiveSet` is never mutated except for its cursor. A refresh builds a
//! fresh set and swaps it in whole, so a reader holding a snapshot always
//! pairs the cursor with the list it was created for.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::nodes::endpoint::Node;

/// Ordered, non-empty list of live nodes plus the index of the next one to hand out.
#[derive(Debug)]
pub struct LiveSet {
    nodes: Vec<Node>,
    /// Always `< nodes.len()`.
    cursor: AtomicUsize,
}

#[allow(clippy::len_without_is_empty)]
impl LiveSet {
    /// Build a set positioned at its first node. Returns `None` for an empty list.
    pub fn new(nodes: Vec<Node>) -> Option<Self> {
        if nodes.is_empty() {
            return None;
        }
        Some(Self {
            nodes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Return the node at the cursor and advance the cursor, wrapping at the end.
    pub fn next(&self) -> &Node {
        let len = self.nodes.len();
        let index = match self
            .cursor
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| Some((c + 1) % len))
        {
            Ok(prev) | Err(prev) => prev,
        };
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether this set holds exactly `nodes`, in order.
    pub fn same_nodes(&self, nodes: &[Node]) -> bool {
        self.nodes == nodes
    }
}
