//! Handles to tasks and resources of a frame graph.

use std::sync::atomic::{AtomicU32, Ordering};

/// Allocate an id for a new frame graph instance.
pub(crate) fn next_graph_id() -> u32 {
    static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(0);
    NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a resource in a frame graph.
///
/// `ResourceHandle` is `Copy` and cheap to pass around. It is only valid within
/// the frame graph that created it, and only until that graph is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    graph: u32,
    epoch: u32,
    index: u32,
}

impl ResourceHandle {
    pub(crate) fn new(graph: u32, epoch: u32, index: u32) -> Self {
        Self {
            graph,
            epoch,
            index,
        }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn graph(self) -> u32 {
        self.graph
    }

    pub(crate) fn epoch(self) -> u32 {
        self.epoch
    }
}

/// Handle to a task in a frame graph.
///
/// Same validity rules as [`ResourceHandle`]. Handles of one frame compare in
/// task insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle {
    graph: u32,
    epoch: u32,
    index: u32,
}

impl TaskHandle {
    pub(crate) fn new(graph: u32, epoch: u32, index: u32) -> Self {
        Self {
            graph,
            epoch,
            index,
        }
    }

    /// Position of the task in insertion order.
    pub fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn graph(self) -> u32 {
        self.graph
    }

    pub(crate) fn epoch(self) -> u32 {
        self.epoch
    }
}
