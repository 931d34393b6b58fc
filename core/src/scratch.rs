//! Per-run side-tables keyed by vertex handle.
//!
//! Algorithms keep their per-vertex state here instead of on the vertices:
//! discovery flags for traversals, distance records for shortest paths,
//! leaders for union-find. A table lives as long as the caller keeps it.

use crate::graph::{EdgeLength, Graph, VertexHandle, VertexId};

/// Discovery flags for one or more chained traversals.
///
/// Passing the same table to several calls lets later calls observe which
/// vertices earlier calls already reached. Starting an unrelated algorithm
/// with a table that was not cleared produces wrong results; that is the
/// caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    flags: Vec<bool>,
    count: usize,
}

impl Discovered {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table covering every handle `graph` has issued so far.
    pub fn for_graph<I: VertexId, D, L: EdgeLength>(graph: &Graph<I, D, L>) -> Self {
        Self {
            flags: vec![false; graph.vertex_slots()],
            count: 0,
        }
    }

    pub fn contains(&self, vertex: VertexHandle) -> bool {
        self.flags.get(vertex.index()).copied().unwrap_or(false)
    }

    /// Mark `vertex` discovered. Returns false if it already was.
    pub fn insert(&mut self, vertex: VertexHandle) -> bool {
        let idx = vertex.index();
        if idx >= self.flags.len() {
            self.flags.resize(idx + 1, false);
        }
        if self.flags[idx] {
            return false;
        }
        self.flags[idx] = true;
        self.count += 1;
        true
    }

    /// Number of vertices currently marked.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reset every flag to false, keeping the allocation.
    pub fn clear(&mut self) {
        self.flags.iter_mut().for_each(|f| *f = false);
        self.count = 0;
    }
}

/// Optional per-vertex record, one slot per vertex handle.
#[derive(Debug, Clone)]
pub struct VertexMap<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> VertexMap<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(slots: usize) -> Self {
        let mut map = Self {
            slots: Vec::with_capacity(slots),
            len: 0,
        };
        map.slots.resize_with(slots, || None);
        map
    }

    pub fn get(&self, vertex: VertexHandle) -> Option<&T> {
        self.slots.get(vertex.index()).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, vertex: VertexHandle) -> Option<&mut T> {
        self.slots.get_mut(vertex.index()).and_then(|s| s.as_mut())
    }

    pub fn contains(&self, vertex: VertexHandle) -> bool {
        self.get(vertex).is_some()
    }

    /// Store `value` for `vertex`, returning the previous record.
    pub fn insert(&mut self, vertex: VertexHandle, value: T) -> Option<T> {
        let idx = vertex.index();
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        let previous = self.slots[idx].replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    pub fn remove(&mut self, vertex: VertexHandle) -> Option<T> {
        let previous = self.slots.get_mut(vertex.index()).and_then(|s| s.take());
        if previous.is_some() {
            self.len -= 1;
        }
        previous
    }

    /// Number of vertices holding a record.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.len = 0;
    }

    /// `(handle, record)` pairs in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.as_ref().map(|value| (VertexHandle::from_index(i), value))
        })
    }
}

impl<T> Default for VertexMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
