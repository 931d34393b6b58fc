use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use num_traits::CheckedAdd;

use crate::error::{GraphError, Result};

/// Identity of a vertex. Any small copyable, hashable key qualifies.
pub trait VertexId: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> VertexId for T {}

/// Length (weight) of an edge. `Default` is the zero length. Sums of lengths
/// go through `checked_add`, so a total past the type's maximum is detected
/// instead of wrapping.
pub trait EdgeLength: Copy + Ord + CheckedAdd + Default + Debug {}

impl<T: Copy + Ord + CheckedAdd + Default + Debug> EdgeLength for T {}

/// Stable arena index of a vertex. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(usize);

impl VertexHandle {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(index: usize) -> Self {
        VertexHandle(index)
    }
}

/// Stable arena index of an edge. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(usize);

impl EdgeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Direction an edge was followed relative to the vertex it was reached from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Edge stored as from→to, traversed from→to.
    Outgoing,
    /// Edge stored as from→to, traversed to→from.
    Incoming,
}

/// Which adjacency lists a traversal follows.
///
/// `Outgoing` is the directed view of the graph, `Both` the undirected view
/// and `Incoming` the transposed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalDirection {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

/// A vertex owned by a [`Graph`].
///
/// Adjacency is kept as lists of incident edge handles; the edges themselves
/// are owned by the graph.
#[derive(Debug, Clone)]
pub struct Vertex<I, D> {
    handle: VertexHandle,
    id: I,
    data: D,
    outgoing: Vec<EdgeHandle>,
    incoming: Vec<EdgeHandle>,
}

impl<I: VertexId, D> Vertex<I, D> {
    pub fn handle(&self) -> VertexHandle {
        self.handle
    }

    pub fn id(&self) -> I {
        self.id
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub fn outgoing_edges(&self) -> &[EdgeHandle] {
        &self.outgoing
    }

    pub fn incoming_edges(&self) -> &[EdgeHandle] {
        &self.incoming
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }
}

/// A directed edge `from → to` with a length.
///
/// `from` is the head the edge leaves, `to` the tail it enters. Undirected
/// algorithms read the same edge in both directions.
#[derive(Debug, Clone)]
pub struct Edge<I, L> {
    handle: EdgeHandle,
    from: VertexHandle,
    to: VertexHandle,
    from_id: I,
    to_id: I,
    length: L,
}

impl<I: VertexId, L: EdgeLength> Edge<I, L> {
    pub fn handle(&self) -> EdgeHandle {
        self.handle
    }

    pub fn from(&self) -> I {
        self.from_id
    }

    pub fn to(&self) -> I {
        self.to_id
    }

    pub fn from_handle(&self) -> VertexHandle {
        self.from
    }

    pub fn to_handle(&self) -> VertexHandle {
        self.to
    }

    pub fn length(&self) -> L {
        self.length
    }

    /// The endpoint opposite `vertex`. For a self-loop this is `vertex` itself.
    pub fn opposite(&self, vertex: VertexHandle) -> VertexHandle {
        if self.from == vertex {
            self.to
        } else {
            self.from
        }
    }
}

/// In-memory graph: arena of vertices and edges plus an id index.
///
/// Vertices and edges are stored in slot vectors indexed by their handles.
/// Removing a vertex empties its slot and the slots of every incident edge;
/// slots are never reused, so stale handles resolve to `None`.
///
/// The graph must not be mutated while an algorithm holds it. Every algorithm
/// borrows it immutably, so the compiler enforces this.
pub struct Graph<I = u64, D = (), L = u64> {
    vertices: Vec<Option<Vertex<I, D>>>,
    edges: Vec<Option<Edge<I, L>>>,
    index: HashMap<I, VertexHandle>,
    edge_count: usize,
}

impl<I: VertexId, D, L: EdgeLength> Graph<I, D, L> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            index: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(vertex_count: usize, edge_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            edges: Vec::with_capacity(edge_count),
            index: HashMap::with_capacity(vertex_count),
            edge_count: 0,
        }
    }

    /// Insert a vertex. Fails with `DuplicateId` if `id` is already present.
    pub fn add_vertex(&mut self, id: I, data: D) -> Result<VertexHandle> {
        if self.index.contains_key(&id) {
            return Err(GraphError::duplicate_id(&id));
        }
        let handle = VertexHandle(self.vertices.len());
        self.vertices.push(Some(Vertex {
            handle,
            id,
            data,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }));
        self.index.insert(id, handle);
        Ok(handle)
    }

    /// Add a directed edge `from → to`. Registers the edge in `from`'s
    /// outgoing list and `to`'s incoming list.
    pub fn add_edge(&mut self, from: I, to: I, length: L) -> Result<EdgeHandle> {
        let from_handle = self.handle_of(from)?;
        let to_handle = self.handle_of(to)?;
        let handle = EdgeHandle(self.edges.len());

        self.slot_mut(from_handle)?.outgoing.push(handle);
        self.slot_mut(to_handle)?.incoming.push(handle);
        self.edges.push(Some(Edge {
            handle,
            from: from_handle,
            to: to_handle,
            from_id: from,
            to_id: to,
            length,
        }));
        self.edge_count += 1;
        Ok(handle)
    }

    /// Bulk load from `(from, to, length)` triples, creating missing endpoints
    /// with a default payload.
    pub fn load_edges<T>(&mut self, edges: T) -> Result<()>
    where
        T: IntoIterator<Item = (I, I, L)>,
        D: Default,
    {
        for (from, to, length) in edges {
            // Ensure both vertices exist
            for id in [from, to] {
                if !self.contains(id) {
                    self.add_vertex(id, D::default())?;
                }
            }
            self.add_edge(from, to, length)?;
        }
        Ok(())
    }

    /// Remove a vertex and every edge incident to it, detaching those edges
    /// from the neighbors' adjacency lists. Returns the number of edges removed.
    pub fn remove_vertex(&mut self, id: I) -> Result<usize> {
        let handle = self.index.remove(&id).ok_or_else(|| GraphError::not_found(&id))?;
        let vertex = self.vertices[handle.0]
            .take()
            .ok_or_else(|| GraphError::not_found(&id))?;

        let mut removed = 0;
        for edge_handle in vertex.outgoing.iter().chain(vertex.incoming.iter()) {
            // A self-loop is listed twice; the second take() finds an empty slot
            let Some(edge) = self.edges[edge_handle.0].take() else {
                continue;
            };
            if edge.to != handle {
                if let Some(Some(neighbor)) = self.vertices.get_mut(edge.to.0) {
                    neighbor.incoming.retain(|e| e != edge_handle);
                }
            }
            if edge.from != handle {
                if let Some(Some(neighbor)) = self.vertices.get_mut(edge.from.0) {
                    neighbor.outgoing.retain(|e| e != edge_handle);
                }
            }
            removed += 1;
        }

        self.edge_count -= removed;
        log::trace!("removed vertex {:?} with {} incident edges", id, removed);
        Ok(removed)
    }

    pub fn contains(&self, id: I) -> bool {
        self.index.contains_key(&id)
    }

    /// Resolve a vertex id to its handle.
    pub fn handle_of(&self, id: I) -> Result<VertexHandle> {
        self.index
            .get(&id)
            .copied()
            .ok_or_else(|| GraphError::not_found(&id))
    }

    pub fn get_vertex_by_id(&self, id: I) -> Result<&Vertex<I, D>> {
        let handle = self.handle_of(id)?;
        self.vertex(handle).ok_or_else(|| GraphError::not_found(&id))
    }

    pub fn vertex_mut(&mut self, id: I) -> Result<&mut Vertex<I, D>> {
        let handle = self.handle_of(id)?;
        self.slot_mut(handle)
    }

    /// Look up a vertex by handle. `None` if it was removed.
    pub fn vertex(&self, handle: VertexHandle) -> Option<&Vertex<I, D>> {
        self.vertices.get(handle.0).and_then(|slot| slot.as_ref())
    }

    /// Look up an edge by handle. `None` if it was removed.
    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge<I, L>> {
        self.edges.get(handle.0).and_then(|slot| slot.as_ref())
    }

    fn slot_mut(&mut self, handle: VertexHandle) -> Result<&mut Vertex<I, D>> {
        match self.vertices.get_mut(handle.0) {
            Some(Some(vertex)) => Ok(vertex),
            _ => Err(GraphError::NotFound {
                id: format!("handle {}", handle.0),
            }),
        }
    }

    /// Live vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<I, D>> {
        self.vertices.iter().filter_map(|slot| slot.as_ref())
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<I, L>> {
        self.edges.iter().filter_map(|slot| slot.as_ref())
    }

    /// Call `visitor` on each vertex in insertion order until it returns true.
    /// Returns whether any call short-circuited.
    pub fn visit_vertices<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&Vertex<I, D>) -> bool,
    {
        self.vertices().any(|v| visitor(v))
    }

    /// Mutable counterpart of [`Graph::visit_vertices`]; only payloads can be
    /// changed through the visitor.
    pub fn visit_vertices_mut<F>(&mut self, mut visitor: F) -> bool
    where
        F: FnMut(&mut Vertex<I, D>) -> bool,
    {
        self.vertices
            .iter_mut()
            .filter_map(|slot| slot.as_mut())
            .any(|v| visitor(v))
    }

    /// Call `visitor` on each edge in insertion order until it returns true.
    /// Returns whether any call short-circuited.
    pub fn visit_edges<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&Edge<I, L>) -> bool,
    {
        self.edges().any(|e| visitor(e))
    }

    /// First vertex, in insertion order, matching `predicate`.
    pub fn find_vertex<F>(&self, mut predicate: F) -> Option<&Vertex<I, D>>
    where
        F: FnMut(&Vertex<I, D>) -> bool,
    {
        self.vertices().find(|v| predicate(v))
    }

    /// Some edge stored as `from → to`, if any.
    pub fn find_directed_edge(&self, from: I, to: I) -> Option<&Edge<I, L>> {
        let from = self.get_vertex_by_id(from).ok()?;
        let to = self.handle_of(to).ok()?;
        from.outgoing
            .iter()
            .filter_map(|&e| self.edge(e))
            .find(|e| e.to == to)
    }

    /// Some edge between `a` and `b` in either direction, if any.
    pub fn find_undirected_edge(&self, a: I, b: I) -> Option<&Edge<I, L>> {
        self.find_directed_edge(a, b)
            .or_else(|| self.find_directed_edge(b, a))
    }

    /// Incident edges of `vertex` selected by `direction`, each paired with
    /// the far endpoint and the direction it was followed in.
    ///
    /// For `Both`, outgoing edges come first, then incoming. A removed
    /// `vertex` has no neighbors.
    pub fn neighbors(
        &self,
        vertex: VertexHandle,
        direction: TraversalDirection,
    ) -> impl Iterator<Item = (&Edge<I, L>, VertexHandle, Direction)> {
        let (use_out, use_inc) = match direction {
            TraversalDirection::Outgoing => (true, false),
            TraversalDirection::Incoming => (false, true),
            TraversalDirection::Both => (true, true),
        };
        let (out, inc): (&[EdgeHandle], &[EdgeHandle]) = match self.vertex(vertex) {
            Some(v) => (v.outgoing.as_slice(), v.incoming.as_slice()),
            None => (&[], &[]),
        };

        let out_iter = out
            .iter()
            .filter(move |_| use_out)
            .filter_map(move |&h| self.edge(h))
            .map(|e| (e, e.to, Direction::Outgoing));

        let in_iter = inc
            .iter()
            .filter(move |_| use_inc)
            .filter_map(move |&h| self.edge(h))
            .map(|e| (e, e.from, Direction::Incoming));

        out_iter.chain(in_iter)
    }

    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of vertex slots ever allocated, live or removed. Side-tables
    /// sized to this cover every handle the graph has issued.
    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let vertex_mem = self.vertices.capacity() * size_of::<Option<Vertex<I, D>>>();
        let edge_mem = self.edges.capacity() * size_of::<Option<Edge<I, L>>>();
        let adjacency: usize = self
            .vertices()
            .map(|v| (v.outgoing.capacity() + v.incoming.capacity()) * size_of::<EdgeHandle>())
            .sum();
        let index_mem = self.index.capacity() * (size_of::<I>() + size_of::<VertexHandle>() + 8);

        vertex_mem + edge_mem + adjacency + index_mem
    }
}

impl<I: VertexId, D, L: EdgeLength> Default for Graph<I, D, L> {
    fn default() -> Self {
        Self::new()
    }
}
