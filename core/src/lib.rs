//! graph-algo-core: In-memory directed graph store and classic algorithms.
//!
//! A pure Rust library holding vertices and weighted edges in an arena, with
//! breadth/depth-first traversal, topological sort, Kosaraju strongly
//! connected components, Dijkstra shortest paths and Prim/Kruskal minimum
//! spanning trees. No I/O and no global state.
//!
//! Algorithms borrow the graph immutably and keep their per-vertex state in
//! side-tables ([`Discovered`], [`VertexMap`]) owned by the call or the
//! caller, so several runs over one graph never interfere.

mod error;
mod graph;
mod order;
mod scratch;
mod shortest_path;
mod spanning_tree;
mod topology;
mod traversal;

pub use error::{GraphError, Result};
pub use graph::{
    Direction, Edge, EdgeHandle, EdgeLength, Graph, TraversalDirection, Vertex, VertexHandle,
    VertexId,
};
pub use order::{ByKey, Comparator, Keyed, MinHeap, NaturalOrder};
pub use scratch::{Discovered, VertexMap};
pub use shortest_path::{
    shortest_path, shortest_path_tree, PathRecord, ShortestPathOptions, ShortestPaths,
};
pub use spanning_tree::{minimum_spanning_tree_kruskal, minimum_spanning_tree_prim, SpanningTree};
pub use topology::{
    inverse_topological_search, is_topological_order, strongly_connected_components,
    topological_order, topological_sort, visit_strongly_connected_components, SortOrder,
};
pub use traversal::{bfs, breadth_first_search, depth_first_search, dfs, SearchOptions};
