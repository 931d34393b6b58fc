use std::collections::VecDeque;

use crate::error::Result;
use crate::graph::{EdgeLength, Graph, TraversalDirection, Vertex, VertexHandle, VertexId};
use crate::scratch::Discovered;

/// Options shared by every traversal-family algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Reset the discovery table before returning. Turn off to chain several
    /// calls that must see each other's discoveries.
    pub clear_discovered: bool,
}

impl SearchOptions {
    /// Keep discovery flags after the call.
    pub fn chained() -> Self {
        Self {
            clear_discovered: false,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            clear_discovered: true,
        }
    }
}

/// Frontier discipline: the only difference between BFS and DFS.
trait Frontier {
    fn put(&mut self, vertex: VertexHandle);
    fn take(&mut self) -> Option<VertexHandle>;
}

/// FIFO frontier.
impl Frontier for VecDeque<VertexHandle> {
    fn put(&mut self, vertex: VertexHandle) {
        self.push_back(vertex);
    }

    fn take(&mut self) -> Option<VertexHandle> {
        self.pop_front()
    }
}

/// LIFO frontier.
impl Frontier for Vec<VertexHandle> {
    fn put(&mut self, vertex: VertexHandle) {
        self.push(vertex);
    }

    fn take(&mut self) -> Option<VertexHandle> {
        self.pop()
    }
}

/// Shared traversal loop.
///
/// Marks the root discovered and seeds the frontier with it, then repeatedly
/// takes a vertex, visits it and puts every undiscovered neighbor (marking it
/// on the way in). Each vertex is visited at most once per discovery table.
fn search<I, D, L, Q, F>(
    graph: &Graph<I, D, L>,
    root: VertexHandle,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    mut frontier: Q,
    mut visit: F,
) -> usize
where
    I: VertexId,
    L: EdgeLength,
    Q: Frontier,
    F: FnMut(&Vertex<I, D>),
{
    let mut visited = 0;

    if discovered.insert(root) {
        frontier.put(root);
    }

    while let Some(current) = frontier.take() {
        let Some(vertex) = graph.vertex(current) else {
            continue;
        };
        visit(vertex);
        visited += 1;

        for (_, neighbor, _) in graph.neighbors(current, direction) {
            if discovered.insert(neighbor) {
                frontier.put(neighbor);
            }
        }
    }

    visited
}

/// Depth-first pass from an already resolved root, leaving `discovered`
/// as it finds it plus whatever this pass reached.
pub(crate) fn depth_first_from<I, D, L, F>(
    graph: &Graph<I, D, L>,
    root: VertexHandle,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    visit: F,
) -> usize
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    search(graph, root, direction, discovered, Vec::new(), visit)
}

/// Breadth-first search from `root`, calling `visit` once per reached vertex.
///
/// `direction` selects the view: `Outgoing` for a directed graph, `Both` for
/// an undirected one. If `root` is already marked in `discovered` nothing is
/// visited. Returns the number of vertices visited.
pub fn breadth_first_search<I, D, L, F>(
    graph: &Graph<I, D, L>,
    root: I,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    options: SearchOptions,
    visit: F,
) -> Result<usize>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    let handle = graph.handle_of(root)?;
    let frontier: VecDeque<VertexHandle> = VecDeque::new();
    let visited = search(graph, handle, direction, discovered, frontier, visit);
    if options.clear_discovered {
        discovered.clear();
    }
    log::debug!("bfs from {:?} ({:?}) visited {} vertices", root, direction, visited);
    Ok(visited)
}

/// Depth-first search from `root`, calling `visit` once per reached vertex.
///
/// Iterative with an explicit stack, so stack use does not grow with graph
/// depth. Same conventions as [`breadth_first_search`].
pub fn depth_first_search<I, D, L, F>(
    graph: &Graph<I, D, L>,
    root: I,
    direction: TraversalDirection,
    discovered: &mut Discovered,
    options: SearchOptions,
    visit: F,
) -> Result<usize>
where
    I: VertexId,
    L: EdgeLength,
    F: FnMut(&Vertex<I, D>),
{
    let handle = graph.handle_of(root)?;
    let visited = depth_first_from(graph, handle, direction, discovered, visit);
    if options.clear_discovered {
        discovered.clear();
    }
    log::debug!("dfs from {:?} ({:?}) visited {} vertices", root, direction, visited);
    Ok(visited)
}

/// BFS with a fresh discovery table. Returns visited ids in visit order.
pub fn bfs<I, D, L>(graph: &Graph<I, D, L>, root: I, direction: TraversalDirection) -> Result<Vec<I>>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut order = Vec::new();
    let mut discovered = Discovered::for_graph(graph);
    breadth_first_search(
        graph,
        root,
        direction,
        &mut discovered,
        SearchOptions::default(),
        |v| order.push(v.id()),
    )?;
    Ok(order)
}

/// DFS with a fresh discovery table. Returns visited ids in visit order.
pub fn dfs<I, D, L>(graph: &Graph<I, D, L>, root: I, direction: TraversalDirection) -> Result<Vec<I>>
where
    I: VertexId,
    L: EdgeLength,
{
    let mut order = Vec::new();
    let mut discovered = Discovered::for_graph(graph);
    depth_first_search(
        graph,
        root,
        direction,
        &mut discovered,
        SearchOptions::default(),
        |v| order.push(v.id()),
    )?;
    Ok(order)
}
