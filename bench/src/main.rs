use std::collections::VecDeque;
use std::error::Error;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use graph_algo_core::{
    is_topological_order, minimum_spanning_tree_kruskal, minimum_spanning_tree_prim, shortest_path,
    shortest_path_tree, topological_sort, visit_strongly_connected_components, Discovered, Graph,
    GraphError, SearchOptions, ShortestPathOptions, SortOrder, TraversalDirection,
};
use serde::Serialize;

type Generator = fn(u64, &mut FastRng) -> graph_algo_core::Result<Graph>;

#[derive(Parser, Debug)]
#[command(name = "graph-algo-bench", version, about = "Time graph-algo-core algorithms on synthetic graphs")]
struct Args {
    /// Which generator to benchmark
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Target vertex count per generated graph
    #[arg(short, long, default_value_t = 100_000, value_parser = clap::value_parser!(u64).range(20..))]
    nodes: u64,

    /// Offset added to every generator's fixed seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Log filter, e.g. "info" or "graph_algo_core=debug"
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print one JSON report per generator instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Run all generators and benchmark each
    All,
    /// Fractal branching tree (deep paths)
    Lsystem,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Two dense cliques connected by a thin bridge
    Barbell,
    /// Diffusion-limited aggregation (organic branching)
    Dla,
}

impl Mode {
    fn generators(self) -> Vec<(&'static str, u64, Generator)> {
        let all: [(Mode, &'static str, u64, Generator); 6] = [
            (Mode::Lsystem, "L-system tree", 42, gen_lsystem),
            (Mode::Scalefree, "Scale-free (edge sampling)", 12345, gen_scale_free),
            (Mode::Smallworld, "Small-world (Watts-Strogatz)", 67890, gen_small_world),
            (Mode::Random, "Erdos-Renyi random", 54321, gen_random),
            (Mode::Barbell, "Barbell (clique-bridge-clique)", 99999, gen_barbell),
            (Mode::Dla, "DLA (organic branching)", 77777, gen_dla),
        ];
        all.into_iter()
            .filter(|(mode, ..)| self == Mode::All || *mode == self)
            .map(|(_, name, seed, generator)| (name, seed, generator))
            .collect()
    }
}

#[derive(Serialize, Debug)]
struct Report {
    generator: &'static str,
    vertices: usize,
    edges: usize,
    memory_mb: f64,
    generate_ms: f64,
    runs: Vec<Run>,
}

#[derive(Serialize, Debug)]
struct Run {
    algorithm: &'static str,
    ms: f64,
    outcome: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _logger = flexi_logger::Logger::try_with_str(&args.log_level)?.start()?;

    if !args.json {
        println!("graph-algo-bench");
        println!("================");
        println!();
    }

    for (name, base_seed, generator) in args.mode.generators() {
        let mut rng = FastRng::new(base_seed.wrapping_add(args.seed));
        let report = run_benchmark(name, generator, args.nodes, &mut rng)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
    }

    Ok(())
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let t = Instant::now();
    let value = f();
    (value, t.elapsed().as_secs_f64() * 1000.0)
}

fn describe<T: std::fmt::Display>(result: &graph_algo_core::Result<T>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(GraphError::Unreachable { .. }) => "unreachable".into(),
        Err(GraphError::DisconnectedGraph { accepted, required }) => {
            format!("disconnected ({}/{} edges)", accepted, required)
        }
        Err(e) => e.to_string(),
    }
}

fn run_benchmark(
    name: &'static str,
    generator: Generator,
    node_count: u64,
    rng: &mut FastRng,
) -> Result<Report, Box<dyn Error>> {
    log::info!("generating {} with {} target vertices", name, node_count);
    let (graph, generate_ms) = timed(|| generator(node_count, rng));
    let graph = graph?;
    log::info!(
        "generated {} vertices, {} edges in {:.1}ms",
        graph.vertex_count(),
        graph.edge_count(),
        generate_ms
    );

    let far = graph.vertex_count() as u64 - 1;
    let mut runs = Vec::new();
    let mut discovered = Discovered::for_graph(&graph);

    let (bfs, ms) = timed(|| {
        graph_algo_core::breadth_first_search(
            &graph,
            0,
            TraversalDirection::Both,
            &mut discovered,
            SearchOptions::default(),
            |_| {},
        )
    });
    runs.push(Run { algorithm: "bfs (undirected)", ms, outcome: describe(&bfs) });

    let (dfs, ms) = timed(|| {
        graph_algo_core::depth_first_search(
            &graph,
            0,
            TraversalDirection::Outgoing,
            &mut discovered,
            SearchOptions::default(),
            |_| {},
        )
    });
    runs.push(Run { algorithm: "dfs (directed)", ms, outcome: describe(&dfs) });

    let ((sorted, order), ms) = timed(|| {
        let mut order = Vec::with_capacity(graph.vertex_count());
        let sorted = topological_sort(&graph, SortOrder::Forward, |v| order.push(v.id()));
        (sorted, order)
    });
    let acyclic = is_topological_order(&graph, &order);
    runs.push(Run {
        algorithm: "topological sort",
        ms,
        outcome: format!("{} vertices, {}", sorted, if acyclic { "valid order" } else { "graph has cycles" }),
    });

    let (components, ms) = timed(|| visit_strongly_connected_components(&graph, |_, _| {}));
    runs.push(Run { algorithm: "kosaraju scc", ms, outcome: format!("{} components", components) });

    let (path, ms) = timed(|| {
        let mut hops = 0usize;
        shortest_path(
            &graph,
            0,
            far,
            TraversalDirection::Outgoing,
            ShortestPathOptions::default(),
            |_, _| hops += 1,
        )
        .map(|length| format!("length {} over {} hops", length, hops.saturating_sub(1)))
    });
    runs.push(Run { algorithm: "dijkstra 0 → last", ms, outcome: describe(&path) });

    let (tree, ms) = timed(|| shortest_path_tree(&graph, 0, TraversalDirection::Both).map(|t| t.reached()));
    runs.push(Run { algorithm: "dijkstra tree (undirected)", ms, outcome: describe(&tree) });

    let (prim, ms) = timed(|| minimum_spanning_tree_prim(&graph, |_| {}).map(|t| t.total_length));
    runs.push(Run { algorithm: "prim mst", ms, outcome: describe(&prim) });

    let (kruskal, ms) = timed(|| minimum_spanning_tree_kruskal(&graph, |_| {}).map(|t| t.total_length));
    runs.push(Run { algorithm: "kruskal mst", ms, outcome: describe(&kruskal) });

    if let (Ok(p), Ok(k)) = (&prim, &kruskal) {
        if p != k {
            log::warn!("{}: prim total {} differs from kruskal total {}", name, p, k);
        }
    }

    Ok(Report {
        generator: name,
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        memory_mb: graph.memory_usage() as f64 / 1_048_576.0,
        generate_ms,
        runs,
    })
}

fn print_report(report: &Report) {
    println!("--- {} ---", report.generator);
    println!(
        "Generated in {:.2}s: {} vertices, {} edges, ~{:.0}MB",
        report.generate_ms / 1000.0,
        report.vertices,
        report.edges,
        report.memory_mb
    );
    println!();
    println!("{:<28} {:>10}  {}", "algorithm", "time", "outcome");
    println!("{:-<28} {:->10}  {:-<30}", "", "", "");
    for run in &report.runs {
        println!("{:<28} {:>8.1}ms  {}", run.algorithm, run.ms, run.outcome);
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n + edges), single-threaded, deterministic for a given seed
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Edge length in 1..=100.
    fn length(&mut self) -> u64 {
        self.next(100) + 1
    }
}

fn add_vertices(graph: &mut Graph, ids: std::ops::Range<u64>) -> graph_algo_core::Result<()> {
    for id in ids {
        graph.add_vertex(id, ())?;
    }
    Ok(())
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each vertex spawns three children. Produces log-depth paths with
/// exponential width; acyclic, so the topological sort is valid.
fn gen_lsystem(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    let mut graph = Graph::with_capacity(node_count as usize, node_count as usize);

    let branching = 3u64;
    graph.add_vertex(0, ())?;

    let mut next_id: u64 = 1;
    let mut frontier: Vec<u64> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = next_id;
                next_id += 1;
                graph.add_vertex(child, ())?;
                graph.add_edge(parent, child, rng.length())?;
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    Ok(graph)
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random existing edge and connecting
/// to one of its endpoints. Vertices with more edges are picked more often.
fn gen_scale_free(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    let edges_per_node = 10u64;
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * edges_per_node) as usize);

    let mut edge_endpoints: Vec<u64> = Vec::with_capacity((node_count * edges_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u64;
    add_vertices(&mut graph, 0..seed)?;
    for i in 0..seed {
        for j in (i + 1)..seed {
            graph.add_edge(i, j, rng.length())?;
            edge_endpoints.push(i);
            edge_endpoints.push(j);
        }
    }

    for new_node in seed..node_count {
        graph.add_vertex(new_node, ())?;

        let attach = edges_per_node.min(new_node);
        for _ in 0..attach {
            let idx = rng.next(edge_endpoints.len() as u64) as usize;
            let target = edge_endpoints[idx];
            if target != new_node {
                graph.add_edge(new_node, target, rng.length())?;
                edge_endpoints.push(new_node);
                edge_endpoints.push(target);
            }
        }
    }

    Ok(graph)
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each vertex links to its K successors on a ring, each link rewired to a
/// random vertex with probability p.
fn gen_small_world(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    let k = 10u64;
    let p = 0.05f64;
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * k) as usize);

    add_vertices(&mut graph, 0..node_count)?;

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            let length = rng.length();

            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            graph.add_edge(i, target, length)?;
        }
    }

    Ok(graph)
}

/// Erdos-Renyi: uniform random edges, about ten per vertex. May leave
/// vertices isolated, so spanning trees usually fail here.
fn gen_random(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    let target_edges = node_count * 10;
    let mut graph = Graph::with_capacity(node_count as usize, target_edges as usize);

    add_vertices(&mut graph, 0..node_count)?;

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            graph.add_edge(from, to, rng.length())?;
        }
    }

    Ok(graph)
}

/// Barbell: two dense cliques connected by a single thin bridge.
///
/// Worst case for paths through a bottleneck. Each clique has about n/2
/// vertices with ~20 random links each; a chain of ten (or eleven) bridge vertices
/// joins them.
fn gen_barbell(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    // An odd remainder goes to the bridge so the total hits node_count
    let clique_size = (node_count - 10) / 2;
    let bridge_len = node_count - 2 * clique_size;
    let links = 20u64.min(clique_size - 1);
    let mut graph = Graph::with_capacity(node_count as usize, (clique_size * 40 + bridge_len) as usize);

    add_vertices(&mut graph, 0..clique_size)?;
    for i in 0..clique_size {
        for _ in 0..links {
            let target = rng.next(clique_size);
            if target != i {
                graph.add_edge(i, target, rng.length())?;
            }
        }
    }

    // Bridge: chain from the last vertex of A
    let bridge_start = clique_size;
    add_vertices(&mut graph, bridge_start..bridge_start + bridge_len)?;
    graph.add_edge(clique_size - 1, bridge_start, rng.length())?;
    for id in bridge_start + 1..bridge_start + bridge_len {
        graph.add_edge(id - 1, id, rng.length())?;
    }

    let b_start = bridge_start + bridge_len;
    add_vertices(&mut graph, b_start..b_start + clique_size)?;
    graph.add_edge(b_start - 1, b_start, rng.length())?;

    for i in 0..clique_size {
        for _ in 0..links {
            let target = rng.next(clique_size);
            if target != i {
                graph.add_edge(b_start + i, b_start + target, rng.length())?;
            }
        }
    }

    Ok(graph)
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new vertex attaches to a random vertex on the recent "surface",
/// with an occasional second link that creates loops.
fn gen_dla(node_count: u64, rng: &mut FastRng) -> graph_algo_core::Result<Graph> {
    let mut graph = Graph::with_capacity(node_count as usize, (node_count * 2) as usize);

    graph.add_vertex(0, ())?;

    // Recent additions new particles attach to; oldest evicted first
    let surface_max = 10000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        graph.add_vertex(new_node, ())?;

        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        graph.add_edge(new_node, attach_to, rng.length())?;

        // 10% chance of a second connection
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            if other != attach_to {
                graph.add_edge(new_node, other, rng.length())?;
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    Ok(graph)
}
