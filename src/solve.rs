use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::{Action, Frontier, Key, Model, Node};

type IndexSet<K> = indexmap::IndexSet<K, fxhash::FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    AStar,
    Bfs,
}

impl Algorithm {
    pub const ALL: [Self; 2] = [Self::AStar, Self::Bfs];

    pub fn run<M: Model + ?Sized>(self, model: &M, on_step: impl FnMut()) -> Outcome {
        match self {
            Algorithm::AStar => astar(model, on_step),
            Algorithm::Bfs => bfs(model, on_step),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => "A*".fmt(f),
            Algorithm::Bfs => "BFS".fmt(f),
        }
    }
}

/// Result of a single search run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub success: bool,
    pub path: Vec<Action>,
    /// Distinct configurations expanded.
    pub nodes_explored: usize,
    pub elapsed: Duration,
    pub path_cost: u32,
    /// Expanded nodes in expansion order.
    pub visited: Vec<Arc<Node>>,
    pub terminal: Option<Arc<Node>>,
    /// Largest number of nodes waiting in the frontier at once.
    pub frontier_high_water: usize,
}

impl Outcome {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Bookkeeping shared by both strategies: the closed set and the visit log.
struct Explorer {
    closed: IndexSet<Key>,
    visited: Vec<Arc<Node>>,
    started: Instant,
}

impl Explorer {
    fn new() -> Self {
        Self {
            closed: IndexSet::default(),
            visited: Vec::new(),
            started: Instant::now(),
        }
    }

    fn is_closed(&self, key: &Key) -> bool {
        self.closed.contains(key)
    }

    /// Close the node's key and log it, or `None` if it was expanded before.
    fn visit(&mut self, mut node: Node) -> Option<Arc<Node>> {
        if !self.closed.insert(node.key().clone()) {
            return None;
        }
        node.set_visit_order(self.closed.len() as u32);
        let node = Arc::new(node);
        self.visited.push(node.clone());
        Some(node)
    }

    fn finish(self, terminal: Option<Arc<Node>>, frontier_high_water: usize) -> Outcome {
        let elapsed = self.started.elapsed();
        let (success, path, path_cost) = match &terminal {
            Some(node) => (true, node.path(), node.cost()),
            None => (false, Vec::new(), 0),
        };
        Outcome {
            success,
            path,
            nodes_explored: self.visited.len(),
            elapsed,
            path_cost,
            visited: self.visited,
            terminal,
            frontier_high_water,
        }
    }
}

/// Best-first search on `g + h`.
///
/// Closed configurations are never reopened, so with a heuristic that is
/// admissible but not consistent the result may in principle be suboptimal.
pub fn astar<M: Model + ?Sized>(model: &M, mut on_step: impl FnMut()) -> Outcome {
    let mut explorer = Explorer::new();
    let mut frontier = Frontier::new();

    let mut initial = model.initial();
    initial.set_heuristic(model.heuristic(&initial));
    debug!("A* started, initial estimate {}", initial.priority());
    frontier.insert(initial);

    let terminal = 'search: loop {
        #[cfg(feature = "coz")]
        coz::scope!("A* expand");

        let Ok(node) = frontier.extract_min() else { break 'search None };
        let Some(node) = explorer.visit(node) else { continue };
        on_step();

        if model.is_goal(&node) {
            break 'search Some(node);
        }

        for mut succ in model.successors(&node) {
            if explorer.is_closed(succ.key()) {
                continue;
            }
            succ.set_heuristic(model.heuristic(&succ));
            frontier.insert(succ);
        }
    };

    let outcome = explorer.finish(terminal, frontier.high_water());
    debug!(
        "A* finished: success={}, cost={}, explored={}, frontier high water={}",
        outcome.success, outcome.path_cost, outcome.nodes_explored, outcome.frontier_high_water,
    );
    outcome
}

/// Breadth-first search. Every action costs 1, so the first goal is optimal.
pub fn bfs<M: Model + ?Sized>(model: &M, mut on_step: impl FnMut()) -> Outcome {
    let mut explorer = Explorer::new();
    let mut queue = VecDeque::from([model.initial()]);
    let mut high_water = queue.len();
    debug!("BFS started");

    let terminal = 'search: loop {
        #[cfg(feature = "coz")]
        coz::scope!("BFS expand");

        let Some(node) = queue.pop_front() else { break 'search None };
        let Some(node) = explorer.visit(node) else { continue };
        on_step();

        if model.is_goal(&node) {
            break 'search Some(node);
        }

        queue.extend(
            model
                .successors(&node)
                .into_iter()
                .filter(|succ| !explorer.is_closed(succ.key())),
        );
        high_water = high_water.max(queue.len());
    };

    let outcome = explorer.finish(terminal, high_water);
    debug!(
        "BFS finished: success={}, cost={}, explored={}, frontier high water={}",
        outcome.success, outcome.path_cost, outcome.nodes_explored, outcome.frontier_high_water,
    );
    outcome
}
