//! Plain-text comparison of A* against BFS.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use rayon::prelude::*;

use crate::levels::Level;
use crate::solve::{self, Algorithm, Outcome};
use crate::{Action, Game};

/// Both strategies run on the same game.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub name: String,
    pub astar: Outcome,
    pub bfs: Outcome,
}

impl Comparison {
    pub fn run(name: impl Into<String>, game: &Game, mut on_step: impl FnMut()) -> Self {
        let astar = solve::astar(game, &mut on_step);
        let bfs = solve::bfs(game, &mut on_step);
        Self {
            name: name.into(),
            astar,
            bfs,
        }
    }
}

/// Compare both strategies on each level, in order.
///
/// With `parallel`, levels run concurrently and compete for the CPU, so the
/// recorded times are only comparable within one level.
pub fn compare_levels(
    levels: &[Level],
    parallel: bool,
    on_step: impl Fn() + Sync,
) -> Result<Vec<Comparison>> {
    let compare = |level: &Level| -> Result<Comparison> {
        let game = level.game()?;
        Ok(Comparison::run(level.name, &game, &on_step))
    };
    if parallel {
        levels.par_iter().map(compare).collect()
    } else {
        levels.iter().map(compare).collect()
    }
}

/// Percentage by which `astar` undercuts `bfs`. Negative if it does worse.
pub fn reduction(astar: f64, bfs: f64) -> Option<f64> {
    (bfs > 0.0).then(|| (bfs - astar) / bfs * 100.0)
}

/// One line of statistics for a single run.
pub struct Stats<'a>(pub Algorithm, pub &'a Outcome);

impl fmt::Display for Stats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Stats(algo, outcome) = self;
        let algo = format!("{algo}:");
        write!(
            f,
            "{algo:<4} {:>6} nodes, {:>8.2}ms, peak frontier {:>5}, ",
            outcome.nodes_explored,
            outcome.elapsed_ms(),
            outcome.frontier_high_water,
        )?;
        if outcome.success {
            write!(f, "{} steps", outcome.path_cost)
        } else {
            "no solution".fmt(f)
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.name)?;
        writeln!(f, "{}", Stats(Algorithm::AStar, &self.astar))?;
        writeln!(f, "{}", Stats(Algorithm::Bfs, &self.bfs))?;
        if self.astar.success && self.bfs.success {
            Analysis {
                astar_nodes: self.astar.nodes_explored,
                bfs_nodes: self.bfs.nodes_explored,
                astar_time: self.astar.elapsed,
                bfs_time: self.bfs.elapsed,
            }
            .fmt(f)?;
        }
        Ok(())
    }
}

struct Analysis {
    astar_nodes: usize,
    bfs_nodes: usize,
    astar_time: Duration,
    bfs_time: Duration,
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(pct) = reduction(self.astar_nodes as f64, self.bfs_nodes as f64) {
            writeln!(f, "A* explored {pct:.1}% fewer nodes than BFS")?;
        }
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        if let Some(pct) = reduction(ms(self.astar_time), ms(self.bfs_time)) {
            writeln!(f, "A* took {pct:.1}% less time than BFS")?;
        }
        Ok(())
    }
}

/// Totals over several comparisons.
pub struct Totals<'a>(pub &'a [Comparison]);

impl fmt::Display for Totals<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (astar_nodes, astar_time) = sum(self.0.iter().map(|c| &c.astar));
        let (bfs_nodes, bfs_time) = sum(self.0.iter().map(|c| &c.bfs));

        writeln!(f, "=== Totals over {} levels ===", self.0.len())?;
        writeln!(
            f,
            "A*:  {astar_nodes:>6} nodes, {:>8.2}ms",
            astar_time.as_secs_f64() * 1000.0
        )?;
        writeln!(
            f,
            "BFS: {bfs_nodes:>6} nodes, {:>8.2}ms",
            bfs_time.as_secs_f64() * 1000.0
        )?;
        Analysis {
            astar_nodes,
            bfs_nodes,
            astar_time,
            bfs_time,
        }
        .fmt(f)
    }
}

fn sum<'a>(outcomes: impl Iterator<Item = &'a Outcome>) -> (usize, Duration) {
    outcomes.fold((0, Duration::ZERO), |(nodes, time), o| {
        (nodes + o.nodes_explored, time + o.elapsed)
    })
}

/// Numbered listing of a solution path.
pub struct Solution<'a>(pub &'a [Action]);

impl fmt::Display for Solution<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "The robot is already at the goal.");
        }
        writeln!(f, "Solution:")?;
        for (action, i) in self.0.iter().zip(1..) {
            writeln!(f, "  {i}. {action}")?;
        }
        Ok(())
    }
}
