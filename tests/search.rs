use std::collections::HashSet;
use std::sync::Arc;

use lightbot_solver::levels::LEVELS;
use lightbot_solver::solve::{self, Algorithm, Outcome};
use lightbot_solver::{Action, Game, Key, Model, Node, Successors};
use rayon::prelude::*;

const SMALL_BOARDS: [&str; 4] = ["R.L\n.#.\n..L", "r..\n##.\nL..", "R.L.L", "L.\nR#\n.L"];

fn game(map: &str) -> Game {
    map.parse().unwrap()
}

fn all_games() -> Vec<Game> {
    LEVELS
        .iter()
        .map(|level| level.game().unwrap())
        .chain(SMALL_BOARDS.iter().map(|map| game(map)))
        .collect()
}

fn visited_keys(outcome: &Outcome) -> Vec<Key> {
    outcome.visited.iter().map(|node| node.key().clone()).collect()
}

/// Shortest solution length by iterative deepening over raw action sequences.
fn brute_force_cost(game: &Game, max_depth: u32) -> Option<u32> {
    fn reaches_goal(game: &Game, node: &Arc<Node>, depth: u32) -> bool {
        if game.is_goal(node) {
            return true;
        }
        depth > 0
            && Action::ALL.into_iter().any(|action| {
                game.apply(node, action)
                    .map_or(false, |next| reaches_goal(game, &Arc::new(next), depth - 1))
            })
    }
    let root = Arc::new(game.initial());
    (0..=max_depth).find(|&depth| reaches_goal(game, &root, depth))
}

/// Every key reachable from the start.
fn reachable_keys(game: &Game) -> HashSet<Key> {
    let mut seen = HashSet::new();
    let mut stack = vec![Arc::new(game.initial())];
    while let Some(node) = stack.pop() {
        if !seen.insert(node.key().clone()) {
            continue;
        }
        stack.extend(game.successors(&node).into_iter().map(Arc::new));
    }
    seen
}

#[test]
fn runs_are_deterministic() {
    for game in all_games() {
        for algo in Algorithm::ALL {
            let a = algo.run(&game, || {});
            let b = algo.run(&game, || {});
            assert_eq!(a.success, b.success);
            assert_eq!(a.path, b.path);
            assert_eq!(a.nodes_explored, b.nodes_explored);
            assert_eq!(visited_keys(&a), visited_keys(&b), "{algo}\n{game}");
        }
    }
}

#[test]
fn bfs_matches_brute_force() {
    for map in SMALL_BOARDS {
        let game = game(map);
        let outcome = solve::bfs(&game, || {});
        assert!(outcome.success, "{map}");
        assert_eq!(Some(outcome.path_cost), brute_force_cost(&game, 10), "{map}");
    }
}

#[test]
fn astar_is_optimal_and_explores_less() {
    for game in all_games() {
        let astar = solve::astar(&game, || {});
        let bfs = solve::bfs(&game, || {});
        assert!(astar.success && bfs.success, "{game}");
        assert_eq!(astar.path_cost, bfs.path_cost, "{game}");
        assert!(astar.nodes_explored <= bfs.nodes_explored, "{game}");
    }
}

#[test]
fn paths_replay_to_terminal() {
    for game in all_games() {
        for algo in Algorithm::ALL {
            let outcome = algo.run(&game, || {});
            let mut node = Arc::new(game.initial());
            for &action in &outcome.path {
                node = Arc::new(game.apply(&node, action).unwrap());
            }
            let terminal = outcome.terminal.unwrap();
            assert_eq!(node.key(), terminal.key(), "{algo}\n{game}");
            assert_eq!(outcome.path.len() as u32, outcome.path_cost);
            assert_eq!(terminal.cost(), outcome.path_cost);
        }
    }
}

#[test]
fn visited_log_has_no_duplicates() {
    for game in all_games() {
        for algo in Algorithm::ALL {
            let outcome = algo.run(&game, || {});
            let distinct = visited_keys(&outcome).into_iter().collect::<HashSet<_>>();
            assert_eq!(distinct.len(), outcome.nodes_explored, "{algo}\n{game}");
        }
    }
}

#[test]
fn basic_board_scenario() {
    let game = game("R.L\n.#.\n..L");
    let astar = solve::astar(&game, || {});
    let bfs = solve::bfs(&game, || {});
    assert!(astar.success && bfs.success);
    assert_eq!(astar.path_cost, bfs.path_cost);
    assert_eq!(astar.path_cost, 6);
    assert!(astar.nodes_explored <= bfs.nodes_explored);
}

#[test]
fn enclosed_light_exhausts_reachable_space() {
    let game = game("R....\n..#..\n.#L#.\n..#..\nL....");
    let reachable = reachable_keys(&game).len();
    // 20 open cells, each with the outer light on or off.
    assert_eq!(reachable, 40);
    for algo in Algorithm::ALL {
        let outcome = algo.run(&game, || {});
        assert!(!outcome.success, "{algo}");
        assert!(outcome.path.is_empty());
        assert!(outcome.terminal.is_none());
        assert_eq!(outcome.path_cost, 0);
        assert_eq!(outcome.nodes_explored, reachable, "{algo}");
        assert_eq!(outcome.visited.len(), reachable, "{algo}");
    }
}

#[test]
fn zero_light_board_is_immediate_goal() {
    let game = game("#.\n.R");
    assert!(game.is_goal(&game.initial()));
    for algo in Algorithm::ALL {
        let outcome = algo.run(&game, || {});
        assert!(outcome.success);
        assert!(outcome.path.is_empty());
        assert_eq!(outcome.nodes_explored, 1);
    }
}

/// Uniform-cost search in disguise: the same puzzle with a zero estimate.
struct Blind<'a>(&'a Game);

impl Model for Blind<'_> {
    fn initial(&self) -> Node {
        self.0.initial()
    }

    fn successors(&self, node: &Arc<Node>) -> Successors {
        self.0.successors(node)
    }

    fn is_goal(&self, node: &Node) -> bool {
        self.0.is_goal(node)
    }

    fn heuristic(&self, _: &Node) -> u32 {
        0
    }
}

#[test]
fn heuristic_can_be_substituted() {
    for game in all_games() {
        let informed = solve::astar(&game, || {});
        let blind = solve::astar(&Blind(&game), || {});
        assert!(blind.success);
        assert_eq!(blind.path_cost, informed.path_cost, "{game}");
        assert!(informed.nodes_explored <= blind.nodes_explored, "{game}");
        assert!(blind.visited.iter().all(|node| node.heuristic() == 0));
    }
}

#[test]
fn parallel_runs_match_sequential() {
    let games = all_games();
    let summarize = |game: &Game| {
        Algorithm::ALL.map(|algo| {
            let outcome = algo.run(game, || {});
            (outcome.path, outcome.nodes_explored)
        })
    };
    let sequential = games.iter().map(summarize).collect::<Vec<_>>();
    let parallel = games.par_iter().map(summarize).collect::<Vec<_>>();
    assert_eq!(sequential, parallel);
}
