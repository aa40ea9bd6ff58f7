use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Key, Term};
use indicatif::{ProgressBar, ProgressStyle};
use lightbot_solver::levels::{self, LEVELS};
use lightbot_solver::report::{self, Comparison, Solution, Stats, Totals};
use lightbot_solver::solve::{self, Algorithm};
use lightbot_solver::{Action, Game, Model, Node};
use log::info;

/// Solve LightBot boards with A* and BFS and compare the two.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve one board and print the solution.
    Solve {
        #[command(flatten)]
        source: Source,
        #[arg(short, long, value_enum, default_value_t = Strategy::Both)]
        algorithm: Strategy,
        /// Also write the report to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Step through the solution on the board afterwards.
        #[arg(long)]
        replay: bool,
        /// Pause between replayed steps, in milliseconds.
        #[arg(long, default_value_t = 300)]
        delay: u64,
    },
    /// Compare A* and BFS on every built-in level.
    Compare {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Run levels concurrently. Faster, but the timings then include
        /// contention between levels and are not comparable across runs.
        #[arg(long)]
        parallel: bool,
    },
    /// Play a board by hand.
    Play {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Built-in level number.
    #[arg(short, long, conflicts_with = "map")]
    level: Option<usize>,
    /// Map file.
    map: Option<PathBuf>,
}

impl Source {
    fn load(&self) -> Result<(String, Game)> {
        if let Some(path) = &self.map {
            let map_data = std::fs::read_to_string(path).context("Failed to read the map")?;
            let game = map_data.parse::<Game>().context("Failed to parse the map")?;
            return Ok((path.display().to_string(), game));
        }
        let number = self.level.unwrap_or(1);
        let level = levels::level(number)
            .with_context(|| format!("No level {number}, expecting 1..={}", LEVELS.len()))?;
        Ok((format!("{} ({})", level.name, level.description), level.game()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Astar,
    Bfs,
    Both,
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {pos} nodes expanded")?);
    Ok(pb)
}

fn emit(text: &str, output: Option<&PathBuf>) -> Result<()> {
    print!("{text}");
    if let Some(path) = output {
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn solve_cmd(
    source: &Source,
    strategy: Strategy,
    output: Option<&PathBuf>,
    replay: Option<Duration>,
) -> Result<()> {
    let (name, game) = source.load()?;
    info!("Loaded {name}");

    let pb = spinner()?;
    let mut text = format!("=== {name} ===\n{game}\n");
    let best = match strategy {
        Strategy::Both => {
            let cmp = Comparison::run(&name, &game, || pb.inc(1));
            writeln!(text, "{cmp}")?;
            cmp.astar
        }
        Strategy::Astar | Strategy::Bfs => {
            let algo = match strategy {
                Strategy::Bfs => Algorithm::Bfs,
                _ => Algorithm::AStar,
            };
            let outcome = algo.run(&game, || pb.inc(1));
            writeln!(text, "{}\n", Stats(algo, &outcome))?;
            outcome
        }
    };
    pb.finish_and_clear();

    if best.success {
        write!(text, "{}", Solution(&best.path))?;
    } else {
        writeln!(text, "No solution found.")?;
    }
    emit(&text, output)?;

    if let Some(delay) = replay.filter(|_| best.success) {
        replay_solution(&game, &best.path, delay)?;
    }
    Ok(())
}

fn replay_solution(game: &Game, path: &[Action], delay: Duration) -> Result<()> {
    let nodes = game.replay(path).context("Solution does not replay on this board")?;
    let total = path.len();
    println!("\n{}", style("Replay").bold());
    for (node, step) in nodes.iter().zip(0..) {
        match node.action() {
            Action::Start => println!("Start"),
            action => println!("Step {step}/{total}: {}", style(action).cyan()),
        }
        print!("{}", game.snapshot(node));
        let lights = node.lights();
        println!("lights on: {}/{}\n", lights.count_on(), lights.len());
        if step < total {
            std::thread::sleep(delay);
        }
    }
    Ok(())
}

fn compare_cmd(output: Option<&PathBuf>, parallel: bool) -> Result<()> {
    let pb = spinner()?;
    let comparisons = report::compare_levels(&LEVELS, parallel, || pb.inc(1))?;
    pb.finish_and_clear();

    let mut text = String::new();
    for cmp in &comparisons {
        writeln!(text, "{cmp}")?;
    }
    write!(text, "{}", Totals(&comparisons))?;
    emit(&text, output)
}

enum Input {
    Exit,
    Do(Action),
    Undo,
    Reset,
    Hint,
}

impl TryFrom<Key> for Input {
    type Error = ();

    fn try_from(key: Key) -> Result<Self, Self::Error> {
        Ok(match key {
            Key::ArrowUp | Key::Char('w') => Self::Do(Action::Up),
            Key::ArrowDown | Key::Char('s') => Self::Do(Action::Down),
            Key::ArrowLeft | Key::Char('a') => Self::Do(Action::Left),
            Key::ArrowRight | Key::Char('d') => Self::Do(Action::Right),
            Key::Char(' ' | 't') => Self::Do(Action::Toggle),
            Key::Escape | Key::Char('q') => Self::Exit,
            Key::Char('z') => Self::Undo,
            Key::Char('r') => Self::Reset,
            Key::Char('h') => Self::Hint,
            _ => return Err(()),
        })
    }
}

fn play_cmd(source: &Source) -> Result<()> {
    let (name, game) = source.load()?;
    let init = Arc::new(game.initial());
    let mut node = init.clone();
    let mut history: Vec<Arc<Node>> = Vec::new();

    let term = Term::stderr();
    eprintln!("{}", style(&name).bold());
    eprintln!("arrows/wasd: move, space/t: toggle, z: undo, r: reset, h: hint, q: quit\n");
    loop {
        let lights = node.lights();
        eprintln!(
            "{}lights on: {}/{}, steps: {}\n",
            game.snapshot(&node),
            lights.count_on(),
            lights.len(),
            node.cost(),
        );

        if game.is_goal(&node) {
            eprintln!("{}", style("All lights are on!").green().bold());
            let optimal = solve::astar(&game, || {});
            if optimal.success {
                eprintln!("Your steps: {}, optimal: {}", node.cost(), optimal.path_cost);
                if node.cost() == optimal.path_cost {
                    eprintln!("{}", style("You found an optimal solution.").green());
                } else {
                    let extra = node.cost().saturating_sub(optimal.path_cost);
                    eprintln!("+{extra} steps over optimal");
                }
            }
            break;
        }

        let input = loop {
            if let Ok(input) = Input::try_from(term.read_key()?) {
                break input;
            }
        };

        match input {
            Input::Exit => break,
            Input::Do(action) => match game.apply(&node, action) {
                Some(next) => {
                    history.push(node);
                    node = Arc::new(next);
                }
                None => eprintln!("{}", style(format!("Invalid move: {action}")).red()),
            },
            Input::Undo => {
                if let Some(last) = history.pop() {
                    node = last;
                }
            }
            Input::Reset => {
                history.push(node);
                node = init.clone();
            }
            Input::Hint => {
                let outcome = solve::astar(&game, || {});
                if outcome.success {
                    eprintln!("From the start, in {} steps:", outcome.path_cost);
                    eprint!("{}", Solution(&outcome.path));
                } else {
                    eprintln!("{}", style("This board has no solution.").red());
                }
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Solve {
            source,
            algorithm,
            output,
            replay,
            delay,
        } => {
            let replay = replay.then(|| Duration::from_millis(*delay));
            solve_cmd(source, *algorithm, output.as_ref(), replay)
        }
        Command::Compare { output, parallel } => compare_cmd(output.as_ref(), *parallel),
        Command::Play { source } => play_cmd(source),
    }
}
