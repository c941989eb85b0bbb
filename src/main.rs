use clap::Parser;
use log::{info, trace, warn};
use pushbox::search::Sampled;
use pushbox::{
    Action, Algorithm, Board, Levels, SearchStatus, SokobanProblem, SolutionBook, SolvedLevel,
};
use std::path::PathBuf;
use std::time::Instant;

fn print_solution(board: &Board, solution: &[Action]) {
    println!("\nStarting position:\n{}", board);
    let mut board = board.clone();
    let total = solution.len();
    for (count, &action) in solution.iter().enumerate() {
        let Some((next, pushed)) = board.apply_move(action) else {
            eprintln!("Error: recorded action {} is illegal here", action);
            return;
        };
        board = next;
        match pushed {
            Some(pos) => println!(
                "Push {} to {:?} ({}/{}):\n{}",
                action,
                pos,
                count + 1,
                total,
                board
            ),
            None => println!("Move {} ({}/{}):\n{}", action, count + 1, total, board),
        }
    }
}

struct LevelStats {
    solved: bool,
    steps: usize,
    states_explored: usize,
    elapsed_ms: u128,
}

struct SolveOpts {
    level_num: usize,
    algorithm: Algorithm,
    max_nodes_explored: usize,
    progress_every: usize,
    print_solution: bool,
}

fn solve_level(board: &Board, opts: &SolveOpts) -> (LevelStats, Option<SolvedLevel>) {
    let start = Instant::now();
    let problem = SokobanProblem::new(board.clone(), opts.algorithm);
    let level_num = opts.level_num;
    let progress = Sampled::new(opts.progress_every, |explored: usize, frontier: usize| {
        trace!(
            "level {}: explored={}, frontier={}",
            level_num, explored, frontier
        );
    });
    let solution = problem.solve_with_limit(progress, Some(opts.max_nodes_explored));
    let elapsed_ms = start.elapsed().as_millis();

    let solved_char = match solution.status {
        SearchStatus::Solved => 'Y',
        SearchStatus::Cutoff => 'N',
        SearchStatus::Exhausted => 'X',
    };

    println!(
        "level: {:<3}  solved: {}  steps: {:<5}  states: {:<12}  elapsed: {} ms",
        opts.level_num,
        solved_char,
        solution.actions.len(),
        solution.explored,
        elapsed_ms
    );

    if opts.print_solution && solution.is_solved() {
        print_solution(board, &solution.actions);
    }

    let stats = LevelStats {
        solved: solution.is_solved(),
        steps: solution.actions.len(),
        states_explored: solution.explored,
        elapsed_ms,
    };
    let record = solution
        .is_solved()
        .then(|| SolvedLevel::from_solution(&solution));
    (stats, record)
}

#[derive(Parser)]
#[command(name = "pushbox")]
#[command(about = "A Sokoban solver", long_about = None)]
struct Args {
    /// Path to the levels file (XSB format)
    #[arg(value_name = "FILE")]
    levels_file: PathBuf,

    /// Level number to solve (1-indexed), or start of range
    #[arg(value_name = "LEVEL")]
    level_start: usize,

    /// Optional end of level range (inclusive, 1-indexed)
    #[arg(value_name = "LEVEL_END")]
    level_end: Option<usize>,

    /// Print the solution step-by-step
    #[arg(short, long)]
    print_solution: bool,

    /// Maximum number of nodes to explore before giving up
    #[arg(short = 'n', long, default_value = "5000000")]
    max_nodes_explored: usize,

    /// Search algorithm
    #[arg(short, long, value_enum, default_value = "deadlock")]
    algorithm: Algorithm,

    /// JSON solution book to read solved levels from and record new ones in
    #[arg(long, value_name = "PATH")]
    solutions: Option<PathBuf>,

    /// Solve levels even if the solution book already has them
    #[arg(long, default_value = "false")]
    force: bool,

    /// Log search progress every N expansions (visible with RUST_LOG=trace)
    #[arg(long, default_value = "100")]
    progress_every: usize,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // Load levels from file
    let levels = match Levels::from_file(&args.levels_file) {
        Ok(levels) => levels,
        Err(e) => {
            eprintln!("Error loading levels: {}", e);
            std::process::exit(1);
        }
    };

    // Determine the range of levels to solve
    let level_end = args.level_end.unwrap_or(args.level_start);

    // Validate range
    if args.level_start == 0 {
        eprintln!("Error: level numbers must be at least 1");
        std::process::exit(1);
    }

    if level_end < args.level_start {
        eprintln!("Error: level end must be >= level start");
        std::process::exit(1);
    }

    if level_end > levels.len() {
        eprintln!(
            "Error: level {} not found (file contains {} levels)",
            level_end,
            levels.len()
        );
        std::process::exit(1);
    }

    let num_levels = level_end - args.level_start + 1;
    if args.print_solution && num_levels > 1 {
        eprintln!("Error: solution printing only supported when solving a single level");
        std::process::exit(1);
    }

    let mut book = match &args.solutions {
        Some(path) => match SolutionBook::load(path) {
            Ok(book) => {
                info!("loaded {} recorded solutions from {}", book.len(), path.display());
                Some(book)
            }
            Err(e) => {
                eprintln!("Error loading solutions: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    // Solve each level in the range
    let mut total_solved = 0;
    let mut total_steps = 0;
    let mut total_states = 0;
    let mut total_time_ms = 0;
    let mut recorded = 0;

    for level_num in args.level_start..=level_end {
        let Some(board) = levels.get(level_num - 1) else {
            continue;
        };

        if let Some(known) = book.as_ref().and_then(|b| b.get(level_num - 1)) {
            if !args.force {
                println!(
                    "level: {:<3}  solved: Y  steps: {:<5}  states: {:<12}  (recorded)",
                    level_num,
                    known.actions.len(),
                    known.explored
                );
                if args.print_solution {
                    match known.actions() {
                        Ok(actions) => print_solution(board, &actions),
                        Err(e) => warn!("level {}: {}", level_num, e),
                    }
                }
                total_solved += 1;
                total_steps += known.actions.len();
                continue;
            }
        }

        let opts = SolveOpts {
            level_num,
            algorithm: args.algorithm,
            max_nodes_explored: args.max_nodes_explored,
            progress_every: args.progress_every,
            print_solution: args.print_solution,
        };
        let (stats, record) = solve_level(board, &opts);

        if let (Some(book), Some(record)) = (book.as_mut(), record) {
            book.insert(level_num - 1, record);
            recorded += 1;
        }

        if stats.solved {
            total_solved += 1;
        }
        total_steps += stats.steps;
        total_states += stats.states_explored;
        total_time_ms += stats.elapsed_ms;
    }

    if let (Some(path), Some(book)) = (&args.solutions, &book) {
        if recorded > 0 {
            if let Err(e) = book.save(path) {
                eprintln!("Error saving solutions: {}", e);
                std::process::exit(1);
            }
            info!("recorded {} new solutions in {}", recorded, path.display());
        }
    }

    // Print summary statistics if multiple levels were solved
    if num_levels > 1 {
        println!("---");
        println!(
            "solved: {:>3}/{:<3}        steps: {:<5}  states: {:<12}  elapsed: {} ms",
            total_solved, num_levels, total_steps, total_states, total_time_ms
        );
    }
}
