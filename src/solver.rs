use clap::ValueEnum;

use crate::board::{ALL_ACTIONS, Action, Board, Position};
use crate::deadlocks::Deadlocks;
use crate::heuristic::AssignmentHeuristic;
use crate::pruning::{is_area_overloaded, is_frozen_corner, is_wall_run_overloaded};
use crate::search::{
    NoProgress, Progress, SearchProblem, SearchStatus, astar_search, breadth_first_search,
};

/// Search strategy, from uninformed to fully informed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Plain breadth-first search, no pruning
    BreadthFirst,
    /// A* with a Manhattan assignment bound and local deadlock checks
    Manhattan,
    /// A* with push distances and area capacity checks
    #[default]
    Deadlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub status: SearchStatus,
    pub actions: Vec<Action>,
    pub explored: usize,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        self.status == SearchStatus::Solved
    }

    /// Actions as a string of `l`, `r`, `u`, `d`.
    pub fn action_string(&self) -> String {
        self.actions.iter().map(|a| a.to_char()).collect()
    }
}

pub struct SokobanProblem {
    start: Board,
    algorithm: Algorithm,
    deadlocks: Option<Deadlocks>,
}

impl SokobanProblem {
    pub fn new(start: Board, algorithm: Algorithm) -> Self {
        let deadlocks = match algorithm {
            Algorithm::Deadlock => Some(Deadlocks::new(&start)),
            Algorithm::BreadthFirst | Algorithm::Manhattan => None,
        };
        SokobanProblem {
            start,
            algorithm,
            deadlocks,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn deadlocks(&self) -> Option<&Deadlocks> {
        self.deadlocks.as_ref()
    }

    pub fn solve(&self, progress: impl Progress) -> Solution {
        self.solve_with_limit(progress, None)
    }

    /// Search until solved, exhausted, or `max_nodes` states have been
    /// expanded.
    pub fn solve_with_limit(&self, progress: impl Progress, max_nodes: Option<usize>) -> Solution {
        match (self.algorithm, &self.deadlocks) {
            (Algorithm::BreadthFirst, _) => {
                let exploration = breadth_first_search(self, progress, max_nodes);
                Solution {
                    status: exploration.status,
                    explored: exploration.len(),
                    actions: exploration.actions,
                }
            }
            (Algorithm::Deadlock, Some(deadlocks)) => {
                let heuristic = AssignmentHeuristic::push_distance(deadlocks);
                self.run_astar(&heuristic, progress, max_nodes)
            }
            _ => {
                let heuristic = AssignmentHeuristic::manhattan();
                self.run_astar(&heuristic, progress, max_nodes)
            }
        }
    }

    fn run_astar(
        &self,
        heuristic: &AssignmentHeuristic<'_>,
        progress: impl Progress,
        max_nodes: Option<usize>,
    ) -> Solution {
        let result = astar_search(self, heuristic, progress, max_nodes);
        Solution {
            status: result.status,
            actions: result.actions,
            explored: result.explored,
        }
    }

    /// Whether a board whose box just landed on `pushed` is worth keeping.
    pub fn accepts_push(&self, board: &Board, pushed: Position, action: Action) -> bool {
        match (self.algorithm, &self.deadlocks) {
            (Algorithm::BreadthFirst, _) => true,
            (Algorithm::Deadlock, Some(deadlocks)) => {
                !is_area_overloaded(board, deadlocks, pushed) && !is_frozen_corner(board, pushed)
            }
            _ => !is_frozen_corner(board, pushed) && !is_wall_run_overloaded(board, pushed, action),
        }
    }
}

impl SearchProblem for SokobanProblem {
    type State = Board;
    type Action = Action;

    fn start(&self) -> Board {
        self.start.clone()
    }

    fn is_goal(&self, board: &Board) -> bool {
        board.is_goal()
    }

    fn successors(&self, board: &Board) -> Vec<(Board, Action, usize)> {
        let mut successors = Vec::with_capacity(ALL_ACTIONS.len());
        for action in ALL_ACTIONS {
            match board.apply_move(action) {
                Some((next, Some(pushed))) => {
                    if self.accepts_push(&next, pushed, action) {
                        successors.push((next, action, 1));
                    }
                }
                Some((next, None)) => successors.push((next, action, 1)),
                None => {}
            }
        }
        successors
    }
}

/// Solve a level from its start board with no node limit.
pub fn solve(start: &Board, algorithm: Algorithm) -> Solution {
    SokobanProblem::new(start.clone(), algorithm).solve(NoProgress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{Cost, Heuristic};

    const ALGORITHMS: [Algorithm; 3] = [
        Algorithm::BreadthFirst,
        Algorithm::Manhattan,
        Algorithm::Deadlock,
    ];

    const FIXTURES: [&str; 4] = [
        "######\n\
         #    #\n\
         # $$ #\n\
         # .. #\n\
         #  @ #\n\
         ######",
        "#######\n\
         #     #\n\
         #@$ . #\n\
         #     #\n\
         #######",
        "########\n\
         #@$ $..#\n\
         #      #\n\
         ########",
        "########\n\
         #@ $  .#\n\
         ########",
    ];

    fn replay(start: &Board, actions: &[Action]) -> Board {
        actions.iter().fold(start.clone(), |board, &action| {
            board.apply_move(action).unwrap().0
        })
    }

    #[test]
    fn test_corridor() {
        let board = Board::from_text("#######\n#@$  .#\n#######").unwrap();
        let solution = solve(&board, Algorithm::Deadlock);
        assert!(solution.is_solved());
        assert_eq!(solution.action_string(), "rrr");
        assert!(solution.explored <= 10);
    }

    #[test]
    fn test_walk_then_push() {
        let board = Board::from_text("########\n#@ $  .#\n########").unwrap();
        for algorithm in ALGORITHMS {
            let solution = solve(&board, algorithm);
            assert_eq!(solution.action_string(), "rrrr", "{:?}", algorithm);
        }
    }

    #[test]
    fn test_already_solved() {
        let board = Board::from_text("####\n#@*#\n####").unwrap();
        for algorithm in ALGORITHMS {
            let solution = solve(&board, algorithm);
            assert!(solution.is_solved());
            assert!(solution.actions.is_empty());
        }
    }

    #[test]
    fn test_corner_push_pruned() {
        let board = Board::from_text("#####\n# $@#\n#  .#\n#####").unwrap();
        let (cornered, _) = board.apply_move(Action::Left).unwrap();

        let pruned = SokobanProblem::new(board.clone(), Algorithm::Deadlock);
        let states: Vec<Board> = pruned
            .successors(&board)
            .into_iter()
            .map(|(state, ..)| state)
            .collect();
        assert_eq!(states.len(), 1);
        assert!(!states.contains(&cornered));

        let manhattan = SokobanProblem::new(board.clone(), Algorithm::Manhattan);
        assert!(!manhattan.accepts_push(&cornered, (1, 1), Action::Left));

        let unpruned = SokobanProblem::new(board.clone(), Algorithm::BreadthFirst);
        let states: Vec<Board> = unpruned
            .successors(&board)
            .into_iter()
            .map(|(state, ..)| state)
            .collect();
        assert_eq!(states.len(), 2);
        assert!(states.contains(&cornered));
    }

    #[test]
    fn test_cornered_level_is_exhausted() {
        let board = Board::from_text("#####\n#$@ #\n#  .#\n#####").unwrap();
        let solution = solve(&board, Algorithm::BreadthFirst);
        assert_eq!(solution.status, SearchStatus::Exhausted);
        assert!(solution.actions.is_empty());
        // Every mover position was visited
        assert_eq!(solution.explored, 5);

        for algorithm in [Algorithm::Manhattan, Algorithm::Deadlock] {
            let solution = solve(&board, algorithm);
            assert_eq!(solution.status, SearchStatus::Exhausted);
        }
    }

    #[test]
    fn test_node_limit() {
        let board = Board::from_text(FIXTURES[0]).unwrap();
        let problem = SokobanProblem::new(board, Algorithm::BreadthFirst);
        let solution = problem.solve_with_limit(NoProgress, Some(3));
        assert_eq!(solution.status, SearchStatus::Cutoff);
        assert!(solution.actions.is_empty());
        assert_eq!(solution.explored, 3);
    }

    #[test]
    fn test_astar_matches_breadth_first() {
        for fixture in FIXTURES {
            let board = Board::from_text(fixture).unwrap();
            let bfs = solve(&board, Algorithm::BreadthFirst);
            assert!(bfs.is_solved(), "{}", fixture);
            assert!(replay(&board, &bfs.actions).is_goal());

            for algorithm in [Algorithm::Manhattan, Algorithm::Deadlock] {
                let solution = solve(&board, algorithm);
                assert!(solution.is_solved(), "{:?}\n{}", algorithm, fixture);
                assert_eq!(solution.actions.len(), bfs.actions.len());
                assert!(solution.explored <= bfs.explored);
                assert!(replay(&board, &solution.actions).is_goal());
            }
        }
    }

    #[test]
    fn test_heuristics_admissible() {
        for fixture in FIXTURES {
            let board = Board::from_text(fixture).unwrap();
            let deadlocks = Deadlocks::new(&board);
            let heuristics = [
                AssignmentHeuristic::manhattan(),
                AssignmentHeuristic::push_distance(&deadlocks),
            ];
            let actions = solve(&board, Algorithm::BreadthFirst).actions;

            let mut state = board.clone();
            for step in 0..=actions.len() {
                let remaining = actions.len() - step;
                for heuristic in &heuristics {
                    match heuristic.estimate(&state) {
                        Cost::Solvable(estimate) => assert!(estimate <= remaining),
                        Cost::Impossible => panic!("solvable state rated impossible"),
                    }
                }
                if step < actions.len() {
                    state = state.apply_move(actions[step]).unwrap().0;
                }
            }
        }
    }

    #[test]
    fn test_pruning_keeps_optimal_path() {
        for fixture in FIXTURES {
            let board = Board::from_text(fixture).unwrap();
            let actions = solve(&board, Algorithm::BreadthFirst).actions;
            let problems = [
                SokobanProblem::new(board.clone(), Algorithm::Manhattan),
                SokobanProblem::new(board.clone(), Algorithm::Deadlock),
            ];

            let mut state = board.clone();
            for &action in &actions {
                let (next, pushed) = state.apply_move(action).unwrap();
                if let Some(pushed) = pushed {
                    for problem in &problems {
                        assert!(
                            problem.accepts_push(&next, pushed, action),
                            "{:?} rejected {} at {:?}\n{}",
                            problem.algorithm(),
                            action,
                            pushed,
                            next
                        );
                    }
                }
                state = next;
            }
        }
    }

    #[test]
    fn test_successor_order() {
        let board = Board::from_text("#####\n#   #\n# @ #\n#  .#\n#####").unwrap();
        let problem = SokobanProblem::new(board.clone(), Algorithm::BreadthFirst);
        let actions: Vec<Action> = problem
            .successors(&board)
            .into_iter()
            .map(|(_, action, cost)| {
                assert_eq!(cost, 1);
                action
            })
            .collect();
        assert_eq!(actions, ALL_ACTIONS.to_vec());
    }
}
