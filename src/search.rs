//! Generic best-first graph search.
//!
//! Both algorithms work over any [`SearchProblem`] and keep their frontier,
//! explored set and node arena local to one invocation.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use log::debug;

use crate::heuristic::{Cost, Heuristic};
use crate::pqueue::PriorityQueue;

pub trait SearchProblem {
    type State: Clone + Eq + Hash;
    type Action: Copy;

    fn start(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Successor triples `(state, action, step_cost)`.
    fn successors(&self, state: &Self::State) -> Vec<(Self::State, Self::Action, usize)>;
}

/// Hook invoked after every expansion with the explored and frontier sizes.
/// Must stay cheap: it runs on the search hot path and cannot abort it.
pub trait Progress {
    fn report(&mut self, explored: usize, frontier: usize);
}

impl<F: FnMut(usize, usize)> Progress for F {
    fn report(&mut self, explored: usize, frontier: usize) {
        self(explored, frontier)
    }
}

pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _explored: usize, _frontier: usize) {}
}

/// Forwards only every `every`th expansion to the wrapped hook.
pub struct Sampled<P> {
    every: usize,
    inner: P,
}

impl<P: Progress> Sampled<P> {
    pub fn new(every: usize, inner: P) -> Self {
        Self {
            every: every.max(1),
            inner,
        }
    }
}

impl<P: Progress> Progress for Sampled<P> {
    fn report(&mut self, explored: usize, frontier: usize) {
        if explored % self.every == 0 {
            self.inner.report(explored, frontier);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Solved,
    /// The frontier emptied without reaching a goal.
    Exhausted,
    /// The node limit was hit first.
    Cutoff,
}

struct Node<S, A> {
    state: S,
    parent: Option<usize>,
    action: Option<A>,
    cost: usize,
    estimate: usize,
}

fn path_to<S, A: Copy>(nodes: &[Node<S, A>], mut id: usize) -> Vec<A> {
    let mut actions = Vec::new();
    while let Some(parent) = nodes[id].parent {
        if let Some(action) = nodes[id].action {
            actions.push(action);
        }
        id = parent;
    }
    actions.reverse();
    actions
}

/// Outcome of a breadth-first search: the path to the goal (empty if none)
/// and every explored state with the path that first reached it.
pub struct Exploration<S, A> {
    pub status: SearchStatus,
    pub actions: Vec<A>,
    nodes: Vec<Node<S, A>>,
    explored: HashMap<S, usize>,
}

impl<S: Eq + Hash, A: Copy> Exploration<S, A> {
    pub fn len(&self) -> usize {
        self.explored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.explored.is_empty()
    }

    pub fn contains(&self, state: &S) -> bool {
        self.explored.contains_key(state)
    }

    /// Accumulated step cost of the path that reached an explored state.
    pub fn cost(&self, state: &S) -> Option<usize> {
        self.explored.get(state).map(|&id| self.nodes[id].cost)
    }

    pub fn path(&self, state: &S) -> Option<Vec<A>> {
        self.explored.get(state).map(|&id| path_to(&self.nodes, id))
    }

    /// Explored states paired with their path cost.
    pub fn iter(&self) -> impl Iterator<Item = (&S, usize)> + '_ {
        self.explored
            .iter()
            .map(|(state, &id)| (state, self.nodes[id].cost))
    }
}

/// Outcome of an A* search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<A> {
    pub status: SearchStatus,
    pub actions: Vec<A>,
    pub explored: usize,
}

/// Expand states in discovery order. The first goal popped is returned.
pub fn breadth_first_search<P: SearchProblem>(
    problem: &P,
    mut progress: impl Progress,
    max_nodes: Option<usize>,
) -> Exploration<P::State, P::Action> {
    let start = problem.start();
    let mut nodes = vec![Node {
        state: start.clone(),
        parent: None,
        action: None,
        cost: 0,
        estimate: 0,
    }];
    let mut queue = VecDeque::from([0usize]);
    let mut frontier = HashMap::from([(start, 0usize)]);
    let mut explored = HashMap::new();
    let mut status = SearchStatus::Exhausted;
    let mut actions = Vec::new();

    while let Some(id) = queue.pop_front() {
        let node = &nodes[id];
        frontier.remove(&node.state);

        if problem.is_goal(&node.state) {
            status = SearchStatus::Solved;
            actions = path_to(&nodes, id);
            break;
        }

        explored.insert(node.state.clone(), id);
        progress.report(explored.len(), frontier.len());

        if max_nodes.is_some_and(|limit| explored.len() >= limit) {
            status = SearchStatus::Cutoff;
            break;
        }

        let cost = node.cost;
        for (next, action, step_cost) in problem.successors(&node.state) {
            if explored.contains_key(&next) || frontier.contains_key(&next) {
                continue;
            }
            nodes.push(Node {
                state: next.clone(),
                parent: Some(id),
                action: Some(action),
                cost: cost + step_cost,
                estimate: 0,
            });
            let next_id = nodes.len() - 1;
            frontier.insert(next, next_id);
            queue.push_back(next_id);
        }
    }

    debug!(
        "breadth-first search finished: {:?}, explored={}, frontier={}",
        status,
        explored.len(),
        frontier.len()
    );

    Exploration {
        status,
        actions,
        nodes,
        explored,
    }
}

/// Expand states in order of `cost + estimate`.
///
/// A state already on the frontier that is reached more cheaply gets a fresh
/// node at the lower priority; the old queue entry is skipped when popped.
/// Explored states are never reopened, so the heuristic must be consistent
/// for the returned path to be optimal. Successors whose estimate is
/// [`Cost::Impossible`] are dropped.
pub fn astar_search<P, H>(
    problem: &P,
    heuristic: &H,
    mut progress: impl Progress,
    max_nodes: Option<usize>,
) -> SearchResult<P::Action>
where
    P: SearchProblem,
    H: Heuristic<P::State>,
{
    let start = problem.start();
    let Cost::Solvable(start_estimate) = heuristic.estimate(&start) else {
        return SearchResult {
            status: SearchStatus::Exhausted,
            actions: Vec::new(),
            explored: 0,
        };
    };

    let mut nodes = vec![Node {
        state: start.clone(),
        parent: None,
        action: None,
        cost: 0,
        estimate: start_estimate,
    }];
    let mut queue = PriorityQueue::new();
    queue.push(start_estimate, 0usize);
    let mut frontier = HashMap::from([(start, 0usize)]);
    let mut explored = HashMap::new();
    let mut status = SearchStatus::Exhausted;
    let mut actions = Vec::new();

    while let Some(id) = queue.pop_min() {
        let node = &nodes[id];
        if frontier.get(&node.state) != Some(&id) {
            // Superseded by a cheaper node for the same state
            continue;
        }
        frontier.remove(&node.state);

        if problem.is_goal(&node.state) {
            status = SearchStatus::Solved;
            actions = path_to(&nodes, id);
            break;
        }

        explored.insert(node.state.clone(), id);
        progress.report(explored.len(), frontier.len());

        if max_nodes.is_some_and(|limit| explored.len() >= limit) {
            status = SearchStatus::Cutoff;
            break;
        }

        let cost = node.cost;
        for (next, action, step_cost) in problem.successors(&node.state) {
            if explored.contains_key(&next) {
                continue;
            }
            let next_cost = cost + step_cost;
            let estimate = match frontier.get(&next) {
                Some(&existing) if nodes[existing].cost <= next_cost => continue,
                Some(&existing) => nodes[existing].estimate,
                None => match heuristic.estimate(&next) {
                    Cost::Solvable(estimate) => estimate,
                    Cost::Impossible => continue,
                },
            };
            nodes.push(Node {
                state: next.clone(),
                parent: Some(id),
                action: Some(action),
                cost: next_cost,
                estimate,
            });
            let next_id = nodes.len() - 1;
            queue.push(next_cost + estimate, next_id);
            frontier.insert(next, next_id);
        }
    }

    debug!(
        "A* search finished: {:?}, explored={}, frontier={}",
        status,
        explored.len(),
        frontier.len()
    );

    SearchResult {
        status,
        actions,
        explored: explored.len(),
    }
}
