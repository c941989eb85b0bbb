use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Action;
use crate::solver::Solution;

#[derive(Debug, Error)]
pub enum SolutionsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed solution book: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid action '{0}' in recorded solution")]
    InvalidAction(char),
}

/// A recorded solution for one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedLevel {
    pub actions: String,
    pub explored: usize,
}

impl SolvedLevel {
    pub fn from_solution(solution: &Solution) -> Self {
        SolvedLevel {
            actions: solution.action_string(),
            explored: solution.explored,
        }
    }

    pub fn actions(&self) -> Result<Vec<Action>, SolutionsError> {
        self.actions
            .chars()
            .map(|ch| Action::from_char(ch).ok_or(SolutionsError::InvalidAction(ch)))
            .collect()
    }
}

/// Solved levels keyed by 0-based level index, stored as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionBook {
    levels: BTreeMap<usize, SolvedLevel>,
}

impl SolutionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a book from disk. A missing file is an empty book.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SolutionsError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SolutionsError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents + "\n")?;
        Ok(())
    }

    pub fn get(&self, level: usize) -> Option<&SolvedLevel> {
        self.levels.get(&level)
    }

    pub fn insert(&mut self, level: usize, solved: SolvedLevel) {
        self.levels.insert(level, solved);
    }

    pub fn contains(&self, level: usize) -> bool {
        self.levels.contains_key(&level)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Entries in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SolvedLevel)> {
        self.levels.iter().map(|(&level, solved)| (level, solved))
    }
}
