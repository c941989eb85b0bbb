use crate::board::Board;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for level parsing operations.
#[derive(Debug, Error)]
pub enum LevelError {
    /// IO error when reading from file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Invalid level content
    #[error("Invalid level: {0}")]
    InvalidLevel(String),
}

/// A collection of Sokoban levels in XSB format.
#[derive(Debug)]
pub struct Levels {
    levels: Vec<Board>,
}

impl Levels {
    /// Parse XSB-formatted Sokoban levels from a string.
    ///
    /// The XSB format uses:
    /// - Lines starting with `;` as level separators/comments
    /// - Standard Sokoban characters (#, @, $, ., *, +, space)
    /// - Empty lines between levels (optional)
    ///
    /// Parses and validates each level, returning the start state of each.
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut levels = Vec::new();
        let mut current_level = String::new();

        for line in contents.lines() {
            // A comment or a blank line closes the level being accumulated
            if line.trim_start().starts_with(';') || line.trim().is_empty() {
                if !current_level.is_empty() {
                    levels.push(Board::from_text(current_level.trim_end_matches('\n'))?);
                    current_level.clear();
                }
                continue;
            }

            current_level.push_str(line);
            current_level.push('\n');
        }

        // Don't forget the last level if file doesn't end with empty line
        if !current_level.is_empty() {
            levels.push(Board::from_text(current_level.trim_end_matches('\n'))?);
        }

        Ok(Levels { levels })
    }

    /// Parse XSB-formatted Sokoban levels from a text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    /// Get the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<&Board> {
        self.levels.get(index)
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.levels.iter()
    }
}
