//! Solution representation for picross puzzles

use crate::puzzle::Picture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One picture that satisfies the puzzle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub picture: Picture,
    /// Time taken by the solver call that produced this picture
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the picture contents
    pub id: String,
    /// 1-based position in the order the solver found it
    pub index: usize,
    pub filled_cells: usize,
    pub total_cells: usize,
    /// Filled fraction, 0.0 to 1.0
    pub density: f64,
    /// `Some(true)` when no other picture exists, `None` when the search stopped early
    pub unique: Option<bool>,
    pub solve_time_ms: u64,
}

impl Solution {
    pub fn new(picture: Picture, index: usize, unique: Option<bool>, solve_time: Duration) -> Self {
        let metadata = SolutionMetadata::analyze(&picture, index, unique, solve_time);
        Self {
            picture,
            solve_time,
            metadata,
        }
    }

    /// Check if this solution is the same picture as another
    pub fn is_equivalent_to(&self, other: &Solution) -> bool {
        self.picture == other.picture
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Header line plus the picture
    pub fn format_picture(&self) -> String {
        let uniqueness = match self.metadata.unique {
            Some(true) => "unique",
            Some(false) => "not unique",
            None => "uniqueness unknown",
        };
        format!(
            "Solution {} ({}), {}/{} filled, {}\n{}",
            self.metadata.index,
            self.metadata.id,
            self.metadata.filled_cells,
            self.metadata.total_cells,
            uniqueness,
            self.picture
        )
    }
}

impl SolutionMetadata {
    pub fn analyze(picture: &Picture, index: usize, unique: Option<bool>, solve_time: Duration) -> Self {
        Self {
            id: Self::generate_id(picture),
            index,
            filled_cells: picture.filled_count(),
            total_cells: picture.cell_count(),
            density: picture.density(),
            unique,
            solve_time_ms: solve_time.as_millis() as u64,
        }
    }

    /// Generate a unique ID for the solution based on the picture
    fn generate_id(picture: &Picture) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        picture.hash(&mut hasher);
        format!("sol_{:016x}", hasher.finish())
    }
}
