//! Configuration settings for the picross SAT solver

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub puzzle: PuzzleConfig,
    pub solver: SolverConfig,
    pub encoding: EncodingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub kind: PuzzleKind,
    pub hint_file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    TwoD,
    ThreeD,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Executable used by the external backend; receives the CNF path as its only argument
    pub executable: PathBuf,
    pub timeout_seconds: u64,
    pub max_solutions: usize,
    /// Keep the CNF file handed to the external solver instead of deleting it
    pub keep_cnf: bool,
    pub cnf_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    External,
    Cadical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub parallel: bool,
    pub plain_strategy: PlainStrategy,
    /// Upper bound on the number of groups a square clue may stand for (lower bound is 3)
    pub square_max_groups: usize,
}

/// How plain stack clues are turned into clauses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlainStrategy {
    /// One selector per placement, shared with the 2D line encoding
    Selector,
    /// Cardinality and contiguity clauses placed directly on the cells
    Direct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            puzzle: PuzzleConfig {
                kind: PuzzleKind::TwoD,
                hint_file: PathBuf::from("input/puzzles/lambda.txt"),
            },
            solver: SolverConfig {
                backend: SolverBackend::External,
                executable: PathBuf::from("gophersat"),
                timeout_seconds: 300,
                max_solutions: 1,
                keep_cnf: false,
                cnf_file: None,
            },
            encoding: EncodingConfig {
                parallel: false,
                plain_strategy: PlainStrategy::Selector,
                square_max_groups: 4,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/solutions"),
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == 0 {
            anyhow::bail!("Solver timeout must be positive");
        }

        if self.solver.max_solutions == 0 {
            anyhow::bail!("Maximum solutions must be positive");
        }

        if self.encoding.square_max_groups < 3 {
            anyhow::bail!(
                "square_max_groups must be at least 3 (got {})",
                self.encoding.square_max_groups
            );
        }

        if !self.puzzle.hint_file.exists() {
            anyhow::bail!("Hint file does not exist: {}", self.puzzle.hint_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(kind) = cli_overrides.kind {
            self.puzzle.kind = kind;
        }
        if let Some(ref hint_file) = cli_overrides.hint_file {
            self.puzzle.hint_file = hint_file.clone();
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(ref executable) = cli_overrides.executable {
            self.solver.executable = executable.clone();
        }
        if let Some(timeout) = cli_overrides.timeout_seconds {
            self.solver.timeout_seconds = timeout;
        }
        if let Some(max_solutions) = cli_overrides.max_solutions {
            self.solver.max_solutions = max_solutions;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if cli_overrides.parallel {
            self.encoding.parallel = true;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub kind: Option<PuzzleKind>,
    pub hint_file: Option<PathBuf>,
    pub backend: Option<SolverBackend>,
    pub executable: Option<PathBuf>,
    pub timeout_seconds: Option<u64>,
    pub max_solutions: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub parallel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.puzzle.kind = PuzzleKind::ThreeD;
        settings.encoding.plain_strategy = PlainStrategy::Direct;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.puzzle.kind, PuzzleKind::ThreeD);
        assert_eq!(loaded.encoding.plain_strategy, PlainStrategy::Direct);
        assert_eq!(loaded.solver.executable, PathBuf::from("gophersat"));
    }

    #[test]
    fn test_yaml_uses_snake_case_variants() {
        let yaml = serde_yaml::to_string(&Settings::default()).unwrap();
        assert!(yaml.contains("kind: two_d"));
        assert!(yaml.contains("backend: external"));
        assert!(yaml.contains("plain_strategy: selector"));
    }

    #[test]
    fn test_validation() {
        let temp_dir = tempdir().unwrap();
        let hint_file = temp_dir.path().join("hints.txt");
        std::fs::write(&hint_file, "1\n1\n1\n1\n").unwrap();

        let mut settings = Settings::default();
        assert!(settings.validate().is_err()); // default hint file is missing

        settings.puzzle.hint_file = hint_file;
        assert!(settings.validate().is_ok());

        settings.encoding.square_max_groups = 2;
        assert!(settings.validate().is_err());

        settings.encoding.square_max_groups = 5;
        settings.solver.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            kind: Some(PuzzleKind::ThreeD),
            backend: Some(SolverBackend::Cadical),
            timeout_seconds: Some(5),
            parallel: true,
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.puzzle.kind, PuzzleKind::ThreeD);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
        assert_eq!(settings.solver.timeout_seconds, 5);
        assert!(settings.encoding.parallel);
        assert_eq!(settings.solver.max_solutions, 1);
    }
}
