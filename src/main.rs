//! Main CLI application for the picross SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use picross_sat::{
    config::{CliOverrides, PuzzleKind, Settings, SolverBackend},
    puzzle::{create_example_puzzles, load_grid_from_file, load_puzzle, Picture},
    solve::{PicrossProblem, SolutionValidator},
    utils::{ColorOutput, SolutionFormatter},
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "picross_sat")]
#[command(about = "Picross SAT Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    #[value(name = "2d")]
    TwoD,
    #[value(name = "3d")]
    ThreeD,
}

impl From<KindArg> for PuzzleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::TwoD => PuzzleKind::TwoD,
            KindArg::ThreeD => PuzzleKind::ThreeD,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    External,
    Cadical,
}

impl From<BackendArg> for SolverBackend {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::External => SolverBackend::External,
            BackendArg::Cadical => SolverBackend::Cadical,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a picross puzzle
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Hint file (overrides config)
        #[arg(short = 'H', long)]
        hints: Option<PathBuf>,

        /// Puzzle kind (overrides config)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<BackendArg>,

        /// External solver executable (overrides config)
        #[arg(long)]
        solver: Option<PathBuf>,

        /// Solver timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum solutions to find (overrides config)
        #[arg(short, long)]
        max_solutions: Option<usize>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encode lines in parallel
        #[arg(long)]
        parallel: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the CNF formula of a puzzle in DIMACS form
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Hint file (overrides config)
        #[arg(short = 'H', long)]
        hints: Option<PathBuf>,

        /// Puzzle kind (overrides config)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Destination of the DIMACS file
        #[arg(short, long, default_value = "puzzle.cnf")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and hint files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check a 2D solution grid against its hints
    Validate {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// 2D hint file
        #[arg(short = 'H', long)]
        hints: PathBuf,

        /// Solution grid file (`X` filled, `.` empty)
        #[arg(short, long)]
        grid: PathBuf,
    },

    /// Show encoding statistics for a puzzle
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Hint file
        #[arg(short = 'H', long)]
        hints: PathBuf,

        /// Puzzle kind (overrides config)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            hints,
            kind,
            backend,
            solver,
            timeout,
            max_solutions,
            output,
            parallel,
            verbose,
        } => {
            init_logging(verbose);
            let overrides = CliOverrides {
                kind: kind.map(Into::into),
                hint_file: hints,
                backend: backend.map(Into::into),
                executable: solver,
                timeout_seconds: timeout,
                max_solutions,
                output_dir: output,
                parallel,
            };
            solve_command(config, overrides, verbose)
        }
        Commands::Encode {
            config,
            hints,
            kind,
            output,
            verbose,
        } => {
            init_logging(verbose);
            let overrides = CliOverrides {
                kind: kind.map(Into::into),
                hint_file: hints,
                ..Default::default()
            };
            encode_command(config, overrides, output)
        }
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate { config, hints, grid } => {
            init_logging(false);
            validate_command(config, hints, grid)
        }
        Commands::Analyze { config, hints, kind } => {
            init_logging(false);
            analyze_command(config, hints, kind.map(Into::into))
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🧩 Starting Picross SAT Solver"));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);

    if verbose {
        println!("Configuration:");
        println!("  Hint file: {} ({:?})", settings.puzzle.hint_file.display(), settings.puzzle.kind);
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  Max solutions: {}", settings.solver.max_solutions);
        println!("  Output dir: {}", settings.output.output_directory.display());
        println!();
    }

    settings.validate().context("Configuration validation failed")?;

    let start_time = Instant::now();
    let mut problem = PicrossProblem::new(settings.clone()).context("Failed to create picross problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
    }

    println!("{}", ColorOutput::info("🧮 Generating SAT constraints and solving..."));
    let outcome = problem.solve().context("Failed to solve picross puzzle")?;
    let total_time = start_time.elapsed();

    let skipped = problem.encoding_statistics().skipped_lines;
    if skipped > 0 {
        println!(
            "{}",
            ColorOutput::warning(&format!("⚠️  {} line(s) had clues that cannot fit and were left open", skipped))
        );
    }

    if outcome.is_unsatisfiable() {
        println!("{}", ColorOutput::warning("❌ No solution exists"));
    } else {
        println!(
            "{}",
            ColorOutput::success(&format!(
                "✅ Found {} solution(s) in {:.3}s",
                outcome.solutions().len(),
                total_time.as_secs_f64()
            ))
        );

        if outcome.solutions().len() > 1 {
            println!("\n{}", SolutionFormatter::format_solution_summary(outcome.solutions()));
        }
        for solution in outcome.solutions().iter().take(3) {
            println!("\n{}", SolutionFormatter::format_solution(solution));
        }
    }

    println!("\n{}", ColorOutput::info("💾 Saving solutions..."));
    SolutionFormatter::save_solutions(&outcome, &settings.output.output_directory, &settings.output.format)
        .context("Failed to save solutions")?;
    println!(
        "{}",
        ColorOutput::success(&format!("Solutions saved to {}", settings.output.output_directory.display()))
    );

    if verbose {
        println!("\n{}", problem.encoding_statistics());
    }

    Ok(())
}

fn encode_command(config_path: PathBuf, overrides: CliOverrides, output: PathBuf) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let mut problem = PicrossProblem::new(settings).context("Failed to create picross problem")?;
    let document = problem.encode_only()?;
    document
        .save(&output)
        .with_context(|| format!("Failed to write CNF to {}", output.display()))?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Wrote {} variables and {} clauses to {}",
            document.variable_count(),
            document.clause_count(),
            output.display()
        ))
    );
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("🛠️  Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/puzzles");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.puzzle.hint_file = PathBuf::from("input/puzzles/face.txt");
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_puzzles(&input_dir).context("Failed to create example puzzles")?;
    println!("Created example hint files in: {}", input_dir.display());

    let variants_dir = config_dir.join("variants");
    std::fs::create_dir_all(&variants_dir)?;

    // In-process solver, no external executable needed
    let mut cadical_config = Settings::default();
    cadical_config.puzzle.hint_file = PathBuf::from("input/puzzles/bar.txt");
    cadical_config.solver.backend = SolverBackend::Cadical;
    cadical_config.solver.max_solutions = 2;
    cadical_config.to_file(variants_dir.join("cadical.yaml"))?;

    let mut cube_config = Settings::default();
    cube_config.puzzle.kind = PuzzleKind::ThreeD;
    cube_config.puzzle.hint_file = PathBuf::from("input/puzzles/split_3d.txt");
    cube_config.encoding.parallel = true;
    cube_config.to_file(variants_dir.join("cube.yaml"))?;

    println!("Created configuration variants in: {}", variants_dir.display());

    println!("\n{}", ColorOutput::success("✅ Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your hint files to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(config_path: PathBuf, hints_path: PathBuf, grid_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("🔍 Validating solution..."));

    let settings = load_settings(&config_path)?;
    let puzzle = load_puzzle(&hints_path, PuzzleKind::TwoD)
        .with_context(|| format!("Failed to load hints from {}", hints_path.display()))?;
    let grid = load_grid_from_file(&grid_path)?;

    println!("{}", SolutionFormatter::format_grid_with_coords(&grid));

    let validator = SolutionValidator::new(&settings);
    let result = validator.validate(&puzzle, &Picture::Grid(grid));
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("✅ Solution is valid!"));
    } else {
        println!("{}", ColorOutput::error("❌ Solution is invalid"));
        if let Some(error) = result.error_message {
            println!("Error: {}", error);
        }
    }

    Ok(())
}

fn analyze_command(config_path: PathBuf, hints_path: PathBuf, kind: Option<PuzzleKind>) -> Result<()> {
    println!("{}", ColorOutput::info("🔬 Analyzing puzzle..."));

    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&CliOverrides {
        kind,
        hint_file: Some(hints_path),
        ..Default::default()
    });

    let mut problem = PicrossProblem::new(settings).context("Failed to create problem for analysis")?;
    println!("{}", problem.estimate_complexity());

    problem.encode_only()?;
    println!("{}", SolutionFormatter::format_line_reports(problem.line_reports()));
    println!("{}", problem.encoding_statistics());

    Ok(())
}
