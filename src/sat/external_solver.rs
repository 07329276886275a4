//! External SAT solver executables (gophersat, kissat, minisat-style output)
//!
//! The solver is run with the CNF file path as its only argument. Its
//! stdout is searched for an `s ... UNSAT` status line or for `v` lines
//! carrying the model, terminated by `0`.

use super::cnf::CnfDocument;
use super::constraints::Clause;
use super::solver::{SatOutcome, SolverSolution, SolverStatistics};
use crate::config::SolverConfig;
use crate::error::{PicrossError, PicrossResult};
use log::{debug, info, warn};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Solver reached through a child process
pub struct ExternalSolver {
    executable: PathBuf,
    timeout: Duration,
    cnf_file: Option<PathBuf>,
    keep_cnf: bool,
    document: CnfDocument,
    last_solve_time: Duration,
}

/// Where the formula lives for one solver run
enum CnfTarget {
    Configured { path: PathBuf, keep: bool },
    /// Removed when dropped, whichever way the run ends
    Scratch(NamedTempFile),
}

impl CnfTarget {
    fn path(&self) -> &Path {
        match self {
            CnfTarget::Configured { path, .. } => path,
            CnfTarget::Scratch(file) => file.path(),
        }
    }
}

/// Captured result of a finished child process
struct ProcessOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

impl ExternalSolver {
    pub fn new<P: Into<PathBuf>>(executable: P, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
            cnf_file: None,
            keep_cnf: false,
            document: CnfDocument::default(),
            last_solve_time: Duration::ZERO,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        let mut solver = Self::new(&config.executable, Duration::from_secs(config.timeout_seconds));
        solver.cnf_file = config.cnf_file.clone();
        solver.keep_cnf = config.keep_cnf;
        solver
    }

    /// Write the formula to `path` instead of a temporary file; keep it afterwards if asked
    pub fn with_cnf_file<P: Into<PathBuf>>(mut self, path: P, keep: bool) -> Self {
        self.cnf_file = Some(path.into());
        self.keep_cnf = keep;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn declare_variables(&mut self, count: usize) {
        self.document.declare_variables(count);
    }

    pub fn add_document(&mut self, document: &CnfDocument) {
        self.declare_variables(document.variable_count());
        self.add_clauses(document.clauses());
    }

    pub fn add_clauses(&mut self, clauses: &[Clause]) {
        for clause in clauses {
            self.add_clause(clause);
        }
    }

    pub fn add_clause(&mut self, clause: &Clause) {
        self.document.push(clause.clone());
    }

    pub fn document(&self) -> &CnfDocument {
        &self.document
    }

    /// Write the formula, run the executable and interpret its answer
    pub fn solve(&mut self) -> PicrossResult<SatOutcome> {
        let target = self.write_cnf()?;
        debug!(
            "Wrote {} clauses over {} variables to {}",
            self.document.clause_count(),
            self.document.variable_count(),
            target.path().display()
        );

        let start_time = Instant::now();
        let result = self.run(target.path());
        self.last_solve_time = start_time.elapsed();

        if let CnfTarget::Configured { path, keep: false } = &target {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Could not remove {}: {}", path.display(), e);
            }
        }
        drop(target);

        let output = result?;
        info!(
            "{} exited with {} after {:.3}s",
            self.executable.display(),
            output.status,
            self.last_solve_time.as_secs_f64()
        );

        match parse_solver_output(&output.stdout, self.last_solve_time)? {
            Some(outcome) => Ok(outcome),
            None if !output.status.success() => Err(PicrossError::SolverFailed {
                status: output.status.to_string(),
                stderr: output.stderr.trim().to_string(),
            }),
            None => Err(PicrossError::UnexpectedOutput(first_lines(&output.stdout, 5))),
        }
    }

    fn write_cnf(&self) -> PicrossResult<CnfTarget> {
        match &self.cnf_file {
            Some(path) => {
                self.document.save(path)?;
                Ok(CnfTarget::Configured {
                    path: path.clone(),
                    keep: self.keep_cnf,
                })
            }
            None => {
                let mut file = tempfile::Builder::new().prefix("picross-").suffix(".cnf").tempfile()?;
                let mut writer = BufWriter::new(file.as_file_mut());
                self.document.write_dimacs(&mut writer)?;
                writer.flush()?;
                drop(writer);
                Ok(CnfTarget::Scratch(file))
            }
        }
    }

    fn run(&self, cnf_path: &Path) -> PicrossResult<ProcessOutput> {
        let mut child = Command::new(&self.executable)
            .arg(cnf_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PicrossError::SolverUnavailable {
                path: self.executable.clone(),
                source,
            })?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                child.kill()?;
                child.wait()?;
                return Err(PicrossError::SolverTimeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        // a grandchild may still hold the pipes open; stop reading at the deadline
        Ok(ProcessOutput {
            status,
            stdout: collect(stdout, deadline),
            stderr: collect(stderr, deadline),
        })
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.document.variable_count(),
            clause_count: self.document.clause_count(),
            solve_time: self.last_solve_time,
        }
    }

    pub fn reset(&mut self) {
        self.document = CnfDocument::default();
        self.last_solve_time = Duration::ZERO;
    }
}

/// Read a pipe on its own thread so the child never blocks on a full pipe
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = [0u8; 8192];
        loop {
            match pipe.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    if sender.send(buffer[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });
    receiver
}

/// Gather what a pipe produced until it closes or the deadline passes
fn collect(receiver: Option<Receiver<Vec<u8>>>, deadline: Instant) -> String {
    let mut bytes = Vec::new();
    if let Some(receiver) = receiver {
        loop {
            match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(chunk) => bytes.extend_from_slice(&chunk),
                Err(RecvTimeoutError::Timeout) => {
                    debug!("Solver pipe still open at the deadline, keeping {} bytes", bytes.len());
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn first_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().take(count).collect();
    if lines.is_empty() {
        "empty output".to_string()
    } else {
        lines.join(" | ")
    }
}

/// Interpret solver stdout.
///
/// `Ok(None)` means neither a status nor a model was recognised. A model
/// is the concatenation of every `v` line and must end with `0`.
pub fn parse_solver_output(stdout: &str, solve_time: Duration) -> PicrossResult<Option<SatOutcome>> {
    let mut literals = Vec::new();
    let mut saw_model = false;
    let mut terminated = false;

    for line in stdout.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("s") => {
                let status = tokens.collect::<Vec<_>>().join(" ").to_uppercase();
                if status.contains("UNSAT") {
                    return Ok(Some(SatOutcome::Unsatisfiable));
                }
            }
            Some("v") => {
                saw_model = true;
                for token in tokens {
                    let literal: i32 = token
                        .parse()
                        .map_err(|_| PicrossError::UnexpectedOutput(format!("bad model literal `{}`", token)))?;
                    if literal == 0 {
                        terminated = true;
                        break;
                    }
                    literals.push(literal);
                }
            }
            _ => {}
        }
        if terminated {
            break;
        }
    }

    if terminated {
        Ok(Some(SatOutcome::Satisfiable(SolverSolution::from_literals(
            literals, solve_time,
        ))))
    } else if saw_model {
        Err(PicrossError::UnexpectedOutput("model line is not terminated by 0".to_string()))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gophersat_model() {
        let stdout = "c solving\ns SATISFIABLE\nv 1 -2 3 0\n";
        let outcome = parse_solver_output(stdout, Duration::ZERO).unwrap().unwrap();
        let solution = outcome.into_solution().unwrap();
        assert_eq!(solution.true_variables(), vec![1, 3]);
        assert_eq!(solution.value(2), Some(false));
    }

    #[test]
    fn test_parse_split_model_lines() {
        let stdout = "s SATISFIABLE\nv 1 -2\nv -3 4 0\n";
        let solution = parse_solver_output(stdout, Duration::ZERO)
            .unwrap()
            .unwrap()
            .into_solution()
            .unwrap();
        assert_eq!(solution.assignment.len(), 4);
        assert_eq!(solution.true_variables(), vec![1, 4]);
    }

    #[test]
    fn test_parse_unsat() {
        let outcome = parse_solver_output("s UNSATISFIABLE\n", Duration::ZERO).unwrap().unwrap();
        assert!(!outcome.is_satisfiable());
    }

    #[test]
    fn test_parse_unrecognised_and_truncated() {
        assert!(parse_solver_output("hello\n", Duration::ZERO).unwrap().is_none());
        assert!(parse_solver_output("", Duration::ZERO).unwrap().is_none());
        assert!(matches!(
            parse_solver_output("s SATISFIABLE\nv 1 2\n", Duration::ZERO),
            Err(PicrossError::UnexpectedOutput(_))
        ));
        assert!(parse_solver_output("v 1 x 0\n", Duration::ZERO).is_err());
    }

    #[test]
    fn test_missing_executable() {
        let mut solver = ExternalSolver::new("/nonexistent/picross-solver", Duration::from_secs(1));
        solver.add_clause(&Clause::unit(1));
        assert!(matches!(solver.solve(), Err(PicrossError::SolverUnavailable { .. })));
    }

    #[test]
    fn test_declare_variables_keeps_clauses() {
        let mut solver = ExternalSolver::new("gophersat", Duration::from_secs(1));
        solver.add_clause(&Clause::binary(1, -2));
        solver.declare_variables(6);
        assert_eq!(solver.document().variable_count(), 6);
        assert_eq!(solver.document().clause_count(), 1);
        solver.declare_variables(3);
        assert_eq!(solver.document().variable_count(), 6);
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("solver.sh");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn test_model_accepted_with_nonzero_exit() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "echo 's SATISFIABLE'; echo 'v -1 2 0'; exit 10");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10));
            solver.add_clause(&Clause::unit(2));

            let solution = solver.solve().unwrap().into_solution().unwrap();
            assert_eq!(solution.true_variables(), vec![2]);
        }

        #[test]
        fn test_solver_receives_cnf_path() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "grep -q '^p cnf 3 1$' \"$1\" && echo 's UNSATISFIABLE'");
            let cnf = dir.path().join("kept.cnf");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10)).with_cnf_file(&cnf, true);
            solver.add_clause(&Clause::new(vec![1, 2, 3]));

            assert!(!solver.solve().unwrap().is_satisfiable());
            assert!(cnf.exists());
        }

        #[test]
        fn test_cnf_removed_unless_kept() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "echo 's UNSATISFIABLE'");
            let cnf = dir.path().join("scratch.cnf");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10)).with_cnf_file(&cnf, false);
            solver.add_clause(&Clause::unit(1));

            solver.solve().unwrap();
            assert!(!cnf.exists());
        }

        #[test]
        fn test_scratch_cnf_removed_after_run() {
            let dir = TempDir::new().unwrap();
            let seen = dir.path().join("seen");
            let exe = script(
                &dir,
                &format!("echo \"$1\" > '{}'\ngrep -q '^p cnf 1 1$' \"$1\" && echo 's UNSATISFIABLE'", seen.display()),
            );
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10));
            solver.add_clause(&Clause::unit(1));

            assert!(!solver.solve().unwrap().is_satisfiable());
            let cnf = PathBuf::from(std::fs::read_to_string(&seen).unwrap().trim());
            let name = cnf.file_name().unwrap().to_string_lossy().into_owned();
            assert!(name.starts_with("picross-") && name.ends_with(".cnf"), "{}", name);
            assert!(!cnf.exists());
        }

        #[test]
        fn test_scratch_cnf_removed_after_timeout() {
            let dir = TempDir::new().unwrap();
            let seen = dir.path().join("seen");
            let exe = script(&dir, &format!("echo \"$1\" > '{}'\nexec sleep 30", seen.display()));
            let mut solver = ExternalSolver::new(exe, Duration::from_millis(500));
            solver.add_clause(&Clause::unit(1));

            assert!(matches!(solver.solve(), Err(PicrossError::SolverTimeout(_))));
            let cnf = PathBuf::from(std::fs::read_to_string(&seen).unwrap().trim());
            assert!(!cnf.exists());
        }

        #[test]
        fn test_open_pipe_does_not_outlive_deadline() {
            // the backgrounded sleep keeps stdout open after the script exits
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "sleep 30 &\necho 's UNSATISFIABLE'");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(1));
            solver.add_clause(&Clause::unit(1));

            let start = Instant::now();
            assert!(!solver.solve().unwrap().is_satisfiable());
            assert!(start.elapsed() < Duration::from_secs(10));
        }

        #[test]
        fn test_failure_without_marker() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "echo 'boom' >&2; exit 3");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10));
            solver.add_clause(&Clause::unit(1));

            match solver.solve() {
                Err(PicrossError::SolverFailed { stderr, .. }) => assert_eq!(stderr, "boom"),
                other => panic!("unexpected result: {:?}", other.map(|o| o.is_satisfiable())),
            }
        }

        #[test]
        fn test_clean_exit_without_marker() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "echo 'thinking'");
            let mut solver = ExternalSolver::new(exe, Duration::from_secs(10));
            solver.add_clause(&Clause::unit(1));
            assert!(matches!(solver.solve(), Err(PicrossError::UnexpectedOutput(_))));
        }

        #[test]
        fn test_timeout_kills_solver() {
            let dir = TempDir::new().unwrap();
            let exe = script(&dir, "exec sleep 30");
            let mut solver = ExternalSolver::new(exe, Duration::from_millis(200));
            solver.add_clause(&Clause::unit(1));

            let start = Instant::now();
            assert!(matches!(solver.solve(), Err(PicrossError::SolverTimeout(_))));
            assert!(start.elapsed() < Duration::from_secs(10));
        }
    }
}
