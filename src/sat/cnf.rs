//! CNF documents and their DIMACS text form

use super::constraints::Clause;
use crate::error::{PicrossError, PicrossResult};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// A complete formula: header counts plus clauses in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfDocument {
    variable_count: usize,
    clauses: Vec<Clause>,
}

impl CnfDocument {
    /// `variable_count` is the allocator's high-water mark; clauses may not
    /// mention a higher id.
    pub fn new(variable_count: usize, clauses: Vec<Clause>) -> Self {
        debug_assert!(clauses.iter().all(|c| c.max_variable() <= variable_count));
        Self { variable_count, clauses }
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Raise the header's variable count; never lowers it
    pub fn declare_variables(&mut self, count: usize) {
        self.variable_count = self.variable_count.max(count);
    }

    /// Append a clause, growing the header if it mentions a new variable
    pub fn push(&mut self, clause: Clause) {
        self.variable_count = self.variable_count.max(clause.max_variable());
        self.clauses.push(clause);
    }

    /// True when every clause holds under `value`
    pub fn evaluate<F: Fn(i32) -> bool>(&self, value: F) -> bool {
        self.clauses.iter().all(|c| c.evaluate(&value))
    }

    pub fn write_dimacs<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_dimacs(writer, self.variable_count, &self.clauses)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> PicrossResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_dimacs(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PicrossResult<Self> {
        let content = std::fs::read_to_string(path)?;
        parse_dimacs(&content)
    }
}

impl fmt::Display for CnfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.variable_count, self.clauses.len())?;
        for clause in &self.clauses {
            for literal in &clause.literals {
                write!(f, "{} ", literal)?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

/// Header `p cnf V C`, then one clause per line terminated by `0`
pub fn write_dimacs<W: Write>(writer: &mut W, variable_count: usize, clauses: &[Clause]) -> std::io::Result<()> {
    writeln!(writer, "p cnf {} {}", variable_count, clauses.len())?;
    for clause in clauses {
        for literal in &clause.literals {
            write!(writer, "{} ", literal)?;
        }
        writeln!(writer, "0")?;
    }
    Ok(())
}

/// Parse DIMACS text. Comment lines (`c ...`) are skipped, clauses may span
/// lines, and the clause count must match the header.
pub fn parse_dimacs(text: &str) -> PicrossResult<CnfDocument> {
    let mut header: Option<(usize, usize)> = None;
    let mut clauses = Vec::new();
    let mut current = Vec::new();
    let mut last_line = 0;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        last_line = line_no;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('c') || trimmed.starts_with('%') {
            continue;
        }

        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(PicrossError::parse(line_no, "duplicate problem line"));
            }
            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() != 4 || parts[1] != "cnf" {
                return Err(PicrossError::parse(line_no, format!("malformed problem line `{}`", trimmed)));
            }
            let vars = parts[2]
                .parse()
                .map_err(|_| PicrossError::parse(line_no, format!("bad variable count `{}`", parts[2])))?;
            let count = parts[3]
                .parse()
                .map_err(|_| PicrossError::parse(line_no, format!("bad clause count `{}`", parts[3])))?;
            header = Some((vars, count));
            continue;
        }

        let (vars, _) = header.ok_or_else(|| PicrossError::parse(line_no, "clause before problem line"))?;
        for token in trimmed.split_whitespace() {
            let literal: i32 = token
                .parse()
                .map_err(|_| PicrossError::parse(line_no, format!("bad literal `{}`", token)))?;
            if literal == 0 {
                clauses.push(Clause::new(std::mem::take(&mut current)));
            } else if literal.unsigned_abs() as usize > vars {
                return Err(PicrossError::parse(
                    line_no,
                    format!("literal {} exceeds declared variable count {}", literal, vars),
                ));
            } else {
                current.push(literal);
            }
        }
    }

    let (vars, count) = header.ok_or_else(|| PicrossError::parse(last_line.max(1), "missing problem line"))?;
    if !current.is_empty() {
        return Err(PicrossError::parse(last_line, "last clause is not terminated by 0"));
    }
    if clauses.len() != count {
        return Err(PicrossError::parse(
            last_line,
            format!("header declares {} clauses, found {}", count, clauses.len()),
        ));
    }

    Ok(CnfDocument {
        variable_count: vars,
        clauses,
    })
}
