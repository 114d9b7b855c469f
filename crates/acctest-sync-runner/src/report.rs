//! Results of a test run.

use std::fmt;
use std::time::Duration;

/// Final state of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The body returned `Ok` and nothing below it failed.
    Passed,
    /// The body or one of its subtests failed.
    Failed,
    /// The body skipped itself.
    Skipped,
    /// The body panicked.
    Panicked,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Failed`] and [`Outcome::Panicked`].
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Failed | Outcome::Panicked)
    }

    /// Short label used in reports and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "pass",
            Outcome::Failed => "fail",
            Outcome::Skipped => "skip",
            Outcome::Panicked => "panic",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a test and all of its subtests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Full slash-separated name.
    pub name: String,
    /// Final outcome.
    pub outcome: Outcome,
    /// Wall time including cleanups.
    pub duration: Duration,
    /// Log lines and failure messages, in the order they were recorded.
    pub logs: Vec<String>,
    /// Subtests in the order they were started.
    pub children: Vec<TestReport>,
}

/// Leaf counts of a report tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Leaves that passed.
    pub passed: usize,
    /// Leaves that failed or panicked.
    pub failed: usize,
    /// Leaves that were skipped.
    pub skipped: usize,
}

impl Summary {
    /// Total number of leaves.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }
}

impl TestReport {
    /// Returns `true` unless this test or a subtest failed.
    pub fn passed(&self) -> bool {
        !self.outcome.is_failure()
    }

    /// Finds a descendant by its name relative to this report,
    /// e.g. `"Endpoint/basic"`.
    pub fn find(&self, relative: &str) -> Option<&TestReport> {
        let mut current = self;
        for part in relative.split('/') {
            let wanted = format!("{}/{}", current.name, part);
            current = current.children.iter().find(|c| c.name == wanted)?;
        }
        Some(current)
    }

    /// Last path component of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Reports without subtests, depth first.
    pub fn leaves(&self) -> Vec<&TestReport> {
        if self.children.is_empty() {
            return vec![self];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }

    /// Counts leaves by outcome.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for leaf in self.leaves() {
            match leaf.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed | Outcome::Panicked => summary.failed += 1,
            }
        }
        summary
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        let label = match self.outcome {
            Outcome::Passed => "PASS",
            Outcome::Skipped => "SKIP",
            Outcome::Failed | Outcome::Panicked => "FAIL",
        };
        writeln!(
            f,
            "{indent}--- {label}: {} ({:.2}s)",
            self.name,
            self.duration.as_secs_f64()
        )?;
        for line in &self.logs {
            writeln!(f, "{indent}    {line}")?;
        }
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
