//! Migration report — per-test outcomes and the run summary

use crate::classify::Disqualification;
use crate::extract::Test;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What happened to one test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub eligible: bool,
    pub also_via_yul: bool,
    /// Rendered call lines (empty when classification failed)
    pub calls: Vec<String>,
    /// Why the test was not migrated
    pub reasons: Vec<Disqualification>,
    /// Written file, if any
    pub output: Option<PathBuf>,
}

impl TestOutcome {
    pub fn new(test: &Test, output: Option<PathBuf>) -> Self {
        Self {
            name: test.name.clone(),
            eligible: test.is_eligible(),
            also_via_yul: test.also_via_yul,
            calls: test.calls.clone(),
            reasons: test.eligibility.reasons().to_vec(),
            output,
        }
    }
}

/// Aggregate tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub extractable: usize,
    pub not_extractable: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} extractable + {} not extractable",
            self.total, self.extractable, self.not_extractable
        )
    }
}

/// Result of migrating one input file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub tests: Vec<TestOutcome>,
    pub summary: Summary,
}

impl MigrationReport {
    pub fn push(&mut self, outcome: TestOutcome) {
        self.summary.total += 1;
        if outcome.eligible {
            self.summary.extractable += 1;
        } else {
            self.summary.not_extractable += 1;
        }
        self.tests.push(outcome);
    }

    /// Human readable report
    ///
    /// With `verbose`, the call lines of every extractable test are listed
    /// under its name.
    pub fn to_report(&self, verbose: bool) -> String {
        let mut out = String::new();

        for test in &self.tests {
            if test.eligible {
                out.push_str(&format!("✓ {}\n", test.name));
                if verbose {
                    for call in &test.calls {
                        out.push_str(&format!("    {}\n", call));
                    }
                }
            } else {
                out.push_str(&format!("✗ {}\n", test.name));
                for reason in &test.reasons {
                    out.push_str(&format!("    - {}\n", reason));
                }
            }
        }

        out.push_str(&self.summary.to_string());
        out
    }
}
