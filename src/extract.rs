//! Test-case extraction — derive declarative call lines from a legacy test
//!
//! A [`Test`] is built from a `(name, body)` pair, classified, and, when the
//! classification allows it, walked line by line:
//!
//! - `//` comments before the run invocation form the test description;
//! - `//` comments after it attach to the next assertion only;
//! - every `ABI_CHECK(` line becomes one call line, in textual order.
//!
//! Literal evaluation happens here, so a test can still lose eligibility
//! during extraction (an unresolved literal or an unrecognized call shape).

use crate::call::parse_call;
use crate::classify::{classify, Disqualification, Eligibility, ASSERTION_PREFIX, RUN_INVOCATION};
use serde::Serialize;
use tracing::debug;

/// Comment marker in the legacy host language
const COMMENT: &str = "//";

/// Placeholder for an assertion line no call shape matched
pub const UNRECOGNIZED_CALL: &str = "?";

/// One legacy test unit
#[derive(Debug, Clone, Serialize)]
pub struct Test {
    pub name: String,
    /// Raw body; the embedded source is removed from it during analysis
    pub body: String,
    /// Embedded source snippet, verbatim
    pub source: String,
    /// Description collected from comments ahead of the run invocation
    pub description: String,
    /// Also run through the Yul pipeline
    pub also_via_yul: bool,
    /// Rendered call lines in textual order
    pub calls: Vec<String>,
    pub eligibility: Eligibility,
}

impl Test {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
            source: String::new(),
            description: String::new(),
            also_via_yul: false,
            calls: Vec::new(),
            eligibility: Eligibility::default(),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.eligibility.is_eligible()
    }

    /// Classify and, if eligible, extract the call lines
    ///
    /// Returns the final verdict.
    pub fn analyse(&mut self) -> bool {
        let classification = classify(&self.body);
        self.source = classification.source;
        self.body = classification.body;
        self.also_via_yul = classification.also_via_yul;
        for reason in classification.eligibility.reasons() {
            self.eligibility.disqualify(reason.clone());
        }

        if self.is_eligible() {
            self.extract_calls();
        }

        for reason in self.eligibility.reasons() {
            debug!(target: "isoltest::extract", test = %self.name, %reason, "not extractable");
        }
        self.is_eligible()
    }

    fn extract_calls(&mut self) {
        let mut description = String::new();
        let mut call_comment = String::new();
        let mut in_test_section = false;
        let mut seen_assertion = false;

        for line in self.body.lines().map(str::trim) {
            let comment = line.strip_prefix(COMMENT);

            if let (false, Some(text)) = (in_test_section, comment) {
                description.push_str(text);
                description.push('\n');
            }
            if line.starts_with(RUN_INVOCATION) {
                in_test_section = true;
            }
            if let (true, Some(text)) = (in_test_section, comment) {
                call_comment.push_str(text);
            }

            if line.starts_with(ASSERTION_PREFIX) {
                if !seen_assertion {
                    seen_assertion = true;
                    self.description = normalize_description(&description);
                }
                description.clear();

                let rendered = match parse_call(line, call_comment.trim()) {
                    Some(call) => {
                        for token in call.unresolved {
                            self.eligibility
                                .disqualify(Disqualification::UnresolvedLiteral { token });
                        }
                        call.line.to_string()
                    }
                    None => {
                        self.eligibility.disqualify(Disqualification::UnrecognizedCall {
                            line: line.to_string(),
                        });
                        UNRECOGNIZED_CALL.to_string()
                    }
                };
                self.calls.push(rendered);
                call_comment.clear();
            }
        }
    }
}

fn normalize_description(raw: &str) -> String {
    raw.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}
