//! Eligibility classification — can a legacy test be expressed declaratively?
//!
//! A test is eligible only if every structural check passes:
//!
//! 1. an embedded source snippet is found behind one of the raw-string
//!    delimiters in [`SOURCE_DELIMITER_TAGS`];
//! 2. none of the [`DENIED_CONSTRUCTS`] occurs in the rest of the body;
//! 3. [`RUN_INVOCATION`] occurs exactly once;
//! 4. every `ABI_CHECK(` line is a `callContractFunction` assertion.
//!
//! All checks always run so that every reason is recorded. Reasons are kept
//! in an [`Eligibility`], which can only accumulate: a disqualified test stays
//! disqualified.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Raw-string delimiter tags, tried in order (`R"TAG(` ... `)TAG";`)
pub const SOURCE_DELIMITER_TAGS: &[&str] = &["", "YY", "ABC", "**", "T", "DELIMITER", "XX"];

/// Harness internals and assertions the declarative format cannot express
pub const DENIED_CONSTRUCTS: &[&str] = &[
    "m_contractAddress",
    "m_compiler",
    "m_evmHost",
    "m_revertStrings",
    "m_optimiserSettings",
    "gasLimit(",
    "gasPrice(",
    "blockNumber(",
    "blockTimestamp(",
    "numLogTopics(",
    "logTopic(",
    "numLogs(",
    "m_output",
    "m_sender",
    "sendMessage(",
    "m_transactionSuccessful",
    "BOOST_CHECK",
    "BOOST_REQUIRE",
    "solidity::test::CommonOptions::get()",
    "bytes{",
    "bytes(",
    "testContractAgainstCppOnRange(",
    "testContractAgainstCpp(",
    "callContractFunctionWithValue(",
    ")YY\";",
];

/// Compiles and deploys the snippet; must appear exactly once
pub const RUN_INVOCATION: &str = "compileAndRun";

/// Start of any assertion line
pub const ASSERTION_PREFIX: &str = "ABI_CHECK(";

/// The only assertion form that can be migrated
pub const PERMITTED_ASSERTION: &str = "ABI_CHECK(callContractFunction";

/// Opts a test into the additional Yul pipeline run
pub const VIA_YUL_MARKER: &str = "ALSO_VIA_YUL";

/// Why a test cannot be migrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disqualification {
    /// No delimited source snippet, or an empty one
    MissingSource,
    /// A deny-listed substring occurs in the body
    DeniedConstruct { construct: String },
    /// The run invocation does not occur exactly once
    RunInvocationCount { count: usize },
    /// An `ABI_CHECK` that is not a `callContractFunction` assertion
    ForeignAssertion { line: String },
    /// An assertion line matching none of the call shapes
    UnrecognizedCall { line: String },
    /// A literal that did not evaluate
    UnresolvedLiteral { token: String },
}

impl fmt::Display for Disqualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disqualification::MissingSource => write!(f, "no embedded source snippet"),
            Disqualification::DeniedConstruct { construct } => {
                write!(f, "uses unsupported construct `{}`", construct)
            }
            Disqualification::RunInvocationCount { count } => {
                write!(f, "{} occurs {} times, expected once", RUN_INVOCATION, count)
            }
            Disqualification::ForeignAssertion { line } => {
                write!(f, "unsupported assertion: {}", line)
            }
            Disqualification::UnrecognizedCall { line } => {
                write!(f, "unrecognized call shape: {}", line)
            }
            Disqualification::UnresolvedLiteral { token } => {
                write!(f, "cannot evaluate literal `{}`", token)
            }
        }
    }
}

/// Monotonic eligibility verdict
///
/// Eligible exactly when no disqualification has been recorded. There is no
/// way to remove a reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    reasons: Vec<Disqualification>,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn disqualify(&mut self, reason: Disqualification) {
        self.reasons.push(reason);
    }

    /// Record `reason` unless `passed`
    pub fn require(&mut self, passed: bool, reason: impl FnOnce() -> Disqualification) {
        if !passed {
            self.disqualify(reason());
        }
    }

    pub fn reasons(&self) -> &[Disqualification] {
        &self.reasons
    }
}

/// Outcome of the structural pass over one test body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Embedded source snippet (empty if none was found)
    pub source: String,
    /// Body with the snippet removed
    pub body: String,
    pub also_via_yul: bool,
    pub eligibility: Eligibility,
}

/// Classify a raw test body
pub fn classify(raw_body: &str) -> Classification {
    let mut eligibility = Eligibility::default();

    let source = find_source(raw_body).unwrap_or_default();
    let body = if source.is_empty() {
        raw_body.to_string()
    } else {
        raw_body.replacen(&source, "", 1)
    };

    for construct in denied_constructs(&body) {
        eligibility.disqualify(Disqualification::DeniedConstruct {
            construct: construct.to_string(),
        });
    }

    let count = body.matches(RUN_INVOCATION).count();
    eligibility.require(count == 1, || Disqualification::RunInvocationCount { count });
    eligibility.require(!source.is_empty(), || Disqualification::MissingSource);

    let also_via_yul = body.contains(VIA_YUL_MARKER);

    for line in body.lines().map(str::trim) {
        if line.starts_with(ASSERTION_PREFIX) && !line.starts_with(PERMITTED_ASSERTION) {
            eligibility.disqualify(Disqualification::ForeignAssertion {
                line: line.to_string(),
            });
        }
    }

    Classification {
        source,
        body,
        also_via_yul,
        eligibility,
    }
}

/// First delimited source snippet, trying tags in order
pub fn find_source(body: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        SOURCE_DELIMITER_TAGS
            .iter()
            .map(|tag| {
                let tag = regex::escape(tag);
                Regex::new(&format!(r#"(?s)R"{tag}\((.+)\){tag}";"#))
                    .expect("source delimiter pattern is valid")
            })
            .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.captures(body))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every deny-listed substring present in `body`
pub fn denied_constructs(body: &str) -> Vec<&'static str> {
    DENIED_CONSTRUCTS
        .iter()
        .copied()
        .filter(|construct| body.contains(construct))
        .collect()
}
