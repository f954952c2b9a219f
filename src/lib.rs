// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # isoltest-extract
//!
//! Migrates imperative end-to-end test cases into declarative isoltest
//! semantic tests.
//!
//! ## Core Concept
//!
//! A legacy test is a C++ block with an embedded Solidity snippet and a
//! sequence of call-and-assert statements:
//!
//! ```text
//! BOOST_AUTO_TEST_CASE(getter)
//! {
//!     // Reads back a constant.
//!     char const* sourceCode = R"(
//!         contract C { function f(uint a) public returns (uint) { return a; } }
//!     )";
//!     compileAndRun(sourceCode);
//!     ABI_CHECK(callContractFunction("f(uint256)", u256(1)), encodeArgs(u256(1)));
//! }
//! ```
//!
//! When the test only uses constructs the declarative format can express, it
//! becomes:
//!
//! ```text
//! // Reads back a constant.
//!         contract C { function f(uint a) public returns (uint) { return a; } }
//!
//! // ----
//! // f(uint256): 1 -> 1
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isoltest_extract::{migrate, OutputLayout};
//!
//! let source = std::fs::read_to_string("SolidityEndToEndTest.cpp")?;
//! let report = migrate(&source, &OutputLayout::default())?;
//! println!("{}", report.summary);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  C++ SOURCE ──► scan ──► (name, body)                       │
//! │                              │                              │
//! │                              ├──► classify ──► Eligibility  │
//! │                              │                              │
//! │                              ├──► extract ──► call lines    │
//! │                              │      └─ call ─ literal       │
//! │                              │                              │
//! │                              └──► emit ──► <name>.sol       │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A test that fails any check is counted as not extractable and produces
//! no file. Nothing about a single test is ever fatal.

// Core engine
pub mod call;
pub mod classify;
pub mod extract;
pub mod literal;

// Input, output and driving
pub mod config;
pub mod emit;
pub mod error;
pub mod migrate;
pub mod report;
pub mod scan;

// Re-exports
pub use call::{parse_call, CallLine, CallShape, ParsedCall};
pub use classify::{classify, Classification, Disqualification, Eligibility};
pub use config::{MigrateConfig, NamingConfig, OutputConfig, OutputLayout};
pub use emit::render;
pub use error::{Error, Result};
pub use extract::Test;
pub use literal::{evaluate, Evaluation, Literal};
pub use migrate::{analyse, check, migrate};
pub use report::{MigrationReport, Summary, TestOutcome};
pub use scan::{scan, TestBlock};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
