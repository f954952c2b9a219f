//! Discover legacy test blocks in a C++ test source
//!
//! A block starts after a `BOOST_AUTO_TEST_CASE(name)` line, opens with a line
//! that is exactly `{` and closes with a line that is exactly `}`. Both brace
//! lines are part of the body. CRLF line endings are read as LF.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// A `(name, body)` pair found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestBlock {
    pub name: String,
    pub body: String,
}

/// Scan a C++ source for test blocks
///
/// Blocks are returned in first-seen order. A later block with the same name
/// replaces the earlier one in place.
pub fn scan(source: &str) -> Vec<TestBlock> {
    static TEST_CASE: OnceLock<Regex> = OnceLock::new();
    let test_case = TEST_CASE.get_or_init(|| {
        Regex::new(r"(?i)BOOST_AUTO_TEST_CASE\((.*)\)").expect("test case pattern is valid")
    });

    let mut blocks: Vec<TestBlock> = Vec::new();
    let mut name = String::new();
    let mut body = String::new();
    let mut inside = false;

    for raw in source.split_inclusive('\n') {
        let line = match raw.strip_suffix("\r\n") {
            Some(content) => Cow::Owned(format!("{}\n", content)),
            None => Cow::Borrowed(raw),
        };
        let line = line.as_ref();
        if let Some(caps) = test_case.captures(line) {
            name = caps[1].to_string();
            body.clear();
        }
        if line == "{\n" {
            inside = true;
        }
        if inside {
            body.push_str(line);
        }
        if line == "}\n" {
            inside = false;
            if !name.is_empty() {
                let block = TestBlock {
                    name: name.clone(),
                    body: body.clone(),
                };
                match blocks.iter_mut().find(|b| b.name == block.name) {
                    Some(existing) => *existing = block,
                    None => blocks.push(block),
                }
            }
        }
    }

    blocks
}
