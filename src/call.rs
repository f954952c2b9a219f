//! Call-pattern matching — decompose one `ABI_CHECK` line into a call line
//!
//! Only five assertion shapes are understood. Each is a [`CallShape`]
//! variant with its own pattern; shapes are tried in [`CallShape::ALL`]
//! order and the first match wins.
//!
//! ```text
//! ABI_CHECK(callContractFunction("f(uint256)", u256(1)), encodeArgs(u256(2)));
//!                                 └─ signature ┘ └ args ┘            └ expected ┘
//!   ──►  f(uint256): 1 -> 2
//! ```

use crate::literal;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Supported call-and-assert shapes, in matching priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    /// `callContractFunction("sig", args), encodeArgs(values)`
    ArgsEncoded,
    /// `callContractFunction("sig", args), fromHex("bytes")`
    ArgsRawHex,
    /// `callContractFunction("sig"), encodeArgs(values)`
    Encoded,
    /// `callContractFunction("sig"), encodeDyn(values)`
    EncodedDyn,
    /// `callContractFunction("sig"), fromHex("bytes")`
    RawHex,
}

impl CallShape {
    pub const ALL: [CallShape; 5] = [
        CallShape::ArgsEncoded,
        CallShape::ArgsRawHex,
        CallShape::Encoded,
        CallShape::EncodedDyn,
        CallShape::RawHex,
    ];

    fn pattern(self) -> &'static str {
        match self {
            CallShape::ArgsEncoded => {
                r#"(?i)ABI_CHECK\(callContractFunction\("(.*)",((?s:.)*)\), encodeArgs\(((?s:.)*)\)\);"#
            }
            CallShape::ArgsRawHex => {
                r#"(?i)ABI_CHECK\(callContractFunction\("(.*)",((?s:.)*)\), fromHex\("((?s:.)*)"\)\);"#
            }
            CallShape::Encoded => {
                r#"(?i)ABI_CHECK\(callContractFunction\("(.*)"\), encodeArgs\(((?s:.)*)\)\);"#
            }
            CallShape::EncodedDyn => {
                r#"(?i)ABI_CHECK\(callContractFunction\("(.*)"\), encodeDyn\(((?s:.)*)\)\);"#
            }
            CallShape::RawHex => {
                r#"(?i)ABI_CHECK\(callContractFunction\("(.*)"\), fromHex\("((?s:.)*)"\)\);"#
            }
        }
    }

    fn regex(self) -> &'static Regex {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            CallShape::ALL
                .iter()
                .map(|shape| Regex::new(shape.pattern()).expect("call shape pattern is valid"))
                .collect()
        });
        &patterns[self as usize]
    }

    /// Whether this shape carries an explicit argument list
    pub fn has_arguments(self) -> bool {
        matches!(self, CallShape::ArgsEncoded | CallShape::ArgsRawHex)
    }

    /// Whether the expectation is a raw hex byte string
    pub fn is_raw_hex(self) -> bool {
        matches!(self, CallShape::ArgsRawHex | CallShape::RawHex)
    }

    /// Split `line` into its raw parts if it has this shape
    pub fn split(self, line: &str) -> Option<RawCall<'_>> {
        let caps = self.regex().captures(line)?;
        let signature = caps.get(1)?.as_str();
        let (arguments, expected) = if self.has_arguments() {
            (caps.get(2)?.as_str(), caps.get(3)?.as_str())
        } else {
            ("", caps.get(2)?.as_str())
        };
        Some(RawCall {
            shape: self,
            signature,
            arguments,
            expected,
        })
    }
}

/// The unevaluated pieces of a matched assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCall<'a> {
    pub shape: CallShape,
    pub signature: &'a str,
    pub arguments: &'a str,
    pub expected: &'a str,
}

/// One declarative assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLine {
    pub signature: String,
    pub arguments: String,
    pub expected: String,
    pub comment: String,
}

impl fmt::Display for CallLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature)?;
        if !self.arguments.is_empty() {
            write!(f, ": {}", self.arguments)?;
        }
        write!(f, " -> {}", self.expected)?;
        if !self.comment.is_empty() {
            write!(f, " # {} #", self.comment)?;
        }
        Ok(())
    }
}

/// A recognized assertion, possibly with literals that failed to evaluate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCall {
    pub shape: CallShape,
    pub line: CallLine,
    /// Tokens rendered as `?`; any entry makes the owning test ineligible
    pub unresolved: Vec<String>,
}

/// Match an assertion line against the known shapes
///
/// Returns `None` when no shape matches; the caller treats that line as
/// unrecognized.
pub fn parse_call(line: &str, comment: &str) -> Option<ParsedCall> {
    let raw = CallShape::ALL.iter().find_map(|shape| shape.split(line))?;

    let arguments = literal::evaluate(raw.arguments);
    let expected = if raw.shape.is_raw_hex() {
        literal::evaluate(&format!("0x{}", raw.expected))
    } else {
        literal::evaluate(raw.expected)
    };

    let mut unresolved = arguments.unresolved;
    unresolved.extend(expected.unresolved);

    Some(ParsedCall {
        shape: raw.shape,
        line: CallLine {
            signature: raw.signature.trim().to_string(),
            arguments: arguments.rendered,
            expected: expected.rendered,
            comment: comment.to_string(),
        },
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(line: &str, comment: &str) -> Option<String> {
        parse_call(line, comment).map(|call| call.line.to_string())
    }

    #[test]
    fn test_arguments_and_encoded_result() {
        assert_eq!(
            render(
                r#"ABI_CHECK(callContractFunction("f(uint256)", u256(1)), encodeArgs(u256(2)));"#,
                ""
            ),
            Some("f(uint256): 1 -> 2".to_string())
        );
    }

    #[test]
    fn test_raw_hex_without_arguments() {
        let call = parse_call(r#"ABI_CHECK(callContractFunction("g()"), fromHex("1234"));"#, "")
            .unwrap();
        assert_eq!(call.shape, CallShape::RawHex);
        // no `: ` without arguments, even for raw-hex calls
        assert_eq!(call.line.to_string(), "g() -> 0x1234");
    }

    #[test]
    fn test_raw_hex_with_arguments() {
        let call = parse_call(
            r#"ABI_CHECK(callContractFunction("h(uint256)", 10), fromHex("00ff"));"#,
            "",
        )
        .unwrap();
        assert_eq!(call.shape, CallShape::ArgsRawHex);
        assert_eq!(call.line.to_string(), "h(uint256): 10 -> 0xff");
    }

    #[test]
    fn test_encoded_without_arguments() {
        let call =
            parse_call(r#"ABI_CHECK(callContractFunction("f()"), encodeArgs(true, 7));"#, "")
                .unwrap();
        assert_eq!(call.shape, CallShape::Encoded);
        assert_eq!(call.line.to_string(), "f() -> true, 7");
    }

    #[test]
    fn test_encode_dyn() {
        let call = parse_call(
            r#"ABI_CHECK(callContractFunction("s()"), encodeDyn(string("abc")));"#,
            "",
        )
        .unwrap();
        assert_eq!(call.shape, CallShape::EncodedDyn);
        assert_eq!(call.line.to_string(), r#"s() -> "abc""#);
    }

    #[test]
    fn test_empty_expectation_keeps_arrow() {
        assert_eq!(
            render(r#"ABI_CHECK(callContractFunction("f()"), encodeArgs());"#, ""),
            Some("f() -> ".to_string())
        );
    }

    #[test]
    fn test_comment_is_attached() {
        assert_eq!(
            render(
                r#"ABI_CHECK(callContractFunction("f()"), encodeArgs(1));"#,
                "first call"
            ),
            Some("f() -> 1 # first call #".to_string())
        );
    }

    #[test]
    fn test_signature_is_trimmed() {
        assert_eq!(
            render(r#"ABI_CHECK(callContractFunction(" f() "), encodeArgs(1));"#, ""),
            Some("f() -> 1".to_string())
        );
    }

    #[test]
    fn test_hex_flag_spans_arguments_and_expectation_separately() {
        let call = parse_call(
            r#"ABI_CHECK(callContractFunction("f(uint256,uint256)", 0x10, 16), encodeArgs(u256(32)));"#,
            "",
        )
        .unwrap();
        assert_eq!(call.line.arguments, "0x10, 0x10");
        assert_eq!(call.line.expected, "32");
    }

    #[test]
    fn test_unresolved_literal_is_reported() {
        let call = parse_call(
            r#"ABI_CHECK(callContractFunction("f(bytes32)", h256(1)), encodeArgs(x));"#,
            "",
        )
        .unwrap();
        assert_eq!(call.line.to_string(), "f(bytes32): ? -> ?");
        assert_eq!(call.unresolved, vec!["h256(1".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(parse_call(r#"ABI_CHECK(callContractFunction("f()"), bytes());"#, "").is_none());
        assert!(parse_call(r#"ABI_CHECK(callContractFunction("f()"), encodeArgs(1))"#, "").is_none());
        assert!(parse_call("ABI_CHECK(m_output, encodeArgs(1));", "").is_none());
    }

    #[test]
    fn test_shape_flags() {
        assert!(CallShape::ArgsEncoded.has_arguments());
        assert!(!CallShape::EncodedDyn.has_arguments());
        assert!(CallShape::RawHex.is_raw_hex());
        assert!(!CallShape::Encoded.is_raw_hex());
    }

    #[test]
    fn test_call_line_display() {
        let line = CallLine {
            signature: "f(uint256)".into(),
            arguments: "1".into(),
            expected: String::new(),
            comment: "c".into(),
        };
        assert_eq!(line.to_string(), "f(uint256): 1 ->  # c #");
    }
}
