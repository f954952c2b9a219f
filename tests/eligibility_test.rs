//! Data-driven eligibility tests
//!
//! Each case starts from a known-good legacy body and applies one change.

use isoltest_extract::classify::DENIED_CONSTRUCTS;
use isoltest_extract::{parse_call, Test};
use rstest::rstest;

const BASE: &str = r#"{
	// Stores and returns a value.
	char const* sourceCode = R"(
		contract C {
			uint x;
			function set(uint v) public { x = v; }
			function get() public returns (uint) { return x; }
		}
	)";
	compileAndRun(sourceCode);
	ABI_CHECK(callContractFunction("set(uint256)", u256(5)), encodeArgs());
	// after set
	ABI_CHECK(callContractFunction("get()"), encodeArgs(u256(5)));
}
"#;

fn analysed(body: &str) -> Test {
    let mut test = Test::new("case", body);
    test.analyse();
    test
}

// ============================================================================
// Single-change scenarios
// ============================================================================

#[rstest]
#[case("unchanged", "", "", true)]
#[case("no_delimiter", "R\"(", "\"(", false)]
#[case("no_run", "compileAndRun(sourceCode);", "", false)]
#[case(
    "two_runs",
    "compileAndRun(sourceCode);",
    "compileAndRun(sourceCode);\n\tcompileAndRun(sourceCode);",
    false
)]
#[case(
    "foreign_assertion",
    "ABI_CHECK(callContractFunction(\"get()\")",
    "ABI_CHECK(m_output, encodeArgs(u256(5)));\n\tABI_CHECK(callContractFunction(\"get()\")",
    false
)]
#[case(
    "unknown_encoder",
    "encodeArgs(u256(5)));",
    "encodeRefArgs(u256(5)));",
    false
)]
#[case("unknown_literal", "u256(5)), encodeArgs());", "h160(5)), encodeArgs());", false)]
#[case("hex_literal", "u256(5)), encodeArgs());", "u256(0x05)), encodeArgs());", true)]
#[case(
    "run_inside_yul_block",
    "compileAndRun(sourceCode);",
    "ALSO_VIA_YUL(compileAndRun(sourceCode);)",
    true
)]
fn test_eligibility_scenarios(
    #[case] name: &str,
    #[case] from: &str,
    #[case] to: &str,
    #[case] expected: bool,
) {
    let body = if from.is_empty() {
        BASE.to_string()
    } else {
        BASE.replacen(from, to, 1)
    };
    let test = analysed(&body);
    assert_eq!(
        test.is_eligible(),
        expected,
        "{}: {:?}",
        name,
        test.eligibility.reasons()
    );
}

#[test]
fn test_base_extraction() {
    let test = analysed(BASE);
    assert_eq!(test.description, "Stores and returns a value.");
    assert_eq!(
        test.calls,
        vec![
            "set(uint256): 5 -> ".to_string(),
            "get() -> 5 # after set #".to_string(),
        ]
    );
}

#[test]
fn test_run_inside_yul_block_keeps_description_only() {
    // the run invocation is no longer at line start, so the test section never opens
    let test = analysed(&BASE.replacen(
        "compileAndRun(sourceCode);",
        "ALSO_VIA_YUL(compileAndRun(sourceCode);)",
        1,
    ));
    assert!(test.also_via_yul);
    assert_eq!(test.description, "Stores and returns a value.");
    assert_eq!(test.calls[1], "get() -> 5");
}

#[test]
fn test_every_denied_construct_disqualifies() {
    for construct in DENIED_CONSTRUCTS {
        let body = BASE.replacen(
            "compileAndRun(sourceCode);",
            &format!("compileAndRun(sourceCode);\n\t{}", construct),
            1,
        );
        let test = analysed(&body);
        assert!(!test.is_eligible(), "{} should disqualify", construct);
        assert!(test.calls.is_empty(), "{} should stop extraction", construct);
    }
}

#[test]
fn test_denied_substring_inside_identifier() {
    // flat substring search: `m_senderBalance` still hits `m_sender`
    let body = BASE.replacen(
        "compileAndRun(sourceCode);",
        "compileAndRun(sourceCode);\n\tauto m_senderBalance = 0;",
        1,
    );
    assert!(!analysed(&body).is_eligible());
}

#[rstest]
#[case(
    r#"ABI_CHECK(callContractFunction("f(uint256)", u256(1)), encodeArgs(u256(2)));"#,
    "f(uint256): 1 -> 2"
)]
// `: ` is only written when there are arguments
#[case(r#"ABI_CHECK(callContractFunction("g()"), fromHex("1234"));"#, "g() -> 0x1234")]
#[case(
    r#"ABI_CHECK(callContractFunction("h(bool,string)", true, "x"), encodeArgs("false"));"#,
    r#"h(bool,string): true, "x" -> false"#
)]
#[case(
    r#"ABI_CHECK(callContractFunction("k()"), encodeDyn(string("hello")));"#,
    r#"k() -> "hello""#
)]
fn test_call_rendering(#[case] line: &str, #[case] expected: &str) {
    let call = parse_call(line, "").unwrap();
    assert!(call.unresolved.is_empty());
    assert_eq!(call.line.to_string(), expected);
}
