//! Migration driver — scan, classify, extract and emit a whole test source
//!
//! Each test is processed on its own; a test that cannot be migrated only
//! counts against the summary. I/O failures while writing are the only
//! errors.

use crate::config::OutputLayout;
use crate::emit;
use crate::error::Result;
use crate::extract::Test;
use crate::report::{MigrationReport, TestOutcome};
use crate::scan::scan;
use tracing::info;

/// Scan and analyse every test in a C++ source
pub fn analyse(source: &str) -> Vec<Test> {
    scan(source)
        .into_iter()
        .map(|block| {
            let mut test = Test::new(block.name, block.body);
            test.analyse();
            test
        })
        .collect()
}

/// Analyse every test without writing anything
pub fn check(source: &str) -> MigrationReport {
    let mut report = MigrationReport::default();
    for test in analyse(source) {
        report.push(TestOutcome::new(&test, None));
    }
    report
}

/// Analyse every test and write the eligible ones into `layout`
pub fn migrate(source: &str, layout: &OutputLayout) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();
    for test in analyse(source) {
        let output = emit::write(&test, layout)?;
        report.push(TestOutcome::new(&test, output));
    }
    info!(
        target: "isoltest::migrate",
        dir = %layout.dir().display(),
        summary = %report.summary,
        "migration finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"BOOST_AUTO_TEST_CASE(ok)
{
	char const* sourceCode = R"(contract C {})";
	compileAndRun(sourceCode);
	ABI_CHECK(callContractFunction("f()"), encodeArgs(1));
}

BOOST_AUTO_TEST_CASE(no_source)
{
	compileAndRun(sourceCode);
}
"#;

    #[test]
    fn test_check_counts() {
        let report = check(SOURCE);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.extractable, 1);
        assert_eq!(report.tests[0].name, "ok");
        assert_eq!(report.tests[0].calls, vec!["f() -> 1".to_string()]);
        assert!(report.tests.iter().all(|t| t.output.is_none()));
    }

    #[test]
    fn test_crlf_source_matches_lf() {
        let crlf = SOURCE.replace('\n', "\r\n");
        assert_eq!(check(&crlf), check(SOURCE));
        assert_eq!(
            check(&crlf).summary.to_string(),
            "2 = 1 extractable + 1 not extractable"
        );
    }

    #[test]
    fn test_empty_source() {
        let report = check("");
        assert_eq!(report.summary.total, 0);
        assert!(report.tests.is_empty());
    }
}
