mod common;

use common::{TestResult, orders_document};
use fmresultset::{FmError, FmResultSet, ParseSettings, TextNormalizer};
use std::borrow::Cow;

#[test]
fn empty_input_fails_before_any_xml_work() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut parsed = FmResultSet::new();
    match parsed.parse(b"") {
        Err(FmError::EmptyDocument) => {}
        other => panic!("expected EmptyDocument, got {other:?}"),
    }
    // Empty input never consumed the state machine, so a real document still
    // goes through on the same instance.
    parsed.parse(orders_document().as_bytes())?;
    assert_eq!(parsed.result()?.records().len(), 2);
    Ok(())
}

#[test]
fn nonzero_error_code_is_classified_as_server_error() {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = common::document("401", "11.0.1.95", common::ORDERS_METADATA, "");
    let mut parsed = FmResultSet::new();
    match parsed.parse(doc.as_bytes()) {
        Err(FmError::ServerError(401)) => {}
        other => panic!("expected ServerError(401), got {other:?}"),
    }
    assert!(matches!(parsed.layout(), Err(FmError::NotYetParsed)));
}

#[test]
fn old_server_version_is_rejected_even_without_an_error_code() {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = common::document("0", "9.0.3", common::ORDERS_METADATA, common::ORDERS_RECORDS);
    let mut parsed = FmResultSet::new();
    match parsed.parse(doc.as_bytes()) {
        Err(FmError::UnsupportedServerVersion { found, required }) => {
            assert_eq!(found, "9.0.3");
            assert_eq!(required, fmresultset::MIN_SERVER_VERSION);
        }
        other => panic!("expected UnsupportedServerVersion, got {other:?}"),
    }
}

#[test]
fn version_floor_is_configurable() {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = ParseSettings::new().min_server_version("12.0");
    let mut parsed = FmResultSet::with_settings(settings);
    match parsed.parse(orders_document().as_bytes()) {
        Err(FmError::UnsupportedServerVersion { found, required }) => {
            assert_eq!(found, "11.0.1.95");
            assert_eq!(required, "12.0");
        }
        other => panic!("expected UnsupportedServerVersion, got {other:?}"),
    }
}

#[test]
fn malformed_xml_leaves_no_materializable_model() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut truncated = orders_document();
    truncated.truncate(truncated.len() / 2);
    let mut parsed = FmResultSet::new();
    match parsed.parse(truncated.as_bytes()) {
        Err(FmError::MalformedXml { line, .. }) => assert!(line >= 1),
        other => panic!("expected MalformedXml, got {other:?}"),
    }
    assert!(matches!(parsed.layout(), Err(FmError::NotYetParsed)));
    assert!(matches!(parsed.result(), Err(FmError::NotYetParsed)));
    // And again: failure is sticky.
    assert!(matches!(parsed.layout(), Err(FmError::NotYetParsed)));
}

#[test]
fn assembly_before_parse_reports_not_yet_parsed() {
    let _ = env_logger::builder().is_test(true).try_init();

    let parsed = FmResultSet::new();
    assert!(matches!(parsed.layout(), Err(FmError::NotYetParsed)));
    assert!(matches!(parsed.result(), Err(FmError::NotYetParsed)));
    assert!(matches!(parsed.server_version(), Err(FmError::NotYetParsed)));
}

#[test]
fn an_instance_parses_at_most_one_document() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let doc = orders_document();
    let mut parsed = FmResultSet::new();
    parsed.parse(doc.as_bytes())?;
    match parsed.parse(doc.as_bytes()) {
        Err(FmError::AlreadyParsed) => {}
        other => panic!("expected AlreadyParsed, got {other:?}"),
    }
    // The first parse's model is unaffected.
    assert_eq!(parsed.server_version()?, "11.0.1.95");
    Ok(())
}

struct Uppercase;

impl TextNormalizer for Uppercase {
    fn normalize<'a>(&self, raw: Cow<'a, str>) -> Cow<'a, str> {
        Cow::Owned(raw.to_uppercase())
    }
}

#[test]
fn normalizer_hook_sees_every_text_and_attribute_value() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let settings = ParseSettings::new().normalizer(Uppercase);
    let mut parsed = FmResultSet::with_settings(settings);
    parsed.parse(orders_document().as_bytes())?;
    let result = parsed.result()?;
    // Attribute values went through the hook too, so field names are
    // uppercased along with the data.
    let record = result.first_record().unwrap();
    assert_eq!(record.field("TITLE")?, ["FIRST ORDER"]);
    Ok(())
}
