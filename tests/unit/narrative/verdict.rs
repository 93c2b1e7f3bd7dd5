//! Unit tests for narration reply parsing

use stockpulse::narrative::{NarrativeVerdict, Recommendation, RiskLevel};

#[test]
fn test_parses_formatted_reply() {
    let reply = "📊 STATUS: Price holds above both averages on rising volume.\n\
                 💡 RECOMMENDATION: HOLD\n\
                 ⚠️ RISK: MEDIUM\n\
                 🎯 KEY LEVEL: $182.50";
    let verdict = NarrativeVerdict::parse(reply);

    assert_eq!(
        verdict.status.as_deref(),
        Some("Price holds above both averages on rising volume.")
    );
    assert_eq!(verdict.recommendation, Some(Recommendation::Hold));
    assert_eq!(verdict.risk, Some(RiskLevel::Medium));
    assert_eq!(verdict.key_level.as_deref(), Some("$182.50"));
}

#[test]
fn test_tolerates_markdown_and_case() {
    let reply = "**Recommendation:** buy (momentum)\n*risk:* high";
    let verdict = NarrativeVerdict::parse(reply);
    assert_eq!(verdict.recommendation, Some(Recommendation::Buy));
    assert_eq!(verdict.risk, Some(RiskLevel::High));
    assert!(verdict.key_level.is_none());
}

#[test]
fn test_free_text_is_empty_verdict() {
    let verdict = NarrativeVerdict::parse("The stock went sideways this week.");
    assert!(verdict.is_empty());
}

#[test]
fn test_unknown_values_and_na_key_level_are_dropped() {
    let verdict = NarrativeVerdict::parse("RECOMMENDATION: ACCUMULATE\nKEY LEVEL: n/a");
    assert!(verdict.recommendation.is_none());
    assert!(verdict.key_level.is_none());
}
