//! Unit tests for narration request building

use chrono::{Duration, TimeZone, Utc};
use stockpulse::models::{ImageRef, IndicatorPoint, PriceBar, Severity, Signal, SignalCategory};
use stockpulse::narrative::request::response_format;
use stockpulse::narrative::NarrativeRequestBuilder;

fn bar(day: i64, close: f64) -> PriceBar {
    let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::days(day);
    PriceBar::new(close, close, close, close, 1000.0, timestamp)
}

fn indicators() -> IndicatorPoint {
    IndicatorPoint {
        rsi14: Some(55.55),
        sma20: Some(101.0),
        sma50: None,
        volume_avg20: 1000.0,
    }
}

#[test]
fn test_builder_computes_changes() {
    let request = NarrativeRequestBuilder::build(
        "AAPL",
        &bar(8, 105.0),
        &bar(7, 100.0),
        &bar(1, 84.0),
        &indicators(),
        &[],
        None,
    );

    assert_eq!(request.symbol, "AAPL");
    assert_eq!(request.price, 105.0);
    assert!((request.change_1d_pct - 5.0).abs() < 1e-9);
    assert!((request.change_1w_pct - 25.0).abs() < 1e-9);
    assert_eq!(request.rsi14, Some(55.55));
    assert!(request.signals.is_empty());
}

#[test]
fn test_prompt_lists_facts_and_format() {
    let signals = vec![Signal::new(
        SignalCategory::Trend,
        Severity::Bullish,
        "📈 Uptrend: price above SMA50",
    )];
    let request = NarrativeRequestBuilder::build(
        "AAPL",
        &bar(8, 105.0),
        &bar(7, 100.0),
        &bar(7, 100.0),
        &indicators(),
        &signals,
        None,
    );
    let prompt = request.prompt();

    assert!(prompt.contains("Price: $105.00"));
    assert!(prompt.contains("1D change: +5.00%"));
    assert!(prompt.contains("RSI(14): 55.5"));
    assert!(prompt.contains("SMA20: $101.00"));
    assert!(prompt.contains("SMA50: n/a"));
    assert!(prompt.contains("- 📈 Uptrend: price above SMA50"));
    assert!(!prompt.contains("chart"));
    for line in response_format() {
        assert!(prompt.contains(&line));
    }
}

#[test]
fn test_prompt_without_signals_says_none() {
    let request = NarrativeRequestBuilder::build(
        "MSFT",
        &bar(2, 10.0),
        &bar(1, 10.0),
        &bar(1, 10.0),
        &IndicatorPoint::default(),
        &[],
        Some(ImageRef::url("https://charts.example/MSFT.png")),
    );
    let prompt = request.prompt();
    assert!(prompt.contains("Signals:\n- none"));
    assert!(prompt.contains("chart is attached"));
    assert!(request.image.is_some());
}

#[test]
fn test_response_format_lists_choices() {
    let format = response_format();
    assert_eq!(format.len(), 4);
    assert!(format[1].contains("BUY|HOLD|SELL"));
    assert!(format[2].contains("LOW|MEDIUM|HIGH"));
}
