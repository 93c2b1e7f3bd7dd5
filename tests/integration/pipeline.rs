//! Orchestrator runs against fake collaborators

use crate::test_utils::{
    create_test_series, test_config, watchlist, FakeMarketData, FakeNarrator, FetchBehavior,
    RecordingDeliverer, TestPipeline,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stockpulse::config::DeliveryMode;
use stockpulse::models::{RunResult, Stage};
use stockpulse::pipeline::{PipelineContext, SymbolOrchestrator};
use stockpulse::report::NARRATIVE_FALLBACK;
use stockpulse::services::UrlTemplateChart;

const REPLY: &str = "📊 STATUS: Holding the trend.\n💡 RECOMMENDATION: HOLD\n⚠️ RISK: LOW\n🎯 KEY LEVEL: $100";

fn failed_stage(result: &RunResult) -> Option<(Stage, &str)> {
    match result {
        RunResult::Failed { stage, error, .. } => Some((*stage, error.as_str())),
        RunResult::Success(_) => None,
    }
}

#[tokio::test]
async fn batch_run_keeps_order_and_reports_failures() {
    let market_data = FakeMarketData::new()
        .with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 105.0)))
        .with("BBB", FetchBehavior::FailTimes(3, create_test_series("BBB", 60, 50.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA", "BBB"])).await;

    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.results[0].symbol(), "AAA");
    assert!(summary.results[0].is_success());
    assert_eq!(summary.results[1].symbol(), "BBB");
    let (stage, error) = failed_stage(&summary.results[1]).expect("BBB failed");
    assert_eq!(stage, Stage::Fetching);
    assert!(error.contains("503"));
    assert_eq!(pipeline.market_data.calls_for("BBB"), 3);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);

    let deliveries = pipeline.deliverer.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].destination, "-1001");
    let text = &deliveries[0].text;
    let aaa = text.find("*AAA*").expect("AAA report delivered");
    let bbb = text.find("❌ *BBB*").expect("BBB placeholder delivered");
    assert!(aaa < bbb);
    assert!(text.contains("Holding the trend."));
    assert!(summary.delivered());
}

#[tokio::test]
async fn fetch_retries_until_success() {
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::FailTimes(2, create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    assert!(summary.results[0].is_success());
    assert_eq!(pipeline.market_data.calls_for("AAA"), 3);
}

#[tokio::test]
async fn non_retryable_fetch_errors_fail_immediately() {
    let market_data = FakeMarketData::new().with("AAA", FetchBehavior::Unauthorized);
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA", "ZZZ"])).await;

    assert_eq!(pipeline.market_data.calls_for("AAA"), 1);
    assert_eq!(pipeline.market_data.calls_for("ZZZ"), 1);
    assert_eq!(failed_stage(&summary.results[0]).map(|f| f.0), Some(Stage::Fetching));
    assert_eq!(failed_stage(&summary.results[1]).map(|f| f.0), Some(Stage::Fetching));
}

#[tokio::test]
async fn fetch_timeout_counts_as_retryable_failure() {
    let mut config = test_config();
    config.fetch_timeout = Duration::from_millis(50);
    config.fetch_max_attempts = 2;
    let market_data = FakeMarketData::new().with("AAA", FetchBehavior::Hang);
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        config,
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    let (stage, error) = failed_stage(&summary.results[0]).expect("AAA failed");
    assert_eq!(stage, Stage::Fetching);
    assert!(error.contains("timed out"));
    assert_eq!(pipeline.market_data.calls_for("AAA"), 2);
}

#[tokio::test]
async fn short_history_fails_at_compute_without_narration() {
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 30, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    let (stage, error) = failed_stage(&summary.results[0]).expect("AAA failed");
    assert_eq!(stage, Stage::Computing);
    assert!(error.contains("insufficient history"));
    assert!(pipeline.narrator.requests().is_empty());

    let deliveries = pipeline.deliverer.deliveries();
    assert!(deliveries[0]
        .text
        .contains("❌ *AAA*: analysis failed (compute: insufficient history"));
}

#[tokio::test]
async fn narration_failure_falls_back() {
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::failing(),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    let report = summary.results[0].report().expect("report still composed");
    assert_eq!(report.narrative, NARRATIVE_FALLBACK);
    assert!(pipeline.deliverer.deliveries()[0]
        .text
        .contains(NARRATIVE_FALLBACK));
}

#[tokio::test]
async fn narration_timeout_falls_back() {
    let mut config = test_config();
    config.narration_timeout = Duration::from_millis(50);
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY).with_delay(Duration::from_secs(5)),
        RecordingDeliverer::new(),
        config,
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    let report = summary.results[0].report().expect("report still composed");
    assert_eq!(report.narrative, NARRATIVE_FALLBACK);
}

#[tokio::test]
async fn narration_receives_latest_facts() {
    let series = create_test_series("AAA", 60, 105.0);
    let prior_close = series.prior().expect("prior bar").close;
    let market_data = FakeMarketData::new().with("AAA", FetchBehavior::Series(series));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        test_config(),
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    let requests = pipeline.narrator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].symbol, "AAA");
    assert_eq!(requests[0].price, 105.0);
    let expected_change = (105.0 / prior_close - 1.0) * 100.0;
    assert!((requests[0].change_1d_pct - expected_change).abs() < 1e-9);
    assert!(requests[0].rsi14.is_some());
    assert!(requests[0].sma50.is_some());

    let report = summary.results[0].report().expect("report");
    assert_eq!(report.narrative, REPLY);
    assert_eq!(report.signals.len(), requests[0].signals.len());
}

#[tokio::test]
async fn per_symbol_mode_delivers_each_report_then_failures() {
    let mut config = test_config();
    config.delivery_mode = DeliveryMode::PerSymbol;
    let market_data = FakeMarketData::new()
        .with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)))
        .with("BBB", FetchBehavior::Series(create_test_series("BBB", 60, 20.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        config,
    );

    let summary = pipeline
        .orchestrator
        .run(&watchlist(&["AAA", "BBB", "CCC"]))
        .await;

    let deliveries = pipeline.deliverer.deliveries();
    assert_eq!(deliveries.len(), 3);
    assert_eq!(
        deliveries[0].text,
        summary.results[0].report().expect("AAA report").render()
    );
    assert_eq!(
        deliveries[1].text,
        summary.results[1].report().expect("BBB report").render()
    );
    assert!(deliveries[2].text.contains("❌ *CCC*"));
    assert!(!deliveries[2].text.contains("*AAA*"));
}

#[tokio::test]
async fn per_symbol_mode_without_failures_sends_no_summary() {
    let mut config = test_config();
    config.delivery_mode = DeliveryMode::PerSymbol;
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        config,
    );

    pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    assert_eq!(pipeline.deliverer.deliveries().len(), 1);
}

#[tokio::test]
async fn delivery_failure_does_not_change_results() {
    let mut config = test_config();
    config.delivery_mode = DeliveryMode::PerSymbol;
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::failing(),
        config,
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA", "BBB"])).await;

    assert!(summary.results[0].is_success());
    assert!(!summary.results[1].is_success());
    assert!(!summary.delivered());
    assert_eq!(summary.delivery_failures.len(), 2);
    assert_eq!(summary.delivery_failures[0].symbol.as_deref(), Some("AAA"));
    assert!(summary.delivery_failures[0].error.contains("403"));
    assert_eq!(summary.delivery_failures[1].symbol, None);
}

#[tokio::test]
async fn delivery_timeout_is_reported_without_failing_symbols() {
    let mut config = test_config();
    config.delivery_timeout = Duration::from_millis(50);
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::hanging(),
        config,
    );

    let started = Instant::now();
    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(summary.results[0].is_success());
    assert!(!summary.delivered());
    assert_eq!(summary.delivery_failures.len(), 1);
    assert_eq!(summary.delivery_failures[0].symbol, None);
    assert!(summary.delivery_failures[0].error.contains("timed out"));
    assert_eq!(pipeline.deliverer.deliveries().len(), 1);
}

#[tokio::test]
async fn per_symbol_delivery_timeout_names_the_symbol() {
    let mut config = test_config();
    config.delivery_timeout = Duration::from_millis(50);
    config.delivery_mode = DeliveryMode::PerSymbol;
    let market_data =
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::hanging(),
        config,
    );

    let summary = pipeline.orchestrator.run(&watchlist(&["AAA"])).await;

    assert!(summary.results[0].is_success());
    assert_eq!(summary.delivery_failures.len(), 1);
    assert_eq!(summary.delivery_failures[0].symbol.as_deref(), Some("AAA"));
    assert!(summary.delivery_failures[0].error.contains("timed out"));
}

#[tokio::test]
async fn symbols_are_paced_but_first_starts_immediately() {
    let mut config = test_config();
    config.symbol_delay = Duration::from_millis(100);
    let market_data = FakeMarketData::new()
        .with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0)))
        .with("BBB", FetchBehavior::Series(create_test_series("BBB", 60, 10.0)))
        .with("CCC", FetchBehavior::Series(create_test_series("CCC", 60, 10.0)));
    let pipeline = TestPipeline::new(
        market_data,
        FakeNarrator::replying(REPLY),
        RecordingDeliverer::new(),
        config,
    );

    let started = Instant::now();
    pipeline
        .orchestrator
        .run(&watchlist(&["AAA", "BBB", "CCC"]))
        .await;

    let calls = pipeline.market_data.call_times();
    let symbols: Vec<&str> = calls.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
    assert!(calls[0].1.duration_since(started) < Duration::from_millis(100));
    for pair in calls.windows(2) {
        assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(100));
    }
}

#[tokio::test]
async fn chart_image_reaches_narration_and_delivery() {
    let mut config = test_config();
    config.delivery_mode = DeliveryMode::PerSymbol;
    let market_data = Arc::new(
        FakeMarketData::new().with("AAA", FetchBehavior::Series(create_test_series("AAA", 60, 10.0))),
    );
    let narrator = Arc::new(FakeNarrator::replying(REPLY));
    let deliverer = Arc::new(RecordingDeliverer::new());
    let context = PipelineContext::new(market_data, narrator.clone(), deliverer.clone(), "-1001")
        .with_chart_source(Arc::new(UrlTemplateChart::new(
            "https://charts.example/{symbol}.png",
        )));
    let orchestrator = SymbolOrchestrator::new(context, config);

    let summary = orchestrator.run(&watchlist(&["AAA"])).await;

    let expected = "https://charts.example/AAA.png";
    let requests = narrator.requests();
    assert_eq!(requests[0].image.as_ref().map(|i| i.url.as_str()), Some(expected));
    let report = summary.results[0].report().expect("report");
    assert_eq!(report.image.as_ref().map(|i| i.url.as_str()), Some(expected));
    let deliveries = deliverer.deliveries();
    assert_eq!(deliveries[0].image.as_ref().map(|i| i.url.as_str()), Some(expected));
}
