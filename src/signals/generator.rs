use crate::indicators::volume::volume_ratio;
use crate::models::{IndicatorPoint, PriceBar, Severity, Signal, SignalCategory};
use crate::signals::categories::{RSI_OVERBOUGHT, RSI_OVERSOLD, VOLUME_SPIKE_RATIO};

pub struct SignalGenerator;

impl SignalGenerator {
    /// Evaluate the momentum, trend and volume rules against the latest bar.
    ///
    /// Rules run in that fixed order and each contributes at most one signal. A rule whose
    /// inputs are undefined contributes nothing.
    pub fn generate(latest_bar: &PriceBar, latest: &IndicatorPoint) -> Vec<Signal> {
        let mut signals = Vec::with_capacity(3);

        if let Some(rsi) = latest.rsi14 {
            signals.push(Self::momentum_signal(Self::analyze_rsi(rsi), rsi));
        }

        if let (Some(sma20), Some(sma50)) = (latest.sma20, latest.sma50) {
            signals.push(Self::trend_signal(Self::analyze_trend(
                latest_bar.close,
                sma20,
                sma50,
            )));
        }

        if let Some(ratio) = volume_ratio(latest_bar.volume, latest.volume_avg20) {
            if ratio > VOLUME_SPIKE_RATIO {
                signals.push(
                    Signal::new(
                        SignalCategory::Volume,
                        Severity::Elevated,
                        format!("📊 High volume: {:.2}x the 20-bar average", ratio),
                    )
                    .with_value(ratio),
                );
            }
        }

        signals
    }

    fn analyze_rsi(rsi: f64) -> RsiAnalysis {
        if rsi < RSI_OVERSOLD {
            RsiAnalysis::Oversold
        } else if rsi > RSI_OVERBOUGHT {
            RsiAnalysis::Overbought
        } else {
            RsiAnalysis::Neutral
        }
    }

    fn analyze_trend(close: f64, sma20: f64, sma50: f64) -> TrendAnalysis {
        if close > sma50 && close > sma20 {
            TrendAnalysis::StrongUptrend
        } else if close > sma50 {
            TrendAnalysis::Uptrend
        } else {
            TrendAnalysis::DowntrendOrWeak
        }
    }

    fn momentum_signal(analysis: RsiAnalysis, rsi: f64) -> Signal {
        let (severity, text) = match analysis {
            RsiAnalysis::Oversold => (Severity::Bullish, format!("🟢 RSI {:.1}: oversold", rsi)),
            RsiAnalysis::Overbought => {
                (Severity::Bearish, format!("🔴 RSI {:.1}: overbought", rsi))
            }
            RsiAnalysis::Neutral => (Severity::Neutral, format!("⚪ RSI {:.1}: neutral", rsi)),
        };
        Signal::new(SignalCategory::Momentum, severity, text).with_value(rsi)
    }

    fn trend_signal(analysis: TrendAnalysis) -> Signal {
        let (severity, text) = match analysis {
            TrendAnalysis::StrongUptrend => (
                Severity::Bullish,
                "🚀 Strong uptrend: price above SMA20 and SMA50",
            ),
            TrendAnalysis::Uptrend => (Severity::Bullish, "📈 Uptrend: price above SMA50"),
            TrendAnalysis::DowntrendOrWeak => {
                (Severity::Bearish, "📉 Downtrend/weak: price at or below SMA50")
            }
        };
        Signal::new(SignalCategory::Trend, severity, text)
    }
}

enum RsiAnalysis {
    Oversold,
    Overbought,
    Neutral,
}

enum TrendAnalysis {
    StrongUptrend,
    Uptrend,
    DowntrendOrWeak,
}
