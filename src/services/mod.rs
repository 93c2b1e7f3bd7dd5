//! External collaborators: market data, narration, delivery, charts.

pub mod alpaca;
pub mod chart;
pub mod delivery;
pub mod errors;
pub mod groq;
pub mod market_data;
pub mod narration;
pub mod telegram;

pub use alpaca::AlpacaMarketData;
pub use chart::{ChartSource, UrlTemplateChart};
pub use delivery::Deliverer;
pub use errors::{ClientInitError, DeliveryError, FetchError, NarrationError};
pub use groq::GroqNarrator;
pub use market_data::MarketDataProvider;
pub use narration::Narrator;
pub use telegram::TelegramDeliverer;
