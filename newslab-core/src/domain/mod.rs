//! Domain types for NewsLab

pub mod bar;
pub mod ids;
pub mod joined;
pub mod news;

pub use bar::{Candle, PriceBar};
pub use ids::EventId;
pub use joined::{JoinedRecord, PriceQuote};
pub use news::{EventType, Labels, NewsEvent, Provider, Sentiment, UnknownLabel};

/// Ticker symbol alias
pub type Ticker = String;
