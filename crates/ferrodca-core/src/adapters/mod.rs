//! Upstream adapters.

pub mod cnn;
pub mod yahoo;

pub use cnn::CnnFearGreedAdapter;
pub use yahoo::YahooChartAdapter;
