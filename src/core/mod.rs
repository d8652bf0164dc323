pub mod aggregator;
pub mod report;

pub use crate::domain::model::{Keyword, Report, Summary};
pub use crate::domain::ports::{CompetitorProvider, MetricsProvider, TrendsProvider};
pub use crate::utils::error::Result;
