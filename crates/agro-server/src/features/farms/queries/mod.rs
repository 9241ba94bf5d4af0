pub mod statistics;

pub use statistics::{FarmStatistics, FarmStatisticsError};
