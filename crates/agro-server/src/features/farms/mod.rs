//! Farms, their cultivations, and aggregate statistics

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateCultivationCommand, CreateCultivationError, CreateFarmCommand, CreateFarmError,
};
pub use queries::{FarmStatistics, FarmStatisticsError};

pub use routes::farms_routes;
