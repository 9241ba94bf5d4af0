pub mod create;
pub mod create_cultivation;

pub use create::{CreateFarmCommand, CreateFarmError};
pub use create_cultivation::{CreateCultivationCommand, CreateCultivationError};
