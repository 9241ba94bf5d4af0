pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateProducerCommand, CreateProducerError};
pub use delete::{DeleteProducerCommand, DeleteProducerError};
pub use update::{UpdateProducerCommand, UpdateProducerError};
