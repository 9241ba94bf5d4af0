//! Producer registration: create, update and remove rural producers

pub mod commands;
pub mod routes;
pub mod types;

pub use commands::{
    CreateProducerCommand, CreateProducerError, DeleteProducerCommand, DeleteProducerError,
    UpdateProducerCommand, UpdateProducerError,
};

pub use routes::producers_routes;
