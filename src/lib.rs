pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod flows;

pub use api::{Flow, FlowError, FlowRunner, GenerationError, StoreError, ValidationError};
pub use crate::core::library::DocumentLibrary;
