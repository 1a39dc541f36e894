// Service exports
pub mod predictor;
pub mod store;

pub use predictor::{LinearModel, ModelError};
pub use store::{DestinationStore, StoreError};
