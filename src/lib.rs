//! Vehicle Insurance Cross-Sell Predictor
//!
//! Serves predictions from a trained vehicle insurance response classifier,
//! loading the promoted model from object storage when credentials are
//! available and the newest local training artifact otherwise.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{FrameError, ResolveError};
pub use models::{ModelBundle, ModelResolver, ModelSource};
pub use types::{DataFrame, VehicleData};
