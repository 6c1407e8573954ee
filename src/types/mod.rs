//! Type definitions for the prediction pipeline

pub mod frame;
pub mod vehicle;

pub use frame::{Column, DataFrame, Value};
pub use vehicle::{VehicleData, VEHICLE_COLUMNS};
