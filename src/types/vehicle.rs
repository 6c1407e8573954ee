//! Customer record for vehicle insurance cross-sell prediction

use crate::error::FrameError;
use crate::types::frame::{Column, DataFrame, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column names in the order the trained pipeline saw them
pub const VEHICLE_COLUMNS: [&str; 11] = [
    "Gender",
    "Age",
    "Driving_License",
    "Region_Code",
    "Previously_Insured",
    "Annual_Premium",
    "Policy_Sales_Channel",
    "Vintage",
    "Vehicle_Age_lt_1_Year",
    "Vehicle_Age_gt_2_Years",
    "Vehicle_Damage_Yes",
];

/// Represents one customer to be scored for vehicle insurance interest.
///
/// Categorical fields are already encoded as integers the way the training
/// data was (gender 1 = male, one-hot vehicle age and damage flags).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleData {
    /// Gender (1 = male, 0 = female)
    #[serde(alias = "Gender")]
    pub gender: i64,

    /// Age in years
    #[serde(alias = "Age")]
    pub age: i64,

    /// Holds a driving license (1 = yes)
    #[serde(alias = "Driving_License")]
    pub driving_license: i64,

    /// Region code of the customer
    #[serde(alias = "Region_Code")]
    pub region_code: f64,

    /// Already has vehicle insurance (1 = yes)
    #[serde(alias = "Previously_Insured")]
    pub previously_insured: i64,

    /// Yearly premium amount
    #[serde(alias = "Annual_Premium")]
    pub annual_premium: f64,

    /// Anonymised outreach channel code
    #[serde(alias = "Policy_Sales_Channel")]
    pub policy_sales_channel: f64,

    /// Days associated with the company
    #[serde(alias = "Vintage")]
    pub vintage: i64,

    /// Vehicle younger than one year
    #[serde(alias = "Vehicle_Age_lt_1_Year")]
    pub vehicle_age_lt_1_year: i64,

    /// Vehicle older than two years
    #[serde(alias = "Vehicle_Age_gt_2_Years")]
    pub vehicle_age_gt_2_years: i64,

    /// Vehicle was damaged in the past
    #[serde(alias = "Vehicle_Damage_Yes")]
    pub vehicle_damage_yes: i64,
}

impl VehicleData {
    /// Create a record from all eleven model inputs
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gender: i64,
        age: i64,
        driving_license: i64,
        region_code: f64,
        previously_insured: i64,
        annual_premium: f64,
        policy_sales_channel: f64,
        vintage: i64,
        vehicle_age_lt_1_year: i64,
        vehicle_age_gt_2_years: i64,
        vehicle_damage_yes: i64,
    ) -> Self {
        Self {
            gender,
            age,
            driving_license,
            region_code,
            previously_insured,
            annual_premium,
            policy_sales_channel,
            vintage,
            vehicle_age_lt_1_year,
            vehicle_age_gt_2_years,
            vehicle_damage_yes,
        }
    }

    /// Field values in `VEHICLE_COLUMNS` order
    pub fn values(&self) -> [Value; 11] {
        [
            Value::Int(self.gender),
            Value::Int(self.age),
            Value::Int(self.driving_license),
            Value::Float(self.region_code),
            Value::Int(self.previously_insured),
            Value::Float(self.annual_premium),
            Value::Float(self.policy_sales_channel),
            Value::Int(self.vintage),
            Value::Int(self.vehicle_age_lt_1_year),
            Value::Int(self.vehicle_age_gt_2_years),
            Value::Int(self.vehicle_damage_yes),
        ]
    }

    /// Column name to one-element list, in declared order
    pub fn as_dict(&self) -> Vec<(&'static str, Vec<Value>)> {
        VEHICLE_COLUMNS
            .iter()
            .zip(self.values())
            .map(|(name, value)| (*name, vec![value]))
            .collect()
    }

    /// Single-row frame with one column per field
    pub fn to_frame(&self) -> Result<DataFrame, FrameError> {
        let columns = self
            .as_dict()
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect();

        let frame = DataFrame::from_columns(columns)?;
        debug!(columns = frame.n_cols(), "Created vehicle data frame");
        Ok(frame)
    }

    /// Frame with one row per record, same columns as `to_frame`
    pub fn records_to_frame(records: &[VehicleData]) -> Result<DataFrame, FrameError> {
        if records.is_empty() {
            return Err(FrameError::Empty);
        }

        let mut columns: Vec<Column> = VEHICLE_COLUMNS
            .iter()
            .map(|name| Column::new(*name, Vec::with_capacity(records.len())))
            .collect();

        for record in records {
            for (column, value) in columns.iter_mut().zip(record.values()) {
                column.values.push(value);
            }
        }

        DataFrame::from_columns(columns)
    }
}
