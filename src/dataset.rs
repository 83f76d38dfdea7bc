//! Records returned by the analytics backend.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One row of a task's result set.
///
/// Only the fields the charts need are typed. Everything else the backend
/// sends (VIN, county, city, ...) is kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    #[serde(default)]
    pub make: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub electric_range: f64,
    #[serde(default, deserialize_with = "year_or_zero")]
    pub model_year: i32,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub base_msrp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev_type: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl DataRow {
    pub fn new(make: &str, electric_range: f64, model_year: i32, base_msrp: f64) -> Self {
        Self {
            make: make.to_string(),
            electric_range,
            model_year,
            base_msrp,
            model: None,
            ev_type: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Description of one column of the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "dataType", default)]
    pub data_type: String,
}

// The backend stores whatever the CSV had, so nulls show up for vehicles
// without a published range or MSRP.
fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn year_or_zero<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map(|year| year as i32)
        .unwrap_or(0))
}
