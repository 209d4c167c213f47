use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawAssessmentRow {
    #[serde(rename = "County")]
    pub county: Option<String>,
    #[serde(rename = "NetTotal")]
    pub net_total: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawIncidentRow {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Started")]
    pub started: Option<String>,
    #[serde(rename = "Counties")]
    pub counties: Option<String>,
    #[serde(rename = "AcresBurned")]
    pub acres_burned: Option<String>,
    #[serde(rename = "StructuresDestroyed")]
    pub structures_destroyed: Option<String>,
    #[serde(rename = "StructuresDamaged")]
    pub structures_damaged: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,
    #[serde(rename = "Updated", default)]
    pub updated: Option<String>,
    #[serde(rename = "ExtinguishedDate", default)]
    pub extinguished_date: Option<String>,
    #[serde(rename = "ExtinguishedDateOnly", default)]
    pub extinguished_date_only: Option<String>,
    #[serde(rename = "StartedDateOnly", default)]
    pub started_date_only: Option<String>,
    #[serde(rename = "ExpectedContainment", default)]
    pub expected_containment: Option<String>,
}

/// One property assessment row. Many rows share a county.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRecord {
    pub county: String,
    pub net_total: f64,
}

/// An incident after field normalization, before the county join.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawIncident {
    pub name: String,
    pub started: Option<NaiveDateTime>,
    pub counties: Vec<String>,
    pub acres_burned: f64,
    pub structures_destroyed: Option<f64>,
    pub structures_damaged: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated: Option<NaiveDateTime>,
    pub extinguished: Option<NaiveDateTime>,
    pub extinguished_date_only: Option<NaiveDateTime>,
    pub started_date_only: Option<NaiveDateTime>,
    pub expected_containment: Option<NaiveDateTime>,
}

/// A fully enriched fire incident. Immutable once the dataset is prepared.
#[derive(Debug, Clone, PartialEq)]
pub struct FireIncident {
    pub name: String,
    pub started: Option<NaiveDateTime>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub counties: Vec<String>,
    pub acres_burned: f64,
    pub structures_destroyed: f64,
    pub structures_damaged: f64,
    pub property_loss_score: f64,
    pub net_average_exposure: Option<f64>,
    pub property_loss_value: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated: Option<NaiveDateTime>,
    pub extinguished: Option<NaiveDateTime>,
    pub extinguished_date_only: Option<NaiveDateTime>,
    pub started_date_only: Option<NaiveDateTime>,
    pub expected_containment: Option<NaiveDateTime>,
}

/// The aggregate fire statistics table. Loaded and kept, never joined.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FireSummaryTable {
    pub columns: Vec<String>,
    pub rows: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct KpiSummary {
    pub total_fires: usize,
    pub total_acres_burned: f64,
    pub total_structures_destroyed: f64,
    /// Sum over incidents with a known loss value only.
    pub total_property_loss_value: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AnnualTrendRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Fires")]
    #[tabled(rename = "Fires")]
    pub fires: usize,
    #[serde(rename = "AcresBurned")]
    #[tabled(rename = "AcresBurned")]
    pub acres_burned: String,
    #[serde(rename = "PropertyLoss")]
    #[tabled(rename = "PropertyLoss")]
    pub property_loss: String,
    #[serde(rename = "PropertyLossValue")]
    #[tabled(rename = "PropertyLossValue")]
    pub property_loss_value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MonthlyCountRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: u32,
    #[serde(rename = "FireCount")]
    #[tabled(rename = "FireCount")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TopLossRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: String,
    #[serde(rename = "AcresBurned")]
    #[tabled(rename = "AcresBurned")]
    pub acres_burned: String,
    #[serde(rename = "PropertyLossScore")]
    #[tabled(rename = "PropertyLossScore")]
    pub property_loss_score: String,
    #[serde(rename = "PropertyLossValue")]
    #[tabled(rename = "PropertyLossValue")]
    pub property_loss_value: String,
    #[serde(rename = "NetAverage")]
    #[tabled(rename = "NetAverage")]
    pub net_average: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct MapPointRow {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "AcresBurned")]
    #[tabled(rename = "AcresBurned")]
    pub acres_burned: f64,
    #[serde(rename = "PropertyLossScore")]
    #[tabled(rename = "PropertyLossScore")]
    pub property_loss_score: f64,
}
