//! Run configuration with the dashboard's default file names.

use std::path::PathBuf;

/// Where the three source tables live and how reports are produced.
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-county property assessments (`County`, `NetTotal`).
    pub assessments_path: PathBuf,
    /// Aggregate fire statistics. Loaded but not joined.
    pub fire_summary_path: PathBuf,
    /// Per-incident fire records.
    pub incidents_path: PathBuf,
    /// Directory report files are written into.
    pub out_dir: PathBuf,
    /// Size of the top-N loss rankings.
    pub top_n: usize,
    /// Rows shown in each console preview.
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assessments_path: PathBuf::from("assess_value.csv"),
            fire_summary_path: PathBuf::from("fire.csv"),
            incidents_path: PathBuf::from("singleFire.csv"),
            out_dir: PathBuf::from("."),
            top_n: 5,
            preview_rows: 5,
        }
    }
}
