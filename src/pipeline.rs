//! The load → index → enrich pipeline and the per-selection view.

use std::collections::BTreeMap;

use crate::config::Config;
use crate::enrich::{enrich, unresolved_counties};
use crate::error::PipelineError;
use crate::exposure::CountyExposureIndex;
use crate::filter::{self, FilterSelection};
use crate::loader;
use crate::types::{AssessmentRecord, FireIncident, FireSummaryTable, RawIncident};

/// Diagnostics collected while preparing the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub assessment_rows: usize,
    pub skipped_assessments: usize,
    pub fire_summary_rows: usize,
    pub incident_rows: usize,
    pub undated_incidents: usize,
    /// County references on incidents that had no assessment data.
    pub unmatched_county_refs: usize,
    pub has_coordinates: bool,
}

/// The prepared, immutable incident collection plus its exposure index.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub index: CountyExposureIndex,
    pub incidents: Vec<FireIncident>,
    pub fire_summary: FireSummaryTable,
    pub report: LoadReport,
}

impl Dataset {
    /// Load all three sources named in `config` and enrich the incidents.
    ///
    /// Any unreadable source aborts the whole preparation.
    pub fn prepare(config: &Config) -> Result<Self, PipelineError> {
        let assessments = loader::load_assessments_from_path(&config.assessments_path)?;
        let fire_summary = loader::load_fire_summary_from_path(&config.fire_summary_path)?;
        let incidents = loader::load_incidents_from_path(&config.incidents_path)?;

        let mut dataset = Self::from_parts(
            &assessments.records,
            fire_summary,
            incidents.incidents,
            incidents.has_coordinates,
        );
        dataset.report.assessment_rows = assessments.total_rows;
        dataset.report.skipped_assessments = assessments.skipped_rows;
        Ok(dataset)
    }

    /// Build a dataset from already-loaded rows.
    pub fn from_parts(
        assessments: &[AssessmentRecord],
        fire_summary: FireSummaryTable,
        raw_incidents: Vec<RawIncident>,
        has_coordinates: bool,
    ) -> Self {
        let index = CountyExposureIndex::build(assessments);
        log::debug!(
            "exposure index built: {} counties from {} assessment rows",
            index.len(),
            assessments.len()
        );

        let mut unmatched: BTreeMap<String, usize> = BTreeMap::new();
        for raw in &raw_incidents {
            for county in unresolved_counties(&raw.counties, &index) {
                *unmatched.entry(county.to_string()).or_default() += 1;
            }
        }
        for (county, refs) in &unmatched {
            log::debug!("county {county:?} has no assessment data ({refs} incident refs)");
        }

        let incidents: Vec<FireIncident> = raw_incidents
            .into_iter()
            .map(|raw| enrich(raw, &index))
            .collect();

        let report = LoadReport {
            assessment_rows: assessments.len(),
            skipped_assessments: 0,
            fire_summary_rows: fire_summary.rows,
            incident_rows: incidents.len(),
            undated_incidents: incidents.iter().filter(|i| i.year.is_none()).count(),
            unmatched_county_refs: unmatched.values().sum(),
            has_coordinates,
        };
        if !unmatched.is_empty() {
            log::info!(
                "{} distinct counties ({} refs) had no assessment data, left out of averages",
                unmatched.len(),
                report.unmatched_county_refs
            );
        }

        Self {
            index,
            incidents,
            fire_summary,
            report,
        }
    }

    /// The incidents matching `selection`, borrowed from this dataset.
    pub fn view(&self, selection: &FilterSelection) -> Vec<&FireIncident> {
        filter::apply(&self.incidents, selection)
    }

    pub fn available_years(&self) -> Vec<i32> {
        filter::available_years(&self.incidents)
    }

    pub fn available_counties(&self) -> Vec<String> {
        filter::available_counties(&self.incidents)
    }
}
