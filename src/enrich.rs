//! Incident enrichment: the county join and the structural-loss metrics.

use crate::exposure::CountyExposureIndex;
use crate::normalize::calendar_fields;
use crate::types::{FireIncident, RawIncident};

/// Mean exposure over the incident's counties that exist in the index.
///
/// Counties missing from the index are skipped and do not count towards the
/// denominator. Returns `None` when the list is empty or nothing resolves.
pub fn net_average_exposure(counties: &[String], index: &CountyExposureIndex) -> Option<f64> {
    let (sum, resolved) = counties
        .iter()
        .filter_map(|c| index.lookup(c))
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if resolved == 0 {
        return None;
    }
    Some(sum / resolved as f64)
}

/// County names on the incident that the index does not know about.
pub fn unresolved_counties<'a>(
    counties: &'a [String],
    index: &CountyExposureIndex,
) -> Vec<&'a str> {
    counties
        .iter()
        .map(String::as_str)
        .filter(|c| index.lookup(c).is_none())
        .collect()
}

pub fn property_loss_score(destroyed: Option<f64>, damaged: Option<f64>) -> f64 {
    destroyed.unwrap_or(0.0) + damaged.unwrap_or(0.0)
}

pub fn property_loss_value(score: f64, exposure: Option<f64>) -> Option<f64> {
    exposure.map(|e| score * e)
}

/// Attach calendar fields and derived metrics to a normalized incident.
pub fn enrich(raw: RawIncident, index: &CountyExposureIndex) -> FireIncident {
    let (year, month) = calendar_fields(raw.started);
    let net_average_exposure = net_average_exposure(&raw.counties, index);
    let property_loss_score =
        property_loss_score(raw.structures_destroyed, raw.structures_damaged);
    FireIncident {
        name: raw.name,
        started: raw.started,
        year,
        month,
        counties: raw.counties,
        acres_burned: raw.acres_burned,
        structures_destroyed: raw.structures_destroyed.unwrap_or(0.0),
        structures_damaged: raw.structures_damaged.unwrap_or(0.0),
        property_loss_score,
        net_average_exposure,
        property_loss_value: property_loss_value(property_loss_score, net_average_exposure),
        latitude: raw.latitude,
        longitude: raw.longitude,
        updated: raw.updated,
        extinguished: raw.extinguished,
        extinguished_date_only: raw.extinguished_date_only,
        started_date_only: raw.started_date_only,
        expected_containment: raw.expected_containment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::decode_timestamp;
    use crate::types::AssessmentRecord;

    fn index(entries: &[(&str, f64)]) -> CountyExposureIndex {
        let records: Vec<AssessmentRecord> = entries
            .iter()
            .map(|(county, net_total)| AssessmentRecord {
                county: county.to_string(),
                net_total: *net_total,
            })
            .collect();
        CountyExposureIndex::build(&records)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_county_list_has_no_exposure() {
        let idx = index(&[("A", 10.0)]);
        assert_eq!(net_average_exposure(&[], &idx), None);
    }

    #[test]
    fn partially_resolved_counties_divide_by_resolved_count() {
        let idx = index(&[("A", 120.0)]);
        assert_eq!(net_average_exposure(&names(&["A", "B"]), &idx), Some(120.0));
    }

    #[test]
    fn averages_all_resolved_counties() {
        let idx = index(&[("A", 100.0), ("B", 300.0)]);
        assert_eq!(net_average_exposure(&names(&["A", "B"]), &idx), Some(200.0));
    }

    #[test]
    fn nothing_resolved_is_missing_not_zero() {
        let idx = index(&[("A", 100.0)]);
        assert_eq!(net_average_exposure(&names(&["X", "Y"]), &idx), None);
    }

    #[test]
    fn reports_unresolved_counties() {
        let idx = index(&[("A", 100.0)]);
        let counties = names(&["A", "lake", "B"]);
        assert_eq!(unresolved_counties(&counties, &idx), vec!["lake", "B"]);
    }

    #[test]
    fn loss_score_treats_missing_counts_as_zero() {
        assert_eq!(property_loss_score(None, Some(3.0)), 3.0);
        assert_eq!(property_loss_score(None, None), 0.0);
        assert_eq!(property_loss_score(Some(2.0), Some(5.0)), 7.0);
    }

    #[test]
    fn loss_value_needs_exposure() {
        assert_eq!(property_loss_value(4.0, Some(2.5)), Some(10.0));
        assert_eq!(property_loss_value(4.0, None), None);
    }

    #[test]
    fn enriches_incident() {
        let idx = index(&[("Lake", 1000.0), ("Napa", 3000.0)]);
        let raw = RawIncident {
            name: "Valley Fire".to_string(),
            started: decode_timestamp(Some("2015-09-12T13:00:00Z")),
            counties: names(&["Lake", "Napa", "Sonoma"]),
            acres_burned: 76067.0,
            structures_destroyed: None,
            structures_damaged: Some(3.0),
            ..RawIncident::default()
        };
        let fire = enrich(raw, &idx);
        assert_eq!(fire.year, Some(2015));
        assert_eq!(fire.month, Some(9));
        assert_eq!(fire.structures_destroyed, 0.0);
        assert_eq!(fire.property_loss_score, 3.0);
        assert_eq!(fire.net_average_exposure, Some(2000.0));
        assert_eq!(fire.property_loss_value, Some(6000.0));
    }

    #[test]
    fn undated_incident_has_no_calendar_fields() {
        let fire = enrich(RawIncident::default(), &CountyExposureIndex::default());
        assert_eq!(fire.year, None);
        assert_eq!(fire.month, None);
        assert_eq!(fire.net_average_exposure, None);
        assert_eq!(fire.property_loss_value, None);
    }
}
