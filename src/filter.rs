//! Year/county filtering over the enriched incidents.
//!
//! Filtering borrows: the returned view points into the source slice and the
//! source is never modified, so any number of selections can be evaluated
//! against the same dataset.

use std::collections::BTreeSet;

use crate::types::FireIncident;

/// The two filter controls. An empty set disables that filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub counties: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<Y, C, S>(years: Y, counties: C) -> Self
    where
        Y: IntoIterator<Item = i32>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            years: years.into_iter().collect(),
            counties: counties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() && self.counties.is_empty()
    }

    /// Whether one incident passes both active predicates.
    pub fn matches(&self, incident: &FireIncident) -> bool {
        let year_ok = self.years.is_empty()
            || incident.year.is_some_and(|y| self.years.contains(&y));
        let county_ok = self.counties.is_empty()
            || incident.counties.iter().any(|c| self.counties.contains(c));
        year_ok && county_ok
    }
}

pub fn apply<'a>(
    incidents: &'a [FireIncident],
    selection: &FilterSelection,
) -> Vec<&'a FireIncident> {
    incidents.iter().filter(|i| selection.matches(i)).collect()
}

/// Distinct years for the year control, ascending. Undated incidents are skipped.
pub fn available_years(incidents: &[FireIncident]) -> Vec<i32> {
    let years: BTreeSet<i32> = incidents.iter().filter_map(|i| i.year).collect();
    years.into_iter().collect()
}

/// Distinct county names across every incident, sorted.
pub fn available_counties(incidents: &[FireIncident]) -> Vec<String> {
    let counties: BTreeSet<&str> = incidents
        .iter()
        .flat_map(|i| i.counties.iter().map(String::as_str))
        .collect();
    counties.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich;
    use crate::exposure::CountyExposureIndex;
    use crate::normalize::decode_timestamp;
    use crate::types::RawIncident;

    fn fire(name: &str, started: Option<&str>, counties: &[&str]) -> FireIncident {
        let raw = RawIncident {
            name: name.to_string(),
            started: decode_timestamp(started),
            counties: counties.iter().map(|c| c.to_string()).collect(),
            ..RawIncident::default()
        };
        enrich(raw, &CountyExposureIndex::default())
    }

    fn sample() -> Vec<FireIncident> {
        vec![
            fire("Valley", Some("2015-09-12"), &["Lake", "Napa"]),
            fire("Atlas", Some("2017-10-08"), &["Napa"]),
            fire("August", Some("2020-08-16"), &["Glenn", "Lake"]),
            fire("Creek", Some("2020-09-04"), &["Fresno"]),
            fire("Unknown", None, &["Lake"]),
        ]
    }

    fn names(view: &[&FireIncident]) -> Vec<String> {
        view.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn empty_selection_returns_everything() {
        let data = sample();
        let view = apply(&data, &FilterSelection::default());
        assert_eq!(view.len(), data.len());
        assert!(view.iter().zip(&data).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn year_filter_keeps_exact_year() {
        let data = sample();
        let view = apply(&data, &FilterSelection::new([2020], Vec::<String>::new()));
        assert_eq!(names(&view), vec!["August", "Creek"]);
    }

    #[test]
    fn year_filter_drops_undated_incidents() {
        let data = sample();
        let view = apply(&data, &FilterSelection::new([2015, 2017, 2020], Vec::<String>::new()));
        assert!(view.iter().all(|i| i.year.is_some()));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn county_filter_matches_any_listed_county() {
        let data = sample();
        let view = apply(&data, &FilterSelection::new([], ["Lake"]));
        assert_eq!(names(&view), vec!["Valley", "August", "Unknown"]);
        assert!(!names(&view).contains(&"Atlas".to_string()));
    }

    #[test]
    fn county_filter_ors_selected_counties() {
        let data = sample();
        let view = apply(&data, &FilterSelection::new([], ["Fresno", "Glenn"]));
        assert_eq!(names(&view), vec!["August", "Creek"]);
    }

    #[test]
    fn filters_compose_with_and() {
        let data = sample();
        let view = apply(&data, &FilterSelection::new([2020], ["Lake"]));
        assert_eq!(names(&view), vec!["August"]);
    }

    #[test]
    fn repeated_filters_are_independent() {
        let data = sample();
        let before = data.clone();
        let first = names(&apply(&data, &FilterSelection::new([2017], Vec::<String>::new())));
        let _ = apply(&data, &FilterSelection::new([2020], ["Lake"]));
        let again = names(&apply(&data, &FilterSelection::new([2017], Vec::<String>::new())));
        assert_eq!(first, again);
        assert_eq!(data, before);
    }

    #[test]
    fn lists_filter_options() {
        let data = sample();
        assert_eq!(available_years(&data), vec![2015, 2017, 2020]);
        assert_eq!(
            available_counties(&data),
            vec!["Fresno", "Glenn", "Lake", "Napa"]
        );
    }
}
