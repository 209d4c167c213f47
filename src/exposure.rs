//! County exposure index: county name to mean assessed `NetTotal`.

use std::collections::BTreeMap;

use crate::types::AssessmentRecord;
use crate::util::average;

/// Mean assessed value per county.
///
/// Keys are exact county strings (case and whitespace included). A county
/// with no assessment rows has no entry at all, which is different from an
/// entry of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountyExposureIndex {
    means: BTreeMap<String, f64>,
}

impl CountyExposureIndex {
    /// Group the records by county and average each group.
    pub fn build(records: &[AssessmentRecord]) -> Self {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for r in records {
            groups.entry(r.county.as_str()).or_default().push(r.net_total);
        }
        let means = groups
            .into_iter()
            .filter_map(|(county, mut values)| {
                // Fixed summation order keeps the mean bit-identical however rows arrive.
                values.sort_by(f64::total_cmp);
                Some((county.to_string(), average(&values)?))
            })
            .collect();
        Self { means }
    }

    pub fn lookup(&self, county: &str) -> Option<f64> {
        self.means.get(county).copied()
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// County names in sorted order.
    pub fn counties(&self) -> impl Iterator<Item = &str> {
        self.means.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(county: &str, net_total: f64) -> AssessmentRecord {
        AssessmentRecord {
            county: county.to_string(),
            net_total,
        }
    }

    #[test]
    fn averages_each_county() {
        let index = CountyExposureIndex::build(&[
            rec("Lake", 100.0),
            rec("Napa", 50.0),
            rec("Lake", 300.0),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.lookup("Lake"), Some(200.0));
        assert_eq!(index.lookup("Napa"), Some(50.0));
    }

    #[test]
    fn holds_exactly_the_distinct_counties() {
        let index = CountyExposureIndex::build(&[
            rec("Lake", 1.0),
            rec("Butte", 2.0),
            rec("Lake", 3.0),
        ]);
        assert_eq!(index.counties().collect::<Vec<_>>(), vec!["Butte", "Lake"]);
    }

    #[test]
    fn absent_county_is_not_zero() {
        let index = CountyExposureIndex::build(&[rec("Lake", 10.0)]);
        assert_eq!(index.lookup("Napa"), None);
    }

    #[test]
    fn keys_are_exact_strings() {
        let index = CountyExposureIndex::build(&[rec("Lake", 10.0)]);
        assert_eq!(index.lookup("lake"), None);
        assert_eq!(index.lookup(" Lake"), None);
    }

    #[test]
    fn order_of_records_does_not_matter() {
        let forward = vec![rec("A", 1.0), rec("B", 4.0), rec("A", 2.0), rec("A", 6.0)];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(
            CountyExposureIndex::build(&forward),
            CountyExposureIndex::build(&reversed)
        );
        assert_eq!(CountyExposureIndex::build(&forward), CountyExposureIndex::build(&forward));
    }

    #[test]
    fn empty_table_gives_empty_index() {
        assert!(CountyExposureIndex::build(&[]).is_empty());
    }
}
