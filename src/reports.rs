use crate::types::{
    AnnualTrendRow, FireIncident, KpiSummary, MapPointRow, MonthlyCountRow, TopLossRow,
};
use crate::util::{format_number, format_optional};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub fn kpi_summary(view: &[&FireIncident]) -> KpiSummary {
    KpiSummary {
        total_fires: view.len(),
        total_acres_burned: view.iter().map(|i| i.acres_burned).sum(),
        total_structures_destroyed: view.iter().map(|i| i.structures_destroyed).sum(),
        total_property_loss_value: view.iter().filter_map(|i| i.property_loss_value).sum(),
    }
}

/// Per-year totals, ascending by year. Undated incidents are not grouped.
pub fn annual_trend(view: &[&FireIncident]) -> Vec<AnnualTrendRow> {
    #[derive(Default)]
    struct Acc {
        fires: usize,
        acres: f64,
        loss_score: f64,
        /// `None` until an incident in the year has a loss value.
        loss_value: Option<f64>,
    }
    let mut map: BTreeMap<i32, Acc> = BTreeMap::new();
    for i in view {
        let Some(year) = i.year else { continue };
        let e = map.entry(year).or_default();
        e.fires += 1;
        e.acres += i.acres_burned;
        e.loss_score += i.property_loss_score;
        if let Some(v) = i.property_loss_value {
            *e.loss_value.get_or_insert(0.0) += v;
        }
    }
    map.into_iter()
        .map(|(year, acc)| AnnualTrendRow {
            year,
            fires: acc.fires,
            acres_burned: format_number(acc.acres, 0),
            property_loss: format_number(acc.loss_score, 0),
            property_loss_value: format_optional(acc.loss_value, 2),
        })
        .collect()
}

/// Fire counts per calendar month, ascending. Months without fires are omitted.
pub fn monthly_seasonality(view: &[&FireIncident]) -> Vec<MonthlyCountRow> {
    let mut map: BTreeMap<u32, usize> = BTreeMap::new();
    for month in view.iter().filter_map(|i| i.month) {
        *map.entry(month).or_default() += 1;
    }
    map.into_iter()
        .map(|(month, count)| MonthlyCountRow { month, count })
        .collect()
}

fn top_loss_rows(mut ranked: Vec<(f64, &FireIncident)>, n: usize) -> Vec<TopLossRow> {
    // Stable sort: ties keep their order in the view.
    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, (_, i))| TopLossRow {
            rank: idx + 1,
            name: i.name.clone(),
            year: i.year.map(|y| y.to_string()).unwrap_or_default(),
            acres_burned: format_number(i.acres_burned, 0),
            property_loss_score: format_number(i.property_loss_score, 0),
            property_loss_value: format_optional(i.property_loss_value, 2),
            net_average: format_optional(i.net_average_exposure, 2),
        })
        .collect()
}

pub fn top_by_loss_score(view: &[&FireIncident], n: usize) -> Vec<TopLossRow> {
    let ranked = view.iter().map(|i| (i.property_loss_score, *i)).collect();
    top_loss_rows(ranked, n)
}

/// Top incidents by estimated loss value. Incidents without a value are
/// excluded rather than ranked as zero.
pub fn top_by_loss_value(view: &[&FireIncident], n: usize) -> Vec<TopLossRow> {
    let ranked = view
        .iter()
        .filter_map(|i| Some((i.property_loss_value?, *i)))
        .collect();
    top_loss_rows(ranked, n)
}

/// Plot points for the fire map, or `None` when the incident table had no
/// coordinate columns and the map should be skipped.
pub fn map_points(view: &[&FireIncident], has_coordinates: bool) -> Option<Vec<MapPointRow>> {
    if !has_coordinates {
        return None;
    }
    let points = view
        .iter()
        .filter_map(|i| {
            Some(MapPointRow {
                name: i.name.clone(),
                latitude: i.latitude?,
                longitude: i.longitude?,
                acres_burned: i.acres_burned,
                property_loss_score: i.property_loss_score,
            })
        })
        .collect();
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(
        name: &str,
        year: Option<i32>,
        month: Option<u32>,
        acres: f64,
        score: f64,
        value: Option<f64>,
    ) -> FireIncident {
        FireIncident {
            name: name.to_string(),
            started: None,
            year,
            month,
            counties: vec![],
            acres_burned: acres,
            structures_destroyed: score,
            structures_damaged: 0.0,
            property_loss_score: score,
            net_average_exposure: value.map(|v| v / score.max(1.0)),
            property_loss_value: value,
            latitude: None,
            longitude: None,
            updated: None,
            extinguished: None,
            extinguished_date_only: None,
            started_date_only: None,
            expected_containment: None,
        }
    }

    fn sample() -> Vec<FireIncident> {
        vec![
            fire("Camp", Some(2018), Some(11), 153336.0, 18804.0, Some(1880.5)),
            fire("Carr", Some(2018), Some(7), 229651.0, 1604.0, None),
            fire("Tubbs", Some(2017), Some(10), 36807.0, 5643.0, Some(9000.0)),
            fire("Small", Some(2017), Some(7), 10.0, 0.0, Some(0.0)),
            fire("Undated", None, None, 5.0, 2.0, None),
        ]
    }

    #[test]
    fn kpis_exclude_missing_loss_values() {
        let data = sample();
        let view: Vec<&FireIncident> = data.iter().collect();
        let kpi = kpi_summary(&view);
        assert_eq!(kpi.total_fires, 5);
        assert_eq!(kpi.total_acres_burned, 419809.0);
        assert_eq!(kpi.total_structures_destroyed, 26053.0);
        assert_eq!(kpi.total_property_loss_value, 10880.5);
    }

    #[test]
    fn annual_trend_groups_by_year_ascending() {
        let data = sample();
        let view: Vec<&FireIncident> = data.iter().collect();
        let rows = annual_trend(&view);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2017);
        assert_eq!(rows[0].fires, 2);
        assert_eq!(rows[0].property_loss, "5,643");
        assert_eq!(rows[1].year, 2018);
        assert_eq!(rows[1].acres_burned, "382,987");
        assert_eq!(rows[1].property_loss_value, "1,880.50");
    }

    #[test]
    fn year_without_loss_values_is_blank_not_zero() {
        let data = vec![
            fire("Carr", Some(2018), Some(7), 229651.0, 1604.0, None),
            fire("Small", Some(2017), Some(7), 10.0, 0.0, Some(0.0)),
        ];
        let view: Vec<&FireIncident> = data.iter().collect();
        let rows = annual_trend(&view);
        assert_eq!(rows[0].year, 2017);
        assert_eq!(rows[0].property_loss_value, "0.00");
        assert_eq!(rows[1].year, 2018);
        assert_eq!(rows[1].property_loss_value, "");
    }

    #[test]
    fn monthly_counts() {
        let data = sample();
        let view: Vec<&FireIncident> = data.iter().collect();
        let rows = monthly_seasonality(&view);
        let pairs: Vec<(u32, usize)> = rows.iter().map(|r| (r.month, r.count)).collect();
        assert_eq!(pairs, vec![(7, 2), (10, 1), (11, 1)]);
    }

    #[test]
    fn ranks_by_loss_score() {
        let data = sample();
        let view: Vec<&FireIncident> = data.iter().collect();
        let rows = top_by_loss_score(&view, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].rank, rows[0].name.as_str()), (1, "Camp"));
        assert_eq!(rows[1].name, "Tubbs");
        assert_eq!(rows[0].year, "2018");
    }

    #[test]
    fn value_ranking_skips_missing_values() {
        let data = sample();
        let view: Vec<&FireIncident> = data.iter().collect();
        let names: Vec<String> =
            top_by_loss_value(&view, 10).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Tubbs", "Camp", "Small"]);
    }

    #[test]
    fn map_is_skipped_without_coordinate_columns() {
        let mut data = sample();
        data[0].latitude = Some(39.8);
        data[0].longitude = Some(-121.4);
        data[1].latitude = Some(40.6);
        let view: Vec<&FireIncident> = data.iter().collect();
        assert!(map_points(&view, false).is_none());
        let points = map_points(&view, true).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Camp");
    }
}
