use serde::Serialize;

use crate::data::model::{Dataset, RecidivismStatus};

// ---------------------------------------------------------------------------
// ScatterPoint – one plotted individual
// ---------------------------------------------------------------------------

/// One point of the age-vs-score scatter, with the fields the tooltip and
/// facets need. Every field is present: records that cannot be positioned
/// are dropped before construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub charge_desc: String,
    pub state: String,
    pub age: u32,
    pub sex: String,
    pub race: String,
    pub decile_score: u8,
    pub recidivism_status: RecidivismStatus,
}

/// Project the visible records to scatter points, preserving order.
///
/// A record with no age or no score has no plot position and is silently
/// dropped; that is a policy, not an error.
pub fn scatter_points(dataset: &Dataset, indices: &[usize]) -> Vec<ScatterPoint> {
    indices
        .iter()
        .filter_map(|&idx| {
            let rec = &dataset.records[idx];
            let (Some(age), Some(decile_score)) = (rec.age, rec.decile_score) else {
                return None;
            };
            Some(ScatterPoint {
                name: rec.name.clone(),
                charge_desc: rec.charge_desc.clone(),
                state: rec.state.clone(),
                age,
                sex: rec.sex.clone(),
                race: rec.race.clone(),
                decile_score,
                recidivism_status: rec.recidivism_status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(name: &str, age: Option<u32>, score: Option<u8>) -> Record {
        Record::new(
            name.into(),
            "Caucasian".into(),
            "Female".into(),
            age,
            "25 - 45".into(),
            Some(2),
            score,
            1,
            "Fraud".into(),
            "NY".into(),
        )
    }

    #[test]
    fn records_without_coordinates_are_dropped() {
        let ds = Dataset::from_records(vec![
            record("A", Some(30), Some(4)),
            record("B", None, Some(9)),
            record("C", Some(50), Some(9)),
            record("D", Some(41), None),
        ]);
        let indices: Vec<usize> = (0..ds.len()).collect();

        let points = scatter_points(&ds, &indices);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "A");
        assert_eq!(points[1].name, "C");
    }

    #[test]
    fn projection_carries_all_tooltip_fields() {
        let ds = Dataset::from_records(vec![record("A", Some(30), Some(4))]);
        let points = scatter_points(&ds, &[0]);

        let p = &points[0];
        assert_eq!(p.age, 30);
        assert_eq!(p.decile_score, 4);
        assert_eq!(p.sex, "Female");
        assert_eq!(p.race, "Caucasian");
        assert_eq!(p.charge_desc, "Fraud");
        assert_eq!(p.state, "NY");
        assert_eq!(p.recidivism_status, RecidivismStatus::Recidivism);
    }

    #[test]
    fn respects_the_given_index_subset() {
        let ds = Dataset::from_records(vec![
            record("A", Some(30), Some(4)),
            record("B", Some(25), Some(2)),
        ]);
        let points = scatter_points(&ds, &[1]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "B");
    }
}
