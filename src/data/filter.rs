use std::collections::BTreeSet;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Filter predicate: user-selected races and age group
// ---------------------------------------------------------------------------

/// Age-group dropdown state: either no constraint or one selected group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AgeGroupFilter {
    #[default]
    All,
    Group(String),
}

/// The user's current filter selections.
///
/// An empty `races` set selects nothing; callers wanting the "show all"
/// default should start from [`FilterSelection::select_all`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub races: BTreeSet<String>,
    pub age_group: AgeGroupFilter,
}

impl FilterSelection {
    /// Selection that shows every record: all observed races, no age
    /// constraint.
    pub fn select_all(dataset: &Dataset) -> Self {
        FilterSelection {
            races: dataset.race_options.iter().cloned().collect(),
            age_group: AgeGroupFilter::All,
        }
    }
}

/// Return indices of records passing the current selection, in input order.
///
/// A record passes when its race is in the selected set AND either no age
/// group is selected or its age group matches. Input records are never
/// mutated.
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if !selection.races.contains(&rec.race) {
                return false;
            }
            match &selection.age_group {
                AgeGroupFilter::All => true,
                AgeGroupFilter::Group(group) => rec.age_group == *group,
            }
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(name: &str, race: &str, age_group: &str) -> Record {
        Record::new(
            name.into(),
            race.into(),
            "Male".into(),
            Some(30),
            age_group.into(),
            Some(1),
            Some(5),
            0,
            "Theft".into(),
            "FL".into(),
        )
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record("A", "Caucasian", "25 - 45"),
            record("B", "African-American", "Less than 25"),
            record("C", "Caucasian", "Less than 25"),
            record("D", "Hispanic", "Greater than 45"),
        ])
    }

    #[test]
    fn select_all_passes_everything_in_order() {
        let ds = dataset();
        let selection = FilterSelection::select_all(&ds);
        assert_eq!(filtered_indices(&ds, &selection), vec![0, 1, 2, 3]);
    }

    #[test]
    fn empty_race_set_selects_nothing() {
        let ds = dataset();
        let selection = FilterSelection::default();
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn race_filter_is_set_membership() {
        let ds = dataset();
        let mut selection = FilterSelection::select_all(&ds);
        selection.races = ["Caucasian".to_string()].into();
        assert_eq!(filtered_indices(&ds, &selection), vec![0, 2]);
    }

    #[test]
    fn age_group_filter_composes_with_races() {
        let ds = dataset();
        let mut selection = FilterSelection::select_all(&ds);
        selection.age_group = AgeGroupFilter::Group("Less than 25".into());
        assert_eq!(filtered_indices(&ds, &selection), vec![1, 2]);

        selection.races = ["Caucasian".to_string()].into();
        assert_eq!(filtered_indices(&ds, &selection), vec![2]);
    }
}
