use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// RecidivismStatus – derived label for the binary outcome
// ---------------------------------------------------------------------------

/// Whether an individual reoffended within the two-year follow-up window.
///
/// Derived once at load time from the `two_year_recid` column. The mapping is
/// a total bijection: 0 ↔ `NoRecidivism`, 1 ↔ `Recidivism`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecidivismStatus {
    NoRecidivism,
    Recidivism,
}

impl RecidivismStatus {
    /// Map the binary outcome column onto its status label.
    /// The loader guarantees `outcome` is 0 or 1.
    pub fn from_outcome(outcome: u8) -> Self {
        if outcome == 0 {
            RecidivismStatus::NoRecidivism
        } else {
            RecidivismStatus::Recidivism
        }
    }

    /// The inverse of [`RecidivismStatus::from_outcome`].
    pub fn outcome(&self) -> u8 {
        match self {
            RecidivismStatus::NoRecidivism => 0,
            RecidivismStatus::Recidivism => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecidivismStatus::NoRecidivism => "No Recidivism",
            RecidivismStatus::Recidivism => "Recidivism",
        }
    }
}

impl fmt::Display for RecidivismStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RecidivismStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// PriorsBin – prior-conviction count bucketed into fixed ranges
// ---------------------------------------------------------------------------

/// Prior-conviction count grouped into the dashboard's fixed bins.
///
/// Declaration order is display order, so the derived `Ord` sorts bins the
/// way the trend chart expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorsBin {
    Zero,
    OneToTwo,
    ThreeToFive,
    SixToTen,
    ElevenToTwenty,
    TwentyOnePlus,
}

impl PriorsBin {
    /// All bins in display order.
    pub const LEVELS: [PriorsBin; 6] = [
        PriorsBin::Zero,
        PriorsBin::OneToTwo,
        PriorsBin::ThreeToFive,
        PriorsBin::SixToTen,
        PriorsBin::ElevenToTwenty,
        PriorsBin::TwentyOnePlus,
    ];

    /// Bucket a raw prior count. Intervals are closed on the right:
    /// `(-1,0], (0,2], (2,5], (5,10], (10,20], (20,100]`.
    ///
    /// Counts outside `[0, 100]` have no bin and return `None`; callers must
    /// account for such records rather than lose them silently.
    pub fn from_count(count: i64) -> Option<Self> {
        match count {
            0 => Some(PriorsBin::Zero),
            1..=2 => Some(PriorsBin::OneToTwo),
            3..=5 => Some(PriorsBin::ThreeToFive),
            6..=10 => Some(PriorsBin::SixToTen),
            11..=20 => Some(PriorsBin::ElevenToTwenty),
            21..=100 => Some(PriorsBin::TwentyOnePlus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorsBin::Zero => "0",
            PriorsBin::OneToTwo => "1-2",
            PriorsBin::ThreeToFive => "3-5",
            PriorsBin::SixToTen => "6-10",
            PriorsBin::ElevenToTwenty => "11-20",
            PriorsBin::TwentyOnePlus => "21+",
        }
    }
}

impl fmt::Display for PriorsBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PriorsBin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// A single individual (one row of the source table).
///
/// `age`, `priors_count` and `decile_score` are optional because the raw CSV
/// leaves cells blank; everything else must be present for the row to load.
/// The two derived fields are computed by [`Record::new`] and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub race: String,
    pub sex: String,
    pub age: Option<u32>,
    /// Age group category (`age_cat` column), e.g. `"Less than 25"`.
    pub age_group: String,
    pub priors_count: Option<i64>,
    /// COMPAS risk score on the 1–10 scale.
    pub decile_score: Option<u8>,
    /// Binary outcome: reoffended within two years (0 or 1).
    pub two_year_recid: u8,
    pub charge_desc: String,
    pub state: String,
    /// Derived from `two_year_recid`.
    pub recidivism_status: RecidivismStatus,
    /// Derived from `priors_count`; `None` when the count is missing or
    /// outside the binnable range.
    pub priors_bin: Option<PriorsBin>,
}

impl Record {
    /// Build a record from raw column values, computing the derived fields.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        race: String,
        sex: String,
        age: Option<u32>,
        age_group: String,
        priors_count: Option<i64>,
        decile_score: Option<u8>,
        two_year_recid: u8,
        charge_desc: String,
        state: String,
    ) -> Self {
        Record {
            recidivism_status: RecidivismStatus::from_outcome(two_year_recid),
            priors_bin: priors_count.and_then(PriorsBin::from_count),
            name,
            race,
            sex,
            age,
            age_group,
            priors_count,
            decile_score,
            two_year_recid,
            charge_desc,
            state,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter options.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Sorted unique race values observed in the data.
    pub race_options: Vec<String>,
    /// Sorted unique age group values observed in the data.
    pub age_group_options: Vec<String>,
}

impl Dataset {
    /// Build the filter-option indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut races: BTreeSet<String> = BTreeSet::new();
        let mut age_groups: BTreeSet<String> = BTreeSet::new();

        for rec in &records {
            if !rec.race.is_empty() {
                races.insert(rec.race.clone());
            }
            if !rec.age_group.is_empty() {
                age_groups.insert(rec.age_group.clone());
            }
        }

        Dataset {
            records,
            race_options: races.into_iter().collect(),
            age_group_options: age_groups.into_iter().collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose prior count could not be binned (missing or out of
    /// range). These never appear in the trend chart.
    pub fn unbinned_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.priors_bin.is_none())
            .count()
    }
}
