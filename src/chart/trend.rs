use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::data::model::{Dataset, PriorsBin};

// ---------------------------------------------------------------------------
// TrendSeries – the two lines of the trend chart
// ---------------------------------------------------------------------------

/// Which line a trend point belongs to. Both series share a 0–1 axis: the
/// mean COMPAS score is divided by 10, the recidivism rate is already a
/// fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendSeries {
    CompasScore,
    RecidivismRate,
}

impl TrendSeries {
    pub fn label(&self) -> &'static str {
        match self {
            TrendSeries::CompasScore => "Average COMPAS Score",
            TrendSeries::RecidivismRate => "Average Recidivism Rate",
        }
    }
}

impl fmt::Display for TrendSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TrendSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// TrendPoint – one (bin, series) observation in long format
// ---------------------------------------------------------------------------

/// One long-format row for the multi-series line renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bin: PriorsBin,
    pub series: TrendSeries,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct BinAccumulator {
    score_sum: f64,
    recid_sum: f64,
    count: usize,
}

/// Group the visible records by prior-conviction bin and emit per-bin means
/// in long format.
///
/// Bins with no visible members are omitted entirely rather than emitted as
/// zero, so a gap in the line means "no data here", not "zero recidivism".
/// Records without a bin or without a score are skipped (the loader accounts
/// for them at load time).
///
/// Output layout: one pass of `CompasScore` points over the present bins in
/// fixed bin order, then one pass of `RecidivismRate` points over the same
/// bins — exactly two rows per present bin.
pub fn trend_series(dataset: &Dataset, indices: &[usize]) -> Vec<TrendPoint> {
    let mut bins: BTreeMap<PriorsBin, BinAccumulator> = BTreeMap::new();

    for &idx in indices {
        let rec = &dataset.records[idx];
        let (Some(bin), Some(score)) = (rec.priors_bin, rec.decile_score) else {
            continue;
        };
        let acc = bins.entry(bin).or_default();
        acc.score_sum += score as f64;
        acc.recid_sum += rec.two_year_recid as f64;
        acc.count += 1;
    }

    // BTreeMap iteration follows PriorsBin's declaration order.
    let mut points = Vec::with_capacity(bins.len() * 2);
    for (&bin, acc) in &bins {
        points.push(TrendPoint {
            bin,
            series: TrendSeries::CompasScore,
            value: acc.score_sum / acc.count as f64 / 10.0,
        });
    }
    for (&bin, acc) in &bins {
        points.push(TrendPoint {
            bin,
            series: TrendSeries::RecidivismRate,
            value: acc.recid_sum / acc.count as f64,
        });
    }
    points
}
