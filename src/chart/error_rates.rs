use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Reference table: COMPAS error rates per race group
// ---------------------------------------------------------------------------

/// Published audit statistics: (race group, false positive %, false
/// negative %). Fixed reference data, not derived from the loaded records.
const ERROR_RATES: [(&str, f64, f64); 6] = [
    ("African-American", 7.5, 31.5),
    ("Asian", 4.0, 19.0),
    ("Caucasian", 3.9, 31.0),
    ("Hispanic", 4.1, 30.8),
    ("Native American", 4.2, 32.0),
    ("Other", 1.5, 30.5),
];

/// Which prediction-vs-outcome mismatch a row measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorMetric {
    FalsePositiveRate,
    FalseNegativeRate,
}

impl ErrorMetric {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorMetric::FalsePositiveRate => "False Positive Rate",
            ErrorMetric::FalseNegativeRate => "False Negative Rate",
        }
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ErrorMetric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One long-format row of the error-rate bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRateEntry {
    pub race: &'static str,
    pub metric: ErrorMetric,
    /// Rate in percent.
    pub rate: f64,
}

/// The reference table melted from its wide per-race layout into long
/// format: all false-positive rows first, then all false-negative rows,
/// races in table order within each metric.
pub fn error_rate_rows() -> Vec<ErrorRateEntry> {
    let mut rows = Vec::with_capacity(ERROR_RATES.len() * 2);
    for &(race, fpr, _) in &ERROR_RATES {
        rows.push(ErrorRateEntry {
            race,
            metric: ErrorMetric::FalsePositiveRate,
            rate: fpr,
        });
    }
    for &(race, _, fnr) in &ERROR_RATES {
        rows.push(ErrorRateEntry {
            race,
            metric: ErrorMetric::FalseNegativeRate,
            rate: fnr,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_six_races_times_two_metrics() {
        let rows = error_rate_rows();
        assert_eq!(rows.len(), 12);
        assert_eq!(
            rows.iter()
                .filter(|r| r.metric == ErrorMetric::FalsePositiveRate)
                .count(),
            6
        );
    }

    #[test]
    fn african_american_reference_values() {
        let rows = error_rate_rows();
        let rate = |metric: ErrorMetric| {
            rows.iter()
                .find(|r| r.race == "African-American" && r.metric == metric)
                .map(|r| r.rate)
                .unwrap()
        };
        assert_eq!(rate(ErrorMetric::FalsePositiveRate), 7.5);
        assert_eq!(rate(ErrorMetric::FalseNegativeRate), 31.5);
    }

    #[test]
    fn melt_is_metric_major() {
        let rows = error_rate_rows();
        assert!(rows[..6]
            .iter()
            .all(|r| r.metric == ErrorMetric::FalsePositiveRate));
        assert!(rows[6..]
            .iter()
            .all(|r| r.metric == ErrorMetric::FalseNegativeRate));
        assert_eq!(rows[0].race, "African-American");
        assert_eq!(rows[6].race, "African-American");
    }
}
