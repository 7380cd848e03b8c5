//! Core types for the query system

use serde::{Deserialize, Serialize};

/// Operator for combining adjacent clauses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    /// All clauses must match (AND)
    And,
    /// At least one clause should match (OR)
    #[default]
    Or,
}

/// Value type for range bounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValue {
    /// 64-bit integer
    Long(i64),
    /// 64-bit floating point
    Double(f64),
    /// Anything that is not a number; never matches a numeric value
    String(String),
}

impl RangeValue {
    /// Convert to f64 if possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RangeValue::Long(v) => Some(*v as f64),
            RangeValue::Double(v) => Some(*v),
            RangeValue::String(s) => s.parse().ok(),
        }
    }
}

/// Range bounds for range queries
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    /// Greater than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<RangeValue>,
    /// Greater than
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<RangeValue>,
    /// Less than or equal to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<RangeValue>,
    /// Less than
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<RangeValue>,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl RangeBounds {
    /// Check if a numeric value is within this range
    ///
    /// A bound that is not numeric excludes every value.
    pub fn contains(&self, value: f64) -> bool {
        let check = |bound: &Option<RangeValue>, ok: fn(f64, f64) -> bool| match bound {
            Some(b) => b.as_f64().map(|b| ok(value, b)).unwrap_or(false),
            None => true,
        };

        check(&self.gte, |v, b| v >= b)
            && check(&self.gt, |v, b| v > b)
            && check(&self.lte, |v, b| v <= b)
            && check(&self.lt, |v, b| v < b)
    }
}

/// Query execution statistics
#[derive(Clone, Debug, Default)]
pub struct QueryStats {
    /// Number of documents matched
    pub docs_matched: u64,
    /// Query execution time in microseconds
    pub execution_time_us: u64,
}
