use serde::{Deserialize, Serialize};

use crate::schema::TypeKind;

/// Two trackers with different payload kinds were merged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot merge {actual} statistics into {expected} statistics")]
pub struct MergeMismatch {
    /// Kind of the receiving tracker
    pub expected: &'static str,
    /// Kind of the merged tracker
    pub actual: &'static str,
}

/// Kind-specific part of a column's statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypedStatistics {
    /// Struct, list and map columns only track counts
    Generic,
    /// Boolean columns
    Boolean {
        /// Number of non-null `true` values
        true_count: u64,
    },
    /// Byte, short, int, long and date columns
    Integer {
        /// Smallest value seen
        min: Option<i64>,
        /// Largest value seen
        max: Option<i64>,
        /// Sum of values, `None` when it lies outside the `i64` range
        sum: Option<i64>,
    },
    /// Float and double columns; NaN values are counted but not aggregated
    Double {
        /// Smallest value seen
        min: Option<f64>,
        /// Largest value seen
        max: Option<f64>,
        /// Sum of values, `None` once it became non-finite
        sum: Option<f64>,
    },
    /// String columns
    String {
        /// Lexicographically smallest value
        min: Option<String>,
        /// Lexicographically largest value
        max: Option<String>,
        /// Total length of all values in bytes
        total_length: u64,
    },
}

impl TypedStatistics {
    /// Empty statistics for the given column kind
    pub fn for_kind(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Boolean => TypedStatistics::Boolean { true_count: 0 },
            TypeKind::Byte | TypeKind::Short | TypeKind::Int | TypeKind::Long | TypeKind::Date => {
                TypedStatistics::Integer {
                    min: None,
                    max: None,
                    sum: Some(0),
                }
            }
            TypeKind::Float | TypeKind::Double => TypedStatistics::Double {
                min: None,
                max: None,
                sum: Some(0.0),
            },
            TypeKind::String => TypedStatistics::String {
                min: None,
                max: None,
                total_length: 0,
            },
            TypeKind::Struct | TypeKind::List | TypeKind::Map => TypedStatistics::Generic,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TypedStatistics::Generic => "generic",
            TypedStatistics::Boolean { .. } => "boolean",
            TypedStatistics::Integer { .. } => "integer",
            TypedStatistics::Double { .. } => "double",
            TypedStatistics::String { .. } => "string",
        }
    }

    fn empty_like(&self) -> Self {
        match self {
            TypedStatistics::Generic => TypedStatistics::Generic,
            TypedStatistics::Boolean { .. } => TypedStatistics::Boolean { true_count: 0 },
            TypedStatistics::Integer { .. } => TypedStatistics::Integer {
                min: None,
                max: None,
                sum: Some(0),
            },
            TypedStatistics::Double { .. } => TypedStatistics::Double {
                min: None,
                max: None,
                sum: Some(0.0),
            },
            TypedStatistics::String { .. } => TypedStatistics::String {
                min: None,
                max: None,
                total_length: 0,
            },
        }
    }
}

fn merge_min<T: PartialOrd + Clone>(current: &mut Option<T>, other: &Option<T>) {
    if let Some(value) = other {
        match current {
            Some(existing) if *existing <= *value => {}
            _ => *current = Some(value.clone()),
        }
    }
}

fn merge_max<T: PartialOrd + Clone>(current: &mut Option<T>, other: &Option<T>) {
    if let Some(value) = other {
        match current {
            Some(existing) if *existing >= *value => {}
            _ => *current = Some(value.clone()),
        }
    }
}

fn narrow_sum(sum: Option<i128>) -> Option<i64> {
    sum.and_then(|s| i64::try_from(s).ok())
}

fn finite_sum(sum: f64) -> Option<f64> {
    if sum.is_finite() {
        Some(sum)
    } else {
        None
    }
}

/// Mutable statistics tracker for one column and one scope.
///
/// Integer sums are accumulated in `i128`, so the reported `i64` sum does not
/// depend on how values were grouped before merging.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    count: u64,
    null_count: u64,
    typed: TypedStatistics,
    // None once unknown: rebuilt from a summary whose sum left the i64 range
    exact_sum: Option<i128>,
}

impl ColumnStatistics {
    /// Empty tracker for a column of the given kind
    pub fn new(kind: TypeKind) -> Self {
        Self {
            count: 0,
            null_count: 0,
            typed: TypedStatistics::for_kind(kind),
            exact_sum: Some(0),
        }
    }

    /// Number of values consumed, nulls included
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of null values consumed
    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    /// Number of non-null values consumed
    pub fn non_null_count(&self) -> u64 {
        self.count - self.null_count
    }

    /// Kind-specific aggregates
    pub fn typed(&self) -> &TypedStatistics {
        &self.typed
    }

    /// Exact sum of the integer values, `None` when it cannot be known
    pub fn exact_sum(&self) -> Option<i128> {
        self.exact_sum
    }

    /// True if no value was consumed since creation or the last reset
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Counts `n` null values
    pub fn increment_nulls(&mut self, n: u64) {
        self.count += n;
        self.null_count += n;
    }

    /// Counts `n` non-null values without aggregating them (composite columns)
    pub fn increment_values(&mut self, n: u64) {
        self.count += n;
    }

    /// Adds a boolean value
    pub fn update_boolean(&mut self, value: bool) {
        self.count += 1;
        if let TypedStatistics::Boolean { true_count } = &mut self.typed {
            if value {
                *true_count += 1;
            }
        }
    }

    /// Adds an integer value
    pub fn update_integer(&mut self, value: i64) {
        self.count += 1;
        if let TypedStatistics::Integer { min, max, sum } = &mut self.typed {
            merge_min(min, &Some(value));
            merge_max(max, &Some(value));
            self.exact_sum = self.exact_sum.and_then(|s| s.checked_add(i128::from(value)));
            *sum = narrow_sum(self.exact_sum);
        }
    }

    /// Adds a floating point value
    pub fn update_double(&mut self, value: f64) {
        self.count += 1;
        if value.is_nan() {
            return;
        }
        if let TypedStatistics::Double { min, max, sum } = &mut self.typed {
            merge_min(min, &Some(value));
            merge_max(max, &Some(value));
            *sum = sum.and_then(|s| finite_sum(s + value));
        }
    }

    /// Adds a string value
    pub fn update_string(&mut self, value: &str) {
        self.count += 1;
        if let TypedStatistics::String {
            min,
            max,
            total_length,
        } = &mut self.typed
        {
            if min.as_deref().map_or(true, |m| value < m) {
                *min = Some(value.to_string());
            }
            if max.as_deref().map_or(true, |m| value > m) {
                *max = Some(value.to_string());
            }
            *total_length += value.len() as u64;
        }
    }

    /// Folds `other` into `self`. Counts add up, ranges widen, sums add up.
    pub fn merge(&mut self, other: &ColumnStatistics) -> Result<(), MergeMismatch> {
        match (&mut self.typed, &other.typed) {
            (TypedStatistics::Generic, TypedStatistics::Generic) => {}
            (
                TypedStatistics::Boolean { true_count },
                TypedStatistics::Boolean {
                    true_count: other_true,
                },
            ) => *true_count += other_true,
            (
                TypedStatistics::Integer { min, max, sum },
                TypedStatistics::Integer {
                    min: other_min,
                    max: other_max,
                    ..
                },
            ) => {
                merge_min(min, other_min);
                merge_max(max, other_max);
                self.exact_sum = match (self.exact_sum, other.exact_sum) {
                    (Some(a), Some(b)) => a.checked_add(b),
                    _ => None,
                };
                *sum = narrow_sum(self.exact_sum);
            }
            (
                TypedStatistics::Double { min, max, sum },
                TypedStatistics::Double {
                    min: other_min,
                    max: other_max,
                    sum: other_sum,
                },
            ) => {
                merge_min(min, other_min);
                merge_max(max, other_max);
                *sum = match (*sum, *other_sum) {
                    (Some(a), Some(b)) => finite_sum(a + b),
                    _ => None,
                };
            }
            (
                TypedStatistics::String {
                    min,
                    max,
                    total_length,
                },
                TypedStatistics::String {
                    min: other_min,
                    max: other_max,
                    total_length: other_length,
                },
            ) => {
                merge_min(min, other_min);
                merge_max(max, other_max);
                *total_length += other_length;
            }
            (mine, theirs) => {
                return Err(MergeMismatch {
                    expected: mine.name(),
                    actual: theirs.name(),
                })
            }
        }
        self.count += other.count;
        self.null_count += other.null_count;
        Ok(())
    }

    /// Clears all aggregates, keeping the column kind
    pub fn reset(&mut self) {
        self.count = 0;
        self.null_count = 0;
        self.typed = self.typed.empty_like();
        self.exact_sum = Some(0);
    }

    /// Read-only snapshot in serialized form
    pub fn summary(&self, column_id: u32) -> ColumnStatisticsSummary {
        ColumnStatisticsSummary {
            column_id,
            count: self.count,
            null_count: self.null_count,
            typed: self.typed.clone(),
        }
    }
}

/// Serialized statistics of one column, as stored in row-index entries and footers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStatisticsSummary {
    /// Column the statistics describe
    pub column_id: u32,
    /// Number of values, nulls included
    pub count: u64,
    /// Number of nulls
    pub null_count: u64,
    /// Kind-specific aggregates
    #[serde(flatten)]
    pub typed: TypedStatistics,
}

impl ColumnStatisticsSummary {
    /// Rebuilds a mutable tracker from a snapshot
    pub fn to_statistics(&self) -> ColumnStatistics {
        let exact_sum = match self.typed {
            TypedStatistics::Integer { sum, .. } => sum.map(i128::from),
            _ => Some(0),
        };
        ColumnStatistics {
            count: self.count,
            null_count: self.null_count,
            typed: self.typed.clone(),
            exact_sum,
        }
    }
}
