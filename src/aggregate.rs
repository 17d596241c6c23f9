//! Read-only aggregates over the selected range.
//!
//! `count` covers every populated cell; the numeric aggregates and the
//! average denominator only see cells whose text parses as a number.

use serde::Serialize;

use crate::store::SparseCellStore;
use crate::types::{parse_numeric, CellRange};

/// Aggregates of one range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Populated cells
    pub count: usize,
    /// Populated cells that parse as numbers
    pub numeric_count: usize,
    pub average: Option<f64>,
}

/// A single toolbar aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Sum,
    Min,
    Max,
    Count,
    Average,
}

impl AggregateKind {
    /// Parse a toolbar action name (`sum`, `min`, `max`, `count`, `avg`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sum" => Some(Self::Sum),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "count" => Some(Self::Count),
            "avg" | "average" => Some(Self::Average),
            _ => None,
        }
    }
}

impl Aggregates {
    /// Walk the populated cells of `range`.
    pub fn compute(store: &SparseCellStore, range: CellRange) -> Self {
        let mut agg = Self::default();
        for (_, text) in store.get_range(range) {
            agg.count += 1;
            let Some(n) = parse_numeric(text) else {
                continue;
            };
            agg.numeric_count += 1;
            agg.sum += n;
            agg.min = Some(agg.min.map_or(n, |m| m.min(n)));
            agg.max = Some(agg.max.map_or(n, |m| m.max(n)));
        }
        if agg.numeric_count > 0 {
            #[allow(clippy::cast_precision_loss)]
            let denom = agg.numeric_count as f64;
            agg.average = Some(agg.sum / denom);
        }
        agg
    }

    /// The value one toolbar button reports.
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, kind: AggregateKind) -> Option<f64> {
        match kind {
            AggregateKind::Sum => Some(self.sum),
            AggregateKind::Min => self.min,
            AggregateKind::Max => self.max,
            AggregateKind::Count => Some(self.count as f64),
            AggregateKind::Average => self.average,
        }
    }
}
