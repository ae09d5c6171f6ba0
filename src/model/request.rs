use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CrossqlError;
use crate::model::{Line, LineRole, QueryComponent};

/// Calendar step for an axis query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Increment {
    Day,
    Month,
    /// No dialect has a native quarter step; synthesized as +3 months.
    Quarter,
    Year,
}

impl Increment {
    /// Advance a date by one increment.
    pub fn step(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Increment::Day => date + Days::new(1),
            Increment::Month => date + Months::new(1),
            Increment::Quarter => date + Months::new(3),
            Increment::Year => date + Months::new(12),
        }
    }
}

impl FromStr for Increment {
    type Err = CrossqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Increment::Day),
            "month" => Ok(Increment::Month),
            "quarter" => Ok(Increment::Quarter),
            "year" => Ok(Increment::Year),
            other => Err(CrossqlError::InvalidIncrement(other.to_string())),
        }
    }
}

impl std::fmt::Display for Increment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Increment::Day => write!(f, "day"),
            Increment::Month => write!(f, "month"),
            Increment::Quarter => write!(f, "quarter"),
            Increment::Year => write!(f, "year"),
        }
    }
}

/// A dense, gap-filled calendar series to LEFT JOIN sparse data onto.
///
/// `start > end` is implementation-defined rather than an error: the emitted
/// spine keeps its seed row and stops recursing, so every dialect returns
/// the single seed bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub increment: Increment,
}

impl AxisSpec {
    pub fn new(start: NaiveDate, end: NaiveDate, increment: Increment) -> Self {
        Self {
            start,
            end,
            increment,
        }
    }

    /// The bucket boundary dates the emitted spine will contain: the seed,
    /// then one step at a time while the previous date is before `end`.
    pub fn buckets(&self) -> Vec<NaiveDate> {
        let mut out = vec![self.start];
        let mut current = self.start;
        while current < self.end {
            current = self.increment.step(current);
            out.push(current);
        }
        out
    }
}

/// One observed distinct value of the pivot column, with its row frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotValue {
    pub value: String,
    pub frequency: u64,
}

impl PivotValue {
    pub fn new(value: impl Into<String>, frequency: u64) -> Self {
        Self {
            value: value.into(),
            frequency,
        }
    }
}

/// Turns distinct values of the pivot-tagged line into output columns.
///
/// The compiler keeps the `max_columns` most frequent values, descending by
/// frequency with ties broken by input order (a stable sort — no stronger
/// tie-break guarantee is offered). The `values` list usually comes from
/// running the discovery query emitted by `pivot_values_sql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotSpec {
    pub values: Vec<PivotValue>,
    pub max_columns: usize,
}

impl PivotSpec {
    pub fn new(values: Vec<PivotValue>, max_columns: usize) -> Self {
        Self {
            values,
            max_columns,
        }
    }

    /// Placeholder spec used before discovery has produced any values.
    pub fn discover(max_columns: usize) -> Self {
        Self {
            values: Vec::new(),
            max_columns,
        }
    }
}

/// An ordered collection of lines plus the optional axis and pivot
/// sub-structures that select the aggregate shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub lines: Vec<Line>,
    #[serde(default)]
    pub axis: Option<AxisSpec>,
    #[serde(default)]
    pub pivot: Option<PivotSpec>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl AggregateRequest {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            axis: None,
            pivot: None,
            limit: None,
            offset: None,
        }
    }

    /// Append an untagged line.
    pub fn line(mut self, text: impl Into<String>, component: QueryComponent) -> Self {
        self.lines.push(Line::new(text, component));
        self
    }

    /// Append a role-tagged line.
    pub fn line_with_role(
        mut self,
        text: impl Into<String>,
        component: QueryComponent,
        role: LineRole,
    ) -> Self {
        self.lines.push(Line::with_role(text, component, role));
        self
    }

    /// Tag the aggregate expression (SELECT component, CountExpression role).
    pub fn count(self, text: impl Into<String>) -> Self {
        self.line_with_role(text, QueryComponent::Select, LineRole::CountExpression)
    }

    /// Add a FROM source.
    pub fn from(self, text: impl Into<String>) -> Self {
        self.line(text, QueryComponent::From)
    }

    /// Add a WHERE predicate fragment.
    pub fn filter(self, text: impl Into<String>) -> Self {
        self.line(text, QueryComponent::Where)
    }

    /// Add a GROUP BY expression.
    pub fn group_by(self, text: impl Into<String>) -> Self {
        self.line(text, QueryComponent::GroupBy)
    }

    /// Add an ORDER BY entry.
    pub fn order_by(self, text: impl Into<String>) -> Self {
        self.line(text, QueryComponent::OrderBy)
    }

    /// Tag the pivot column (GroupBy component, PivotColumn role).
    pub fn pivot_column(self, text: impl Into<String>) -> Self {
        self.line_with_role(text, QueryComponent::GroupBy, LineRole::PivotColumn)
    }

    /// Tag the axis date expression (GroupBy component, AxisColumn role).
    pub fn axis_column(self, text: impl Into<String>) -> Self {
        self.line_with_role(text, QueryComponent::GroupBy, LineRole::AxisColumn)
    }

    pub fn with_axis(mut self, axis: AxisSpec) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn with_pivot(mut self, pivot: PivotSpec) -> Self {
        self.pivot = Some(pivot);
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u32) -> Self {
        self.offset = Some(n);
        self
    }

    /// Lines belonging to a component, in caller order.
    pub fn component(&self, component: QueryComponent) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(move |l| l.component == component)
    }

    /// The single line carrying a role, if any.
    pub fn role_line(&self, role: LineRole) -> Option<&Line> {
        self.lines.iter().find(|l| l.has_role(role))
    }

    /// How many lines carry a role.
    pub fn role_count(&self, role: LineRole) -> usize {
        self.lines.iter().filter(|l| l.has_role(role)).count()
    }
}

impl Default for AggregateRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_increment_from_str() {
        assert_eq!("Quarter".parse::<Increment>().unwrap(), Increment::Quarter);
        assert!(matches!(
            "week".parse::<Increment>(),
            Err(CrossqlError::InvalidIncrement(_))
        ));
    }

    #[test]
    fn test_bucket_count_matches_ceiling_formula() {
        // Monthly, Jan..Mar inclusive: 3 buckets.
        let spec = AxisSpec::new(d(2023, 1, 1), d(2023, 3, 1), Increment::Month);
        assert_eq!(spec.buckets(), vec![d(2023, 1, 1), d(2023, 2, 1), d(2023, 3, 1)]);

        // Daily over ten days: 10 buckets.
        let spec = AxisSpec::new(d(2023, 1, 1), d(2023, 1, 10), Increment::Day);
        assert_eq!(spec.buckets().len(), 10);

        // Unaligned end: last bucket may pass `end` but its truncation equals
        // end's truncation under the increment.
        let spec = AxisSpec::new(d(2023, 1, 15), d(2023, 3, 10), Increment::Month);
        let buckets = spec.buckets();
        assert_eq!(buckets.last().copied(), Some(d(2023, 3, 15)));
    }

    #[test]
    fn test_buckets_monotonic() {
        let spec = AxisSpec::new(d(2020, 1, 1), d(2024, 1, 1), Increment::Quarter);
        let buckets = spec.buckets();
        assert!(buckets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_quarter_round_trip() {
        // Four quarter steps from a quarter boundary land on the same month
        // one year later.
        let start = d(2023, 4, 1);
        let mut current = start;
        for _ in 0..4 {
            current = Increment::Quarter.step(current);
        }
        assert_eq!(current, d(2024, 4, 1));
    }

    #[test]
    fn test_start_after_end_yields_seed_bucket() {
        let spec = AxisSpec::new(d(2023, 5, 1), d(2023, 1, 1), Increment::Month);
        assert_eq!(spec.buckets(), vec![d(2023, 5, 1)]);
    }

    #[test]
    fn test_request_serde_round_trip() {
        let request = AggregateRequest::new()
            .count("COUNT(*)")
            .from("orders")
            .group_by("region")
            .with_axis(AxisSpec::new(d(2023, 1, 1), d(2023, 3, 1), Increment::Month));
        let json = serde_json::to_string(&request).unwrap();
        let back: AggregateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
