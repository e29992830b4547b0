//! Client-side search and structured column filters.
//!
//! Both stages only narrow: the free-text search runs first, then every
//! predicate must hold. Values are compared in their normalized (stringified,
//! lower-cased) form; numeric operators coerce both sides and never match when
//! either side is not a number.

use crate::core::types::Row;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Comparison applied by a [`FilterPredicate`]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FilterOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

impl FilterOperator {
    /// Short label for dialogs and the active-filter summary
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::Contains => "contains",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
        }
    }

    pub fn next(self) -> Self {
        let all: Vec<_> = Self::iter().collect();
        let idx = all.iter().position(|op| *op == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all: Vec<_> = Self::iter().collect();
        let idx = all.iter().position(|op| *op == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// A single structured condition on one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterPredicate {
    pub fn new(column: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Evaluate against a row; a missing column reads as the empty string
    pub fn matches(&self, row: &Row) -> bool {
        let cell = row.get(&self.column).map(|v| v.normalized()).unwrap_or_default();
        let wanted = self.value.to_lowercase();

        match self.operator {
            FilterOperator::Equals => cell == wanted,
            FilterOperator::NotEquals => cell != wanted,
            FilterOperator::Contains => cell.contains(&wanted),
            FilterOperator::GreaterThan => match (coerce_number(&cell), coerce_number(&wanted)) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            },
            FilterOperator::LessThan => match (coerce_number(&cell), coerce_number(&wanted)) {
                (Some(a), Some(b)) => a < b,
                _ => false,
            },
        }
    }

    /// Compact form for the toolbar, e.g. `cpm > 5`
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.column, self.operator.symbol(), self.value)
    }
}

/// Numeric reading of a normalized cell. Blank text (null and missing cells
/// included) reads as 0; other non-numeric or non-finite text is not a number.
fn coerce_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// True when any value of the row contains the already lower-cased term.
/// Null cells are searched as the text "null".
pub fn matches_search(row: &Row, term_lower: &str) -> bool {
    row.values().any(|v| v.search_text().contains(term_lower))
}

/// Stateless search + predicate pipeline
pub struct FilterEngine;

impl FilterEngine {
    /// Narrow `rows` by the search term, then by every predicate.
    ///
    /// Surviving rows keep their input order. Empty term and no predicates
    /// return every row.
    pub fn apply<'a>(rows: &'a [Row], search_term: &str, predicates: &[FilterPredicate]) -> Vec<&'a Row> {
        let term = search_term.to_lowercase();

        rows.iter()
            .filter(|row| term.is_empty() || matches_search(row, &term))
            .filter(|row| predicates.iter().all(|p| p.matches(row)))
            .collect()
    }
}
