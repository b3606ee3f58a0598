use std::collections::BTreeSet;

use super::model::{CellValue, Table, CITY};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// FilterSelection: which cities the user picked
// ---------------------------------------------------------------------------

/// The set of selected city values.
///
/// An empty selection means "no filter": every row stays visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    cities: BTreeSet<CellValue>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, city: &CellValue) -> bool {
        self.cities.contains(city)
    }

    /// Add the city if absent, remove it otherwise.
    pub fn toggle(&mut self, city: &CellValue) {
        if !self.cities.remove(city) {
            self.cities.insert(city.clone());
        }
    }

    pub fn clear(&mut self) {
        self.cities.clear();
    }

    /// Drop every selected city that is not in `available`.
    pub fn retain_available(&mut self, available: &[CellValue]) {
        self.cities.retain(|c| available.contains(c));
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }
}

impl FromIterator<CellValue> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = CellValue>>(iter: I) -> Self {
        FilterSelection {
            cities: iter.into_iter().collect(),
        }
    }
}

/// Default selection: the first `n` cities in encounter order.
pub fn default_selection(city_options: &[CellValue], n: usize) -> FilterSelection {
    city_options.iter().take(n).cloned().collect()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// A filtered table plus a notice when filtering was not possible.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub table: Table,
    pub notice: Option<DashboardError>,
}

/// Keep the rows whose city is selected, in their original order.
///
/// * The table has no city column → returned unchanged, with a notice
/// * The selection is empty → returned unchanged
/// * Otherwise → only rows with a selected city
pub fn filter(table: &Table, selection: &FilterSelection) -> Filtered {
    let Some(city_idx) = table.schema().index_of(CITY) else {
        return Filtered {
            table: table.clone(),
            notice: Some(DashboardError::MissingColumn {
                view: "city filter",
                column: CITY.to_string(),
            }),
        };
    };

    if selection.is_empty() {
        return Filtered {
            table: table.clone(),
            notice: None,
        };
    }

    Filtered {
        table: table.filter_rows(|r| selection.contains(r.get(city_idx))),
        notice: None,
    }
}
