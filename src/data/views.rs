//! Derived datasets computed from the filtered table on every render pass.

use std::collections::HashMap;

use super::filter::{filter, FilterSelection};
use super::model::{CellValue, Table, CITY, CUISINE_STYLE, PRICE_RANGE, RATING};
use crate::error::DashboardError;

/// Row and entry caps applied by the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLimits {
    pub preview_rows: usize,
    pub top_cuisines: usize,
}

impl Default for ViewLimits {
    fn default() -> Self {
        ViewLimits {
            preview_rows: 20,
            top_cuisines: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// DerivedView – capability-checked aggregation
// ---------------------------------------------------------------------------

/// An aggregation that needs a fixed set of columns.
pub trait DerivedView: Sized {
    /// Human-readable name used in "missing data" messages.
    const NAME: &'static str;
    /// Columns that must be present in the schema.
    const REQUIRED: &'static [&'static str];

    /// Compute the view. `columns[i]` is the index of `REQUIRED[i]`.
    fn compute(table: &Table, columns: &[usize], limits: &ViewLimits) -> Self;

    /// Check the schema, then compute.
    fn build(table: &Table, limits: &ViewLimits) -> Result<Self, DashboardError> {
        let schema = table.schema();
        let columns = Self::REQUIRED
            .iter()
            .map(|col| {
                schema.index_of(col).ok_or_else(|| DashboardError::MissingColumn {
                    view: Self::NAME,
                    column: col.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| log::debug!("Skipping view: {e}"))?;
        Ok(Self::compute(table, &columns, limits))
    }
}

// ---------------------------------------------------------------------------
// City ratings (bar chart)
// ---------------------------------------------------------------------------

/// Mean rating per city, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRatings {
    pub entries: Vec<(CellValue, f64)>,
}

impl DerivedView for CityRatings {
    const NAME: &'static str = "city ratings";
    const REQUIRED: &'static [&'static str] = &[CITY, RATING];

    fn compute(table: &Table, columns: &[usize], _limits: &ViewLimits) -> Self {
        let (city_idx, rating_idx) = (columns[0], columns[1]);

        // (city, sum, count) in first-encounter order
        let mut groups: Vec<(CellValue, f64, usize)> = Vec::new();
        let mut positions: HashMap<&CellValue, usize> = HashMap::new();

        for row in table.rows() {
            let city = row.get(city_idx);
            let pos = *positions.entry(city).or_insert_with(|| {
                groups.push((city.clone(), 0.0, 0));
                groups.len() - 1
            });
            if let Some(rating) = row.get(rating_idx).as_f64() {
                groups[pos].1 += rating;
                groups[pos].2 += 1;
            }
        }

        let mut entries: Vec<(CellValue, f64)> = groups
            .into_iter()
            .filter(|(_, _, count)| *count > 0)
            .map(|(city, sum, count)| (city, sum / count as f64))
            .collect();
        // stable: ties keep encounter order
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        CityRatings { entries }
    }
}

// ---------------------------------------------------------------------------
// Price vs rating (scatter)
// ---------------------------------------------------------------------------

/// One scatter point per filtered row.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub price: CellValue,
    pub rating: Option<f64>,
    /// Colour key; `None` when the table has no city column.
    pub city: Option<CellValue>,
}

/// Price range against rating for every filtered row, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRatingPairs {
    pub points: Vec<PricePoint>,
}

impl DerivedView for PriceRatingPairs {
    const NAME: &'static str = "price vs rating";
    const REQUIRED: &'static [&'static str] = &[PRICE_RANGE, RATING];

    fn compute(table: &Table, columns: &[usize], _limits: &ViewLimits) -> Self {
        let (price_idx, rating_idx) = (columns[0], columns[1]);
        let city_idx = table.schema().index_of(CITY);

        let points = table
            .rows()
            .iter()
            .map(|row| PricePoint {
                price: row.get(price_idx).clone(),
                rating: row.get(rating_idx).as_f64(),
                city: city_idx.map(|idx| row.get(idx).clone()),
            })
            .collect();

        PriceRatingPairs { points }
    }
}

/// How price values map onto the horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceAxis {
    Numeric,
    /// Category labels in first-appearance order; position = index.
    Categorical(Vec<CellValue>),
}

impl PriceAxis {
    pub fn position(&self, price: &CellValue) -> Option<f64> {
        match self {
            PriceAxis::Numeric => price.as_f64(),
            PriceAxis::Categorical(categories) => categories
                .iter()
                .position(|c| c == price)
                .map(|i| i as f64),
        }
    }
}

impl PriceRatingPairs {
    /// Numeric when every non-null price is a number, categorical otherwise.
    pub fn price_axis(&self) -> PriceAxis {
        let mut prices = self.points.iter().map(|p| &p.price).filter(|p| !p.is_null());
        if prices.all(|p| p.as_f64().is_some()) {
            return PriceAxis::Numeric;
        }

        let mut categories: Vec<CellValue> = Vec::new();
        for point in &self.points {
            if !point.price.is_null() && !categories.contains(&point.price) {
                categories.push(point.price.clone());
            }
        }
        PriceAxis::Categorical(categories)
    }
}

// ---------------------------------------------------------------------------
// Cuisine frequency (pie chart)
// ---------------------------------------------------------------------------

/// The most frequent cuisine styles with their counts, most common first.
#[derive(Debug, Clone, PartialEq)]
pub struct CuisineFrequency {
    pub entries: Vec<(CellValue, usize)>,
}

impl CuisineFrequency {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }
}

impl DerivedView for CuisineFrequency {
    const NAME: &'static str = "cuisine distribution";
    const REQUIRED: &'static [&'static str] = &[CUISINE_STYLE];

    fn compute(table: &Table, columns: &[usize], limits: &ViewLimits) -> Self {
        let cuisine_idx = columns[0];

        let mut entries: Vec<(CellValue, usize)> = Vec::new();
        let mut positions: HashMap<&CellValue, usize> = HashMap::new();

        for row in table.rows() {
            let cuisine = row.get(cuisine_idx);
            if cuisine.is_null() {
                continue;
            }
            let pos = *positions.entry(cuisine).or_insert_with(|| {
                entries.push((cuisine.clone(), 0));
                entries.len() - 1
            });
            entries[pos].1 += 1;
        }

        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limits.top_cuisines);

        CuisineFrequency { entries }
    }
}

// ---------------------------------------------------------------------------
// Preview + render pass
// ---------------------------------------------------------------------------

/// The first rows of the filtered table, all columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub table: Table,
}

impl Preview {
    pub fn of(table: &Table, limits: &ViewLimits) -> Self {
        Preview {
            table: table.head(limits.preview_rows),
        }
    }
}

/// Everything the presentation layer needs for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    /// Degradations hit while filtering.
    pub notices: Vec<DashboardError>,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub city_ratings: Result<CityRatings, DashboardError>,
    pub price_rating: Result<PriceRatingPairs, DashboardError>,
    pub cuisines: Result<CuisineFrequency, DashboardError>,
    pub preview: Preview,
}

impl RenderPass {
    /// Filter `table` by `selection` and derive every view from the result.
    pub fn build(table: &Table, selection: &FilterSelection, limits: &ViewLimits) -> Self {
        let filtered = filter(table, selection);
        let view = &filtered.table;

        RenderPass {
            notices: filtered.notice.iter().cloned().collect(),
            row_count: view.len(),
            columns: view.schema().columns().to_vec(),
            city_ratings: CityRatings::build(view, limits),
            price_rating: PriceRatingPairs::build(view, limits),
            cuisines: CuisineFrequency::build(view, limits),
            preview: Preview::of(view, limits),
        }
    }
}

impl Default for RenderPass {
    fn default() -> Self {
        RenderPass::build(&Table::empty(), &FilterSelection::new(), &ViewLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    fn ratings(rows: &[&[&str]]) -> Table {
        table(&[CITY, RATING], rows)
    }

    #[test]
    fn test_city_ratings_example() {
        let t = ratings(&[&["Paris", "4.0"], &["Paris", "5.0"], &["Rome", "3.0"]]);
        let view = CityRatings::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(
            view.entries,
            vec![(CellValue::from("Paris"), 4.5), (CellValue::from("Rome"), 3.0)]
        );
    }

    #[test]
    fn test_city_ratings_sorted_descending_with_stable_ties() {
        let t = ratings(&[
            &["Oslo", "3.0"],
            &["Rome", "4.0"],
            &["Milan", "3.0"],
            &["Rome", "5.0"],
            &["Lyon", "2"],
        ]);
        let view = CityRatings::build(&t, &ViewLimits::default()).unwrap();
        let cities: Vec<String> = view.entries.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(cities, vec!["Rome", "Oslo", "Milan", "Lyon"]);
        for pair in view.entries.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_city_ratings_null_handling() {
        let t = ratings(&[
            &["Paris", "4.0"],
            &["Paris", ""],
            &["", "2.0"],
            &["Rome", "n/a"],
        ]);
        let view = CityRatings::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(
            view.entries,
            vec![(CellValue::from("Paris"), 4.0), (CellValue::Null, 2.0)]
        );
    }

    #[test]
    fn test_city_ratings_without_rating_column() {
        let t = table(&[CITY], &[&["Paris"]]);
        let err = CityRatings::build(&t, &ViewLimits::default()).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingColumn {
                view: "city ratings",
                column: RATING.to_string()
            }
        );
    }

    #[test]
    fn test_price_rating_pairs_pass_through() {
        let t = table(
            &[CITY, PRICE_RANGE, RATING],
            &[
                &["Paris", "$$$$", "4.5"],
                &["Rome", "$", ""],
                &["Paris", "$$$$", "4.5"],
            ],
        );
        let view = PriceRatingPairs::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(view.points.len(), 3);
        assert_eq!(view.points[0], view.points[2]);
        assert_eq!(view.points[1].rating, None);
        assert_eq!(view.points[1].city, Some(CellValue::from("Rome")));
    }

    #[test]
    fn test_price_rating_pairs_without_city_column() {
        let t = table(&[PRICE_RANGE, RATING], &[&["2", "4.0"]]);
        let view = PriceRatingPairs::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(view.points[0].city, None);
        assert_eq!(view.price_axis(), PriceAxis::Numeric);
        assert_eq!(view.price_axis().position(&view.points[0].price), Some(2.0));
    }

    #[test]
    fn test_categorical_price_axis_in_appearance_order() {
        let t = table(
            &[PRICE_RANGE, RATING],
            &[&["$$ - $$$", "4"], &["", "3"], &["$", "5"], &["$$ - $$$", "2"]],
        );
        let axis = PriceRatingPairs::build(&t, &ViewLimits::default())
            .unwrap()
            .price_axis();
        assert_eq!(
            axis,
            PriceAxis::Categorical(vec![CellValue::from("$$ - $$$"), CellValue::from("$")])
        );
        assert_eq!(axis.position(&CellValue::from("$")), Some(1.0));
        assert_eq!(axis.position(&CellValue::Null), None);
    }

    #[test]
    fn test_price_rating_requires_price_column() {
        let t = ratings(&[&["Paris", "4.0"]]);
        assert!(matches!(
            PriceRatingPairs::build(&t, &ViewLimits::default()),
            Err(DashboardError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_cuisine_frequency_example() {
        let t = table(&[CUISINE_STYLE], &[&["Italian"], &["Italian"], &["French"]]);
        let view = CuisineFrequency::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(
            view.entries,
            vec![(CellValue::from("Italian"), 2), (CellValue::from("French"), 1)]
        );
        assert_eq!(view.total(), 3);
    }

    #[test]
    fn test_nan_text_groups_as_one_value() {
        let t = table(
            &[CITY, RATING, CUISINE_STYLE],
            &[
                &["NaN", "4.0", "NaN"],
                &["nan", "2.0", "NaN"],
                &["Paris", "5.0", "nan"],
                &["Paris", "3.0", "Italian"],
            ],
        );

        let cuisines = CuisineFrequency::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(
            cuisines.entries,
            vec![(CellValue::Float(f64::NAN), 3), (CellValue::from("Italian"), 1)]
        );

        let ratings = CityRatings::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(
            ratings.entries,
            vec![(CellValue::from("Paris"), 4.0), (CellValue::Float(f64::NAN), 3.0)]
        );
    }

    #[test]
    fn test_cuisine_frequency_top_ten_with_stable_ties() {
        let names: Vec<String> = (0..15).map(|i| format!("Cuisine {i}")).collect();
        let mut rows: Vec<Vec<&str>> = names.iter().map(|n| vec![n.as_str()]).collect();
        rows.push(vec!["Cuisine 14"]);
        rows.push(vec![""]);
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&[CUISINE_STYLE], &rows);

        let view = CuisineFrequency::build(&t, &ViewLimits::default()).unwrap();
        assert_eq!(view.entries.len(), 10);
        assert_eq!(view.entries[0], (CellValue::from("Cuisine 14"), 2));
        assert_eq!(view.entries[1], (CellValue::from("Cuisine 0"), 1));
        assert_eq!(view.entries[9], (CellValue::from("Cuisine 8"), 1));
        for pair in view.entries.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_render_pass_filters_before_deriving() {
        let t = table(
            &[CITY, RATING, PRICE_RANGE],
            &[&["Paris", "4.0", "$"], &["Rome", "3.0", "$$"], &["Paris", "5.0", "$"]],
        );
        let selection: FilterSelection = [CellValue::from("Paris")].into_iter().collect();
        let pass = RenderPass::build(&t, &selection, &ViewLimits::default());

        assert_eq!(pass.row_count, 2);
        assert_eq!(pass.columns, vec![CITY, RATING, PRICE_RANGE]);
        assert!(pass.notices.is_empty());
        assert_eq!(
            pass.city_ratings.unwrap().entries,
            vec![(CellValue::from("Paris"), 4.5)]
        );
        assert_eq!(pass.price_rating.unwrap().points.len(), 2);
        assert!(pass.cuisines.is_err());
        assert_eq!(pass.preview.table.len(), 2);
    }

    #[test]
    fn test_preview_is_capped() {
        let rows: Vec<Vec<String>> = (0..30).map(|i| vec![format!("City {i}")]).collect();
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().map(String::as_str).collect()).collect();
        let rows: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
        let t = table(&[CITY], &rows);

        let pass = RenderPass::build(&t, &FilterSelection::new(), &ViewLimits::default());
        assert_eq!(pass.row_count, 30);
        assert_eq!(pass.preview.table.len(), 20);
        assert_eq!(pass.preview.table.rows()[0].get(0), &CellValue::from("City 0"));
    }

    #[test]
    fn test_preview_shows_source_text() {
        let t = ratings(&[&["Paris", "4.0"], &["Rome", "4.5"]]);
        let pass = RenderPass::build(&t, &FilterSelection::new(), &ViewLimits::default());
        let preview = pass.preview.table.rows();
        assert_eq!(preview[0].text(1), "4.0");
        assert_eq!(preview[1].text(1), "4.5");
    }

    #[test]
    fn test_render_pass_on_empty_table() {
        let pass = RenderPass::default();
        assert_eq!(pass.row_count, 0);
        assert_eq!(pass.notices.len(), 1);
        assert!(pass.city_ratings.is_err());
    }
}
