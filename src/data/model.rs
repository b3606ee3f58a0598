use std::collections::HashSet;
use std::fmt;

pub const CITY: &str = "City";
pub const RATING: &str = "Rating";
pub const PRICE_RANGE: &str = "Price Range";
pub const CUISINE_STYLE: &str = "Cuisine Style";

// ---------------------------------------------------------------------------
// CellValue – a single CSV cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, inferred from the CSV text.
/// Used as a key in sets and maps, so it must be `Ord` and `Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Empty field.
    Null,
}

// -- Manual Eq/Ord/Hash so we can put CellValue in BTreeSet and HashMap --
// Floats compare by their canonical form: every NaN is one value and
// -0.0 equals 0.0, so equality, ordering and hashing agree.

fn canonical(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => canonical(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl CellValue {
    /// Infer the type of a raw CSV field: integer, float, bool, else text.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }

    /// Numeric view of the cell. `NaN` counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Schema – the columns present in a loaded table
// ---------------------------------------------------------------------------

/// Ordered column names taken from the CSV header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        Schema { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// First column of `required` that is not part of this schema.
    pub fn first_missing<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        required.iter().copied().find(|c| !self.contains(c))
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the CSV
// ---------------------------------------------------------------------------

/// A single restaurant row; cells line up with the table's [`Schema`].
/// The source text is kept for display, the typed cells for computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    cells: Vec<CellValue>,
    raw: Vec<String>,
}

impl Record {
    /// Type every field with [`CellValue::parse`], keeping the original text.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let raw: Vec<String> = fields.into_iter().map(str::to_string).collect();
        let cells = raw.iter().map(|f| CellValue::parse(f)).collect();
        Record { cells, raw }
    }

    /// Cell at a column index; out-of-range reads as `Null`.
    pub fn get(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&CellValue::Null)
    }

    /// Field text exactly as it appeared in the CSV; out-of-range reads as "".
    pub fn text(&self, idx: usize) -> &str {
        self.raw.get(idx).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Rows loaded from one CSV file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Schema,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, rows: Vec<Record>) -> Self {
        Table { schema, rows }
    }

    /// Zero rows, zero known columns.
    pub fn empty() -> Self {
        Table::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// New table with the same schema holding the rows that satisfy `keep`.
    pub fn filter_rows(&self, mut keep: impl FnMut(&Record) -> bool) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Distinct values of a column in first-encounter order.
    /// Empty when the column does not exist.
    pub fn unique_values(&self, column: &str) -> Vec<CellValue> {
        let Some(idx) = self.schema.index_of(column) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.get(idx))
            .filter(|v| seen.insert(*v))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from string cells, inferring types like the loader does.
    pub(crate) fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let schema = Schema::new(columns.iter().map(|c| c.to_string()).collect());
        let rows = rows
            .iter()
            .map(|r| Record::from_fields(r.iter().copied()))
            .collect();
        Table::new(schema, rows)
    }

    #[test]
    fn test_parse_infers_types() {
        assert_eq!(CellValue::parse(""), CellValue::Null);
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::parse("true"), CellValue::Bool(true));
        assert_eq!(CellValue::parse("$$ - $$$"), CellValue::from("$$ - $$$"));
    }

    #[test]
    fn test_as_f64_treats_nan_as_missing() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::from("x").as_f64(), None);
    }

    #[test]
    fn test_schema_first_missing() {
        let schema = Schema::new(vec![CITY.to_string(), RATING.to_string()]);
        assert_eq!(schema.first_missing(&[CITY, RATING]), None);
        assert_eq!(schema.first_missing(&[CITY, CUISINE_STYLE]), Some(CUISINE_STYLE));
    }

    #[test]
    fn test_unique_values_keep_encounter_order() {
        let t = table(&[CITY], &[&["Rome"], &["Paris"], &["Rome"], &[""]]);
        assert_eq!(
            t.unique_values(CITY),
            vec![CellValue::from("Rome"), CellValue::from("Paris"), CellValue::Null]
        );
        assert!(t.unique_values(RATING).is_empty());
    }

    #[test]
    fn test_record_get_out_of_range_is_null() {
        let r = Record::from_fields(["1"]);
        assert_eq!(r.get(5), &CellValue::Null);
        assert_eq!(r.text(5), "");
    }

    #[test]
    fn test_record_keeps_source_text() {
        let r = Record::from_fields(["4.0", "007", "1e3", ""]);
        assert_eq!(r.get(0), &CellValue::Float(4.0));
        assert_eq!(r.get(1), &CellValue::Integer(7));
        assert_eq!(r.text(0), "4.0");
        assert_eq!(r.text(1), "007");
        assert_eq!(r.text(2), "1e3");
        assert_eq!(r.text(3), "");
        assert_eq!(CellValue::Float(4.0).to_string(), "4.0");
    }

    #[test]
    fn test_float_equality_matches_hashing() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        fn hash_of(v: &CellValue) -> u64 {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        }

        let nan = CellValue::parse("NaN");
        assert_eq!(nan, CellValue::parse("nan"));
        assert_eq!(nan, CellValue::Float(-f64::NAN));
        assert_eq!(hash_of(&nan), hash_of(&CellValue::Float(-f64::NAN)));

        let neg_zero = CellValue::parse("-0.0");
        assert_eq!(neg_zero, CellValue::Float(0.0));
        assert_eq!(hash_of(&neg_zero), hash_of(&CellValue::Float(0.0)));

        assert_ne!(CellValue::Float(1.0), CellValue::Integer(1));
    }

    #[test]
    fn test_unique_values_collapse_repeated_nan() {
        let t = table(&[CITY], &[&["NaN"], &["Paris"], &["nan"], &["NaN"]]);
        assert_eq!(
            t.unique_values(CITY),
            vec![CellValue::Float(f64::NAN), CellValue::from("Paris")]
        );
    }
}
