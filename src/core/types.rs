use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Identifier handed out for every issued load request.
///
/// Ids are strictly increasing within one dashboard, so the latest request is
/// always the one with the largest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id issued after this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Remote data feed backing one of the dashboard pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    MarketLines,
    SellersJson,
    Play,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketLines => "market_lines",
            Self::SellersJson => "sellers_json",
            Self::Play => "play",
        }
    }

    /// Human readable title used in headers and notifications
    pub fn title(&self) -> &'static str {
        match self {
            Self::MarketLines => "Market Lines",
            Self::SellersJson => "SH Sellers.json",
            Self::Play => "Play",
        }
    }

    pub fn all() -> [DataSource; 3] {
        [Self::MarketLines, Self::SellersJson, Self::Play]
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market_lines" => Ok(Self::MarketLines),
            "sellers_json" => Ok(Self::SellersJson),
            "play" => Ok(Self::Play),
            _ => Err(format!("Unknown data source: {}", s)),
        }
    }
}

/// A single cell of a remote row.
///
/// Rows arrive as loosely typed JSON; every value is folded into one of these
/// variants when the response is parsed. Nested arrays and objects are kept as
/// their compact JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Lower-cased string form used by search and filter comparisons
    pub fn normalized(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Lower-cased form used by free-text search, where null reads as "null"
    pub fn search_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            other => other.normalized(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Integral values print without a fractional part ("10", not "10.0")
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Self::Number(f),
                None => Self::Text(n.to_string()),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(CellValue::from)
    }
}

/// One record of a region, in the key order the backend sent it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs; a repeated column keeps its first
    /// position and takes the last value.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Self::new();
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }

    /// Convert a JSON object, keeping its key order
    pub fn from_json_object(object: Map<String, Value>) -> Self {
        Self {
            cells: object
                .into_iter()
                .map(|(k, v)| (k, CellValue::from(v)))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(k, _)| *k == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    /// Column names in natural order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.cells.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Display text for a column; missing columns render empty
    pub fn display(&self, column: &str) -> String {
        self.get(column).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Regional buckets of rows, keyed by region name in backend order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    regions: Vec<(String, Vec<Row>)>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a region; replacing an existing one keeps its position
    pub fn insert(&mut self, region: impl Into<String>, rows: Vec<Row>) {
        let region = region.into();
        match self.regions.iter_mut().find(|(name, _)| *name == region) {
            Some((_, existing)) => *existing = rows,
            None => self.regions.push((region, rows)),
        }
    }

    /// Rows of a region; an unknown region has no rows
    pub fn rows(&self, region: &str) -> &[Row] {
        self.regions
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.iter().any(|(name, _)| name == region)
    }

    pub fn region_names(&self) -> Vec<&str> {
        self.regions.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn first_region(&self) -> Option<&str> {
        self.regions.first().map(|(name, _)| name.as_str())
    }

    pub fn position(&self, region: &str) -> Option<usize> {
        self.regions.iter().position(|(name, _)| name == region)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn total_records(&self) -> usize {
        self.regions.iter().map(|(_, rows)| rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_id_ordering() {
        let first = RequestId::new(1);
        let second = first.next();

        assert!(second > first);
        assert_eq!(second.value(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn test_data_source_conversion() {
        assert_eq!(DataSource::from_str("play").unwrap(), DataSource::Play);
        assert_eq!(DataSource::SellersJson.as_str(), "sellers_json");
        assert!(DataSource::from_str("unknown").is_err());
    }

    #[test]
    fn test_cell_stringification() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Number(10.0).to_string(), "10");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::from("ShowHeroes").normalized(), "showheroes");
    }

    #[test]
    fn test_cell_from_json() {
        assert_eq!(CellValue::from(serde_json::json!(3)), CellValue::Number(3.0));
        assert_eq!(CellValue::from(serde_json::json!(null)), CellValue::Null);
        assert_eq!(
            CellValue::from(serde_json::json!(["a", 1])),
            CellValue::Text("[\"a\",1]".to_string())
        );
    }

    #[test]
    fn test_row_preserves_key_order() {
        let value = serde_json::json!({"zeta": 1, "alpha": "x", "mid": null});
        let Value::Object(object) = value else {
            panic!("expected object");
        };
        let row = Row::from_json_object(object);

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(row.display("alpha"), "x");
        assert_eq!(row.display("missing"), "");
    }

    #[test]
    fn test_row_insert_replaces_in_place() {
        let mut row = Row::from_pairs([("a", 1), ("b", 2)]);
        row.insert("a", 5);

        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_dataset_regions() {
        let mut dataset = Dataset::new();
        dataset.insert("GLOBAL", vec![Row::from_pairs([("a", 1)])]);
        dataset.insert("EMEA", vec![Row::new(), Row::new()]);

        assert_eq!(dataset.region_names(), vec!["GLOBAL", "EMEA"]);
        assert_eq!(dataset.first_region(), Some("GLOBAL"));
        assert_eq!(dataset.total_records(), 3);
        assert!(dataset.rows("APAC").is_empty());
    }
}
