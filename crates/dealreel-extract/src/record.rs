//! Uniform field access over heterogeneous raw records.
//!
//! Raw records arrive either as string-keyed JSON mappings or as typed,
//! attribute-bearing structs. Both expose the same [`Lookup`] capability, so
//! the extractor reads `"offers.listings.0.price.amount"` the same way from
//! either shape. Every structural miss along a path (missing key, `null`,
//! wrong node kind, out-of-range index) collapses to `None`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::{ApiItem, ScrapedCard};

/// Named-field access with an absent-value result.
pub trait Lookup {
    /// Returns the field called `name`, or `None` if it is missing or null.
    fn field(&self, name: &str) -> Option<Field<'_>>;
}

/// A borrowed view of one field value.
#[derive(Clone)]
pub enum Field<'a> {
    Text(&'a str),
    Number(Decimal),
    Bool(bool),
    Node(&'a dyn Lookup),
    List(Vec<&'a dyn Lookup>),
}

impl<'a> Field<'a> {
    /// Trimmed text; numbers are rendered in their shortest form.
    /// Blank strings count as absent.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Field::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Field::Number(n) => Some(n.normalize().to_string()),
            Field::Bool(_) | Field::Node(_) | Field::List(_) => None,
        }
    }

    /// Numeric value; text is parsed leniently as a price (`"$1,099.99"`).
    #[must_use]
    pub fn number(&self) -> Option<Decimal> {
        match self {
            Field::Number(n) => Some(*n),
            Field::Text(s) => crate::price::parse_price(s),
            Field::Bool(_) | Field::Node(_) | Field::List(_) => None,
        }
    }

    #[must_use]
    pub fn flag(&self) -> Option<bool> {
        match self {
            Field::Bool(b) => Some(*b),
            Field::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            Field::Number(_) | Field::Node(_) | Field::List(_) => None,
        }
    }

    /// List elements; any non-list field yields an empty list.
    #[must_use]
    pub fn items(self) -> Vec<&'a dyn Lookup> {
        match self {
            Field::List(items) => items,
            _ => Vec::new(),
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Field::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Field::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Field::Node(_) => f.write_str("Node(..)"),
            Field::List(items) => write!(f, "List(len={})", items.len()),
        }
    }
}

/// Conversion of a stored value into a [`Field`] view.
pub trait AsField {
    fn as_field(&self) -> Option<Field<'_>>;
}

impl AsField for String {
    fn as_field(&self) -> Option<Field<'_>> {
        Some(Field::Text(self))
    }
}

impl AsField for f64 {
    fn as_field(&self) -> Option<Field<'_>> {
        decimal_from_f64(*self).map(Field::Number)
    }
}

impl AsField for bool {
    fn as_field(&self) -> Option<Field<'_>> {
        Some(Field::Bool(*self))
    }
}

impl<T: AsField> AsField for Option<T> {
    fn as_field(&self) -> Option<Field<'_>> {
        self.as_ref().and_then(T::as_field)
    }
}

impl<T: Lookup> AsField for Vec<T> {
    fn as_field(&self) -> Option<Field<'_>> {
        Some(Field::List(
            self.iter().map(|item| item as &dyn Lookup).collect(),
        ))
    }
}

impl Lookup for Value {
    fn field(&self, name: &str) -> Option<Field<'_>> {
        self.as_object()?.get(name)?.as_field()
    }
}

impl AsField for Value {
    fn as_field(&self) -> Option<Field<'_>> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(Field::Bool(*b)),
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(decimal_from_f64))
                .map(Field::Number),
            Value::String(s) => Some(Field::Text(s)),
            Value::Array(items) => Some(Field::List(
                items.iter().map(|item| item as &dyn Lookup).collect(),
            )),
            Value::Object(_) => Some(Field::Node(self)),
        }
    }
}

/// Converts through the shortest decimal representation so `22.99_f64`
/// becomes exactly `22.99`, matching what a JSON mapping would yield.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

/// Resolves a dotted path such as `"offers.listings.0.price.amount"`.
///
/// Numeric segments index into lists; every other segment is a field name.
#[must_use]
pub fn get_path<'a>(root: &'a dyn Lookup, path: &str) -> Option<Field<'a>> {
    let mut current = Field::Node(root);
    for segment in path.split('.') {
        current = match current {
            Field::Node(node) => node.field(segment)?,
            Field::List(items) => {
                let index: usize = segment.parse().ok()?;
                Field::Node(*items.get(index)?)
            }
            Field::Text(_) | Field::Number(_) | Field::Bool(_) => return None,
        };
    }
    Some(current)
}

/// One raw record as handed over by a source adapter.
#[derive(Debug, Clone)]
pub enum RawRecord {
    /// String-keyed mapping, e.g. a record loaded from a JSON file.
    Mapping(Value),
    /// Typed catalog API item.
    Item(ApiItem),
    /// Typed card scraped from a listing page.
    Card(ScrapedCard),
}

impl RawRecord {
    /// The field accessor matching this record's shape.
    #[must_use]
    pub fn view(&self) -> &dyn Lookup {
        match self {
            RawRecord::Mapping(value) => value,
            RawRecord::Item(item) => item,
            RawRecord::Card(card) => card,
        }
    }

    /// Describes why the record cannot be traversed at all, if so.
    #[must_use]
    pub fn structural_defect(&self) -> Option<String> {
        match self {
            RawRecord::Mapping(Value::Object(_)) | RawRecord::Item(_) | RawRecord::Card(_) => {
                None
            }
            RawRecord::Mapping(other) => Some(format!(
                "expected a JSON object, found {}",
                json_kind(other)
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        RawRecord::Mapping(value)
    }
}

impl From<ApiItem> for RawRecord {
    fn from(item: ApiItem) -> Self {
        RawRecord::Item(item)
    }
}

impl From<ScrapedCard> for RawRecord {
    fn from(card: ScrapedCard) -> Self {
        RawRecord::Card(card)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn mapping_path_resolves_nested_text() {
        let record = json!({"item_info": {"title": {"display_value": "  Echo Dot  "}}});
        let title = get_path(&record, "item_info.title.display_value").and_then(|f| f.text());
        assert_eq!(title.as_deref(), Some("Echo Dot"));
    }

    #[test]
    fn mapping_path_indexes_lists() {
        let record = json!({"offers": {"listings": [{"price": {"amount": 22.99}}]}});
        let amount = get_path(&record, "offers.listings.0.price.amount").and_then(|f| f.number());
        assert_eq!(amount, Some(Decimal::new(2299, 2)));
    }

    #[test]
    fn missing_segments_are_absent() {
        let record = json!({"offers": {"listings": []}});
        assert!(get_path(&record, "offers.listings.0.price.amount").is_none());
        assert!(get_path(&record, "images.primary.large.url").is_none());
        assert!(get_path(&record, "offers.listings.x").is_none());
    }

    #[test]
    fn null_is_absent() {
        let record = json!({"item_info": null});
        assert!(get_path(&record, "item_info").is_none());
        assert!(get_path(&record, "item_info.title").is_none());
    }

    #[test]
    fn descending_into_scalar_is_absent() {
        let record = json!({"asin": "B000000001"});
        assert!(get_path(&record, "asin.value").is_none());
    }

    #[test]
    fn blank_text_is_absent() {
        let record = json!({"asin": "   "});
        assert!(get_path(&record, "asin").and_then(|f| f.text()).is_none());
    }

    #[test]
    fn text_field_parses_as_number() {
        let record = json!({"amount": "$1,099.99"});
        let amount = get_path(&record, "amount").and_then(|f| f.number());
        assert_eq!(amount, Some(Decimal::new(109_999, 2)));
    }

    #[test]
    fn flag_accepts_bool_and_text() {
        let record = json!({"a": true, "b": "false", "c": "maybe"});
        assert_eq!(get_path(&record, "a").and_then(|f| f.flag()), Some(true));
        assert_eq!(get_path(&record, "b").and_then(|f| f.flag()), Some(false));
        assert_eq!(get_path(&record, "c").and_then(|f| f.flag()), None);
    }

    #[test]
    fn typed_item_matches_mapping_lookup() {
        let value = json!({
            "asin": "B000000001",
            "offers": {"listings": [{"price": {"amount": 22.99, "currency": "USD"}}]}
        });
        let item: ApiItem = serde_json::from_value(value.clone()).unwrap();

        for path in ["asin", "offers.listings.0.price.currency"] {
            let from_map = get_path(&value, path).and_then(|f| f.text());
            let from_item = get_path(&item, path).and_then(|f| f.text());
            assert_eq!(from_map, from_item, "path {path}");
        }
        let from_map = get_path(&value, "offers.listings.0.price.amount").and_then(|f| f.number());
        let from_item = get_path(&item, "offers.listings.0.price.amount").and_then(|f| f.number());
        assert_eq!(from_map, from_item);
    }

    #[test]
    fn raw_record_view_dispatches_by_shape() {
        let record = RawRecord::from(json!({"asin": "B000000001"}));
        assert_eq!(
            get_path(record.view(), "asin").and_then(|f| f.text()).as_deref(),
            Some("B000000001")
        );
        assert!(record.structural_defect().is_none());
    }

    #[test]
    fn non_object_mapping_is_defective() {
        let record = RawRecord::from(json!("just a string"));
        let defect = record.structural_defect().expect("string record is defective");
        assert!(defect.contains("a string"));
    }
}
