use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend-assigned listing identifier
pub type PropertyId = i64;

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ListingType {
    Rent,
    #[default]
    Buy,
}

impl From<String> for ListingType {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("rent") {
            Self::Rent
        } else {
            Self::Buy
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rent => f.write_str("rent"),
            Self::Buy => f.write_str("buy"),
        }
    }
}

/// Core listing data model, decoded from a `properties` row.
///
/// Only `id` is required. Every other column falls back to an empty/zero
/// value when missing or `null`, so a sparse row still renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub listing_type: ListingType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "count")]
    pub bedrooms: u32,
    #[serde(default, deserialize_with = "count")]
    pub bathrooms: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "count")]
    pub reviews: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub idealista_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub habitaclia_score: f64,
    #[serde(default)]
    pub description: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Non-negative count. Numeric columns may arrive as `2.0`; fractions round
/// to the nearest whole number and negatives clamp to zero.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or_default();
    Ok(value.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}

impl Property {
    /// Longitude/latitude pair in the order map SDKs expect
    pub fn lng_lat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    /// Price as shown on a listing card: `$1,200/mo` or `$350,000`
    pub fn display_price(&self) -> String {
        let amount = format!("${}", group_thousands(self.price));
        match self.listing_type {
            ListingType::Rent => format!("{amount}/mo"),
            ListingType::Buy => amount,
        }
    }
}

/// Formats a number with `,` thousands separators, keeping up to two
/// fraction digits when present.
pub fn group_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let cents = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if cents > 0 {
        let fraction = format!("{cents:02}");
        grouped.push('.');
        grouped.push_str(fraction.trim_end_matches('0'));
    }
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_row() {
        let row = r#"{
            "id": 7, "title": "Loft", "type": "rent", "price": 1200,
            "bedrooms": 2, "bathrooms": 1, "address": "1 Main St",
            "image": "https://img/1.jpg", "rating": 4.5, "reviews": 12,
            "longitude": -74.0, "latitude": 40.7, "company": "Acme",
            "idealista_score": 8.1, "habitaclia_score": 7.4,
            "description": null
        }"#;
        let property: Property = serde_json::from_str(row).unwrap();
        assert_eq!(property.id, 7);
        assert_eq!(property.listing_type, ListingType::Rent);
        assert_eq!(property.reviews, 12);
        assert_eq!(property.description, None);
        assert_eq!(property.lng_lat(), (-74.0, 40.7));
    }

    #[test]
    fn sparse_row_falls_back_to_defaults() {
        let property: Property = serde_json::from_str(r#"{"id": 3, "type": "lease"}"#).unwrap();
        assert_eq!(property.id, 3);
        assert_eq!(property.listing_type, ListingType::Buy);
        assert_eq!(property.title, "");
        assert_eq!(property.price, 0.0);
    }

    #[test]
    fn null_columns_do_not_sink_the_batch() {
        let rows = r#"[
            {"id": 1, "title": "A", "price": 500},
            {"id": 2, "title": null, "company": null, "type": null, "price": 300,
             "rating": null, "longitude": null, "description": null}
        ]"#;
        let properties: Vec<Property> = serde_json::from_str(rows).unwrap();

        assert_eq!(properties.len(), 2);
        let sparse = &properties[1];
        assert_eq!(sparse.title, "");
        assert_eq!(sparse.company, "");
        assert_eq!(sparse.listing_type, ListingType::Buy);
        assert_eq!(sparse.rating, 0.0);
        assert_eq!(sparse.price, 300.0);
    }

    #[test]
    fn counts_accept_float_encodings() {
        let row = r#"{"id": 4, "bedrooms": 2.0, "bathrooms": 1.5, "reviews": -3, "price": null}"#;
        let property: Property = serde_json::from_str(row).unwrap();

        assert_eq!(property.bedrooms, 2);
        assert_eq!(property.bathrooms, 2);
        assert_eq!(property.reviews, 0);
        assert_eq!(property.price, 0.0);
    }

    #[test]
    fn row_without_id_is_rejected() {
        assert!(serde_json::from_str::<Property>(r#"{"title": "No id"}"#).is_err());
    }

    #[test]
    fn price_display_depends_on_type() {
        let mut property = Property {
            price: 1200.0,
            listing_type: ListingType::Rent,
            ..Default::default()
        };
        assert_eq!(property.display_price(), "$1,200/mo");

        property.listing_type = ListingType::Buy;
        property.price = 350_000.0;
        assert_eq!(property.display_price(), "$350,000");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(1_234_567.5), "1,234,567.5");
        assert_eq!(group_thousands(-2500.25), "-2,500.25");
    }
}
