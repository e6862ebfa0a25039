use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Currency used when a record does not carry one
pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn non_negative_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = f64::deserialize(deserializer)?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "price must be a non-negative number, got {amount}"
        )));
    }
    Ok(amount)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Listing status of a property
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

/// Asking price, tagged with its currency.
///
/// Backends store the amount as a numeric column, so fractional values
/// decode as-is. Negative and non-finite amounts are rejected on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    #[serde(rename = "price", deserialize_with = "non_negative_amount")]
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Self::new(amount, DEFAULT_CURRENCY)
    }
}

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    pub city: String,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Core property listing record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(flatten)]
    pub price: Price,
    #[serde(flatten)]
    pub location: Location,
    pub property_type: String,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f32>,
    /// Living area in square metres
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Minimal available listing priced in the default currency; optional
    /// fields start out empty.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        price: f64,
        city: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            price: Price::from(price),
            location: Location {
                city: city.into(),
                ..Location::default()
            },
            property_type: property_type.into(),
            bedrooms: None,
            bathrooms: None,
            area: None,
            amenities: None,
            images: None,
            status: PropertyStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.price.currency = currency.into();
        self
    }

    pub fn city(&self) -> &str {
        &self.location.city
    }

    pub fn neighborhood(&self) -> Option<&str> {
        self.location.neighborhood.as_deref()
    }
}
