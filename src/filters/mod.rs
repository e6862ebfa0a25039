use crate::models::Property;
use serde::{Deserialize, Serialize};

/// Lowest price accepted by the default filter set
pub const DEFAULT_MIN_PRICE: f64 = 0.0;
/// Highest price accepted by the default filter set
pub const DEFAULT_MAX_PRICE: f64 = 10_000_000.0;

/// Filter set applied to the fetched listings.
///
/// An empty list means "no constraint" for that dimension, never "reject all".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PropertyFilters {
    /// Inclusive price bounds
    pub price_range: (f64, f64),
    /// Minimum bedroom thresholds; any one satisfied is enough
    pub bedrooms: Vec<u32>,
    /// Minimum bathroom thresholds; any one satisfied is enough
    pub bathrooms: Vec<f32>,
    /// Accepted property types
    pub property_type: Vec<String>,
    /// Accepted cities
    pub location: Vec<String>,
    /// Requested amenities (match-any)
    pub amenities: Vec<String>,
    /// Free-text query over title, description, city and neighborhood
    pub search_query: String,
}

impl Default for PropertyFilters {
    fn default() -> Self {
        Self {
            price_range: (DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE),
            bedrooms: Vec::new(),
            bathrooms: Vec::new(),
            property_type: Vec::new(),
            location: Vec::new(),
            amenities: Vec::new(),
            search_query: String::new(),
        }
    }
}

impl PropertyFilters {
    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = (min, max);
        self
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.location = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_property_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property_type = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_bedrooms(mut self, thresholds: Vec<u32>) -> Self {
        self.bedrooms = thresholds;
        self
    }

    pub fn with_min_bathrooms(mut self, thresholds: Vec<f32>) -> Self {
        self.bathrooms = thresholds;
        self
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// True when no dimension narrows the result
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Decide whether a single record passes every active filter dimension.
///
/// Records missing bedroom, bathroom or amenity data are not rejected by
/// those dimensions.
pub fn matches(property: &Property, filters: &PropertyFilters) -> bool {
    let (min_price, max_price) = filters.price_range;
    let price = property.price.amount;
    if price < min_price || price > max_price {
        return false;
    }

    if !filters.search_query.is_empty() && !matches_search(property, &filters.search_query) {
        return false;
    }

    if !filters.location.is_empty() && !filters.location.iter().any(|c| c == property.city()) {
        return false;
    }

    if !filters.property_type.is_empty()
        && !filters
            .property_type
            .iter()
            .any(|t| *t == property.property_type)
    {
        return false;
    }

    if let Some(bedrooms) = property.bedrooms {
        if !filters.bedrooms.is_empty() && !filters.bedrooms.iter().any(|min| *min <= bedrooms) {
            return false;
        }
    }

    if let Some(bathrooms) = property.bathrooms {
        if !filters.bathrooms.is_empty() && !filters.bathrooms.iter().any(|min| *min <= bathrooms)
        {
            return false;
        }
    }

    if let Some(amenities) = &property.amenities {
        if !filters.amenities.is_empty()
            && !filters.amenities.iter().any(|wanted| amenities.contains(wanted))
        {
            return false;
        }
    }

    true
}

fn matches_search(property: &Property, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    hit(property.title.as_str())
        || hit(property.description.as_str())
        || hit(property.city())
        || property.neighborhood().is_some_and(hit)
}

/// Keep the records matching `filters`, in their original order.
pub fn filter_properties(properties: &[Property], filters: &PropertyFilters) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| matches(p, filters))
        .cloned()
        .collect()
}
