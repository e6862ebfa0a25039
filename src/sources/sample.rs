use crate::models::{Location, Price, Property, PropertyStatus};
use chrono::{DateTime, Utc};

// 2024-03-01T09:00:00Z
const SAMPLE_EPOCH: i64 = 1_709_283_600;

fn listed(day: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(SAMPLE_EPOCH + day * 86_400, 0).unwrap_or_default()
}

fn tags(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    title: &str,
    description: &str,
    price: f64,
    city: &str,
    neighborhood: Option<&str>,
    property_type: &str,
    rooms: (Option<u32>, Option<f32>),
    area: Option<f64>,
    amenities: Option<Vec<String>>,
    status: PropertyStatus,
    day: i64,
) -> Property {
    Property {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        price: Price::new(price, "USD"),
        location: Location {
            city: city.to_string(),
            neighborhood: neighborhood.map(str::to_string),
            latitude: None,
            longitude: None,
        },
        property_type: property_type.to_string(),
        bedrooms: rooms.0,
        bathrooms: rooms.1,
        area,
        amenities,
        images: Some(vec![format!("/images/{id}/cover.jpg")]),
        status,
        created_at: listed(day),
        updated_at: listed(day + 1),
    }
}

/// Built-in demo listings, used when no backend or seed file is configured.
pub fn sample_properties() -> Vec<Property> {
    vec![
        sample(
            "ocean-villa",
            "Oceanfront Villa",
            "Glass-walled villa with an infinity pool above the surf.",
            4_850_000.0,
            "Miami",
            Some("Key Biscayne"),
            "villa",
            (Some(5), Some(5.5)),
            Some(620.0),
            tags(&["pool", "ocean view", "wine cellar"]),
            PropertyStatus::Available,
            0,
        ),
        sample(
            "skyline-penthouse",
            "Skyline Penthouse",
            "Two-level penthouse with a wraparound terrace and private lift.",
            7_200_000.0,
            "New York",
            Some("Tribeca"),
            "penthouse",
            (Some(4), Some(4.5)),
            Some(410.0),
            tags(&["terrace", "concierge", "gym"]),
            PropertyStatus::Available,
            2,
        ),
        sample(
            "canyon-retreat",
            "Canyon Retreat",
            "Modernist retreat on three acres with mountain views.",
            2_950_000.0,
            "Los Angeles",
            Some("Topanga"),
            "house",
            (Some(3), Some(3.0)),
            Some(280.0),
            tags(&["pool", "garden"]),
            PropertyStatus::Reserved,
            4,
        ),
        sample(
            "harbor-loft",
            "Harbor Loft",
            "Converted warehouse loft facing the marina.",
            1_150_000.0,
            "Miami",
            Some("Brickell"),
            "apartment",
            (Some(2), Some(2.0)),
            Some(140.0),
            tags(&["gym", "concierge"]),
            PropertyStatus::Available,
            7,
        ),
        sample(
            "estate-lot",
            "Hillside Estate Lot",
            "Entitled building lot with approved plans.",
            890_000.0,
            "Los Angeles",
            None,
            "land",
            (None, None),
            Some(4_000.0),
            None,
            PropertyStatus::Available,
            9,
        ),
        sample(
            "park-townhouse",
            "Park Avenue Townhouse",
            "Restored limestone townhouse with a private garden.",
            12_400_000.0,
            "New York",
            Some("Upper East Side"),
            "townhouse",
            (Some(6), Some(6.5)),
            Some(760.0),
            tags(&["garden", "elevator", "wine cellar"]),
            PropertyStatus::Sold,
            12,
        ),
    ]
}
