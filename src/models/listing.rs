use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// Common display shape every inventory row is normalized into. The
/// category tables carry provider-specific price columns; normalization
/// collapses them into one `price` using a fixed precedence per category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: Vec<String>,
    pub type_tag: ServiceCategory,
}

/// Aggregated results across categories, built fresh per query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub total_count: usize,
    pub by_category: BTreeMap<ServiceCategory, Vec<ServiceRecord>>,
}

fn parse_images(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

// ── Raw rows per category table ──
//
// Each row type knows its own price-field precedence; `into_record` is the
// single place that mapping lives.

#[derive(Debug, Clone)]
pub struct JetRow {
    pub id: String,
    pub name: String,
    pub home_base: Option<String>,
    pub capacity: i64,
    pub hourly_rate: Option<f64>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl JetRow {
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            title: self.name,
            subtitle: self
                .home_base
                .map(|base| format!("Based in {base} · up to {} passengers", self.capacity)),
            price: self.hourly_rate.or(self.price),
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::Jet,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmptyLegRow {
    pub id: String,
    pub aircraft_name: String,
    pub from_location: String,
    pub to_location: String,
    pub departure_date: Option<String>,
    pub seats: i64,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl EmptyLegRow {
    pub fn into_record(self) -> ServiceRecord {
        let mut subtitle = format!("{} → {}", self.from_location, self.to_location);
        if let Some(date) = &self.departure_date {
            subtitle.push_str(&format!(" on {date}"));
        }
        ServiceRecord {
            id: self.id,
            title: self.aircraft_name,
            subtitle: Some(subtitle),
            price: self.price,
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::EmptyLeg,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HelicopterRow {
    pub id: String,
    pub name: String,
    pub home_base: Option<String>,
    pub capacity: i64,
    pub price_per_hour: Option<f64>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl HelicopterRow {
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            title: self.name,
            subtitle: self
                .home_base
                .map(|base| format!("Based in {base} · up to {} passengers", self.capacity)),
            price: self.price_per_hour.or(self.price),
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::Helicopter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct YachtRow {
    pub id: String,
    pub name: String,
    pub home_port: Option<String>,
    pub guests: i64,
    pub price_per_day: Option<f64>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl YachtRow {
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            title: self.name,
            subtitle: self
                .home_port
                .map(|port| format!("{port} · up to {} guests", self.guests)),
            price: self.price_per_day.or(self.price),
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::Yacht,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CarRow {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub seats: i64,
    pub price_per_day: Option<f64>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl CarRow {
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            title: self.name,
            subtitle: self.location.map(|loc| format!("{loc} · {} seats", self.seats)),
            price: self.price_per_day.or(self.price),
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::Car,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdventureRow {
    pub id: String,
    pub title: String,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub images: String,
}

impl AdventureRow {
    pub fn into_record(self) -> ServiceRecord {
        ServiceRecord {
            id: self.id,
            title: self.title,
            subtitle: self.location,
            price: self.price,
            currency: self.currency,
            images: parse_images(&self.images),
            type_tag: ServiceCategory::Adventure,
        }
    }
}
