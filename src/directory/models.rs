use serde::{Deserialize, Serialize};

use crate::{
    error::PileError,
    geo::{format_distance, Coordinates},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointCategory {
    Store,
    School,
    Public,
    Event,
}

impl PointCategory {
    /// Label shown next to a point in the directory
    pub fn label(&self) -> &'static str {
        match self {
            PointCategory::Store => "Magasin",
            PointCategory::School => "École",
            PointCategory::Public => "Service public",
            PointCategory::Event => "Événement",
        }
    }
}

impl std::fmt::Display for PointCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointCategory::Store => write!(f, "store"),
            PointCategory::School => write!(f, "school"),
            PointCategory::Public => write!(f, "public"),
            PointCategory::Event => write!(f, "event"),
        }
    }
}

impl std::str::FromStr for PointCategory {
    type Err = PileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "store" => Ok(PointCategory::Store),
            "school" => Ok(PointCategory::School),
            "public" => Ok(PointCategory::Public),
            "event" => Ok(PointCategory::Event),
            _ => Err(PileError::Validation(format!("unknown point category: {}", s))),
        }
    }
}

/// Read-only collection point reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPoint {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub category: PointCategory,
    pub active: bool,
    pub hours: Option<String>,
}

impl CollectionPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Turn-by-turn directions link for the point
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            self.lat, self.lng
        )
    }

    fn matches_text(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
    }

    pub(crate) fn matches(&self, query: &SearchQuery) -> bool {
        self.active
            && query.category.map_or(true, |c| c == self.category)
            && self.matches_text(&query.text.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// `None` means every category
    pub category: Option<PointCategory>,
}

impl SearchQuery {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<PointCategory>) -> Self {
        self.category = category;
        self
    }

    /// Parse a category filter where `all` selects every category
    pub fn parse_category(s: &str) -> std::result::Result<Option<PointCategory>, PileError> {
        if s.eq_ignore_ascii_case("all") {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

/// A search hit with its distance from the origin, if one was given
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedPoint<'a> {
    pub point: &'a CollectionPoint,
    pub distance_km: Option<f64>,
}

impl AnnotatedPoint<'_> {
    pub fn distance_label(&self) -> Option<String> {
        self.distance_km.map(format_distance)
    }
}
