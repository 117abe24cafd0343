use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    // Food & drink
    Restaurant,
    Cafe,
    Bar,
    Bakery,
    Brewery,
    Winery,

    // Culture
    Museum,
    Gallery,
    Theatre,
    Cinema,
    Library,

    // Heritage
    Monument,
    Church,
    Castle,

    // Outdoors
    Park,
    Garden,
    Viewpoint,
    Beach,
    Lake,
    Zoo,

    // Urban
    Market,
    Aquarium,
}

impl PlaceCategory {
    /// Expected visit duration for this category. Static configuration shared
    /// by budget selection, adventure generation and suggestion ranking.
    pub fn visit_duration(&self) -> Duration {
        let minutes = match self {
            PlaceCategory::Restaurant => 75,
            PlaceCategory::Cafe => 40,
            PlaceCategory::Bar => 45,
            PlaceCategory::Bakery => 20,
            PlaceCategory::Brewery => 60,
            PlaceCategory::Winery => 75,
            PlaceCategory::Museum => 90,
            PlaceCategory::Gallery => 60,
            PlaceCategory::Theatre => 120,
            PlaceCategory::Cinema => 120,
            PlaceCategory::Library => 40,
            PlaceCategory::Monument => 20,
            PlaceCategory::Church => 25,
            PlaceCategory::Castle => 90,
            PlaceCategory::Park => 45,
            PlaceCategory::Garden => 40,
            PlaceCategory::Viewpoint => 20,
            PlaceCategory::Beach => 120,
            PlaceCategory::Lake => 60,
            PlaceCategory::Zoo => 150,
            PlaceCategory::Market => 50,
            PlaceCategory::Aquarium => 90,
        };
        Duration::from_secs(minutes * 60)
    }

    /// Default category pool for surprise itineraries when the caller gives
    /// no preference beyond an exclusion.
    pub fn adventure_pool() -> Vec<PlaceCategory> {
        vec![
            PlaceCategory::Museum,
            PlaceCategory::Monument,
            PlaceCategory::Park,
            PlaceCategory::Viewpoint,
            PlaceCategory::Gallery,
            PlaceCategory::Market,
            PlaceCategory::Cafe,
            PlaceCategory::Church,
            PlaceCategory::Garden,
        ]
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Bar => "bar",
            PlaceCategory::Bakery => "bakery",
            PlaceCategory::Brewery => "brewery",
            PlaceCategory::Winery => "winery",
            PlaceCategory::Museum => "museum",
            PlaceCategory::Gallery => "gallery",
            PlaceCategory::Theatre => "theatre",
            PlaceCategory::Cinema => "cinema",
            PlaceCategory::Library => "library",
            PlaceCategory::Monument => "monument",
            PlaceCategory::Church => "church",
            PlaceCategory::Castle => "castle",
            PlaceCategory::Park => "park",
            PlaceCategory::Garden => "garden",
            PlaceCategory::Viewpoint => "viewpoint",
            PlaceCategory::Beach => "beach",
            PlaceCategory::Lake => "lake",
            PlaceCategory::Zoo => "zoo",
            PlaceCategory::Market => "market",
            PlaceCategory::Aquarium => "aquarium",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PlaceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "restaurant" => Ok(PlaceCategory::Restaurant),
            "cafe" => Ok(PlaceCategory::Cafe),
            "bar" => Ok(PlaceCategory::Bar),
            "bakery" => Ok(PlaceCategory::Bakery),
            "brewery" => Ok(PlaceCategory::Brewery),
            "winery" => Ok(PlaceCategory::Winery),
            "museum" => Ok(PlaceCategory::Museum),
            "gallery" => Ok(PlaceCategory::Gallery),
            "theatre" => Ok(PlaceCategory::Theatre),
            "cinema" => Ok(PlaceCategory::Cinema),
            "library" => Ok(PlaceCategory::Library),
            "monument" => Ok(PlaceCategory::Monument),
            "church" => Ok(PlaceCategory::Church),
            "castle" => Ok(PlaceCategory::Castle),
            "park" => Ok(PlaceCategory::Park),
            "garden" => Ok(PlaceCategory::Garden),
            "viewpoint" => Ok(PlaceCategory::Viewpoint),
            "beach" => Ok(PlaceCategory::Beach),
            "lake" => Ok(PlaceCategory::Lake),
            "zoo" => Ok(PlaceCategory::Zoo),
            "market" => Ok(PlaceCategory::Market),
            "aquarium" => Ok(PlaceCategory::Aquarium),
            _ => Err(format!("Invalid place category: {}", s)),
        }
    }
}

/// A candidate place returned by the search collaborator.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceCandidate {
    pub id: Uuid,
    pub name: String,
    pub category: PlaceCategory,
    pub coordinates: Coordinates,
    /// Rating on a 0-5 scale, when the search collaborator knows one.
    pub rating: Option<f32>,
    /// Free-form description tags ("unique", "original", ...).
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PlaceCandidate {
    pub fn new(name: String, category: PlaceCategory, coordinates: Coordinates) -> Self {
        PlaceCandidate {
            id: Uuid::new_v4(),
            name,
            category,
            coordinates,
            rating: None,
            tags: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn visit_duration(&self) -> Duration {
        self.category.visit_duration()
    }

    /// True when the candidate carries a novelty tag worth a ranking bonus.
    pub fn has_novelty_tag(&self) -> bool {
        self.tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case("unique") || t.eq_ignore_ascii_case("original"))
    }
}
