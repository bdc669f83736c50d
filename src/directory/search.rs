use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::Config,
    directory::models::{AnnotatedPoint, CollectionPoint, PointCategory, SearchQuery},
    geo::{haversine_km, resolve_origin, Coordinates, Geolocator},
};

/// Filter the catalog and annotate hits with their distance from `origin`
///
/// Results keep catalog order; they are not sorted by distance.
pub fn search<'a>(
    points: &'a [CollectionPoint],
    query: &SearchQuery,
    origin: Option<Coordinates>,
) -> Vec<AnnotatedPoint<'a>> {
    points
        .iter()
        .filter(|point| point.matches(query))
        .map(|point| AnnotatedPoint {
            point,
            distance_km: origin.map(|o| haversine_km(&o, &point.coordinates())),
        })
        .collect()
}

/// Number of catalog entries per category (inactive points included)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub all: usize,
    pub store: usize,
    pub school: usize,
    pub public: usize,
    pub event: usize,
}

pub struct CollectionPointDirectory {
    points: Vec<CollectionPoint>,
    default_origin: Coordinates,
    geolocation_timeout: Duration,
}

impl CollectionPointDirectory {
    pub fn new(
        points: Vec<CollectionPoint>,
        default_origin: Coordinates,
        geolocation_timeout: Duration,
    ) -> Self {
        Self {
            points,
            default_origin,
            geolocation_timeout,
        }
    }

    pub fn from_config(points: Vec<CollectionPoint>, config: &Config) -> Self {
        Self::new(points, config.default_origin(), config.geolocation_timeout())
    }

    pub fn points(&self) -> &[CollectionPoint] {
        &self.points
    }

    pub fn default_origin(&self) -> Coordinates {
        self.default_origin
    }

    pub fn get(&self, id: &str) -> Option<&CollectionPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn search(&self, query: &SearchQuery, origin: Option<Coordinates>) -> Vec<AnnotatedPoint<'_>> {
        let results = search(&self.points, query, origin);
        debug!(
            "Search '{}' ({}) matched {} of {} points",
            query.text,
            query.category.map_or("all".to_string(), |c| c.to_string()),
            results.len(),
            self.points.len()
        );
        results
    }

    /// Search from the device position, or the default origin when it is unavailable
    pub async fn search_near(
        &self,
        geolocator: &dyn Geolocator,
        query: &SearchQuery,
    ) -> Vec<AnnotatedPoint<'_>> {
        let origin = resolve_origin(geolocator, self.geolocation_timeout, self.default_origin).await;
        self.search(query, Some(origin))
    }

    pub fn category_counts(&self) -> CategoryCounts {
        let mut counts = CategoryCounts {
            all: self.points.len(),
            ..Default::default()
        };
        for point in &self.points {
            match point.category {
                PointCategory::Store => counts.store += 1,
                PointCategory::School => counts.school += 1,
                PointCategory::Public => counts.public += 1,
                PointCategory::Event => counts.event += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PileError, geo::location::MockGeolocator, seed};

    fn directory() -> CollectionPointDirectory {
        CollectionPointDirectory::from_config(seed::collection_points(), &Config::default())
    }

    fn ids(results: &[AnnotatedPoint<'_>]) -> Vec<String> {
        results.iter().map(|r| r.point.id.clone()).collect()
    }

    #[test]
    fn test_lyon_store_search() {
        let directory = directory();
        let query = SearchQuery::new("Lyon").with_category(Some(PointCategory::Store));
        let results = directory.search(&query, Some(Coordinates::new(45.75, 4.85)));

        assert!(!results.is_empty());
        for hit in &results {
            assert!(hit.point.active);
            assert_eq!(hit.point.category, PointCategory::Store);
            let haystack = format!("{} {}", hit.point.name, hit.point.address).to_lowercase();
            assert!(haystack.contains("lyon"));
            assert!(hit.distance_km.unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_results_keep_catalog_order() {
        let directory = directory();
        let results = directory.search(&SearchQuery::default(), Some(Coordinates::new(45.76, 4.86)));

        let expected: Vec<String> = directory
            .points()
            .iter()
            .filter(|p| p.active)
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids(&results), expected);
    }

    #[test]
    fn test_no_origin_means_no_distance() {
        let directory = directory();
        let results = directory.search(&SearchQuery::default(), None);
        assert!(results.iter().all(|r| r.distance_km.is_none()));
        assert!(results.iter().all(|r| r.distance_label().is_none()));
    }

    #[test]
    fn test_inactive_points_excluded() {
        let directory = directory();
        let inactive: Vec<_> = directory.points().iter().filter(|p| !p.active).collect();
        assert!(!inactive.is_empty());

        let results = directory.search(&SearchQuery::default(), None);
        for point in inactive {
            assert!(!ids(&results).contains(&point.id));
        }
    }

    #[test]
    fn test_category_counts_cover_catalog() {
        let directory = directory();
        let counts = directory.category_counts();
        assert_eq!(counts.all, directory.points().len());
        assert_eq!(counts.store + counts.school + counts.public + counts.event, counts.all);
        assert_eq!(counts.store, 2);
    }

    #[tokio::test]
    async fn test_search_near_falls_back_to_default_origin() {
        let directory = directory();
        let mut geo = MockGeolocator::new();
        geo.expect_current_position()
            .returning(|_| Err(PileError::LocationUnavailable("gps off".to_string())));

        let near = directory.search_near(&geo, &SearchQuery::default()).await;
        let from_default = directory.search(&SearchQuery::default(), Some(directory.default_origin()));

        assert_eq!(near, from_default);
        assert!(near.iter().all(|r| r.distance_km.is_some()));
    }
}
