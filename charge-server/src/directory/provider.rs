//! Abstraction over "give me stations near this point".

use std::future::Future;

use crate::domain::{ConnectorType, Station};
use crate::geo::Coordinate;

use super::error::DirectoryError;

/// Largest search radius the directory honours, in kilometers.
pub const MAX_RADIUS_KM: f64 = 500.0;

/// Largest result count the directory honours.
pub const MAX_RESULTS: usize = 500;

/// A nearby-stations query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: Coordinate,
    pub radius_km: f64,
    pub max_results: usize,

    /// Only stations offering one of these; empty means no filter.
    pub connectors: Vec<ConnectorType>,
}

impl NearbyQuery {
    /// Create a query. Radius and result count are capped at the
    /// directory's own ceilings.
    pub fn new(center: Coordinate, radius_km: f64, max_results: usize) -> Self {
        Self {
            center,
            radius_km: radius_km.clamp(0.0, MAX_RADIUS_KM),
            max_results: max_results.min(MAX_RESULTS),
            connectors: Vec::new(),
        }
    }

    /// Restrict the query to stations offering any of `connectors`.
    pub fn with_connectors(mut self, connectors: &[ConnectorType]) -> Self {
        self.connectors = connectors.to_vec();
        self
    }
}

/// Source of normalized stations around a point.
///
/// Implemented by the live directory client and its caching wrapper, and
/// by test doubles.
pub trait StationProvider {
    fn fetch_nearby(
        &self,
        query: &NearbyQuery,
    ) -> impl Future<Output = Result<Vec<Station>, DirectoryError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_caps_apply() {
        let query = NearbyQuery::new(Coordinate::new(0.0, 0.0), 900.0, 2000);
        assert_eq!(query.radius_km, MAX_RADIUS_KM);
        assert_eq!(query.max_results, MAX_RESULTS);

        let query = NearbyQuery::new(Coordinate::new(0.0, 0.0), 20.0, 10);
        assert_eq!(query.radius_km, 20.0);
        assert_eq!(query.max_results, 10);
        assert!(query.connectors.is_empty());
    }

    #[test]
    fn with_connectors_sets_filter() {
        let query = NearbyQuery::new(Coordinate::new(0.0, 0.0), 20.0, 10)
            .with_connectors(&[ConnectorType::Ccs, ConnectorType::Tesla]);
        assert_eq!(
            query.connectors,
            vec![ConnectorType::Ccs, ConnectorType::Tesla]
        );
    }
}
