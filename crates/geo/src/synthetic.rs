//! Seeded synthetic placement.
//!
//! Listings without a stored position can still be shown on a map by giving
//! them a stand-in position near an anchor. The position is derived from a
//! seed and the listing id only, so the same listing lands on the same spot
//! for every filter pass, list render and marker update.

use crate::{destination_point, Coordinate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Deterministic generator of stand-in coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticPlacer {
    seed: u64,
    spread_km: f64,
}

impl SyntheticPlacer {
    /// Creates a placer that scatters points up to `spread_km` from the anchor.
    ///
    /// Negative or non-finite spreads collapse to zero.
    pub fn new(seed: u64, spread_km: f64) -> Self {
        let spread_km = if spread_km.is_finite() { spread_km.max(0.0) } else { 0.0 };
        Self { seed, spread_km }
    }

    /// Seed used for every placement.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Maximum distance of a placed point from its anchor.
    pub fn spread_km(&self) -> f64 {
        self.spread_km
    }

    /// Place the item identified by `id` near `anchor`.
    ///
    /// # Example
    /// ```
    /// use bookshare_geo::{Coordinate, SyntheticPlacer};
    ///
    /// let placer = SyntheticPlacer::new(42, 4.0);
    /// let anchor = Coordinate::new(40.7128, -74.0060);
    /// assert_eq!(placer.place("book-1", &anchor), placer.place("book-1", &anchor));
    /// ```
    pub fn place(&self, id: &str, anchor: &Coordinate) -> Coordinate {
        let mut rng = StdRng::seed_from_u64(self.item_seed(id));
        let bearing = rng.random::<f64>() * std::f64::consts::TAU;
        let distance_km = rng.random::<f64>() * self.spread_km;

        destination_point(anchor, bearing, distance_km)
    }

    fn item_seed(&self, id: &str) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(id.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine_distance;
    use proptest::prelude::*;

    const ANCHOR: Coordinate = Coordinate { latitude: 40.7128, longitude: -74.0060 };

    #[test]
    fn test_same_inputs_same_point() {
        let placer = SyntheticPlacer::new(7, 4.0);
        let a = placer.place("listing-a", &ANCHOR);
        let b = placer.place("listing-a", &ANCHOR);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_and_seeds_spread_points() {
        let placer = SyntheticPlacer::new(7, 4.0);
        assert_ne!(placer.place("listing-a", &ANCHOR), placer.place("listing-b", &ANCHOR));

        let other_seed = SyntheticPlacer::new(8, 4.0);
        assert_ne!(placer.place("listing-a", &ANCHOR), other_seed.place("listing-a", &ANCHOR));
    }

    #[test]
    fn test_zero_spread_returns_anchor() {
        let placer = SyntheticPlacer::new(1, 0.0);
        let point = placer.place("anything", &ANCHOR);
        assert!(haversine_distance(&ANCHOR, &point) < 1e-9);
    }

    #[test]
    fn test_invalid_spread_is_zeroed() {
        assert_eq!(SyntheticPlacer::new(1, -3.0).spread_km(), 0.0);
        assert_eq!(SyntheticPlacer::new(1, f64::NAN).spread_km(), 0.0);
    }

    #[test]
    fn test_spread_holds_next_to_the_pole() {
        let anchor = Coordinate::new(89.9, 0.0);
        let placer = SyntheticPlacer::new(3, 50.0);
        let worst = (0..2000)
            .map(|i| haversine_distance(&anchor, &placer.place(&format!("book-{i}"), &anchor)))
            .fold(0.0f64, f64::max);
        assert!(worst <= 50.0 + 1e-3, "worst distance from anchor {worst} km");
    }

    proptest! {
        #[test]
        fn prop_points_stay_within_spread(
            seed in any::<u64>(),
            id in "[a-z0-9-]{1,24}",
            spread in 0.0f64..50.0,
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
        ) {
            let anchor = Coordinate::new(lat, lng);
            let placer = SyntheticPlacer::new(seed, spread);
            let point = placer.place(&id, &anchor);
            prop_assert!(point.is_valid());
            prop_assert!(haversine_distance(&anchor, &point) <= spread + 1e-3);
        }
    }
}
