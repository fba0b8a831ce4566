//! Batch distance calculations with optional parallelism.
//!
//! Items expose their position through [`Located`]. Items without a position
//! get an infinite distance, so they sort last and never fall inside a radius.

use crate::{haversine_distance, Coordinate};
use serde::{Deserialize, Serialize};

/// Something with an identifier and an optional position.
pub trait Located {
    /// Stable identifier of the item.
    fn id(&self) -> &str;

    /// Position of the item, if known.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// Result of a distance calculation for a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// The item ID
    pub id: String,
    /// Calculated distance in kilometers (Infinity if location is unknown)
    pub distance: f64,
}

/// An item that passed a radius filter, with its distance from the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearby<'a, T> {
    /// The matched item
    pub item: &'a T,
    /// Distance from the centre in kilometers
    pub distance_km: f64,
}

/// Calculate distances from a centre to multiple items.
///
/// # Example
/// ```
/// use bookshare_geo::{calculate_distances, Coordinate, Located};
///
/// struct Pin(&'static str, Coordinate);
///
/// impl Located for Pin {
///     fn id(&self) -> &str { self.0 }
///     fn coordinate(&self) -> Option<Coordinate> { Some(self.1) }
/// }
///
/// let pins = [Pin("a", Coordinate::new(0.0, 1.0)), Pin("b", Coordinate::new(0.0, 2.0))];
/// let results = calculate_distances(&Coordinate::new(0.0, 0.0), &pins);
/// assert_eq!(results.len(), 2);
/// assert!(results[0].distance < results[1].distance);
/// ```
pub fn calculate_distances<T>(center: &Coordinate, items: &[T]) -> Vec<DistanceResult>
where
    T: Located + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|item| DistanceResult {
                id: item.id().to_string(),
                distance: distance_to(center, item),
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items
            .iter()
            .map(|item| DistanceResult {
                id: item.id().to_string(),
                distance: distance_to(center, item),
            })
            .collect()
    }
}

/// Calculate distances and return results sorted by distance.
///
/// # Arguments
/// * `center` - Reference coordinate
/// * `items` - Items to measure
/// * `max_results` - Maximum number of results to return (None for all)
pub fn calculate_distances_sorted<T>(
    center: &Coordinate,
    items: &[T],
    max_results: Option<usize>,
) -> Vec<DistanceResult>
where
    T: Located + Sync,
{
    let mut results = calculate_distances(center, items);

    // Stable sort keeps input order for ties; Infinity ends up last
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    if let Some(max) = max_results {
        results.truncate(max);
    }

    results
}

/// Select the items whose distance from `center` is at most `radius_km`.
///
/// The result is ordered by ascending distance. Items at equal distance keep
/// their input order, so the output is a pure function of the inputs.
pub fn within_radius<'a, T>(center: &Coordinate, items: &'a [T], radius_km: f64) -> Vec<Nearby<'a, T>>
where
    T: Located + Sync,
{
    #[cfg(feature = "parallel")]
    let mut results: Vec<Nearby<'a, T>> = {
        use rayon::prelude::*;
        items
            .par_iter()
            .filter_map(|item| nearby_entry(center, item, radius_km))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<Nearby<'a, T>> = items
        .iter()
        .filter_map(|item| nearby_entry(center, item, radius_km))
        .collect();

    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}

#[inline]
fn nearby_entry<'a, T: Located>(center: &Coordinate, item: &'a T, radius_km: f64) -> Option<Nearby<'a, T>> {
    let distance_km = distance_to(center, item);
    (distance_km <= radius_km).then_some(Nearby { item, distance_km })
}

#[inline]
fn distance_to<T: Located>(center: &Coordinate, item: &T) -> f64 {
    item.coordinate()
        .map_or(f64::INFINITY, |coord| haversine_distance(center, &coord))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Pin {
        id: String,
        at: Option<Coordinate>,
    }

    impl Located for Pin {
        fn id(&self) -> &str {
            &self.id
        }

        fn coordinate(&self) -> Option<Coordinate> {
            self.at
        }
    }

    fn pin(id: &str, at: Option<(f64, f64)>) -> Pin {
        Pin {
            id: id.to_string(),
            at: at.map(Coordinate::from),
        }
    }

    fn create_test_items() -> Vec<Pin> {
        vec![
            // Brooklyn
            pin("brooklyn", Some((40.6782, -73.9442))),
            // Jersey City
            pin("jersey", Some((40.7178, -74.0431))),
            // Philadelphia
            pin("philly", Some((39.9526, -75.1652))),
            // No stored location
            pin("unplaced", None),
        ]
    }

    const MANHATTAN: Coordinate = Coordinate { latitude: 40.7128, longitude: -74.0060 };

    #[test]
    fn test_batch_distances() {
        let items = create_test_items();
        let results = calculate_distances(&MANHATTAN, &items);

        assert_eq!(results.len(), 4);

        let brooklyn = results.iter().find(|r| r.id == "brooklyn").unwrap();
        assert!(brooklyn.distance > 0.0 && brooklyn.distance < 15.0);

        let unplaced = results.iter().find(|r| r.id == "unplaced").unwrap();
        assert!(unplaced.distance.is_infinite());
    }

    #[test]
    fn test_sorted_distances() {
        let items = create_test_items();
        let results = calculate_distances_sorted(&MANHATTAN, &items, None);

        for window in results.windows(2) {
            assert!(window[0].distance <= window[1].distance);
        }
        assert_eq!(results.last().unwrap().id, "unplaced");
    }

    #[test]
    fn test_max_results() {
        let items = create_test_items();
        let results = calculate_distances_sorted(&MANHATTAN, &items, Some(2));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "jersey");
    }

    #[test]
    fn test_radius_filter() {
        let items = create_test_items();
        let results = within_radius(&MANHATTAN, &items, 20.0);

        let ids: Vec<&str> = results.iter().map(|n| n.item.id()).collect();
        assert_eq!(ids, vec!["jersey", "brooklyn"]);
        assert!(results.iter().all(|n| n.distance_km <= 20.0));
    }

    #[test]
    fn test_equator_degree_boundary() {
        let items = vec![pin("east", Some((0.0, 1.0)))];
        let origin = Coordinate::new(0.0, 0.0);

        assert!(within_radius(&origin, &items, 100.0).is_empty());
        assert_eq!(within_radius(&origin, &items, 120.0).len(), 1);
    }

    #[test]
    fn test_identical_point_is_nearby_at_zero_radius() {
        let items = vec![pin("here", Some((40.7128, -74.0060)))];
        let results = within_radius(&MANHATTAN, &items, 0.0);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].distance_km, 0.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = vec![
            pin("first", Some((0.0, 0.5))),
            pin("second", Some((0.0, -0.5))),
        ];
        let results = within_radius(&Coordinate::new(0.0, 0.0), &items, 100.0);
        let ids: Vec<&str> = results.iter().map(|n| n.item.id()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    fn pins() -> impl Strategy<Value = Vec<Pin>> {
        prop::collection::vec(
            prop::option::weighted(0.9, (-1.0f64..1.0, -1.0f64..1.0)),
            0..40,
        )
        .prop_map(|offsets| {
            offsets
                .into_iter()
                .enumerate()
                .map(|(i, at)| pin(&format!("pin-{i}"), at))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_within_radius_is_exact_subset(items in pins(), radius in 0.0f64..200.0) {
            let center = Coordinate::new(0.0, 0.0);
            let selected = within_radius(&center, &items, radius);
            let expected = items
                .iter()
                .filter(|p| p.at.is_some_and(|c| haversine_distance(&center, &c) <= radius))
                .count();
            prop_assert_eq!(selected.len(), expected);
            for n in &selected {
                prop_assert!(n.distance_km <= radius);
            }
        }

        #[test]
        fn prop_within_radius_is_monotonic(items in pins(), r1 in 0.0f64..150.0, extra in 0.0f64..150.0) {
            let center = Coordinate::new(0.0, 0.0);
            let small: Vec<&str> = within_radius(&center, &items, r1).iter().map(|n| n.item.id()).collect();
            let large: Vec<&str> = within_radius(&center, &items, r1 + extra).iter().map(|n| n.item.id()).collect();
            for id in small {
                prop_assert!(large.contains(&id));
            }
        }
    }
}
