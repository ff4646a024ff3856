//! Geometry primitives shared by text assembly, extraction, and detection.

mod rect;
mod ruling;

pub use rect::Rect;
pub use ruling::Ruling;

/// A 2D point (x, y) in page coordinates.
pub type Point = (f64, f64);

/// Total ordering for floats with NaN collapsed to Equal.
pub(crate) fn fcmp(a: f64, b: f64) -> std::cmp::Ordering {
    a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
}

/// Cluster sorted-adjacent values: two values land in the same cluster when
/// their gap is at most `tolerance`, chaining transitively.
pub(crate) fn cluster_values(mut xs: Vec<f64>, tolerance: f64) -> Vec<Vec<f64>> {
    xs.sort_by(|a, b| fcmp(*a, *b));
    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for x in xs {
        match clusters.last_mut() {
            Some(cluster) if x - *cluster.last().unwrap() <= tolerance => cluster.push(x),
            _ => clusters.push(vec![x]),
        }
    }
    clusters
}

/// Cluster objects by a float key, chaining values within `tolerance`.
/// Clusters come back ordered by key; object order inside a cluster follows
/// the key order too.
pub(crate) fn cluster_objects<T, F: Fn(&T) -> f64>(
    xs: Vec<T>,
    key_fn: F,
    tolerance: f64,
) -> Vec<Vec<T>> {
    let mut tagged: Vec<(f64, T)> = xs.into_iter().map(|x| (key_fn(&x), x)).collect();
    tagged.sort_by(|a, b| fcmp(a.0, b.0));
    let mut clusters: Vec<Vec<T>> = Vec::new();
    let mut last_key = f64::NEG_INFINITY;
    for (key, item) in tagged {
        if clusters.is_empty() || key - last_key > tolerance {
            clusters.push(Vec::new());
        }
        clusters.last_mut().unwrap().push(item);
        last_key = key;
    }
    clusters
}
