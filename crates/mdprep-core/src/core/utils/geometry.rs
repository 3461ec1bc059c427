use nalgebra::{Point3, Vector3};

/// Unweighted geometric center of a set of points, or `None` for an empty set.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_empty_set_is_none() {
        let points: Vec<Point3<f64>> = Vec::new();
        assert!(centroid(&points).is_none());
    }

    #[test]
    fn centroid_averages_coordinates() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, -3.0),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
        assert!((c.z + 1.0).abs() < 1e-12);
    }
}
