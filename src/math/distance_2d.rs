use super::Vector2;

/// Z component of the cross product of two planar vectors.
///
/// Positive when `b` turns counter-clockwise from `a`.
#[must_use]
pub fn cross_2d(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_follows_turn_direction() {
        let east = Vector2::new(1.0, 0.0);
        assert!(cross_2d(&east, &Vector2::new(1.0, 1.0)) > 0.0);
        assert!(cross_2d(&east, &Vector2::new(1.0, -1.0)) < 0.0);
        assert!(cross_2d(&east, &Vector2::new(-3.0, 0.0)).abs() < f64::EPSILON);
    }
}
