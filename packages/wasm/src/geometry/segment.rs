use super::Position;

/// Check whether segment `p1-q1` intersects segment `p2-q2` in the xy plane.
///
/// Solves `p1 + t * (q1 - p1) = p2 + u * (q2 - p2)` and reports an
/// intersection when both `t` and `u` lie in `[0, 1]`, so touching endpoints
/// count. Parallel and collinear segments (zero determinant) are never
/// reported, even when they overlap.
pub fn segments_intersect(p1: Position, q1: Position, p2: Position, q2: Position) -> bool {
    let d1 = q1 - p1;
    let d2 = q2 - p2;

    let determinant = d1.cross_2d(d2);
    if determinant == 0.0 {
        return false;
    }

    // Vector from the start of A to the start of B
    let w = p2 - p1;

    let t = w.cross_2d(d2) / determinant;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }

    let u = w.cross_2d(d1) / determinant;
    (0.0..=1.0).contains(&u)
}
