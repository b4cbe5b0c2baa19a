/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_360(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Re-expresses an angle in degrees in the signed `[-180, 180)` convention.
pub fn to_signed_180(degrees: f64) -> f64 {
    let wrapped = normalize_360(degrees);
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Smallest absolute difference between two headings, in degrees.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = normalize_360(a - b);
    diff.min(360.0 - diff)
}
