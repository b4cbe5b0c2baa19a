pub mod angle;
pub mod sphere;

pub use angle::{angular_difference, normalize_360, to_signed_180};
pub use sphere::{destination, haversine_distance, initial_bearing, EARTH_RADIUS_M};
