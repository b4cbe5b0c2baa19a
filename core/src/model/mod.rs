pub mod frame;
pub mod mission;
pub mod waypoint;

pub use frame::{AltitudeType, GeoFrame, Orientation, PointOfInterest};
pub use mission::Mission;
pub use waypoint::{Waypoint, WaypointAction};
