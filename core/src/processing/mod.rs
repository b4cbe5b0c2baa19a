pub mod builder;
pub mod heading;
pub mod merger;
pub mod metrics;
pub mod pitch;
pub mod thinner;

pub use builder::{BuildSettings, MissionBuilder};
pub use heading::{HeadingMode, HeadingSolver};
pub use merger::{FileWaypoints, MissionMerger};
pub use metrics::{format_duration, MetricsEstimator, MissionMetrics};
pub use pitch::{PitchConvention, PitchMapper, PitchMode};
pub use thinner::Thinner;
