pub mod kmz;
pub mod summary;
pub mod template;
pub mod wpml;

use serde::{Deserialize, Serialize};

pub use kmz::{write_kmz, KmzContents};
pub use summary::MissionSummary;
pub use template::render_template;
pub use wpml::render_waylines;

pub const WPML_NAMESPACE: &str = "http://www.dji.com/wpmz/1.0.2";
pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// DJI Mini 4 Pro.
pub const DRONE_ENUM_VALUE: u32 = 68;
pub const DRONE_SUB_ENUM_VALUE: u32 = 0;

/// What the aircraft does once the last waypoint is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishAction {
    #[default]
    GoHome,
    NoAction,
    AutoLand,
    GotoFirstWaypoint,
}

impl FinishAction {
    pub fn wpml_name(self) -> &'static str {
        match self {
            FinishAction::GoHome => "goHome",
            FinishAction::NoAction => "noAction",
            FinishAction::AutoLand => "autoLand",
            FinishAction::GotoFirstWaypoint => "gotoFirstWaypoint",
        }
    }
}

/// What the aircraft does when the remote-control link drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RcLostAction {
    #[default]
    GoBack,
    Landing,
    Hover,
}

impl RcLostAction {
    pub fn wpml_name(self) -> &'static str {
        match self {
            RcLostAction::GoBack => "goBack",
            RcLostAction::Landing => "landing",
            RcLostAction::Hover => "hover",
        }
    }
}

/// Container-level mission settings that do not affect waypoint geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionSettings {
    pub finish_action: FinishAction,
    pub rc_lost_action: RcLostAction,
    pub transitional_speed_m_s: f64,
    pub turn_damping_m: f64,
}

impl Default for MissionSettings {
    fn default() -> Self {
        Self {
            finish_action: FinishAction::GoHome,
            rc_lost_action: RcLostAction::GoBack,
            transitional_speed_m_s: 12.0,
            turn_damping_m: 0.0,
        }
    }
}
