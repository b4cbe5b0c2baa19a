use crate::export::{MissionSettings, DRONE_ENUM_VALUE, DRONE_SUB_ENUM_VALUE, KML_NAMESPACE, WPML_NAMESPACE};
use anyhow::Context;
use missioncore::math::to_signed_180;
use missioncore::model::{AltitudeType, Mission, Waypoint, WaypointAction};
use missioncore::processing::HeadingMode;
use std::fmt::Write;

const TURN_MODE_INTERMEDIATE: &str = "toPointAndPassWithContinuityCurvature";
const TURN_MODE_LAST: &str = "toPointAndStopWithContinuityCurvature";
const HEADING_PATH_MODE: &str = "followBadArc";

/// Renders `waylines.wpml` for a merged mission.
pub fn render_waylines(
    mission: &Mission,
    settings: &MissionSettings,
    heading_mode: HeadingMode,
) -> anyhow::Result<String> {
    let first = mission
        .waypoints()
        .first()
        .context("cannot render an empty mission")?;

    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<kml xmlns="{}" xmlns:wpml="{}">"#,
        KML_NAMESPACE, WPML_NAMESPACE
    )?;
    writeln!(out, "  <Document>")?;
    write_mission_config(&mut out, settings, "    ")?;

    writeln!(out, "    <Folder>")?;
    writeln!(out, "      <wpml:templateId>0</wpml:templateId>")?;
    writeln!(
        out,
        "      <wpml:executeHeightMode>{}</wpml:executeHeightMode>",
        first.altitude_type.wpml_name()
    )?;
    writeln!(out, "      <wpml:waylineId>0</wpml:waylineId>")?;
    writeln!(
        out,
        "      <wpml:distance>{:.1}</wpml:distance>",
        mission.total_distance_m()
    )?;
    writeln!(
        out,
        "      <wpml:duration>{:.1}</wpml:duration>",
        mission.estimated_duration_s()
    )?;
    writeln!(
        out,
        "      <wpml:autoFlightSpeed>{}</wpml:autoFlightSpeed>",
        mission.cruise_speed_m_s()
    )?;

    let mut ids = ActionIds::default();
    let last = mission.len() - 1;
    for (index, waypoint) in mission.waypoints().iter().enumerate() {
        let placemark = PlacemarkContext {
            index,
            last,
            reference_altitude: first.altitude,
        };
        write_placemark(&mut out, waypoint, &placemark, settings, heading_mode, &mut ids)?;
    }

    writeln!(out, "    </Folder>")?;
    writeln!(out, "  </Document>")?;
    writeln!(out, "</kml>")?;
    Ok(out)
}

/// `missionConfig` block shared by the waylines file and the generated template.
pub(crate) fn write_mission_config(
    out: &mut String,
    settings: &MissionSettings,
    indent: &str,
) -> std::fmt::Result {
    writeln!(out, "{indent}<wpml:missionConfig>")?;
    writeln!(out, "{indent}  <wpml:flyToWaylineMode>safely</wpml:flyToWaylineMode>")?;
    writeln!(
        out,
        "{indent}  <wpml:finishAction>{}</wpml:finishAction>",
        settings.finish_action.wpml_name()
    )?;
    writeln!(out, "{indent}  <wpml:exitOnRCLost>executeLostAction</wpml:exitOnRCLost>")?;
    writeln!(
        out,
        "{indent}  <wpml:executeRCLostAction>{}</wpml:executeRCLostAction>",
        settings.rc_lost_action.wpml_name()
    )?;
    writeln!(
        out,
        "{indent}  <wpml:globalTransitionalSpeed>{:.1}</wpml:globalTransitionalSpeed>",
        settings.transitional_speed_m_s
    )?;
    writeln!(out, "{indent}  <wpml:droneInfo>")?;
    writeln!(
        out,
        "{indent}    <wpml:droneEnumValue>{}</wpml:droneEnumValue>",
        DRONE_ENUM_VALUE
    )?;
    writeln!(
        out,
        "{indent}    <wpml:droneSubEnumValue>{}</wpml:droneSubEnumValue>",
        DRONE_SUB_ENUM_VALUE
    )?;
    writeln!(out, "{indent}  </wpml:droneInfo>")?;
    writeln!(out, "{indent}</wpml:missionConfig>")
}

struct PlacemarkContext {
    index: usize,
    last: usize,
    reference_altitude: f64,
}

impl PlacemarkContext {
    fn is_endpoint(&self) -> bool {
        self.index == 0 || self.index == self.last
    }
}

/// Global counters for action group and action ids, both starting at 1.
struct ActionIds {
    group: u32,
    action: u32,
}

impl Default for ActionIds {
    fn default() -> Self {
        Self {
            group: 1,
            action: 1,
        }
    }
}

impl ActionIds {
    fn next(&mut self) -> (u32, u32) {
        let ids = (self.group, self.action);
        self.group += 1;
        self.action += 1;
        ids
    }
}

fn execute_height(waypoint: &Waypoint, reference_altitude: f64) -> f64 {
    match waypoint.altitude_type {
        AltitudeType::Wgs84 => waypoint.altitude,
        AltitudeType::RelativeToStartPoint => waypoint.altitude - reference_altitude,
    }
}

fn write_placemark(
    out: &mut String,
    waypoint: &Waypoint,
    ctx: &PlacemarkContext,
    settings: &MissionSettings,
    heading_mode: HeadingMode,
    ids: &mut ActionIds,
) -> std::fmt::Result {
    writeln!(out, "      <Placemark>")?;
    writeln!(
        out,
        "        <Point><coordinates>{:.8},{:.8}</coordinates></Point>",
        waypoint.longitude, waypoint.latitude
    )?;
    writeln!(out, "        <wpml:index>{}</wpml:index>", ctx.index)?;
    writeln!(
        out,
        "        <wpml:executeHeight>{:.1}</wpml:executeHeight>",
        execute_height(waypoint, ctx.reference_altitude)
    )?;
    writeln!(
        out,
        "        <wpml:waypointSpeed>{}</wpml:waypointSpeed>",
        waypoint.speed_m_s
    )?;

    let turn_mode = if ctx.index == ctx.last {
        TURN_MODE_LAST
    } else {
        TURN_MODE_INTERMEDIATE
    };
    writeln!(out, "        <wpml:waypointTurnParam>")?;
    writeln!(out, "          <wpml:waypointTurnMode>{}</wpml:waypointTurnMode>", turn_mode)?;
    writeln!(
        out,
        "          <wpml:waypointTurnDampingDist>{}</wpml:waypointTurnDampingDist>",
        settings.turn_damping_m
    )?;
    writeln!(out, "        </wpml:waypointTurnParam>")?;
    writeln!(out, "        <wpml:useStraightLine>0</wpml:useStraightLine>")?;

    write_heading_param(out, waypoint, ctx, heading_mode)?;

    for action in &waypoint.actions {
        match *action {
            WaypointAction::GimbalRotate { pitch_deg } => {
                let (group_id, action_id) = ids.next();
                write_gimbal_rotate(out, ctx.index, group_id, action_id, pitch_deg)?;
            }
            WaypointAction::GimbalEvenlyRotate { pitch_deg } if ctx.index < ctx.last => {
                let (group_id, action_id) = ids.next();
                write_gimbal_evenly_rotate(out, ctx.index, group_id, action_id, pitch_deg)?;
            }
            WaypointAction::GimbalEvenlyRotate { .. } => {}
        }
    }

    writeln!(out, "      </Placemark>")
}

fn write_heading_param(
    out: &mut String,
    waypoint: &Waypoint,
    ctx: &PlacemarkContext,
    heading_mode: HeadingMode,
) -> std::fmt::Result {
    let (mode, enable) = match heading_mode {
        HeadingMode::FollowCourse => ("followWayline", false),
        _ => ("smoothTransition", ctx.is_endpoint()),
    };
    writeln!(out, "        <wpml:waypointHeadingParam>")?;
    writeln!(out, "          <wpml:waypointHeadingMode>{}</wpml:waypointHeadingMode>", mode)?;
    writeln!(
        out,
        "          <wpml:waypointHeadingAngle>{:.1}</wpml:waypointHeadingAngle>",
        to_signed_180(waypoint.heading)
    )?;
    writeln!(
        out,
        "          <wpml:waypointPoiPoint>0.000000,0.000000,0.000000</wpml:waypointPoiPoint>"
    )?;
    writeln!(
        out,
        "          <wpml:waypointHeadingAngleEnable>{}</wpml:waypointHeadingAngleEnable>",
        u8::from(enable)
    )?;
    writeln!(
        out,
        "          <wpml:waypointHeadingPathMode>{}</wpml:waypointHeadingPathMode>",
        HEADING_PATH_MODE
    )?;
    writeln!(out, "        </wpml:waypointHeadingParam>")
}

fn write_group_header(
    out: &mut String,
    group_id: u32,
    start: usize,
    end: usize,
    trigger: &str,
) -> std::fmt::Result {
    writeln!(out, "        <wpml:actionGroup>")?;
    writeln!(out, "          <wpml:actionGroupId>{}</wpml:actionGroupId>", group_id)?;
    writeln!(
        out,
        "          <wpml:actionGroupStartIndex>{}</wpml:actionGroupStartIndex>",
        start
    )?;
    writeln!(
        out,
        "          <wpml:actionGroupEndIndex>{}</wpml:actionGroupEndIndex>",
        end
    )?;
    writeln!(out, "          <wpml:actionGroupMode>parallel</wpml:actionGroupMode>")?;
    writeln!(out, "          <wpml:actionTrigger>")?;
    writeln!(
        out,
        "            <wpml:actionTriggerType>{}</wpml:actionTriggerType>",
        trigger
    )?;
    writeln!(out, "          </wpml:actionTrigger>")
}

fn write_gimbal_rotate(
    out: &mut String,
    index: usize,
    group_id: u32,
    action_id: u32,
    pitch_deg: f64,
) -> std::fmt::Result {
    write_group_header(out, group_id, index, index, "reachPoint")?;
    writeln!(out, "          <wpml:action>")?;
    writeln!(out, "            <wpml:actionId>{}</wpml:actionId>", action_id)?;
    writeln!(
        out,
        "            <wpml:actionActuatorFunc>gimbalRotate</wpml:actionActuatorFunc>"
    )?;
    writeln!(out, "            <wpml:actionActuatorFuncParam>")?;
    let params = [
        ("gimbalHeadingYawBase", String::from("aircraft")),
        ("gimbalRotateMode", "absoluteAngle".into()),
        ("gimbalPitchRotateEnable", "1".into()),
        ("gimbalPitchRotateAngle", format!("{:.1}", pitch_deg)),
        ("gimbalRollRotateEnable", "0".into()),
        ("gimbalRollRotateAngle", "0".into()),
        ("gimbalYawRotateEnable", "0".into()),
        ("gimbalYawRotateAngle", "0".into()),
        ("gimbalRotateTimeEnable", "0".into()),
        ("gimbalRotateTime", "0".into()),
        ("payloadPositionIndex", "0".into()),
    ];
    for (name, value) in &params {
        writeln!(out, "              <wpml:{name}>{value}</wpml:{name}>")?;
    }
    writeln!(out, "            </wpml:actionActuatorFuncParam>")?;
    writeln!(out, "          </wpml:action>")?;
    writeln!(out, "        </wpml:actionGroup>")
}

fn write_gimbal_evenly_rotate(
    out: &mut String,
    index: usize,
    group_id: u32,
    action_id: u32,
    pitch_deg: f64,
) -> std::fmt::Result {
    let trigger = if index == 0 {
        "reachPoint"
    } else {
        "betweenAdjacentPoints"
    };
    write_group_header(out, group_id, index, index + 1, trigger)?;
    writeln!(out, "          <wpml:action>")?;
    writeln!(out, "            <wpml:actionId>{}</wpml:actionId>", action_id)?;
    writeln!(
        out,
        "            <wpml:actionActuatorFunc>gimbalEvenlyRotate</wpml:actionActuatorFunc>"
    )?;
    writeln!(out, "            <wpml:actionActuatorFuncParam>")?;
    writeln!(
        out,
        "              <wpml:gimbalPitchRotateAngle>{:.1}</wpml:gimbalPitchRotateAngle>",
        pitch_deg
    )?;
    writeln!(
        out,
        "              <wpml:payloadPositionIndex>0</wpml:payloadPositionIndex>"
    )?;
    writeln!(out, "            </wpml:actionActuatorFuncParam>")?;
    writeln!(out, "          </wpml:action>")?;
    writeln!(out, "        </wpml:actionGroup>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use missioncore::math::destination;
    use missioncore::processing::{FileWaypoints, MissionMerger};

    fn waypoint(latitude: f64, longitude: f64, altitude: f64, heading: f64) -> Waypoint {
        Waypoint {
            latitude,
            longitude,
            altitude,
            altitude_type: AltitudeType::RelativeToStartPoint,
            heading,
            gimbal_pitch: -30.0,
            speed_m_s: 8.0,
            source_file: "orbit.json".into(),
            actions: vec![
                WaypointAction::GimbalRotate { pitch_deg: -30.0 },
                WaypointAction::GimbalEvenlyRotate { pitch_deg: -30.0 },
            ],
        }
    }

    fn mission() -> Mission {
        let (lat, lon) = destination(52.0, 4.0, 90.0, 100.0);
        let (lat2, lon2) = destination(lat, lon, 90.0, 100.0);
        let files = vec![FileWaypoints {
            file_id: "orbit.json".into(),
            selection_order: 0,
            waypoints: vec![
                waypoint(52.0, 4.0, 100.0, 270.0),
                waypoint(lat, lon, 110.0, 90.0),
                waypoint(lat2, lon2, 120.0, 180.0),
            ],
        }];
        MissionMerger::new(10.0).merge(files).unwrap()
    }

    #[test]
    fn waylines_contain_one_placemark_per_waypoint() {
        let xml = render_waylines(&mission(), &MissionSettings::default(), HeadingMode::PointAtPoi)
            .unwrap();
        assert_eq!(xml.matches("<Placemark>").count(), 3);
        assert!(xml.contains("<wpml:executeHeightMode>relativeToStartPoint</wpml:executeHeightMode>"));
        assert!(xml.contains("<wpml:distance>201.0</wpml:distance>"));
        assert!(xml.contains("<wpml:duration>20.1</wpml:duration>"));
        assert!(xml.contains("<wpml:finishAction>goHome</wpml:finishAction>"));
        assert!(xml.contains("<coordinates>4.00000000,52.00000000</coordinates>"));
    }

    #[test]
    fn relative_heights_use_first_waypoint_as_reference() {
        let xml = render_waylines(&mission(), &MissionSettings::default(), HeadingMode::PointAtPoi)
            .unwrap();
        assert!(xml.contains("<wpml:executeHeight>0.0</wpml:executeHeight>"));
        assert!(xml.contains("<wpml:executeHeight>10.0</wpml:executeHeight>"));
        assert!(xml.contains("<wpml:executeHeight>20.0</wpml:executeHeight>"));
    }

    #[test]
    fn headings_are_signed_and_enabled_at_endpoints() {
        let xml = render_waylines(&mission(), &MissionSettings::default(), HeadingMode::PointAtPoi)
            .unwrap();
        assert!(xml.contains("<wpml:waypointHeadingAngle>-90.0</wpml:waypointHeadingAngle>"));
        assert!(xml.contains("<wpml:waypointHeadingAngle>-180.0</wpml:waypointHeadingAngle>"));
        assert_eq!(
            xml.matches("<wpml:waypointHeadingAngleEnable>1</wpml:waypointHeadingAngleEnable>")
                .count(),
            2
        );
        assert_eq!(xml.matches(TURN_MODE_LAST).count(), 1);
    }

    #[test]
    fn last_waypoint_has_no_between_points_group() {
        let xml = render_waylines(&mission(), &MissionSettings::default(), HeadingMode::FollowCourse)
            .unwrap();
        assert_eq!(xml.matches("gimbalRotate<").count(), 3);
        assert_eq!(xml.matches("gimbalEvenlyRotate<").count(), 2);
        assert_eq!(xml.matches("betweenAdjacentPoints").count(), 1);
        assert!(xml.contains("<wpml:actionGroupId>5</wpml:actionGroupId>"));
        assert!(!xml.contains("<wpml:actionGroupId>6</wpml:actionGroupId>"));
        assert!(xml.contains("followWayline"));
    }
}
