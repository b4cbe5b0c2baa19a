use crate::export::wpml::write_mission_config;
use crate::export::{MissionSettings, KML_NAMESPACE, WPML_NAMESPACE};
use log::{info, warn};
use std::fmt::Write;

pub const TEMPLATE_AUTHOR: &str = "GES_Converter";

/// Returns the reference template when it carries a mission config, otherwise a generated default.
pub fn render_template(
    reference: Option<&str>,
    settings: &MissionSettings,
    created_ms: i64,
) -> anyhow::Result<String> {
    if let Some(content) = reference {
        if content.contains("<wpml:missionConfig>") && content.contains("<wpml:droneInfo>") {
            info!("using provided reference template.kml");
            return Ok(content.to_string());
        }
        warn!("reference template.kml lacks missionConfig/droneInfo, generating default");
    }

    let mut out = String::new();
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        out,
        r#"<kml xmlns="{}" xmlns:wpml="{}">"#,
        KML_NAMESPACE, WPML_NAMESPACE
    )?;
    writeln!(out, "  <Document>")?;
    writeln!(out, "    <wpml:author>{}</wpml:author>", TEMPLATE_AUTHOR)?;
    writeln!(out, "    <wpml:createTime>{}</wpml:createTime>", created_ms)?;
    writeln!(out, "    <wpml:updateTime>{}</wpml:updateTime>", created_ms)?;
    write_mission_config(&mut out, settings, "    ")?;
    writeln!(out, "    <Folder>")?;
    writeln!(out, "      <Placemark>")?;
    writeln!(out, "        <Point><coordinates>0,0</coordinates></Point>")?;
    writeln!(out, "      </Placemark>")?;
    writeln!(out, "    </Folder>")?;
    writeln!(out, "  </Document>")?;
    writeln!(out, "</kml>")?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{FinishAction, RcLostAction};

    #[test]
    fn default_template_embeds_settings_and_time() {
        let settings = MissionSettings {
            finish_action: FinishAction::AutoLand,
            rc_lost_action: RcLostAction::Hover,
            ..Default::default()
        };
        let kml = render_template(None, &settings, 1_700_000_000_000).unwrap();
        assert!(kml.contains("<wpml:createTime>1700000000000</wpml:createTime>"));
        assert!(kml.contains("<wpml:finishAction>autoLand</wpml:finishAction>"));
        assert!(kml.contains("<wpml:executeRCLostAction>hover</wpml:executeRCLostAction>"));
        assert!(kml.contains("<wpml:globalTransitionalSpeed>12.0</wpml:globalTransitionalSpeed>"));
        assert!(kml.contains("<wpml:droneEnumValue>68</wpml:droneEnumValue>"));
    }

    #[test]
    fn complete_reference_is_used_verbatim() {
        let reference =
            "<kml><wpml:missionConfig><wpml:droneInfo></wpml:droneInfo></wpml:missionConfig></kml>";
        let kml = render_template(Some(reference), &MissionSettings::default(), 0).unwrap();
        assert_eq!(kml, reference);
    }

    #[test]
    fn incomplete_reference_falls_back_to_default() {
        let kml = render_template(Some("<kml/>"), &MissionSettings::default(), 5).unwrap();
        assert!(kml.contains(TEMPLATE_AUTHOR));
    }
}
