use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline component that raised an error or emitted a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Source,
    Thin,
    Heading,
    Pitch,
    Build,
    Merge,
    Metrics,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Source => "source",
            Stage::Thin => "thin",
            Stage::Heading => "heading",
            Stage::Pitch => "pitch",
            Stage::Build => "build",
            Stage::Merge => "merge",
            Stage::Metrics => "metrics",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common error type for pipeline execution.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MissionError {
    #[error("invalid parameter in {stage} stage{}: {reason}", file_suffix(.file))]
    InvalidParameter {
        stage: Stage,
        file: Option<String>,
        reason: String,
    },
    #[error("no point of interest set for file '{file}'")]
    MissingPoi { file: String },
    #[error("mission has no waypoints")]
    EmptyMission,
}

fn file_suffix(file: &Option<String>) -> String {
    match file {
        Some(name) => format!(" (file '{}')", name),
        None => String::new(),
    }
}

impl MissionError {
    pub fn invalid(stage: Stage, reason: impl Into<String>) -> Self {
        MissionError::InvalidParameter {
            stage,
            file: None,
            reason: reason.into(),
        }
    }

    /// Attaches the source file identifier, keeping any identifier already present.
    pub fn in_file(self, file_id: &str) -> Self {
        match self {
            MissionError::InvalidParameter {
                stage,
                file: None,
                reason,
            } => MissionError::InvalidParameter {
                stage,
                file: Some(file_id.to_string()),
                reason,
            },
            MissionError::MissingPoi { file } if file.is_empty() => MissionError::MissingPoi {
                file: file_id.to_string(),
            },
            other => other,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            MissionError::InvalidParameter { stage, .. } => *stage,
            MissionError::MissingPoi { .. } => Stage::Heading,
            MissionError::EmptyMission => Stage::Merge,
        }
    }
}

pub type MissionResult<T> = Result<T, MissionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_file_attaches_identifier_once() {
        let err = MissionError::invalid(Stage::Thin, "target below 2")
            .in_file("orbit.json")
            .in_file("other.json");
        assert_eq!(
            err.to_string(),
            "invalid parameter in thin stage (file 'orbit.json'): target below 2"
        );
        assert_eq!(err.stage(), Stage::Thin);
    }

    #[test]
    fn missing_poi_reports_heading_stage() {
        let err = MissionError::MissingPoi {
            file: String::new(),
        }
        .in_file("a.json");
        assert_eq!(err.to_string(), "no point of interest set for file 'a.json'");
        assert_eq!(err.stage(), Stage::Heading);
    }
}
