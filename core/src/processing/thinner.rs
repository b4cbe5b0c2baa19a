use crate::model::GeoFrame;
use crate::prelude::{MissionError, MissionResult, Stage};
use crate::telemetry::log::LogManager;

/// Reduces a dense animation to a sparse frame set by uniform index sampling.
pub struct Thinner {
    logger: LogManager,
}

impl Thinner {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(Stage::Thin),
        }
    }

    /// Indices kept when thinning `len` frames to `target_count`, first and last included.
    fn sample_indices(len: usize, target_count: usize) -> Vec<usize> {
        if len == 0 {
            return Vec::new();
        }
        if target_count >= len || target_count < 2 {
            return (0..len).collect();
        }

        let last = len - 1;
        let spans = target_count - 1;
        let mut indices: Vec<usize> = Vec::with_capacity(target_count);
        for i in 0..target_count {
            let index = rounded_ratio(i * last, spans).min(last);
            if indices.last() != Some(&index) {
                indices.push(index);
            }
        }
        if indices.last() != Some(&last) {
            indices.push(last);
        }
        indices
    }

    pub fn thin(&self, frames: Vec<GeoFrame>, target_count: usize) -> MissionResult<Vec<GeoFrame>> {
        if target_count < 2 {
            return Err(MissionError::invalid(
                Stage::Thin,
                format!("target count {} must be at least 2", target_count),
            ));
        }
        if frames.is_empty() {
            return Err(MissionError::invalid(Stage::Thin, "no frames to thin"));
        }

        let original = frames.len();
        if target_count >= original {
            self.logger.detail(&format!(
                "target {} >= {} frames, keeping all",
                target_count, original
            ));
            return Ok(frames);
        }

        let indices = Self::sample_indices(original, target_count);
        let mut keep = indices.iter().copied().peekable();
        let thinned: Vec<GeoFrame> = frames
            .into_iter()
            .enumerate()
            .filter_map(|(index, frame)| {
                if keep.peek() == Some(&index) {
                    keep.next();
                    Some(frame)
                } else {
                    None
                }
            })
            .collect();

        self.logger
            .record(&format!("{} -> {} frames", original, thinned.len()));
        Ok(thinned)
    }
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
fn rounded_ratio(numerator: usize, denominator: usize) -> usize {
    let quotient = numerator / denominator;
    let twice_remainder = 2 * (numerator % denominator);
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

impl Default for Thinner {
    fn default() -> Self {
        Self::new()
    }
}
