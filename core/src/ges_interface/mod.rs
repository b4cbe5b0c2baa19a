pub mod document;

pub use document::{GesCameraFrame, GesCoordinate, GesDocument, GesRotation, DEFAULT_FRAME_RATE};
