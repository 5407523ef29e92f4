use std::path::PathBuf;

use image::RgbImage;

use crate::CellDetector;

/// Interactive camera session, modeled as an explicit state machine.
///
/// `start` moves Idle to CameraActive, `capture` moves CameraActive to
/// FrameCaptured, and handing the frame to the detector resets the session
/// to Idle.
#[derive(Debug, Clone)]
pub enum CameraSession {
    Idle,
    CameraActive,
    FrameCaptured(RgbImage),
}

#[derive(Debug)]
pub struct AppState {
    pub detector: CellDetector,
    /// Where the annotated PNG is written; the directory is created before
    /// each detection.
    pub output_path: PathBuf,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            detector: CellDetector::new(),
            output_path: PathBuf::from("output/test_result.png"),
        }
    }
}
