pub mod detection;
pub mod models;
pub mod pipeline;

pub use detection::{CellDetector, build_standard_pipeline};
pub use models::{Blob, CellMark, DetectionReport, DetectionSummary, Verdict};
pub use pipeline::{
    DebugConfig, FramePipeline, MetaValue, PipelineExecutor, Region, Stage, StageContext,
    StageItem, WorkUnit,
};

#[cfg(feature = "camera")]
pub mod camera;

#[cfg(feature = "gui")]
pub mod gui;
