use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Result;
use image::{DynamicImage, RgbImage};

/// Pixel-aligned region of the normalized frame.
#[derive(Debug, Clone)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Typed metadata attached to a stage item.
#[derive(Debug, Clone)]
pub enum MetaValue {
    Bool(bool),
    Float(f64),
    Int(i64),
    Text(String),
}

/// A unit of work flowing through the pipeline: an image (full frame,
/// mask, or a cropped blob region) plus bookkeeping.
#[derive(Clone)]
pub struct StageItem {
    pub image: DynamicImage,

    /// The normalized working frame, shared across items once the
    /// normalize stage has run.
    pub frame: Arc<RgbImage>,

    /// Where this item's image sits in the frame (None for the full frame).
    pub region: Option<Region>,

    pub metadata: HashMap<String, MetaValue>,
}

impl StageItem {
    /// Item covering a whole input image.
    pub fn from_image(image: DynamicImage) -> Self {
        let frame = Arc::new(image.to_rgb8());
        Self {
            image,
            frame,
            region: None,
            metadata: HashMap::new(),
        }
    }

    /// Item covering a region cropped out of the shared frame.
    pub fn from_region(image: DynamicImage, frame: Arc<RgbImage>, region: Region) -> Self {
        Self {
            image,
            frame,
            region: Some(region),
            metadata: HashMap::new(),
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key) {
            Some(MetaValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key) {
            Some(MetaValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.metadata.get(key) {
            Some(MetaValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetaValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Debug-dump configuration: every stage writes its intermediate images
/// below this directory.
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
}

/// Context shared by all stages of one pipeline.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub verbose: bool,
    pub debug: Option<DebugConfig>,
}

/// One processing stage.
///
/// A stage receives every live item at once and may transform them
/// (many -> many), split them (one -> many), filter them (many -> fewer),
/// or merge them (many -> one).
pub trait Stage: Send + Sync {
    fn process(&self, items: Vec<StageItem>, context: &StageContext) -> Result<Vec<StageItem>>;

    /// Human-readable name, used for narration and debug directories.
    fn name(&self) -> &str;
}

/// An item queued for the executor, together with the stages it still has
/// to pass through.
#[derive(Clone)]
pub struct WorkUnit {
    pub item: StageItem,
    pub remaining: Vec<Arc<dyn Stage>>,
    pub stage_index: usize,
    /// Item ids from previous stages, e.g. [1, 3] means item 1 of stage
    /// one produced this as its item 3.
    pub lineage: Vec<usize>,
}

impl WorkUnit {
    pub fn new(item: StageItem, stages: Vec<Arc<dyn Stage>>) -> Self {
        Self {
            item,
            remaining: stages,
            stage_index: 0,
            lineage: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Filename derived from the lineage, e.g. "01-03.png".
    pub fn lineage_filename(&self, extension: &str) -> String {
        if self.lineage.is_empty() {
            format!("01.{}", extension)
        } else {
            let ids: Vec<String> = self.lineage.iter().map(|id| format!("{:02}", id)).collect();
            format!("{}.{}", ids.join("-"), extension)
        }
    }

    fn save_debug(&self, context: &StageContext, stage_name: &str) -> Result<()> {
        let Some(debug) = &context.debug else {
            return Ok(());
        };

        // stage_index already points past the stage that produced this item
        let stage_dir = debug
            .output_dir
            .join(stage_dir_name(self.stage_index.saturating_sub(1), stage_name));
        std::fs::create_dir_all(&stage_dir)?;

        let filename = self.lineage_filename("png");
        self.item
            .image
            .save(stage_dir.join(&filename))
            .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

        if context.verbose {
            println!("  Debug: saved {}/{}", stage_dir.display(), filename);
        }
        Ok(())
    }

    /// Run the next stage on this unit alone and queue its outputs.
    ///
    /// The executor feeds stages one item at a time, so merging stages
    /// (which need every item together) only behave correctly under the
    /// sequential `FramePipeline::run`.
    pub fn advance(&mut self, context: &StageContext) -> Result<Vec<WorkUnit>> {
        if self.remaining.is_empty() {
            return Ok(Vec::new());
        }

        let stage = self.remaining[0].clone();
        let remaining_after = self.remaining[1..].to_vec();

        let outputs = stage.process(vec![self.item.clone()], context)?;

        let mut units = Vec::new();
        for (idx, item) in outputs.into_iter().enumerate() {
            let mut lineage = self.lineage.clone();
            lineage.push(idx + 1);

            let unit = WorkUnit {
                item,
                remaining: remaining_after.clone(),
                stage_index: self.stage_index + 1,
                lineage,
            };
            unit.save_debug(context, stage.name())?;
            units.push(unit);
        }
        Ok(units)
    }
}

fn stage_dir_name(index: usize, name: &str) -> String {
    format!("{:02}_{}", index + 1, name.to_lowercase().replace(' ', "_"))
}

/// Work-queue pipeline executor.
pub struct PipelineExecutor {
    sender: Sender<WorkUnit>,
    receiver: Receiver<WorkUnit>,
    context: StageContext,
}

impl PipelineExecutor {
    pub fn new(context: StageContext) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            context,
        }
    }

    /// Drain the queue until every unit has passed through its remaining
    /// stages, collecting finished items.
    pub fn execute(&self, initial: Vec<WorkUnit>) -> Result<Vec<StageItem>> {
        let mut pending = 0usize;
        for unit in initial {
            self.sender
                .send(unit)
                .map_err(|e| anyhow::anyhow!("Failed to queue work unit: {}", e))?;
            pending += 1;
        }

        let mut finished = Vec::new();
        while pending > 0 {
            match self.receiver.try_recv() {
                Ok(mut unit) => {
                    pending -= 1;
                    if unit.is_complete() {
                        finished.push(unit.item);
                    } else {
                        for next in unit.advance(&self.context)? {
                            self.sender
                                .send(next)
                                .map_err(|e| anyhow::anyhow!("Failed to queue work unit: {}", e))?;
                            pending += 1;
                        }
                    }
                }
                Err(mpsc::TryRecvError::Empty) => std::thread::yield_now(),
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        Ok(finished)
    }
}

/// Composable pipeline builder.
pub struct FramePipeline {
    stages: Vec<Arc<dyn Stage>>,
    context: StageContext,
}

impl FramePipeline {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            context: StageContext {
                verbose: false,
                debug: None,
            },
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.context.verbose = verbose;
        self
    }

    /// Enable debug dumps below `output_dir`. The directory must be empty
    /// or absent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }
        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn add_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn add_stage_boxed(mut self, stage: Box<dyn Stage>) -> Self {
        self.stages.push(Arc::from(stage));
        self
    }

    /// Run every stage in order over the full item set.
    pub fn run(&self, input: DynamicImage) -> Result<Vec<StageItem>> {
        self.save_debug_input(&input)?;

        let mut items = vec![StageItem::from_image(input)];
        for (index, stage) in self.stages.iter().enumerate() {
            if self.context.verbose {
                println!("Running stage: {} ({} items)", stage.name(), items.len());
            }

            items = stage.process(items, &self.context)?;

            if let Some(debug) = &self.context.debug {
                let stage_dir = debug.output_dir.join(stage_dir_name(index, stage.name()));
                std::fs::create_dir_all(&stage_dir)?;
                for (idx, item) in items.iter().enumerate() {
                    let path = stage_dir.join(format!("{:02}.png", idx + 1));
                    item.image
                        .save(&path)
                        .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;
                }
                if self.context.verbose {
                    println!("  Debug: saved {} images to {}", items.len(), stage_dir.display());
                }
            }

            if self.context.verbose {
                println!("  -> {} items", items.len());
            }
        }
        Ok(items)
    }

    /// Run with the work-queue executor. Suitable for pipelines whose
    /// stages act on items independently; see `WorkUnit::advance`.
    pub fn run_with_executor(&self, input: DynamicImage) -> Result<Vec<StageItem>> {
        self.save_debug_input(&input)?;

        let unit = WorkUnit::new(StageItem::from_image(input), self.stages.clone());
        PipelineExecutor::new(self.context.clone()).execute(vec![unit])
    }

    /// Run only the first `count` stages (useful for inspecting
    /// intermediates).
    pub fn run_partial(&self, input: DynamicImage, count: usize) -> Result<Vec<StageItem>> {
        let mut items = vec![StageItem::from_image(input)];
        for stage in self.stages.iter().take(count) {
            if self.context.verbose {
                println!("Running stage: {} ({} items)", stage.name(), items.len());
            }
            items = stage.process(items, &self.context)?;
        }
        Ok(items)
    }

    fn save_debug_input(&self, input: &DynamicImage) -> Result<()> {
        if let Some(debug) = &self.context.debug {
            let input_dir = debug.output_dir.join("00_input");
            std::fs::create_dir_all(&input_dir)?;
            input
                .save(input_dir.join("01.png"))
                .map_err(|e| anyhow::anyhow!("Failed to save debug input: {}", e))?;
            if self.context.verbose {
                println!("  Debug: saved 00_input/01.png");
            }
        }
        Ok(())
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new()
    }
}
