//! Content pipeline: an ordered, composable chain of transformation stages
//!
//! Stages wrap each other like middleware: each stage receives the content
//! context and a `Next` handle and decides whether to call the rest of the
//! chain before, after, or not at all around its own logic. The first
//! registered stage is the outermost wrapper; the terminal stage is a no-op.

mod compress;
mod create;
mod minify;

pub use compress::GzipStage;
pub use create::CreateFilesStage;
pub use minify::MinifyStage;

use crate::config::{PipelineConfig, SiteConfig, StageKind};
use crate::PipelineResult;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// The unit of work flowing through the pipeline: one page or asset
pub struct ContentContext<'a> {
    /// The run's configuration
    pub config: &'a SiteConfig,
    /// Origin of the content: a request URL or a source file path
    pub source: String,
    /// File the content is destined for
    pub target: PathBuf,
    /// The content bytes; stages that rewrite content replace the buffer
    pub content: Cursor<Vec<u8>>,
}

impl<'a> ContentContext<'a> {
    pub fn new(
        config: &'a SiteConfig,
        source: impl Into<String>,
        target: impl Into<PathBuf>,
        content: Vec<u8>,
    ) -> Self {
        ContentContext {
            config,
            source: source.into(),
            target: target.into(),
            content: Cursor::new(content),
        }
    }

    /// Lowercased extension of the target path, if any
    pub fn target_extension(&self) -> Option<String> {
        self.target
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// One unit of the pipeline, wrapping the rest of the chain
pub trait Stage: Send + Sync {
    fn handle(&self, ctx: &mut ContentContext<'_>, next: Next<'_>) -> PipelineResult<()>;
}

/// Handle to the remainder of the stage chain
///
/// Not calling [`Next::run`] short-circuits every stage registered after the
/// current one.
pub struct Next<'a> {
    stages: &'a [Box<dyn Stage>],
}

impl Next<'_> {
    /// A chain with no remaining stages
    pub fn terminal() -> Next<'static> {
        Next { stages: &[] }
    }

    pub fn run(self, ctx: &mut ContentContext<'_>) -> PipelineResult<()> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.handle(ctx, Next { stages: rest }),
            // Terminal no-op
            None => Ok(()),
        }
    }
}

/// An ordered chain of content stages
///
/// Stages run in registration order on the way in and reverse order on the
/// way out, so the first registered stage observes the context first before
/// `next` and last after it.
#[derive(Default)]
pub struct ContentPipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl ContentPipeline {
    pub fn new() -> Self {
        ContentPipeline { stages: Vec::new() }
    }

    /// Appends a stage to the chain
    pub fn use_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Runs the full chain over one context
    pub fn run(&self, ctx: &mut ContentContext<'_>) -> PipelineResult<()> {
        Next {
            stages: &self.stages,
        }
        .run(ctx)
    }

    /// Builds the pipeline described by the configuration
    ///
    /// `scheduled_targets` is the set of absolute target paths of the run's
    /// static-asset copy schedule; the gzip stage consults it to avoid
    /// double-compressing assets that ship with a prebuilt `.gz` sibling.
    pub fn from_config(config: &PipelineConfig, scheduled_targets: HashSet<PathBuf>) -> Self {
        let mut pipeline = ContentPipeline::new();
        for kind in &config.stages {
            pipeline = match kind {
                StageKind::CreateFiles => pipeline.use_stage(CreateFilesStage),
                StageKind::Minify => pipeline.use_stage(MinifyStage),
                StageKind::GzipCompress => {
                    pipeline.use_stage(GzipStage::new(scheduled_targets.clone()))
                }
            };
        }
        pipeline
    }
}

/// Appends `.gz` to the file name of a target path
pub(crate) fn gz_sibling(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}
