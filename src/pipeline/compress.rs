use crate::pipeline::{gz_sibling, ContentContext, Next, Stage};
use crate::PipelineResult;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Writes a `<target>.gz` sibling file for allow-listed targets
///
/// Calls the rest of the chain first, then compresses the stream at maximum
/// level into a sibling file next to the primary target. `.gz` targets are
/// never re-compressed, and a target whose `.gz` sibling is already in the
/// run's copy schedule is skipped so prebuilt compressed assets are not
/// compressed twice. The stream is rewound afterwards for any downstream
/// consumer.
pub struct GzipStage {
    scheduled_targets: HashSet<PathBuf>,
}

impl GzipStage {
    pub fn new(scheduled_targets: HashSet<PathBuf>) -> Self {
        GzipStage { scheduled_targets }
    }
}

impl Stage for GzipStage {
    fn handle(&self, ctx: &mut ContentContext<'_>, next: Next<'_>) -> PipelineResult<()> {
        next.run(ctx)?;

        let Some(ext) = ctx.target_extension() else {
            return Ok(());
        };
        if ext == "gz" {
            return Ok(());
        }
        if !ctx
            .config
            .pipeline
            .compress_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext))
        {
            return Ok(());
        }

        let gz_target = gz_sibling(&ctx.target);
        if self.scheduled_targets.contains(&gz_target) {
            tracing::debug!(
                "Skipping compression of {}: a prebuilt .gz sibling is scheduled for copy",
                ctx.target.display()
            );
            return Ok(());
        }

        if let Some(parent) = gz_target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        ctx.content.set_position(0);
        let file = fs::File::create(&gz_target)?;
        let mut encoder = GzEncoder::new(file, Compression::best());
        std::io::copy(&mut ctx.content, &mut encoder)?;
        encoder.finish()?;

        // Rewind for sibling consumers of the uncompressed stream.
        ctx.content.set_position(0);

        Ok(())
    }
}
