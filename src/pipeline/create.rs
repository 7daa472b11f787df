use crate::pipeline::{ContentContext, Next, Stage};
use crate::{PipelineError, PipelineResult};
use std::fs;

/// Terminal write stage: copies the finished content stream into the target file
///
/// Calls the rest of the chain first so that transform stages have replaced
/// the stream before any bytes hit disk, then ensures the target's parent
/// directory exists and writes the stream verbatim from the start.
pub struct CreateFilesStage;

impl Stage for CreateFilesStage {
    fn handle(&self, ctx: &mut ContentContext<'_>, next: Next<'_>) -> PipelineResult<()> {
        next.run(ctx)?;

        let parent = ctx
            .target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| PipelineError::MissingParent(ctx.target.clone()))?;
        fs::create_dir_all(parent)?;

        tracing::info!("Copying {} to {}", ctx.source, ctx.target.display());

        ctx.content.set_position(0);
        let mut file = fs::File::create(&ctx.target)?;
        std::io::copy(&mut ctx.content, &mut file)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::pipeline::ContentPipeline;
    use std::path::Path;

    #[test]
    fn test_writes_content_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/page.html");

        let config = SiteConfig::default();
        let pipeline = ContentPipeline::new().use_stage(CreateFilesStage);
        let mut ctx = ContentContext::new(&config, "http://test/", &target, b"<html/>".to_vec());
        pipeline.run(&mut ctx).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"<html/>");
    }

    #[test]
    fn test_rewinds_stream_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("page.html");

        let config = SiteConfig::default();
        let mut ctx = ContentContext::new(&config, "src", &target, b"abcdef".to_vec());
        // Simulate an upstream stage having consumed the stream.
        ctx.content.set_position(6);

        CreateFilesStage
            .handle(&mut ctx, crate::pipeline::Next::terminal())
            .unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"abcdef");
    }

    #[test]
    fn test_missing_parent_is_an_error() {
        let config = SiteConfig::default();
        let mut ctx = ContentContext::new(&config, "src", Path::new("/"), Vec::new());

        let result = CreateFilesStage.handle(&mut ctx, crate::pipeline::Next::terminal());
        assert!(matches!(result, Err(PipelineError::MissingParent(_))));
    }
}
