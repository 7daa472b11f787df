//! Generation orchestration
//!
//! A run resets the output folder, fires the registered pre-generation
//! hooks, crawls the application, copies the static-asset schedule through
//! the content pipeline, fires the post-generation hooks, and finally
//! renders the sitemap. Fetch, per-asset, and hook failures are logged and
//! the run continues; only configuration problems abort it outright.

mod sitemap;

pub use sitemap::{Sitemap, UrlEntry};

use crate::assets::{discover_default_assets, dedup_assets, target_on_disk, FsAssetProvider};
use crate::config::{ContentToCopy, SiteConfig};
use crate::crawler::Crawler;
use crate::pipeline::{ContentContext, ContentPipeline};
use crate::routes::RouteRegistry;
use crate::{ConfigError, FreezeError, Result};
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Shared state hooks observe and mutate around a generation run
pub struct GenerationContext {
    pub config: Arc<SiteConfig>,
    pub routes: Mutex<RouteRegistry>,
}

type Hook = Box<
    dyn Fn(Arc<GenerationContext>) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>
        + Send
        + Sync,
>;

/// Orchestrates one full site generation
pub struct Generator {
    config: Arc<SiteConfig>,
    pre_hooks: Vec<Hook>,
    post_hooks: Vec<Hook>,
}

impl Generator {
    pub fn new(config: SiteConfig) -> Self {
        Generator {
            config: Arc::new(config),
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
        }
    }

    /// Registers a hook that runs after the output folder is reset and
    /// before the crawl starts; hooks run in registration order
    pub fn before_generation<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<GenerationContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.pre_hooks.push(Box::new(move |ctx| Box::pin(hook(ctx))));
        self
    }

    /// Registers a hook that runs after the crawl and asset copy, before
    /// the sitemap is rendered; hooks run in registration order
    pub fn after_generation<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<GenerationContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.post_hooks.push(Box::new(move |ctx| Box::pin(hook(ctx))));
        self
    }

    /// Runs the whole generation
    pub async fn generate(&self) -> Result<()> {
        let app_url = self.config.site.app_url.clone().ok_or_else(|| {
            FreezeError::Config(ConfigError::Validation(
                "site.app-url is required to generate".to_string(),
            ))
        })?;

        self.reset_output_folder()?;

        let ctx = Arc::new(GenerationContext {
            config: self.config.clone(),
            routes: Mutex::new(RouteRegistry::new()),
        });

        for hook in &self.pre_hooks {
            if let Err(e) = hook(ctx.clone()).await {
                tracing::error!("Pre-generation hook failed: {}", e);
            }
        }

        let schedule = self.build_copy_schedule()?;
        let scheduled_targets: HashSet<PathBuf> = schedule
            .iter()
            .map(|entry| target_on_disk(&self.config.output.folder, &entry.target))
            .collect();
        let pipeline = ContentPipeline::from_config(&self.config.pipeline, scheduled_targets);

        if self.config.crawl.suppress_generation {
            tracing::info!("Generation is suppressed; skipping crawl and asset copy");
        } else {
            let mut crawler = Crawler::new(&app_url, &self.config, &pipeline, &ctx.routes)?;
            if let Err(e) = crawler.start_crawling().await {
                tracing::error!("Crawl did not complete: {}", e);
            }

            self.copy_assets(&schedule, &pipeline);
        }

        for hook in &self.post_hooks {
            if let Err(e) = hook(ctx.clone()).await {
                tracing::error!("Post-generation hook failed: {}", e);
            }
        }

        if self.config.sitemap.enable {
            self.write_sitemap(&ctx)?;
        }

        Ok(())
    }

    fn reset_output_folder(&self) -> Result<()> {
        let folder = &self.config.output.folder;
        if folder.exists() {
            tracing::info!("Deleting output folder {}", folder.display());
            std::fs::remove_dir_all(folder)?;
        }
        std::fs::create_dir_all(folder)?;
        Ok(())
    }

    /// Explicit copy entries plus everything discovered under the static
    /// root, deduplicated and with ignored targets filtered out
    fn build_copy_schedule(&self) -> Result<Vec<ContentToCopy>> {
        let mut schedule = self.config.assets.content_to_copy.clone();

        if let Some(static_root) = &self.config.assets.static_root {
            if static_root.is_dir() {
                let provider = FsAssetProvider::new(static_root);
                schedule.extend(discover_default_assets(&provider)?);
            } else {
                tracing::warn!(
                    "Static root {} does not exist; skipping discovery",
                    static_root.display()
                );
            }
        }

        let ignored = &self.config.assets.ignored_paths;
        let schedule = dedup_assets(schedule)
            .into_iter()
            .filter(|entry| {
                if is_ignored(&entry.target, ignored) {
                    tracing::debug!("Skipping ignored path {}", entry.target);
                    false
                } else {
                    true
                }
            })
            .collect();

        Ok(schedule)
    }

    fn copy_assets(&self, schedule: &[ContentToCopy], pipeline: &ContentPipeline) {
        for entry in schedule {
            if !entry.source.is_file() {
                tracing::error!(
                    "Static asset {} does not exist; skipping {}",
                    entry.source.display(),
                    entry.target
                );
                continue;
            }

            let content = match std::fs::read(&entry.source) {
                Ok(content) => content,
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", entry.source.display(), e);
                    continue;
                }
            };

            let target = target_on_disk(&self.config.output.folder, &entry.target);
            let mut ctx = ContentContext::new(
                &self.config,
                entry.source.to_string_lossy().into_owned(),
                target,
                content,
            );
            if let Err(e) = pipeline.run(&mut ctx) {
                tracing::error!("Failed to copy {}: {}", entry.target, e);
            }
        }
    }

    fn write_sitemap(&self, ctx: &GenerationContext) -> Result<()> {
        let site_url = self
            .config
            .site
            .site_url
            .as_deref()
            .ok_or(FreezeError::MissingSiteUrl)?;

        let routes = ctx.routes.lock().unwrap().discovered_routes();
        let sitemap = Sitemap::from_routes(site_url, &self.config.sitemap, &routes);

        let path = target_on_disk(&self.config.output.folder, &self.config.sitemap.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        tracing::info!("Writing sitemap with {} URLs", sitemap.entries().len());
        std::fs::write(&path, sitemap.into_xml())?;
        Ok(())
    }
}

/// An output-relative target is ignored when it equals or lives under one of
/// the configured ignored paths
fn is_ignored(target: &str, ignored_paths: &[String]) -> bool {
    let target = target.trim_start_matches('/');
    ignored_paths.iter().any(|ignored| {
        let ignored = ignored.trim_start_matches('/').trim_end_matches('/');
        target == ignored || target.starts_with(&format!("{}/", ignored))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SitemapConfig, SiteSection};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_is_ignored_matches_exact_and_subtree() {
        let ignored = vec!["_framework".to_string(), "/private/".to_string()];

        assert!(is_ignored("_framework", &ignored));
        assert!(is_ignored("_framework/blazor.js", &ignored));
        assert!(is_ignored("private/keys.txt", &ignored));
        assert!(!is_ignored("_frameworks/other.js", &ignored));
        assert!(!is_ignored("css/site.css", &ignored));
    }

    fn suppressed_config(output: PathBuf) -> SiteConfig {
        SiteConfig {
            site: SiteSection {
                app_url: Some("http://localhost:5000".to_string()),
                site_url: Some("https://example.com".to_string()),
            },
            crawl: crate::config::CrawlConfig {
                extra_urls: Vec::new(),
                suppress_generation: true,
            },
            output: crate::config::OutputConfig {
                folder: output,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_hooks_run_in_order_around_suppressed_generation() {
        let dir = tempfile::tempdir().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let pre = counter.clone();
        let post = counter.clone();
        let generator = Generator::new(suppressed_config(dir.path().join("out")))
            .before_generation(move |_ctx| {
                let pre = pre.clone();
                async move {
                    assert_eq!(pre.fetch_add(1, Ordering::SeqCst), 0);
                    Ok(())
                }
            })
            .after_generation(move |_ctx| {
                let post = post.clone();
                async move {
                    assert_eq!(post.fetch_add(1, Ordering::SeqCst), 1);
                    Ok(())
                }
            });

        generator.generate().await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_hook_routes_feed_the_sitemap() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = suppressed_config(out.clone());
        config.sitemap = SitemapConfig {
            enable: true,
            ..Default::default()
        };

        let generator = Generator::new(config).after_generation(|ctx| async move {
            ctx.routes.lock().unwrap().add_route("/injected", None);
            Ok(())
        });
        generator.generate().await.unwrap();

        let xml = std::fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(xml.contains("<loc>https://example.com/injected</loc>"));
    }

    #[tokio::test]
    async fn test_failing_hook_does_not_abort_later_phases() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = suppressed_config(out.clone());
        config.sitemap = SitemapConfig {
            enable: true,
            ..Default::default()
        };

        let post_ran = Arc::new(AtomicUsize::new(0));
        let post = post_ran.clone();
        let generator = Generator::new(config)
            .before_generation(|_ctx| async { Err(FreezeError::MissingSiteUrl) })
            .after_generation(move |_ctx| {
                let post = post.clone();
                async move {
                    post.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });

        generator.generate().await.unwrap();

        assert_eq!(post_ran.load(Ordering::SeqCst), 1);
        assert!(out.join("sitemap.xml").is_file());
    }

    #[tokio::test]
    async fn test_output_folder_reset_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("stale.html"), "old").unwrap();

        Generator::new(suppressed_config(out.clone()))
            .generate()
            .await
            .unwrap();

        assert!(out.is_dir());
        assert!(!out.join("stale.html").exists());
    }

    #[tokio::test]
    async fn test_missing_app_url_is_an_error() {
        let mut config = suppressed_config(PathBuf::from("unused"));
        config.site.app_url = None;

        let result = Generator::new(config).generate().await;
        assert!(matches!(result, Err(FreezeError::Config(_))));
    }
}
