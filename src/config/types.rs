use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sitefreeze
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// Output layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Folder the generated site is written into (destroyed and recreated
    /// at the start of every run)
    #[serde(default = "default_output_folder")]
    pub folder: PathBuf,

    /// How crawled page paths map to files on disk
    #[serde(default)]
    pub style: OutputStyle,

    /// File name used for index pages
    #[serde(rename = "index-file-name", default = "default_index_file_name")]
    pub index_file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            folder: default_output_folder(),
            style: OutputStyle::default(),
            index_file_name: default_index_file_name(),
        }
    }
}

/// Site identity configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSection {
    /// Origin of the running application to crawl, e.g. "http://localhost:5000"
    #[serde(rename = "app-url")]
    pub app_url: Option<String>,

    /// Public base URL of the published site, required for sitemap output
    #[serde(rename = "site-url")]
    pub site_url: Option<String>,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlConfig {
    /// Paths fetched in addition to everything reachable from "/"
    #[serde(rename = "extra-urls", default)]
    pub extra_urls: Vec<String>,

    /// Skip crawling and asset copy entirely; hooks still run
    #[serde(rename = "suppress-generation", default)]
    pub suppress_generation: bool,
}

/// Static asset configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetsConfig {
    /// Root directory whose contents are discovered and copied by default
    #[serde(rename = "static-root")]
    pub static_root: Option<PathBuf>,

    /// Explicit (source, target) copy entries on top of discovery
    #[serde(rename = "content-to-copy", default)]
    pub content_to_copy: Vec<ContentToCopy>,

    /// Output-relative target paths excluded from copying
    #[serde(rename = "ignored-paths", default)]
    pub ignored_paths: Vec<String>,
}

/// Content pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Stages in registration order; the first entry is the outermost wrapper
    #[serde(default = "default_stages")]
    pub stages: Vec<StageKind>,

    /// Target extensions the minify stage applies to
    #[serde(rename = "minify-extensions", default = "default_transform_extensions")]
    pub minify_extensions: Vec<String>,

    /// Target extensions the gzip stage applies to
    #[serde(rename = "compress-extensions", default = "default_transform_extensions")]
    pub compress_extensions: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            stages: default_stages(),
            minify_extensions: default_transform_extensions(),
            compress_extensions: default_transform_extensions(),
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    #[serde(default)]
    pub enable: bool,

    /// Output-relative path of the sitemap file
    #[serde(default = "default_sitemap_path")]
    pub path: String,

    /// URL suffixes excluded from the sitemap
    #[serde(rename = "ignored-suffixes", default)]
    pub ignored_suffixes: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        SitemapConfig {
            enable: false,
            path: default_sitemap_path(),
            ignored_suffixes: Vec::new(),
        }
    }
}

/// Policy mapping a crawled URL path to a file path on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputStyle {
    /// `/a/b` becomes `a/b/index.html`
    #[default]
    IndexInSubfolders,
    /// `/a/b` becomes `a/b.html`
    AppendHtmlExtension,
}

/// One unit of the content pipeline, identified for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    CreateFiles,
    Minify,
    GzipCompress,
}

/// A single (source file, output-relative target) copy instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ContentToCopy {
    pub source: PathBuf,
    pub target: String,
}

impl ContentToCopy {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        ContentToCopy {
            source: source.into(),
            target: target.into(),
        }
    }
}

fn default_output_folder() -> PathBuf {
    PathBuf::from("output")
}

fn default_index_file_name() -> String {
    "index.html".to_string()
}

fn default_stages() -> Vec<StageKind> {
    vec![StageKind::CreateFiles]
}

fn default_transform_extensions() -> Vec<String> {
    vec!["html".to_string(), "css".to_string(), "js".to_string()]
}

fn default_sitemap_path() -> String {
    "sitemap.xml".to_string()
}
