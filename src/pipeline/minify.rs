//! Minify stage for HTML, CSS, and JavaScript targets
//!
//! Uses minify-html for HTML, lightningcss for CSS, and oxc for JavaScript.
//! Minifier failures are never fatal: the original content is kept and a
//! warning is logged.

use crate::pipeline::{ContentContext, Next, Stage};
use crate::PipelineResult;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::io::Cursor;

/// Rewrites the content stream with a minified copy for allow-listed targets
///
/// Minifies before calling the rest of the chain so that downstream stages
/// (compression in particular) see the final bytes. The replacement buffer is
/// positioned at the start. Targets whose extension is not in
/// `pipeline.minify-extensions` pass through untouched.
pub struct MinifyStage;

impl Stage for MinifyStage {
    fn handle(&self, ctx: &mut ContentContext<'_>, next: Next<'_>) -> PipelineResult<()> {
        let Some(ext) = ctx.target_extension() else {
            return next.run(ctx);
        };
        if !ctx
            .config
            .pipeline
            .minify_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext))
        {
            return next.run(ctx);
        }

        let minified = match ext.as_str() {
            "html" => Some(minify_html_content(ctx.content.get_ref())),
            "css" => {
                text_content(ctx).and_then(|text| minify_css(&text).map(String::into_bytes))
            }
            "js" => text_content(ctx).and_then(|text| minify_js(&text).map(String::into_bytes)),
            _ => return next.run(ctx),
        };

        match minified {
            Some(bytes) => ctx.content = Cursor::new(bytes),
            None => tracing::warn!(
                "Minification failed for {}, keeping original content",
                ctx.target.display()
            ),
        }

        next.run(ctx)
    }
}

fn text_content(ctx: &ContentContext<'_>) -> Option<String> {
    match std::str::from_utf8(ctx.content.get_ref()) {
        Ok(text) => Some(text.to_string()),
        Err(_) => None,
    }
}

/// Minify HTML content.
pub fn minify_html_content(content: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = false;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(content, &cfg)
}

/// Mangles and compresses a JavaScript module; None when it does not parse
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !parsed.errors.is_empty() {
        return None;
    }

    let mut program = parsed.program;
    let minified = Minifier::new(MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    })
    .minify(&allocator, &mut program);

    let generated = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program);
    Some(generated.code)
}

/// Re-prints a stylesheet in minified form; None when it does not parse
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(printed.code)
}
