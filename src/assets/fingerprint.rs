//! Fingerprint pairing for prebuilt compressed static assets
//!
//! Build toolchains that fingerprint assets ship each file as an
//! uncompressed original plus prebuilt compressed siblings whose source
//! names carry the fingerprint token. Pairing reconstructs the four variants
//! a fingerprinted layout needs: original, original compressed, and the
//! fingerprinted forms of both.

use crate::config::ContentToCopy;
use std::collections::HashMap;

const COMPRESSION_EXTENSIONS: &[&str] = &[".gz", ".br"];

/// Expands grouped asset variants into the four-variant copy list
///
/// Input pairs are grouped by target path with any compression suffix
/// stripped. A group contributes output only when it holds both the
/// uncompressed original and at least one compressed sibling; for each
/// compressed sibling the fingerprint token is read from its source file
/// name and four copy instructions are emitted.
pub fn pair_fingerprint_variants(input: &[ContentToCopy]) -> Vec<ContentToCopy> {
    let mut groups: HashMap<String, Vec<&ContentToCopy>> = HashMap::new();
    for entry in input {
        groups
            .entry(remove_compression_extension(&entry.target).to_string())
            .or_default()
            .push(entry);
    }

    let mut keys: Vec<&String> = groups.keys().collect();
    keys.sort();

    let mut result = Vec::new();
    for key in keys {
        let group = &groups[key];
        let uncompressed = group.iter().find(|e| !is_compressed(&e.target));
        let compressed: Vec<_> = group.iter().filter(|e| is_compressed(&e.target)).collect();

        // Skip if missing pairs.
        let Some(uncompressed) = uncompressed else {
            continue;
        };
        if compressed.is_empty() {
            continue;
        }

        for entry in compressed {
            let fingerprint = extract_fingerprint(&entry.source.to_string_lossy());

            // 1. Original uncompressed.
            result.push((*uncompressed).clone());

            // 2. Original compressed.
            result.push((**entry).clone());

            // 3. Fingerprinted uncompressed.
            result.push(ContentToCopy::new(
                uncompressed.source.clone(),
                add_fingerprint(&uncompressed.target, &fingerprint),
            ));

            // 4. Fingerprinted compressed.
            result.push(ContentToCopy::new(
                entry.source.clone(),
                add_fingerprint(&entry.target, &fingerprint),
            ));
        }
    }

    result
}

/// Reads the fingerprint token out of a compressed asset's source file name
///
/// The file name (compression suffix and trailing extension removed) is
/// split on `-`: a literal `{0}` placeholder in the second segment shifts
/// the token to the third segment, otherwise the second segment is the
/// token. Names without two segments yield an empty token.
fn extract_fingerprint(compressed_source: &str) -> String {
    let filename = compressed_source
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(compressed_source);
    let mut stem = remove_compression_extension(filename);
    if let Some(idx) = stem.rfind('.') {
        stem = &stem[..idx];
    }

    let parts: Vec<&str> = stem.split('-').collect();
    match parts.as_slice() {
        [_, "{0}", third, ..] => (*third).to_string(),
        [_, second, ..] => (*second).to_string(),
        _ => String::new(),
    }
}

/// Inserts a fingerprint token before the final extension of a target path
///
/// `*.styles.css` targets keep their multi-part extension intact: the token
/// lands between the base name and `.styles.css`. Compression suffixes are
/// re-appended unchanged.
fn add_fingerprint(target: &str, fingerprint: &str) -> String {
    let mut compression_extension = "";
    let mut target = target;
    for ext in COMPRESSION_EXTENSIONS {
        if ends_with_ignore_case(target, ext) {
            compression_extension = &target[target.len() - ext.len()..];
            target = &target[..target.len() - ext.len()];
            break;
        }
    }

    const STYLES_SUFFIX: &str = ".styles.css";
    if ends_with_ignore_case(target, STYLES_SUFFIX) {
        let split = target.len() - STYLES_SUFFIX.len();
        return format!(
            "{}.{}{}{}",
            &target[..split],
            fingerprint,
            &target[split..],
            compression_extension
        );
    }

    let (base, main_extension) = match target.rfind('.') {
        Some(idx) => target.split_at(idx),
        None => (target, ""),
    };
    format!(
        "{}.{}{}{}",
        base, fingerprint, main_extension, compression_extension
    )
}

fn remove_compression_extension(target: &str) -> &str {
    for ext in COMPRESSION_EXTENSIONS {
        if ends_with_ignore_case(target, ext) {
            return &target[..target.len() - ext.len()];
        }
    }
    target
}

fn is_compressed(target: &str) -> bool {
    COMPRESSION_EXTENSIONS
        .iter()
        .any(|ext| ends_with_ignore_case(target, ext))
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len() && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(entries: &[ContentToCopy]) -> Vec<&str> {
        entries.iter().map(|e| e.target.as_str()).collect()
    }

    #[test]
    fn test_basic_pairing_emits_four_variants() {
        let input = vec![
            ContentToCopy::new("wwwroot/style.css", "css/style.css"),
            ContentToCopy::new("compressed/style-abc123.css.gz", "css/style.css.gz"),
        ];

        let result = pair_fingerprint_variants(&input);

        assert_eq!(
            targets(&result),
            vec![
                "css/style.css",
                "css/style.css.gz",
                "css/style.abc123.css",
                "css/style.abc123.css.gz",
            ]
        );
    }

    #[test]
    fn test_styles_css_keeps_multi_part_extension() {
        assert_eq!(
            add_fingerprint("app.styles.css", "xyz"),
            "app.xyz.styles.css"
        );
        assert_eq!(
            add_fingerprint("app.styles.css.gz", "xyz"),
            "app.xyz.styles.css.gz"
        );
    }

    #[test]
    fn test_fingerprint_from_placeholder_name() {
        let input = vec![
            ContentToCopy::new("wwwroot/app.styles.css", "app.styles.css"),
            ContentToCopy::new(
                "compressed/app-{0}-deadbeef.gz",
                "app.styles.css.gz",
            ),
        ];

        let result = pair_fingerprint_variants(&input);

        assert!(targets(&result).contains(&"app.deadbeef.styles.css"));
        assert!(targets(&result).contains(&"app.deadbeef.styles.css.gz"));
    }

    #[test]
    fn test_group_without_compressed_sibling_dropped() {
        let input = vec![ContentToCopy::new("wwwroot/plain.css", "css/plain.css")];
        assert!(pair_fingerprint_variants(&input).is_empty());
    }

    #[test]
    fn test_group_without_uncompressed_original_dropped() {
        let input = vec![ContentToCopy::new(
            "compressed/orphan-abc.gz",
            "js/orphan.js.gz",
        )];
        assert!(pair_fingerprint_variants(&input).is_empty());
    }

    #[test]
    fn test_fingerprint_without_delimiter_is_empty() {
        assert_eq!(extract_fingerprint("plainname.gz"), "");
    }

    #[test]
    fn test_fingerprint_from_hash_only_name() {
        assert_eq!(extract_fingerprint("qqpx14ss9t-lqkmkwt0th.gz"), "lqkmkwt0th");
    }

    #[test]
    fn test_target_without_extension() {
        assert_eq!(add_fingerprint("LICENSE", "abc"), "LICENSE.abc");
    }

    #[test]
    fn test_brotli_sibling_paired_too() {
        let input = vec![
            ContentToCopy::new("wwwroot/app.js", "js/app.js"),
            ContentToCopy::new("compressed/app-ff00aa.js.br", "js/app.js.br"),
        ];

        let result = pair_fingerprint_variants(&input);

        assert_eq!(
            targets(&result),
            vec![
                "js/app.js",
                "js/app.js.br",
                "js/app.ff00aa.js",
                "js/app.ff00aa.js.br",
            ]
        );
    }
}
