//! Rewriting of document-relative links in rendered HTML.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static RELATIVE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="\./([^"]*)"|href='\./([^']*)'"#).unwrap());

/// Rewrite `href="./..."` links into site-rooted links.
///
/// The link is resolved against the directory of `document_path` and placed
/// under `prefix`:
///
/// ```
/// use mdocs_renderer::rewrite_relative_links;
///
/// let html = r#"<a href="./setup.md#linux">Setup</a>"#;
/// assert_eq!(
///     rewrite_relative_links(html, "guide/intro", "/docs"),
///     r#"<a href="/docs/guide/setup.md#linux">Setup</a>"#,
/// );
/// ```
///
/// Only the `./` form is touched. Absolute, external and `../` links are
/// left unchanged, so rewriting already rewritten HTML is a no-op.
#[must_use]
pub fn rewrite_relative_links(html: &str, document_path: &str, prefix: &str) -> String {
    let directory = document_path
        .trim_matches('/')
        .rsplit_once('/')
        .map_or("", |(dir, _)| dir);
    let base = if directory.is_empty() {
        format!("{prefix}/")
    } else {
        format!("{prefix}/{directory}/")
    };

    RELATIVE_HREF
        .replace_all(html, |caps: &Captures<'_>| {
            let (quote, target) = match (caps.get(1), caps.get(2)) {
                (Some(target), _) => ('"', target.as_str()),
                (None, Some(target)) => ('\'', target.as_str()),
                (None, None) => return caps[0].to_owned(),
            };
            format!("href={quote}{base}{target}{quote}")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rewrite_sibling_link() {
        assert_eq!(
            rewrite_relative_links(r#"<a href="./setup.md">x</a>"#, "guide/intro", "/docs"),
            r#"<a href="/docs/guide/setup.md">x</a>"#
        );
    }

    #[test]
    fn test_rewrite_empty_prefix() {
        assert_eq!(
            rewrite_relative_links(r#"<a href="./setup.md">x</a>"#, "guide/intro", ""),
            r#"<a href="/guide/setup.md">x</a>"#
        );
    }

    #[test]
    fn test_rewrite_root_document() {
        assert_eq!(
            rewrite_relative_links(r#"<a href="./faq">x</a>"#, "index", "/docs"),
            r#"<a href="/docs/faq">x</a>"#
        );
    }

    #[test]
    fn test_rewrite_readme_document_uses_its_directory() {
        assert_eq!(
            rewrite_relative_links(
                r#"<a href="./install.md">x</a>"#,
                "getting-started/README",
                "/docs"
            ),
            r#"<a href="/docs/getting-started/install.md">x</a>"#
        );
    }

    #[test]
    fn test_rewrite_keeps_query_and_fragment() {
        assert_eq!(
            rewrite_relative_links(
                r#"<a href="./setup.md?os=linux&amp;v=2#step-1">x</a>"#,
                "guide/intro",
                "/docs"
            ),
            r#"<a href="/docs/guide/setup.md?os=linux&amp;v=2#step-1">x</a>"#
        );
    }

    #[test]
    fn test_rewrite_single_quoted_href() {
        assert_eq!(
            rewrite_relative_links("<a href='./setup.md'>x</a>", "guide/intro", "/docs"),
            "<a href='/docs/guide/setup.md'>x</a>"
        );
    }

    #[test]
    fn test_other_links_untouched() {
        let html = concat!(
            r#"<a href="https://example.com">a</a>"#,
            r#"<a href="/docs/guide">b</a>"#,
            r#"<a href="../other.md">c</a>"#,
            r#"<a href="setup.md">d</a>"#,
            r##"<a href="#section">e</a>"##,
            r#"<img src="./logo.png">"#,
        );
        assert_eq!(rewrite_relative_links(html, "guide/intro", "/docs"), html);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let html = r#"<p><a href="./a.md">a</a> and <a href="./b/c.md">c</a></p>"#;
        let once = rewrite_relative_links(html, "guide/intro", "/docs");
        let twice = rewrite_relative_links(&once, "guide/intro", "/docs");
        assert_eq!(once, twice);
        assert!(once.contains(r#"href="/docs/guide/b/c.md""#));
    }
}
