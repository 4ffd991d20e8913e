//! Bare URL detection in text runs.
//!
//! Detection runs on text the Markdown parser has already processed, so
//! inline syntax inside a URL is parsed first: `https://x.com/*a*` links
//! `https://x.com/` and emphasizes `a`. Escape such characters
//! (`https://x.com/\*a\*`) to keep them in the link. Punctuation replaced
//! by smart punctuation is restored inside detected URLs.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:https?://|www\.)[^\s<>]+").unwrap());

/// Characters never kept at the end of a detected URL.
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '*', '_', '\u{2019}', '\u{201d}', '\u{2026}',
];

/// Escape `text` as HTML, turning bare URLs into links.
///
/// With `smart_punctuation`, curly quotes, dashes and ellipses inside a URL
/// are mapped back to the ASCII the parser replaced.
pub(crate) fn linkify(text: &str, smart_punctuation: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for found in URL_PATTERN.find_iter(text) {
        let url = trim_url(found.as_str());
        if !has_host(url) {
            continue;
        }

        let start = found.start();
        let end = start + url.len();
        out.push_str(&escape_html(&text[last..start]));

        let url = if smart_punctuation {
            restore_punctuation(url)
        } else {
            url.to_owned()
        };
        let href = if url.starts_with("www.") {
            format!("http://{url}")
        } else {
            url.clone()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(&url)
        )
        .unwrap();
        last = end;
    }

    out.push_str(&escape_html(&text[last..]));
    out
}

/// Drop trailing punctuation and unbalanced closing parentheses.
fn trim_url(mut url: &str) -> &str {
    loop {
        if let Some(stripped) = url.strip_suffix(TRAILING_PUNCTUATION) {
            url = stripped;
        } else if url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
            url = &url[..url.len() - 1];
        } else {
            return url;
        }
    }
}

/// Undo smart punctuation replacements.
fn restore_punctuation(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            '\u{2013}' => out.push_str("--"),
            '\u{2014}' => out.push_str("---"),
            '\u{2026}' => out.push_str("..."),
            _ => out.push(c),
        }
    }
    out
}

/// True if something follows the scheme or `www.` marker.
fn has_host(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("www."))
        .unwrap_or_default();
    rest.chars().next().is_some_and(char::is_alphanumeric)
}
