//! State structs tracking context during event processing.

use std::collections::HashMap;

use pulldown_cmark::Alignment;
use serde::Serialize;

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
    /// Destination URL and title of the image being captured.
    pending: Option<(String, String)>,
}

impl ImageState {
    /// Start capturing alt text for an image.
    pub(crate) fn start(&mut self, src: String, title: String) {
        self.active = true;
        self.alt_text.clear();
        self.pending = Some((src, title));
    }

    /// End image capture and return (src, title, alt).
    pub(crate) fn end(&mut self) -> Option<(String, String, String)> {
        self.active = false;
        let alt = std::mem::take(&mut self.alt_text);
        self.pending.take().map(|(src, title)| (src, title, alt))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// State for tracking headings and the document title.
///
/// The first H1 always provides the extracted title and is left out of the
/// table of contents. With `strip_first_h1` it is also left out of the
/// output; later H1s render normally.
pub(crate) struct HeadingState {
    strip_first_h1: bool,
    /// Text of the first H1.
    title: Option<String>,
    seen_first_h1: bool,
    /// Inside the first H1 while it is being stripped.
    in_first_h1: bool,
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Plain heading text (for table of contents and slug).
    text: String,
    /// Heading HTML (with inline formatting).
    html: String,
    toc: Vec<TocEntry>,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn new(strip_first_h1: bool) -> Self {
        Self {
            strip_first_h1,
            title: None,
            seen_first_h1: false,
            in_first_h1: false,
            current_level: None,
            text: String::new(),
            html: String::new(),
            toc: Vec::new(),
            id_counts: HashMap::new(),
        }
    }

    /// Inside a heading that is being rendered.
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    /// Inside the first H1 while it is being stripped.
    pub(crate) fn is_in_first_h1(&self) -> bool {
        self.in_first_h1
    }

    /// Start tracking a heading.
    ///
    /// The first H1 is captured as the title only when stripping is enabled.
    pub(crate) fn start_heading(&mut self, level: u8) {
        self.text.clear();
        if self.strip_first_h1 && level == 1 && !self.seen_first_h1 {
            self.in_first_h1 = true;
            return;
        }

        self.current_level = Some(level);
        self.html.clear();
    }

    /// Complete the stripped first H1 and keep its text as title.
    pub(crate) fn complete_first_h1(&mut self) {
        self.title = Some(self.text.trim().to_owned());
        self.text.clear();
        self.in_first_h1 = false;
        self.seen_first_h1 = true;
    }

    /// Complete a rendered heading.
    ///
    /// Returns (level, id, html) or None if not in a heading.
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);
        let id = self.generate_id(&text);

        if level == 1 && !self.seen_first_h1 {
            self.title = Some(text.trim().to_owned());
            self.seen_first_h1 = true;
        } else {
            self.toc.push(TocEntry {
                level,
                title: text.trim().to_owned(),
                id: id.clone(),
            });
        }

        Some((level, id, html))
    }

    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("kebab-case"), "kebab-case");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("Установка"), "установка");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        assert!(!state.is_active());

        state.start(Some("rust".to_owned()));
        assert!(state.is_active());

        state.push_str("fn main() {}");
        let (lang, content) = state.end();
        assert_eq!(lang, Some("rust".to_owned()));
        assert_eq!(content, "fn main() {}");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_state() {
        let mut state = TableState::default();
        state.start(vec![Alignment::Left, Alignment::Center, Alignment::None]);

        state.start_head();
        assert!(state.is_in_head());
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:left""#
        );

        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:center""#
        );

        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");

        state.end_head();
        assert!(!state.is_in_head());
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        assert!(!state.is_active());

        state.start("logo.png".to_owned(), String::new());
        assert!(state.is_active());

        state.push_str("alt text");
        let (src, title, alt) = state.end().unwrap();
        assert_eq!(src, "logo.png");
        assert_eq!(title, "");
        assert_eq!(alt, "alt text");
        assert!(!state.is_active());
    }

    #[test]
    fn test_heading_state_keeps_first_h1() {
        let mut state = HeadingState::new(false);

        state.start_heading(1);
        assert!(state.is_active());
        state.push_text("My Title");
        let (level, id, _html) = state.complete_heading().unwrap();
        assert_eq!(level, 1);
        assert_eq!(id, "my-title");

        state.start_heading(2);
        state.push_text("Section");
        state.complete_heading().unwrap();

        assert_eq!(state.take_title(), Some("My Title".to_owned()));
        assert_eq!(state.take_toc().len(), 1);
    }

    #[test]
    fn test_heading_state_strips_only_first_h1() {
        let mut state = HeadingState::new(true);

        state.start_heading(1);
        assert!(state.is_in_first_h1());
        assert!(!state.is_active());
        state.push_text("My Title");
        state.complete_first_h1();

        state.start_heading(1);
        assert!(state.is_active());
        state.push_text("Appendix");
        let (level, id, _html) = state.complete_heading().unwrap();
        assert_eq!(level, 1);
        assert_eq!(id, "appendix");

        assert_eq!(state.take_title(), Some("My Title".to_owned()));
        let toc = state.take_toc();
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "Appendix");
    }
}
