//! Best-effort outline text parsing and canonical re-serialization.

use regex::Regex;
use scrivano_core::ChapterOutline;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Placeholder used when the response carries no `Title:` line.
pub const DEFAULT_TITLE: &str = "Untitled Story";

/// Fixed title of the id-0 hook block.
pub const HOOK_TITLE: &str = "The Hook";

static TITLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*title:\s*(.*)$").expect("valid title regex"));

static CHAPTER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Chapter\s+(\d+)\s*:\s*(.*)$").expect("valid chapter regex"));

static WORD_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*word\s*count:\s*([\d,]+)\s*words?\s*\)").expect("valid word-count regex")
});

static CONCEPT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*concept:\s*(.*)$").expect("valid concept regex"));

/// A parsed outline: the refined title plus ordered chapter descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutline {
    /// Title refined by the model, or [`DEFAULT_TITLE`]
    pub refined_title: String,
    /// Chapter descriptors in response order
    pub outlines: Vec<ChapterOutline>,
}

/// Parse raw outline text into a title and chapter descriptors.
///
/// The first line starting with a case-insensitive `title:` marker supplies
/// the refined title. The remaining text splits into blocks at each
/// `Chapter <N>:` line; text before the first such line is discarded. Id 0
/// is the hook: its title is forced to [`HOOK_TITLE`], its word count to 0,
/// and the rest of its block is kept verbatim as concept text. Non-zero ids
/// additionally require a parenthesized `(Word Count: <n> words)` figure
/// and a `Concept:` line (first line only); blocks missing any required
/// field are silently dropped.
///
/// # Examples
///
/// ```
/// use scrivano_outline::parse;
///
/// let parsed = parse(
///     "Title: My Story\nChapter 0: The Hook\nIntro text\n\
///      Chapter 1: Beginning\n(Word Count: 500 words)\nConcept: hero wakes up\n",
/// );
/// assert_eq!(parsed.refined_title, "My Story");
/// assert_eq!(parsed.outlines.len(), 2);
/// ```
pub fn parse(raw: &str) -> ParsedOutline {
    let mut refined_title = DEFAULT_TITLE.to_string();
    let mut remaining_lines: Vec<&str> = Vec::new();
    let mut title_seen = false;

    for line in raw.lines() {
        if !title_seen && let Some(caps) = TITLE_LINE.captures(line) {
            title_seen = true;
            let title = caps[1].trim();
            if !title.is_empty() {
                refined_title = title.to_string();
            }
            continue;
        }
        remaining_lines.push(line);
    }

    let mut outlines = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in remaining_lines {
        if CHAPTER_HEADER.is_match(line) {
            if let Some(chapter) = parse_block(&block) {
                outlines.push(chapter);
            }
            block = vec![line];
        } else if !block.is_empty() {
            block.push(line);
        }
        // Lines before the first chapter header fall through untracked.
    }
    if let Some(chapter) = parse_block(&block) {
        outlines.push(chapter);
    }

    ParsedOutline {
        refined_title,
        outlines,
    }
}

/// Parse one chapter block (header line plus body lines).
fn parse_block(lines: &[&str]) -> Option<ChapterOutline> {
    let header = lines.first()?;
    let caps = CHAPTER_HEADER.captures(header)?;
    let id: u32 = caps[1].parse().ok()?;
    let header_title = caps[2].trim();
    let body = &lines[1..];

    if id == 0 {
        let concept = body.join("\n").trim().to_string();
        return Some(ChapterOutline::new(0, HOOK_TITLE.to_string(), 0, concept));
    }

    if header_title.is_empty() {
        return None;
    }

    let word_count: usize = body.iter().find_map(|line| {
        let caps = WORD_COUNT.captures(line)?;
        caps[1].replace(',', "").parse().ok()
    })?;

    let concept = body.iter().find_map(|line| {
        let caps = CONCEPT_LINE.captures(line)?;
        let text = caps[1].trim();
        (!text.is_empty()).then(|| text.to_string())
    })?;

    Some(ChapterOutline::new(
        id,
        header_title.to_string(),
        word_count,
        concept,
    ))
}

/// Canonical re-serialization of a parsed outline.
///
/// Produces exactly the wire format [`parse`] consumes, so parsing is
/// idempotent over it: `parse(&render(&parsed)) == parsed` for any
/// parser-produced value.
pub fn render(outline: &ParsedOutline) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title: {}", outline.refined_title);

    for chapter in &outline.outlines {
        if *chapter.id() == 0 {
            let _ = writeln!(out, "Chapter 0: {HOOK_TITLE}");
            if !chapter.concept().is_empty() {
                let _ = writeln!(out, "{}", chapter.concept());
            }
        } else {
            let _ = writeln!(out, "Chapter {}: {}", chapter.id(), chapter.title());
            let _ = writeln!(out, "(Word Count: {} words)", chapter.word_count());
            let _ = writeln!(out, "Concept: {}", chapter.concept());
        }
    }

    out
}
