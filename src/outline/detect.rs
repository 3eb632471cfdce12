//! Heading and title detection over extracted text lines
//!
//! Assigns "H1".."H4" tags to lines using font-size ranking relative to the
//! body text size, numbered-section patterns, and bold/uppercase cues. The
//! output feeds [`build_outline`](super::builder::build_outline).

use std::collections::{HashMap, HashSet};

use super::types::HeadingRecord;

/// Heading candidates must exceed the body size by this factor.
const HEADING_SIZE_RATIO: f32 = 1.1;
/// A size occurring in at least this share of lines is body text, not a heading.
const HEADING_FREQ_CEILING: f32 = 0.10;
/// Levels assigned to the largest candidate sizes, in rank order.
const SIZE_LEVELS: [&str; 4] = ["H1", "H2", "H3", "H4"];

/// One extracted text line with the layout metadata heading detection needs.
#[derive(Debug, Clone)]
pub struct LineBlock {
    /// Whitespace-normalized line text
    pub text: String,
    /// 1-based page number
    pub page: u32,
    /// Dominant font size on the line
    pub font_size: f32,
    /// Whether the dominant font is bold
    pub bold: bool,
    /// Top y coordinate of the line on its page
    pub y: f32,
}

impl LineBlock {
    pub fn new(text: impl Into<String>, page: u32, font_size: f32, bold: bool, y: f32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            bold,
            y,
        }
    }
}

/// Detect leveled headings in reading order.
///
/// Lines equal to the document title, bare page numbers, and repeats of the
/// same heading text on the same page are skipped.
pub fn detect_headings(blocks: &[LineBlock], title: Option<&str>) -> Vec<HeadingRecord> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let body_size = body_font_size(blocks);
    let size_levels = heading_size_levels(blocks, body_size);

    let mut outline = Vec::new();
    let mut seen: HashSet<(u32, String)> = HashSet::new();

    for block in blocks {
        let text = block.text.trim();
        if text.len() < 2 {
            continue;
        }
        if title.is_some_and(|t| !t.is_empty() && (text == t || t.contains(text))) {
            continue;
        }
        if is_page_marker(text) {
            continue;
        }

        let font_size = round_size(block.font_size);
        let level = numbered_section_level(text)
            .or_else(|| uppercase_level(text, font_size, body_size))
            .or_else(|| size_levels.get(&font_size.to_bits()).copied())
            .or_else(|| bold_level(block, text, body_size));

        let Some(level) = level else { continue };
        if text.len() > 150 {
            continue;
        }

        let cleaned = text.trim_end_matches([' ', '.']).to_string();
        if seen.insert((block.page, cleaned.clone())) {
            outline.push(HeadingRecord::new(cleaned, level, block.page));
        }
    }

    outline
}

/// Detect the document title: the run of near-largest-font lines at the top
/// of the first page, joined in vertical order.
pub fn detect_title(blocks: &[LineBlock]) -> Option<String> {
    let first_page = blocks.iter().map(|b| b.page).min()?;
    let mut candidates: Vec<&LineBlock> = blocks
        .iter()
        .filter(|b| b.page == first_page && b.text.trim().len() >= 10)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let max_size = candidates
        .iter()
        .map(|b| b.font_size)
        .fold(f32::MIN, f32::max);
    candidates.retain(|b| b.font_size >= max_size * 0.9 && b.y < 400.0);
    candidates.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut lines: Vec<&str> = Vec::new();
    let mut last_y = f32::MIN;
    for block in candidates {
        // Only adjacent lines continue the title.
        if !lines.is_empty() && block.y - last_y > 40.0 {
            break;
        }
        lines.push(block.text.trim());
        last_y = block.y;
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

/// Most frequent rounded font size; the document's body text size.
fn body_font_size(blocks: &[LineBlock]) -> f32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for block in blocks {
        *counts.entry(round_size(block.font_size).to_bits()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(bits, _)| f32::from_bits(bits))
        .unwrap_or(0.0)
}

/// Map the largest infrequent font sizes to heading levels.
///
/// A size qualifies when it is clearly above body size and rare enough not to
/// be running text. The four largest map to H1..H4.
fn heading_size_levels(blocks: &[LineBlock], body_size: f32) -> HashMap<u32, &'static str> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for block in blocks {
        *counts.entry(round_size(block.font_size).to_bits()).or_insert(0) += 1;
    }

    let ceiling = (blocks.len() as f32 * HEADING_FREQ_CEILING).max(1.0) as usize;
    let mut candidates: Vec<u32> = counts
        .into_iter()
        .filter(|&(bits, count)| {
            f32::from_bits(bits) > body_size * HEADING_SIZE_RATIO && count < ceiling
        })
        .map(|(bits, _)| bits)
        .collect();
    candidates.sort_by(|a, b| f32::from_bits(*b).total_cmp(&f32::from_bits(*a)));

    candidates
        .into_iter()
        .zip(SIZE_LEVELS)
        .collect()
}

/// Level from a leading section number: "1." -> H1, "1.2" -> H2, and so on.
fn numbered_section_level(text: &str) -> Option<&'static str> {
    let token = text.split_whitespace().next()?;
    if token.len() == text.trim().len() {
        // A bare number with nothing after it is not a heading.
        return None;
    }

    let token = token.strip_suffix('.').unwrap_or(token);
    let parts: Vec<&str> = token.split('.').collect();
    if parts.is_empty() || parts.len() > 4 {
        return None;
    }
    if !parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }
    // "1 Introduction" without a dot is ambiguous with list items; require a
    // trailing dot for top-level numbers.
    if parts.len() == 1 && !token_ends_with_dot(text) {
        return None;
    }

    Some(SIZE_LEVELS[parts.len() - 1])
}

fn token_ends_with_dot(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|token| token.ends_with('.'))
}

/// Short all-uppercase lines read as headings.
fn uppercase_level(text: &str, font_size: f32, body_size: f32) -> Option<&'static str> {
    let words = text.split_whitespace().count();
    let has_letters = text.chars().any(|c| c.is_alphabetic());
    if !has_letters || words == 0 || words > 12 {
        return None;
    }
    if !text
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(|c| c.is_uppercase())
    {
        return None;
    }
    if font_size > body_size * 1.05 {
        Some("H1")
    } else if font_size >= body_size {
        Some("H2")
    } else {
        None
    }
}

/// Bold lines at or above body size read as headings, sized by how much
/// larger than body they are.
fn bold_level(block: &LineBlock, text: &str, body_size: f32) -> Option<&'static str> {
    if !block.bold {
        return None;
    }
    let words = text.split_whitespace().count();
    if !(1..=25).contains(&words) {
        return None;
    }
    let font_size = round_size(block.font_size);
    if font_size >= body_size * 1.15 {
        Some("H1")
    } else if font_size >= body_size * 1.05 {
        Some("H2")
    } else if font_size >= body_size * 0.95 && text.starts_with(char::is_uppercase) {
        Some("H3")
    } else {
        None
    }
}

/// "Page 12" or a standalone number.
fn is_page_marker(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    lower
        .strip_prefix("page ")
        .is_some_and(|rest| rest.trim().bytes().all(|b| b.is_ascii_digit()))
}

fn round_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_lines(count: usize, page: u32) -> Vec<LineBlock> {
        (0..count)
            .map(|i| {
                LineBlock::new(
                    format!("Plain body text line number {} with several words.", i),
                    page,
                    10.0,
                    false,
                    100.0 + i as f32 * 12.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_font_size_hierarchy_maps_to_levels() {
        let mut blocks = vec![
            LineBlock::new("Chapter One", 1, 18.0, false, 50.0),
            LineBlock::new("A Section", 1, 14.0, false, 80.0),
        ];
        blocks.extend(body_lines(30, 1));

        let outline = detect_headings(&blocks, None);
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].level, "H1");
        assert_eq!(outline[0].text, "Chapter One");
        assert_eq!(outline[1].level, "H2");
    }

    #[test]
    fn test_numbered_sections_override_font_size() {
        let mut blocks = vec![
            LineBlock::new("1. Introduction", 1, 10.0, false, 50.0),
            LineBlock::new("1.2 Background", 1, 10.0, false, 70.0),
            LineBlock::new("1.2.3 Details", 2, 10.0, false, 50.0),
            LineBlock::new("1.2.3.4 Fine print", 2, 10.0, false, 70.0),
        ];
        blocks.extend(body_lines(30, 1));

        let outline = detect_headings(&blocks, None);
        let levels: Vec<&str> = outline.iter().map(|h| h.level.as_str()).collect();
        assert_eq!(levels, vec!["H1", "H2", "H3", "H4"]);
    }

    #[test]
    fn test_bare_number_is_not_a_heading() {
        let mut blocks = body_lines(20, 1);
        blocks.push(LineBlock::new("42", 1, 10.0, false, 400.0));
        blocks.push(LineBlock::new("Page 7", 1, 10.0, false, 410.0));

        let outline = detect_headings(&blocks, None);
        assert!(outline.is_empty());
    }

    #[test]
    fn test_bold_line_at_body_size_is_h3() {
        let mut blocks = body_lines(30, 1);
        blocks.push(LineBlock::new("Important Caveats Apply", 1, 10.0, true, 300.0));

        let outline = detect_headings(&blocks, None);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].level, "H3");
    }

    #[test]
    fn test_uppercase_short_line_is_heading() {
        let mut blocks = body_lines(30, 1);
        blocks.push(LineBlock::new("RESULTS AND DISCUSSION", 1, 10.5, false, 200.0));

        let outline = detect_headings(&blocks, None);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].text, "RESULTS AND DISCUSSION");
    }

    #[test]
    fn test_title_lines_excluded_and_deduped_per_page() {
        let mut blocks = vec![
            LineBlock::new("Understanding Deep Reading", 1, 22.0, false, 40.0),
            LineBlock::new("Summary", 1, 16.0, false, 100.0),
            LineBlock::new("Summary", 1, 16.0, false, 400.0),
            LineBlock::new("Summary", 2, 16.0, false, 60.0),
        ];
        blocks.extend(body_lines(40, 1));

        let outline = detect_headings(&blocks, Some("Understanding Deep Reading"));
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].page, 1);
        assert_eq!(outline[1].page, 2);
    }

    #[test]
    fn test_detect_title_joins_adjacent_large_lines() {
        let mut blocks = vec![
            LineBlock::new("Understanding Deep", 1, 22.0, false, 40.0),
            LineBlock::new("Reading Behaviour", 1, 22.0, false, 65.0),
            LineBlock::new("An unrelated large line", 1, 21.0, false, 500.0),
        ];
        blocks.extend(body_lines(10, 1));

        let title = detect_title(&blocks).unwrap();
        assert_eq!(title, "Understanding Deep Reading Behaviour");
    }

    #[test]
    fn test_detect_title_empty_input() {
        assert!(detect_title(&[]).is_none());
    }

    #[test]
    fn test_empty_blocks_yield_no_headings() {
        assert!(detect_headings(&[], None).is_empty());
    }
}
