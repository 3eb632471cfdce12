//! Flat-to-nested outline conversion
//!
//! Single pass over the leveled records with a stack of open nodes. A node
//! stays open until a record with an equal or lower level closes it; closed
//! nodes attach to the nearest still-open ancestor, or become roots.

use super::types::{HeadingRecord, OutlineError, OutlineNode, Result};

/// Build a nested outline tree from flat leveled heading records.
///
/// Node ids are `"{document_id}-{i}"` with the zero-based input position, so
/// they stay unique within a document even when titles repeat. A single
/// malformed level fails the whole batch; partial trees are unsafe to render.
///
/// Gaps in the level sequence are preserved as direct parent-child edges; no
/// synthetic intermediate nodes are inserted.
pub fn build_outline(document_id: &str, records: &[HeadingRecord]) -> Result<Vec<OutlineNode>> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let level = parse_level(&record.level)?;
        let node = OutlineNode {
            id: format!("{}-{}", document_id, i),
            title: record.text.clone(),
            level,
            page: record.page,
            children: Vec::new(),
        };

        // Equal level closes the sibling; deeper open nodes close too.
        while stack.last().is_some_and(|top| top.level >= level) {
            if let Some(closed) = stack.pop() {
                attach(&mut roots, &mut stack, closed);
            }
        }
        stack.push(node);
    }

    while let Some(closed) = stack.pop() {
        attach(&mut roots, &mut stack, closed);
    }

    Ok(roots)
}

/// Attach a closed node to the nearest open ancestor, or to the root list.
///
/// Nodes close in input order, so append order preserves reading order.
fn attach(roots: &mut Vec<OutlineNode>, stack: &mut [OutlineNode], closed: OutlineNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(closed),
        None => roots.push(closed),
    }
}

/// Parse a backend level tag ("H1".."H6") to its integer level.
///
/// An optional `H`/`h` prefix is stripped; the remainder must parse to an
/// integer in 1..=6. Any other prefix is malformed.
pub fn parse_level(raw: &str) -> Result<u8> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('H')
        .or_else(|| trimmed.strip_prefix('h'))
        .unwrap_or(trimmed);

    match digits.parse::<u8>() {
        Ok(level @ 1..=6) => Ok(level),
        _ => Err(OutlineError::MalformedLevel(raw.to_string())),
    }
}
