//! Table-of-contents construction
//!
//! Two stages, both pure logic:
//!
//! 1. [`detect`]: extracted text lines with layout metadata are tagged as
//!    leveled heading records ("H1".."H4") using font-size ranking and
//!    structural cues.
//! 2. [`builder`]: a flat, ordered sequence of heading records becomes a
//!    nested outline tree for navigation display.
//!
//! A single malformed level fails a whole build; callers should hide the
//! outline panel for that document rather than render a partial tree.

mod builder;
mod detect;
mod types;

pub use builder::{build_outline, parse_level};
pub use detect::{detect_headings, detect_title, LineBlock};
pub use types::{HeadingRecord, OutlineError, OutlineNode, Result};
