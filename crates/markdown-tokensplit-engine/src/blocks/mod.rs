//! # Block Extraction
//!
//! Turns a markdown document into the ordered sequence of top-level blocks
//! that the packer works on.
//!
//! ## Modules
//!
//! - **`types`**: `Block` and `BlockKind`
//! - **`kinds`**: block-specific helpers with owned delimiters (`CodeFence`)
//! - **`extract`**: walks the `pulldown-cmark` event stream and re-serializes
//!   each top-level node as standalone markdown
//!
//! ## Key Invariants
//!
//! - Blocks appear in document order and never overlap
//! - Every block's text is valid markdown on its own, ending in `\n`
//! - Headings and paragraphs keep their inline markup verbatim
//! - Code blocks always carry a closing fence

pub mod extract;
pub mod kinds;
pub mod types;

pub use extract::{extract_blocks, markdown_options};
pub use kinds::{CodeFence, FenceKind};
pub use types::{Block, BlockKind};
