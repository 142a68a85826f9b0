use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::kinds::CodeFence;
use super::types::{Block, BlockKind};

/// Extensions enabled when parsing documents for splitting.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Break a markdown document into its top-level blocks, in document order.
///
/// Every byte of non-whitespace source ends up in exactly one block. An empty
/// or whitespace-only document yields a single blank line.
pub fn extract_blocks(markdown: &str) -> Vec<Block> {
    let mut extractor = Extractor::new(markdown);
    for (event, range) in Parser::new_ext(markdown, markdown_options()).into_offset_iter() {
        extractor.process_event(event, range);
    }
    let blocks = extractor.finish();
    log::debug!(
        "extracted {} blocks from {} bytes of markdown",
        blocks.len(),
        markdown.len()
    );
    blocks
}

enum NodeKind {
    Heading(u8),
    Paragraph,
    Code { language: String, content: String },
    Generic,
}

/// A top-level node whose events are still arriving.
struct OpenNode {
    kind: NodeKind,
    range: Range<usize>,
    /// Union of the spans of every nested event.
    inline: Option<Range<usize>>,
}

impl OpenNode {
    fn from_tag(tag: &Tag<'_>, range: Range<usize>) -> Self {
        let kind = match tag {
            Tag::Heading { level, .. } => NodeKind::Heading(*level as u8),
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::Code {
                language: info.to_string(),
                content: String::new(),
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::Code {
                language: String::new(),
                content: String::new(),
            },
            _ => NodeKind::Generic,
        };
        Self {
            kind,
            range,
            inline: None,
        }
    }

    fn leaf(range: Range<usize>) -> Self {
        Self {
            kind: NodeKind::Generic,
            range,
            inline: None,
        }
    }

    fn record_inline(&mut self, range: &Range<usize>) {
        self.inline = Some(match self.inline.take() {
            Some(seen) => seen.start.min(range.start)..seen.end.max(range.end),
            None => range.clone(),
        });
    }

    fn absorb_text(&mut self, text: &str, range: &Range<usize>) {
        if let NodeKind::Code { content, .. } = &mut self.kind {
            content.push_str(text);
            return;
        }
        self.record_inline(range);
    }

    fn into_block(self, source: &str) -> Block {
        let inline = self.inline.map(|span| &source[span]).unwrap_or_default();
        match self.kind {
            NodeKind::Heading(level) => Block::heading(level, inline),
            NodeKind::Paragraph => Block::paragraph(inline),
            NodeKind::Code { language, content } => Block::code(CodeFence::new(language, content)),
            NodeKind::Generic => Block::generic(&source[self.range]),
        }
    }
}

struct Extractor<'a> {
    source: &'a str,
    blocks: Vec<Block>,
    depth: usize,
    open: Option<OpenNode>,
    /// End of the last top-level node, trailing whitespace excluded.
    cursor: Option<usize>,
}

impl<'a> Extractor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            blocks: Vec::new(),
            depth: 0,
            open: None,
            cursor: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                if self.depth == 0 {
                    self.open = Some(OpenNode::from_tag(&tag, range));
                } else if let Some(node) = self.open.as_mut() {
                    node.record_inline(&range);
                }
                self.depth += 1;
            }
            Event::End(_) => {
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0
                    && let Some(node) = self.open.take()
                {
                    self.emit(node);
                }
            }
            _ if self.depth == 0 => self.emit(OpenNode::leaf(range)),
            Event::Text(text) => {
                if let Some(node) = self.open.as_mut() {
                    node.absorb_text(&text, &range);
                }
            }
            _ => {
                if let Some(node) = self.open.as_mut() {
                    node.record_inline(&range);
                }
            }
        }
    }

    fn emit(&mut self, node: OpenNode) {
        self.push_gap(node.range.start);
        let end = node.range.start + self.source[node.range.clone()].trim_end().len();
        let block = node.into_block(self.source);
        self.cursor = Some(end);
        self.push(block);
    }

    /// Handle the source between the previous node and `until`: blank lines
    /// become a separator, and anything the parser emitted no events for
    /// (link reference definitions) is kept verbatim.
    fn push_gap(&mut self, until: usize) {
        let leading = self.cursor.is_none();
        let from = self.cursor.unwrap_or(0).min(until);
        let gap = &self.source[from..until];

        let content = gap.trim();
        if content.is_empty() {
            if separates(gap, leading) {
                self.push_blank_line();
            }
            return;
        }

        let start = gap.len() - gap.trim_start().len();
        let end = start + content.len();
        if separates(&gap[..start], leading) {
            self.push_blank_line();
        }
        self.push(Block::generic(content));
        if separates(&gap[end..], false) {
            self.push_blank_line();
        }
    }

    fn push_blank_line(&mut self) {
        let already_separated = self.blocks.last().is_some_and(|last| {
            matches!(last.kind(), BlockKind::BlankLine) || last.text().ends_with("\n\n")
        });
        if !already_separated {
            self.blocks.push(Block::blank_line());
        }
    }

    fn push(&mut self, block: Block) {
        if !block.text().is_empty() {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.push_gap(self.source.len());
        if self.blocks.is_empty() {
            self.blocks.push(Block::blank_line());
        }
        self.blocks
    }
}

/// Whether `segment` holds a blank line. Before the first node any line break
/// counts, since there is no preceding line to terminate.
fn separates(segment: &str, leading: bool) -> bool {
    let breaks = segment.matches('\n').count();
    if leading { breaks >= 1 } else { breaks >= 2 }
}
