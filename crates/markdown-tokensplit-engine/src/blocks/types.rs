use super::kinds::CodeFence;

/// The kind of a top-level block, with its kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    /// An ATX or setext heading, normalized to ATX form.
    Heading {
        /// 1 through 6.
        level: u8,
    },
    Paragraph,
    /// A fenced or indented code block.
    Code(CodeFence),
    /// Blank line(s) separating two top-level nodes in the source.
    BlankLine,
    /// Any other structural node: lists, block quotes, tables, HTML, rules,
    /// footnote and link reference definitions.
    Generic,
}

/// One top-level structural unit of a document, with the markdown that
/// re-renders it standalone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    text: String,
}

impl Block {
    /// ATX heading text. Line breaks from a multi-line setext heading become
    /// single spaces, since an ATX heading ends at its first newline.
    pub fn heading(level: u8, inline: &str) -> Self {
        let level = level.clamp(1, 6);
        let mut text = "#".repeat(usize::from(level));
        let inline = inline
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !inline.is_empty() {
            text.push(' ');
            text.push_str(&inline);
        }
        text.push('\n');
        Self {
            kind: BlockKind::Heading { level },
            text,
        }
    }

    pub fn paragraph(inline: &str) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: format!("{}\n", inline.trim_end()),
        }
    }

    pub fn code(fence: CodeFence) -> Self {
        Self {
            text: fence.render(),
            kind: BlockKind::Code(fence),
        }
    }

    pub fn blank_line() -> Self {
        Self {
            kind: BlockKind::BlankLine,
            text: "\n".to_string(),
        }
    }

    /// Verbatim source of a structural node. Whitespace-only source renders
    /// as the empty string.
    pub fn generic(source: &str) -> Self {
        let source = source.trim_end();
        let text = if source.trim().is_empty() {
            String::new()
        } else {
            format!("{source}\n")
        };
        Self {
            kind: BlockKind::Generic,
            text,
        }
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, BlockKind::Code(_))
    }
}
