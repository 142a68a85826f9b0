#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn marker(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

/// A fenced code block: language tag, raw content and the fence that
/// delimits it.
///
/// The fence is chosen so the content can never close the block early: it is
/// one marker longer than the longest run of that marker in the content, and
/// never shorter than three. Backticks are used unless the language tag
/// itself contains one, since a backtick fence may not carry a backtick in its
/// info string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    language: String,
    content: String,
    fence: String,
}

impl CodeFence {
    pub const MIN_FENCE_LEN: usize = 3;

    pub fn new(language: impl Into<String>, content: impl Into<String>) -> Self {
        let language = language.into().trim().to_string();
        let mut content = content.into();
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }

        let kind = if language.contains('`') {
            FenceKind::Tildes
        } else {
            FenceKind::Backticks
        };
        let marker = kind.marker();
        let len = (longest_run(&content, marker) + 1).max(Self::MIN_FENCE_LEN);

        Self {
            language,
            content,
            fence: marker.to_string().repeat(len),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Raw code, always newline-terminated unless empty.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn fence(&self) -> &str {
        &self.fence
    }

    pub fn kind(&self) -> FenceKind {
        if self.fence.starts_with('~') {
            FenceKind::Tildes
        } else {
            FenceKind::Backticks
        }
    }

    pub fn open(&self) -> String {
        format!("{}{}\n", self.fence, self.language)
    }

    pub fn close(&self) -> String {
        format!("{}\n", self.fence)
    }

    /// Wrap newline-terminated lines in this block's fences, followed by the
    /// blank-line separator.
    pub fn wrap(&self, body: &str) -> String {
        format!("{}{}{}\n", self.open(), body, self.close())
    }

    /// The whole block as standalone markdown.
    pub fn render(&self) -> String {
        self.wrap(&self.content)
    }
}

fn longest_run(text: &str, marker: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == marker {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
