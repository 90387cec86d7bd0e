use std::fmt;

use crate::hex::to_hex32;

/// Column width the instruction rendering is padded to before the comment.
pub const INSTRUCTION_WIDTH: usize = 35;

/// One instruction-trace line, built up while an instruction executes.
///
/// Starts as `aaaaaaaa: wwwwwwww  ` and receives the rendering and the
/// `// ...` comment from the handler that executes the instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLine {
    text: String,
}

impl TraceLine {
    /// Starts a line for the word fetched at `pc`.
    #[must_use]
    pub fn new(pc: u32, word: u32) -> Self {
        Self {
            text: format!("{}: {}  ", to_hex32(pc), to_hex32(word)),
        }
    }

    /// Appends the padded rendering followed by `// comment`.
    pub fn record(&mut self, rendering: &str, comment: fmt::Arguments<'_>) {
        self.text
            .push_str(&format!("{rendering:<INSTRUCTION_WIDTH$}// {comment}"));
    }

    /// Appends a rendering with no padding and no comment.
    pub fn record_bare(&mut self, rendering: &str) {
        self.text.push_str(rendering);
    }

    /// The line as built so far, without a trailing newline.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
