//! Line-oriented output buffer with indentation.

#[derive(Debug)]
pub struct SourceWriter {
    output: String,
    indent_level: u32,
    indent_str: String,
    at_line_start: bool,
}

impl SourceWriter {
    pub fn new(indent_str: impl Into<String>, indent_level: u32) -> Self {
        SourceWriter {
            output: String::new(),
            indent_level,
            indent_str: indent_str.into(),
            at_line_start: true,
        }
    }

    /// Append text, indenting first when at the start of a line.
    pub fn write(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.indent_level {
                self.output.push_str(&self.indent_str);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// `write` followed by `write_line`.
    pub fn line(&mut self, text: &str) {
        self.write(text);
        self.write_line();
    }

    pub const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub const fn indent_level(&self) -> u32 {
        self.indent_level
    }

    pub fn finish(self) -> String {
        self.output
    }
}
