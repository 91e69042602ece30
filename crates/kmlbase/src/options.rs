//! Configuration options for XML text emission

/// Options for [`XmlWriter`](crate::XmlWriter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// String repeated once per nesting level before each line
    pub indent: String,

    /// Line terminator written after each tag or text element
    pub newline: String,
}

impl WriterOptions {
    /// Compact output: no indentation and no newlines
    pub fn raw() -> Self {
        Self {
            indent: String::new(),
            newline: String::new(),
        }
    }
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            newline: "\n".to_string(),
        }
    }
}
