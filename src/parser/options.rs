//! Extraction options.

/// Options for extracting PDF documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// How per-page failures are handled
    pub error_mode: ErrorMode,

    /// Trim leading and trailing whitespace from page text
    pub trim_text: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the whole document when any page fails.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Keep page text exactly as the PDF library returns it.
    pub fn raw_text(mut self) -> Self {
        self.trim_text = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            trim_text: true,
        }
    }
}

/// Error handling mode for page text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Degrade a failing page to empty text and continue
    #[default]
    Lenient,
}
