use serde::Serialize;

/// A single completion candidate.
///
/// # Examples
///
/// ```
/// use cmdline_completion::CompletionProposal;
///
/// let proposal = CompletionProposal::new("--color")
///     .with_description("Paint color")
///     .with_category("Options");
/// assert_eq!(proposal.display, "--color");
/// assert!(proposal.complete);
/// assert!(!proposal.dont_quote);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionProposal {
    /// Text inserted on the line.
    pub value: String,
    /// Text shown in a completion menu.
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Append a space (and close an open quote) after inserting.
    pub complete: bool,
    /// Insert the value verbatim, without escaping.
    pub dont_quote: bool,
}

impl CompletionProposal {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            category: None,
            description: None,
            complete: true,
            dont_quote: false,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn dont_quote(mut self, dont_quote: bool) -> Self {
        self.dont_quote = dont_quote;
        self
    }
}
