//! Template rendering error types.

/// Template rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Handlebars rendering error.
    #[error("Template rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// A rendered link comment does not reference the ticket, so later runs
    /// would not recognise the merge request as linked.
    #[error("Rendered comment does not contain a ticket key matching '{prefix}-<number>'")]
    MissingTicketKey { prefix: String },
}
