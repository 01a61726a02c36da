use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while parsing scheme documents and their entries.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    #[diagnostic(code(abec::parse::syntax))]
    Syntax {
        message: String,
        #[label("here")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Unknown special marker '{marker}'")]
    #[diagnostic(
        code(abec::parse::unknown_special),
        help("valid markers are: <rgid>, <secret>, <mu>, <lambda>, <epsilon>, <xattr>, <xattralt>")
    )]
    UnknownSpecialMarker {
        marker: String,
        #[label("not a known special value")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Integer literal out of range: {literal}")]
    #[diagnostic(code(abec::parse::int_range))]
    IntOutOfRange {
        literal: String,
        #[label("does not fit a 64-bit integer")]
        span: miette::SourceSpan,
        #[source_code]
        src: miette::NamedSource<String>,
    },

    #[error("Malformed scheme document: {message}")]
    #[diagnostic(code(abec::parse::document))]
    Document { message: String },
}

impl ParseError {
    pub fn syntax(
        message: impl Into<String>,
        start: usize,
        end: usize,
        source: &str,
        context: &str,
    ) -> Self {
        ParseError::Syntax {
            message: message.into(),
            span: (start, end.saturating_sub(start).max(1)).into(),
            src: miette::NamedSource::new(context, source.to_owned()),
        }
    }
}
