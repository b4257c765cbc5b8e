//! Error tree produced by the semantic passes.
//!
//! A [`Diag`] is either a leaf (message plus the location of the offending
//! definition) or a composite (message plus the underlying diagnostics that
//! caused it). Composites let a stage report every problem it found under
//! one heading, e.g. all the constructor failures of a model under
//! "Failed to understand the constructors".
//!
//! Rendering goes through miette: the tree becomes a `miette::Report` whose
//! related diagnostics are the underlying errors.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, NamedSource, Report, Severity};
use std::fmt;

/// A location a diagnostic points at.
///
/// The primary label marks the definition the diagnostic is about; the
/// secondary ones mark supporting locations, such as the earlier
/// definition in a conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    /// Empty if the location speaks for itself.
    pub message: String,
    pub primary: bool,
}

impl DiagLabel {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            primary: false,
        }
    }

    fn to_labeled_span(&self, source: &SourceFile) -> LabeledSpan {
        let span = source.clamp_span(&self.span);
        let text = (!self.message.is_empty()).then(|| self.message.clone());
        let at = (span.start, span.len());
        if self.primary {
            LabeledSpan::new_primary_with_span(text, at)
        } else {
            LabeledSpan::new_with_span(text, at)
        }
    }
}

/// A node of the error tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans showing relevant source locations.
    pub labels: Vec<DiagLabel>,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Optional diagnostic code (e.g. "metamodel::inheritance_cycle").
    pub code: Option<String>,
    /// The errors this one summarizes; empty for a leaf.
    pub underlying: Vec<Diag>,
}

impl Diag {
    /// Creates a leaf error with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
            underlying: Vec::new(),
        }
    }

    /// Creates a leaf error pointing at `span`.
    pub fn at(span: Span, message: impl Into<String>) -> Self {
        Self::error(message).with_primary_label(span, "")
    }

    /// Creates a composite error summarizing `underlying`.
    pub fn composite(message: impl Into<String>, underlying: Vec<Diag>) -> Self {
        Self {
            underlying,
            ..Self::error(message)
        }
    }

    /// Adds a primary label to this diagnostic.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::primary(span, message));
        self
    }

    /// Adds a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::secondary(span, message));
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether this diagnostic has no underlying errors.
    pub fn is_leaf(&self) -> bool {
        self.underlying.is_empty()
    }

    /// The location of the first primary label, if any.
    pub fn primary_span(&self) -> Option<&Span> {
        self.labels
            .iter()
            .find(|label| label.primary)
            .map(|label| &label.span)
    }

    /// Collects the messages of all leaves, depth first.
    ///
    /// Leaves are where the actual problems are stated; the composites above
    /// them only say which stage gave up.
    pub fn leaf_messages(&self) -> Vec<&str> {
        let mut messages = Vec::new();
        self.collect_leaf_messages(&mut messages);
        messages
    }

    fn collect_leaf_messages<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.underlying.is_empty() {
            out.push(&self.message);
        } else {
            for diag in &self.underlying {
                diag.collect_leaf_messages(out);
            }
        }
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The model source that spans refer to, for rendering.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
    name: Option<String>,
}

impl SourceFile {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Names the source, e.g. after the file the model was read from.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Restricts `span` to the source. Spans of synthesized definitions
    /// may lie outside of it.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        start..span.end.min(len).max(start)
    }
}

/// Converts an error tree into a miette report over `source`.
///
/// The underlying errors of a composite become the related diagnostics of
/// the report, recursively.
pub fn convert_diag_to_report(diag: &Diag, source: &SourceFile) -> Report {
    let report = Report::new(Rendered::new(diag, source));
    let content = source.content().to_string();
    match source.name() {
        Some(name) => report.with_source_code(NamedSource::new(name, content)),
        None => report.with_source_code(content),
    }
}

/// A [`Diag`] with its labels resolved against the source.
#[derive(Debug)]
struct Rendered {
    diag: Diag,
    labels: Vec<LabeledSpan>,
    related: Vec<Rendered>,
}

impl Rendered {
    fn new(diag: &Diag, source: &SourceFile) -> Self {
        Self {
            diag: Diag {
                underlying: Vec::new(),
                ..diag.clone()
            },
            labels: diag
                .labels
                .iter()
                .map(|label| label.to_labeled_span(source))
                .collect(),
            related: diag
                .underlying
                .iter()
                .map(|underlying| Rendered::new(underlying, source))
                .collect(),
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.diag, f)
    }
}

impl std::error::Error for Rendered {}

impl Diagnostic for Rendered {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.diag.code.as_ref()?;
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.diag.help.as_ref()?;
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            return None;
        }
        Some(Box::new(
            self.related.iter().map(|rendered| rendered as &dyn Diagnostic),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_carries_primary_location() {
        let diag = Diag::at(5..10, "The symbol is invalid");
        assert!(diag.is_leaf());
        assert_eq!(diag.primary_span(), Some(&(5..10)));
    }

    #[test]
    fn composite_collects_leaf_messages_depth_first() {
        let diag = Diag::composite(
            "Failed to understand the constructors",
            vec![
                Diag::composite(
                    "Failed to understand the constructor of the class A",
                    vec![Diag::error("first"), Diag::error("second")],
                ),
                Diag::error("third"),
            ],
        );

        assert!(!diag.is_leaf());
        assert_eq!(diag.leaf_messages(), vec!["first", "second", "third"]);
    }

    #[test]
    fn spans_are_clamped_to_the_source() {
        let source = SourceFile::new("hello");
        assert_eq!(source.clamp_span(&(0..10)), 0..5);
        assert_eq!(source.clamp_span(&(3..2)), 3..3);
        assert_eq!(source.clamp_span(&(10..20)), 5..5);
    }

    #[test]
    fn report_exposes_underlying_errors_as_related() {
        let source = SourceFile::new("class Something(Abstract):\n    x: int").named("model.py");
        let diag = Diag::composite(
            "Failed to translate",
            vec![
                Diag::at(31..32, "first").with_secondary_label(0..5, "defined here"),
                Diag::error("second").with_code("metamodel::other"),
            ],
        );

        let report = convert_diag_to_report(&diag, &source);
        assert_eq!(report.to_string(), "Failed to translate");

        let built = Rendered::new(&diag, &source);
        let related = built
            .related()
            .expect("expected related diagnostics")
            .collect::<Vec<_>>();
        assert_eq!(related.len(), 2);
        assert_eq!(related[0].to_string(), "first");
        assert_eq!(built.related[0].labels.len(), 2);
        assert!(built.related[0].labels[0].primary());
        assert!(!built.related[0].labels[1].primary());
        assert_eq!(built.related[1].diag.code.as_deref(), Some("metamodel::other"));
    }

    #[test]
    fn report_survives_out_of_bounds_spans() {
        let source = SourceFile::new("short");
        let diag = Diag::at(0..100, "error");
        let built = Rendered::new(&diag, &source);
        assert_eq!(built.labels[0].offset(), 0);
        assert_eq!(built.labels[0].len(), 5);
    }
}
