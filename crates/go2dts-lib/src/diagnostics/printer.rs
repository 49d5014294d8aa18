//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::{Diagnostics, Location, Severity};
use crate::source_map::SourceMap;

/// Renders diagnostics against the sources of a run.
pub struct DiagnosticsPrinter<'a> {
    diagnostics: &'a Diagnostics,
    sources: &'a SourceMap,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(diagnostics: &'a Diagnostics, sources: &'a SourceMap) -> Self {
        Self {
            diagnostics,
            sources,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }

            let span = match &diag.location {
                Location::Span(span) => *span,
                Location::Path(path) => {
                    writeln!(w, "{}: {}", diag.severity(), diag.message)?;
                    writeln!(w, "  --> {path}")?;
                    continue;
                }
            };

            let (Some(source), Some(path)) =
                (self.sources.content(span.source), self.sources.path(span.source))
            else {
                writeln!(w, "{diag}")?;
                continue;
            };

            let mut snippet = Snippet::source(source)
                .line_start(1)
                .path(path)
                .annotation(
                    AnnotationKind::Primary
                        .span(adjust_range(span.range, source.len()))
                        .label(&diag.message),
                );

            for related in diag.related.iter().filter(|r| r.span.source == span.source) {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span.range, source.len()))
                        .label(&related.message),
                );
            }

            let mut report: Vec<Group> = vec![
                severity_to_level(diag.severity())
                    .primary_title(&diag.message)
                    .element(snippet),
            ];

            // Related locations in other files get their own snippet.
            for related in diag.related.iter().filter(|r| r.span.source != span.source) {
                let (Some(other), Some(other_path)) = (
                    self.sources.content(related.span.source),
                    self.sources.path(related.span.source),
                ) else {
                    continue;
                };
                report.push(
                    Level::NOTE.secondary_title(&related.message).element(
                        Snippet::source(other)
                            .line_start(1)
                            .path(other_path)
                            .annotation(
                                AnnotationKind::Context
                                    .span(adjust_range(related.span.range, other.len())),
                            ),
                    ),
                );
            }

            for hint in &diag.hints {
                report.push(Group::with_title(Level::HELP.secondary_title(hint)));
            }

            writeln!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = usize::from(range.start()).min(limit);
    let end: usize = usize::from(range.end()).min(limit);

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
