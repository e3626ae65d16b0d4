//! rustc-style terminal rendering.

use qhdl_source::{SourceDb, Span};

use crate::diagnostic::{Diagnostic, Label, LabelStyle};

/// Formats diagnostics as plain text in the familiar rustc layout:
///
/// ```text
/// error[E402]: port `In1` of `B1` is an input but `Out1` is an output of `DoubleBeamsplitter`
///   --> double_bs.qhdl:14:28
///    |
/// 14 |     port map (In1 => Out1, In2 => In1, Out1 => s1, Out2 => s2);
///    |                      ^^^^ drives nothing here
///    |
///    = note: ...
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerminalRenderer {
    /// Wrap severity headers in ANSI colour codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders one diagnostic.
    pub fn render(&self, diag: &Diagnostic, db: &SourceDb) -> String {
        let mut out = String::new();
        let header = format!("{}[{}]", diag.severity, diag.code);
        if self.color {
            let colour = if diag.is_error() { "31" } else { "33" };
            out.push_str(&format!("\x1b[1;{colour}m{header}\x1b[0m: {}\n", diag.message));
        } else {
            out.push_str(&format!("{header}: {}\n", diag.message));
        }

        if let Some(resolved) = db.resolve_span(diag.primary_span) {
            let gutter = " ".repeat(resolved.start_line.to_string().len());
            out.push_str(&format!("{gutter}--> {resolved}\n"));
            out.push_str(&format!("{gutter} |\n"));

            let primary_message = diag
                .labels
                .iter()
                .find(|l| l.style == LabelStyle::Primary && l.span == diag.primary_span)
                .map(|l| l.message.as_str())
                .unwrap_or("");
            let primary = Label::primary(diag.primary_span, primary_message);
            render_label(&mut out, db, &primary, &gutter);

            for label in diag.labels.iter().filter(|l| l.span != diag.primary_span) {
                render_label(&mut out, db, label, &gutter);
            }
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }
        out
    }

    /// Renders all diagnostics separated by blank lines.
    pub fn render_all(&self, diags: &[Diagnostic], db: &SourceDb) -> String {
        diags
            .iter()
            .map(|d| self.render(d, db))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_label(out: &mut String, db: &SourceDb, label: &Label, gutter: &str) {
    let Some(file) = db.get(label.span.file) else {
        return;
    };
    let span: Span = label.span;
    let (line, col) = file.line_col(span.start);
    let text = file.line_text(line);
    let indent = (col as usize).saturating_sub(1);
    let width = (span.len() as usize)
        .min(text.len().saturating_sub(indent))
        .max(1);
    let marker = match label.style {
        LabelStyle::Primary => "^",
        LabelStyle::Secondary => "-",
    };
    let number = format!("{line:>width$}", width = gutter.len());
    out.push_str(&format!("{number} | {text}\n"));
    out.push_str(&format!(
        "{gutter} | {}{}",
        " ".repeat(indent),
        marker.repeat(width)
    ));
    if !label.message.is_empty() {
        out.push(' ');
        out.push_str(&label.message);
    }
    out.push('\n');
}
