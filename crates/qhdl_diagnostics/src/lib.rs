//! Structured diagnostics for QHDL elaboration.
//!
//! Every user-facing problem becomes a [`Diagnostic`] carrying a stable
//! [`DiagnosticCode`] (`E100`, `W401`, ...), a severity, and labelled source
//! spans. Stages running in parallel report into a shared [`DiagnosticSink`],
//! and [`TerminalRenderer`] prints the result in rustc style.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Label, LabelStyle};
pub use renderer::TerminalRenderer;
pub use severity::Severity;
pub use sink::DiagnosticSink;
