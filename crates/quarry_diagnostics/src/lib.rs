//! Structured diagnostics for the quarry placer.
//!
//! Placement stages report progress, warnings, and failures as [`Diagnostic`]
//! values carrying a severity, a category-prefixed code, and optional labels
//! pointing at grid regions. The thread-safe [`DiagnosticSink`] accumulates them
//! for the caller, and [`TerminalRenderer`] formats them for humans.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
