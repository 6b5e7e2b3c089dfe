//! Diagnostic rendering backends.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;

/// Formats diagnostics into output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[L002]: could not find enough free logic cells for cluster 3
///   --> x 4..=7, y 2..=4: cluster 3
///   --> (9, 9): last claimed cell
///    = note: claimed 10 of 12 cells
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in the header.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        if self.color {
            let color = match diag.severity {
                crate::Severity::Error => "31",
                crate::Severity::Warning => "33",
                crate::Severity::Note => "36",
            };
            out.push_str(&format!("\x1b[1;{color}m{header}\x1b[0m: {}\n", diag.message));
        } else {
            out.push_str(&format!("{header}: {}\n", diag.message));
        }

        // Primary labels first, then context
        let primary = diag.labels.iter().filter(|l| l.style == LabelStyle::Primary);
        let secondary = diag.labels.iter().filter(|l| l.style == LabelStyle::Secondary);
        for label in primary.chain(secondary) {
            out.push_str(&format!("  --> {}: {}\n", label.region, label.message));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}
