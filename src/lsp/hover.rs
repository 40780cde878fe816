//! Hover rendering for cross-reference hints.

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind};

use super::position::range_between;
use crate::documentation::DocFragment;
use crate::navigation::Hint;

/// Render a hint as a Markdown hover anchored on its span in `source`.
pub fn hover_for_hint(source: &str, hint: &Hint) -> Hover {
    let span = &hint.span;
    let range = range_between(
        source,
        (span.start_line.saturating_sub(1), span.start_column),
        (span.end_line.saturating_sub(1), span.end_column),
    );

    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format_hint(hint),
        }),
        range: Some(range),
    }
}

/// Markdown body of a hint.
pub fn format_hint(hint: &Hint) -> String {
    let mut sections = Vec::new();

    if let Some(def) = &hint.definition {
        let mut section = format!("**Defined in:** `{}`", def.path);
        if !def.snippet.is_empty() {
            section.push_str(&format!("\n\n```\n{}\n```", def.snippet));
        }
        sections.push(section);
    }

    if let Some(fragments) = &hint.documentation {
        sections.push(format!(
            "**Documentation:**\n\n{}",
            format_fragments(fragments).trim()
        ));
    }

    sections.join("\n\n---\n\n")
}

/// Markdown for parsed documentation.
pub fn format_fragments(fragments: &[DocFragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        match fragment {
            DocFragment::Text(text) => out.push_str(text),
            DocFragment::Code(code) => out.push_str(&inline_code(code)),
            DocFragment::Section { label, identifier } => {
                out.push_str(&format!("\n\n**{}** ", label.text()));
                if let Some(ident) = identifier {
                    out.push_str(&inline_code(ident));
                    out.push(' ');
                }
            }
            DocFragment::Preformatted(text) => {
                out.push_str(&format!("\n```\n{}\n```\n", text.trim_end()));
            }
        }
    }
    out
}

/// Wrap in backticks, widening the fence when the code itself has one.
fn inline_code(code: &str) -> String {
    if code.contains('`') {
        format!("`` {} ``", code)
    } else {
        format!("`{}`", code)
    }
}
