//! Parsing raw documentation comments into render-ready fragments.
//!
//! Javadoc-tagged text is scanned left to right against an ordered rule table;
//! C++ comments are only whitespace-normalised. Rendering is left to the caller.

use std::sync::LazyLock;

use regex::Regex;

/// Label introducing a documentation section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    See,
    Parameter,
    Exception,
    Author,
    Version,
    Since,
    Returns,
    Deprecated,
}

impl SectionLabel {
    pub fn text(self) -> &'static str {
        match self {
            SectionLabel::See => "See:",
            SectionLabel::Parameter => "Parameter:",
            SectionLabel::Exception => "Exception:",
            SectionLabel::Author => "Author:",
            SectionLabel::Version => "Version:",
            SectionLabel::Since => "Since:",
            SectionLabel::Returns => "Returns:",
            SectionLabel::Deprecated => "Deprecated:",
        }
    }
}

/// One unit of parsed documentation, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocFragment {
    /// Prose, copied verbatim.
    Text(String),
    /// Inline code from `{@code ...}` or `{@link ...}`.
    Code(String),
    /// Start of a labeled section; the content follows as later fragments.
    Section {
        label: SectionLabel,
        /// Parameter or exception name, styled as code.
        identifier: Option<String>,
    },
    /// Text shown as-is in a fixed-width block.
    Preformatted(String),
}

enum Rule {
    InlineCode,
    Section { pattern: Regex, label: SectionLabel },
}

impl Rule {
    fn section(pattern: &str, label: SectionLabel) -> Self {
        Rule::Section {
            pattern: Regex::new(pattern).unwrap(),
            label,
        }
    }

    /// Try the rule at `pos`; on a match return the fragment and the offset to resume at.
    fn apply(&self, text: &str, pos: usize) -> Option<(DocFragment, usize)> {
        let rest = &text[pos..];
        match self {
            Rule::InlineCode => {
                let opener = rest.get(..INLINE_OPENER_LEN)?;
                if !INLINE_OPENERS
                    .iter()
                    .any(|tag| opener.eq_ignore_ascii_case(tag))
                {
                    return None;
                }
                let start = pos + INLINE_OPENER_LEN;
                let end = matching_brace(&text[start..])
                    .map(|i| start + i)
                    .unwrap_or(text.len());
                let code = text[start..end].trim().to_string();
                Some((DocFragment::Code(code), (end + 1).min(text.len())))
            }
            Rule::Section { pattern, label } => {
                let caps = pattern.captures(rest)?;
                let matched = caps.get(0)?;
                let fragment = DocFragment::Section {
                    label: *label,
                    identifier: caps.get(1).map(|m| m.as_str().to_string()),
                };
                Some((fragment, pos + matched.end()))
            }
        }
    }
}

const INLINE_OPENERS: [&str; 2] = ["{@code", "{@link"];
const INLINE_OPENER_LEN: usize = 6;

/// Earlier rules shadow later ones.
static JAVADOC_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::InlineCode,
        Rule::section(r"(?i)^\s*@see\s+", SectionLabel::See),
        Rule::section(
            r"(?i)^\s*@param\s+<\s*([$A-Z_][0-9A-Z_$]*)\s*>\s*",
            SectionLabel::Parameter,
        ),
        Rule::section(
            r"(?i)^\s*@param\s+([$A-Z_][0-9A-Z_$]*)\s+",
            SectionLabel::Parameter,
        ),
        Rule::section(
            r"(?i)^\s*@throws\s+([$A-Z_][0-9A-Z_$]*)\s+",
            SectionLabel::Exception,
        ),
        Rule::section(r"(?i)^\s*@author\s+", SectionLabel::Author),
        Rule::section(r"(?i)^\s*@version\s+", SectionLabel::Version),
        Rule::section(r"(?i)^\s*@since\s+", SectionLabel::Since),
        Rule::section(r"(?i)^\s*@return\s+", SectionLabel::Returns),
        Rule::section(r"(?i)^\s*@deprecated\s+", SectionLabel::Deprecated),
    ]
});

static LEADING_STARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\*").unwrap());
static NEWLINE_INDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*").unwrap());

/// Parse `raw` documentation written in `language`.
///
/// Empty input yields no fragments.
pub fn format_documentation(language: &str, raw: &str) -> Vec<DocFragment> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match language {
        "java" => parse_javadoc(&strip_comment_markers(raw)),
        "c++" => vec![DocFragment::Preformatted(
            NEWLINE_INDENT.replace_all(raw, "\n").into_owned(),
        )],
        _ => vec![DocFragment::Preformatted(raw.to_string())],
    }
}

/// Remove `/**`, the closing `*/` and the `*` gutter from a block comment.
fn strip_comment_markers(raw: &str) -> String {
    let text = raw.trim().replacen("/**", "", 1);
    let text = text.strip_suffix("*/").unwrap_or(&text);
    LEADING_STARS.replace_all(text, "").trim().to_string()
}

fn parse_javadoc(text: &str) -> Vec<DocFragment> {
    let mut fragments = Vec::new();
    let mut prose = String::new();
    let mut pos = 0;

    while pos < text.len() {
        let matched = JAVADOC_RULES.iter().find_map(|rule| rule.apply(text, pos));
        match matched {
            Some((fragment, next)) => {
                if !prose.is_empty() {
                    fragments.push(DocFragment::Text(std::mem::take(&mut prose)));
                }
                fragments.push(fragment);
                pos = next;
            }
            None => {
                let Some(c) = text[pos..].chars().next() else {
                    break;
                };
                prose.push(c);
                pos += c.len_utf8();
            }
        }
    }

    if !prose.is_empty() {
        fragments.push(DocFragment::Text(prose));
    }
    fragments
}

/// Index of the `}` closing an already-open brace, counting nested pairs.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> DocFragment {
        DocFragment::Text(s.to_string())
    }

    fn code(s: &str) -> DocFragment {
        DocFragment::Code(s.to_string())
    }

    fn section(label: SectionLabel, identifier: Option<&str>) -> DocFragment {
        DocFragment::Section {
            label,
            identifier: identifier.map(str::to_string),
        }
    }

    #[test]
    fn parses_mixed_javadoc() {
        let fragments =
            format_documentation("java", "/** {@code x<y} text @param <T> desc @return r */");
        assert_eq!(
            fragments,
            vec![
                code("x<y"),
                text(" text"),
                section(SectionLabel::Parameter, Some("T")),
                text("desc"),
                section(SectionLabel::Returns, None),
                text("r"),
            ]
        );
    }

    #[test]
    fn strips_comment_gutter() {
        let raw = "/**\n   * Adds two numbers.\n   *\n   * @param a first\n   * @param b second\n   */";
        assert_eq!(
            format_documentation("java", raw),
            vec![
                text("Adds two numbers."),
                section(SectionLabel::Parameter, Some("a")),
                text("first"),
                section(SectionLabel::Parameter, Some("b")),
                text("second"),
            ]
        );
    }

    #[test]
    fn nested_braces_in_inline_code() {
        let fragments = format_documentation("java", "{@code new int[] {1, 2}} done");
        assert_eq!(fragments, vec![code("new int[] {1, 2}"), text(" done")]);
    }

    #[test]
    fn unterminated_inline_code_runs_to_end() {
        let fragments = format_documentation("java", "see {@link Foo#bar(int");
        assert_eq!(fragments, vec![text("see "), code("Foo#bar(int")]);
    }

    #[test]
    fn tags_are_case_insensitive() {
        let fragments = format_documentation("java", "{@LINK List} @THROWS IOException when");
        assert_eq!(
            fragments,
            vec![
                code("List"),
                section(SectionLabel::Exception, Some("IOException")),
                text("when"),
            ]
        );
    }

    #[test]
    fn every_section_label() {
        let raw = "@see a @author b @version c @since d @deprecated e";
        let labels: Vec<&str> = format_documentation("java", raw)
            .into_iter()
            .filter_map(|f| match f {
                DocFragment::Section { label, .. } => Some(label.text()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["See:", "Author:", "Version:", "Since:", "Deprecated:"]);
    }

    #[test]
    fn identifiers_allow_dollar_and_underscore() {
        let fragments = format_documentation("java", "@param $_x1 value");
        assert_eq!(
            fragments,
            vec![section(SectionLabel::Parameter, Some("$_x1")), text("value")]
        );
    }

    #[test]
    fn tag_without_argument_stays_prose() {
        assert_eq!(format_documentation("java", "@param"), vec![text("@param")]);
    }

    #[test]
    fn cpp_collapses_indentation() {
        let fragments = format_documentation("c++", "/// Frobs.\n    ///   Twice.\n\n  /// Done.");
        assert_eq!(
            fragments,
            vec![DocFragment::Preformatted(
                "/// Frobs.\n///   Twice.\n/// Done.".to_string()
            )]
        );
    }

    #[test]
    fn unknown_language_passes_through() {
        assert_eq!(
            format_documentation("go", "// Frob does things."),
            vec![DocFragment::Preformatted("// Frob does things.".to_string())]
        );
    }

    #[test]
    fn empty_input_has_no_fragments() {
        assert!(format_documentation("java", "").is_empty());
        assert!(format_documentation("c++", "   ").is_empty());
        assert!(format_documentation("java", "/** */").is_empty());
    }
}
