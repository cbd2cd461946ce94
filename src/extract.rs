//! Text extraction and cleanup for matched spans.

use crate::decl::SourceSpan;
use crate::rule::ExtractionMode;

/// Line appended in place of a collapsed body.
pub const ELISION_MARKER: &str = "// ...";

/// Extract every span in source order, one blank line between them.
///
/// Spans that start at the same offset are extracted once.
pub fn extract_spans(source: &str, spans: &[SourceSpan], mode: ExtractionMode) -> String {
    let mut ordered: Vec<SourceSpan> = spans.to_vec();
    ordered.sort_by_key(|s| s.byte_start);
    ordered.dedup_by_key(|s| s.byte_start);

    ordered
        .iter()
        .map(|span| extract_span(source, *span, mode))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Extract a single span and clean it up according to `mode`.
pub fn extract_span(source: &str, span: SourceSpan, mode: ExtractionMode) -> String {
    let text = span_text(source, span);
    let lines = trim_blank_lines(text.lines().collect());

    let rewritten: Vec<String> = match mode {
        ExtractionMode::FullMember => lines.iter().map(|l| l.to_string()).collect(),
        ExtractionMode::BlockStructureOnly => block_structure(&lines),
        ExtractionMode::ContentOnly => content_only(&lines),
    };

    dedent(&rewritten).join("\n")
}

/// Slice the span, widened to its line start when only indentation precedes it.
fn span_text(source: &str, span: SourceSpan) -> &str {
    let end = span.byte_end.min(source.len());
    let start = span.byte_start.min(end);
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return "";
    }

    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..start];
    if prefix.chars().all(char::is_whitespace) {
        &source[line_start..end]
    } else {
        &source[start..end]
    }
}

fn trim_blank_lines(lines: Vec<&str>) -> Vec<&str> {
    let first = lines.iter().position(|l| !is_blank(l));
    let last = lines.iter().rposition(|l| !is_blank(l));
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].to_vec(),
        _ => Vec::new(),
    }
}

/// Keep everything up to the first opening brace, then a stub body.
///
/// Declarations without a block body (fields, expression-bodied members) keep
/// their signature and get the same stub.
fn block_structure(lines: &[&str]) -> Vec<String> {
    let Some(first) = lines.first() else {
        return Vec::new();
    };
    let indent = leading_whitespace(first);

    let mut out: Vec<String> = match code_braces(lines).into_iter().find(|b| b.brace == '{') {
        Some(open) => {
            let mut head: Vec<String> = lines[..open.row].iter().map(|l| l.to_string()).collect();
            head.push(lines[open.row][..=open.col].to_string());
            head
        }
        None => {
            let mut head = signature(lines);
            head.push(format!("{indent}{{"));
            head
        }
    };
    out.push(format!("{indent}    {ELISION_MARKER}"));
    out.push(format!("{indent}}}"));
    out
}

/// Lines of a brace-less declaration up to its `=>` body or terminating `;`.
fn signature(lines: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    for line in lines {
        if let Some(arrow) = line.find("=>") {
            let head = line[..arrow].trim_end();
            if !is_blank(head) {
                out.push(head.to_string());
            }
            return out;
        }
        out.push(line.trim_end().to_string());
    }
    if let Some(last) = out.last_mut() {
        let trimmed = last.trim_end_matches(';').trim_end().len();
        last.truncate(trimmed);
    }
    out
}

/// Keep only what sits between the first `{` and the last `}`.
fn content_only(lines: &[&str]) -> Vec<String> {
    let braces = code_braces(lines);
    let open = braces.iter().find(|b| b.brace == '{');
    let close = braces.iter().rev().find(|b| b.brace == '}');
    let (Some(open), Some(close)) = (open, close) else {
        return Vec::new();
    };
    let (first, last) = (open.row, close.row);
    let open_at = open.col + 1;
    let close_at = close.col;

    if first == last {
        if close_at <= open_at {
            return Vec::new();
        }
        let inner = &lines[first][open_at..close_at];
        return if is_blank(inner) {
            Vec::new()
        } else {
            vec![inner.trim().to_string()]
        };
    }
    if last < first {
        return Vec::new();
    }

    let mut out = Vec::new();
    let head = &lines[first][open_at..];
    if !is_blank(head) {
        out.push(head.trim().to_string());
    }
    out.extend(lines[first + 1..last].iter().map(|l| l.to_string()));
    let tail = &lines[last][..close_at];
    if !is_blank(tail) {
        out.push(tail.trim_end().to_string());
    }

    trim_blank_lines(out.iter().map(String::as_str).collect())
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// A brace outside comments and string or character literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodeBrace {
    row: usize,
    /// Byte offset within the line
    col: usize,
    brace: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    Str { verbatim: bool },
    Char,
    BlockComment,
}

/// Braces that belong to code, in source order.
///
/// Attribute arguments such as `[Route("api/{id}")]` and interpolation holes
/// are string content and are skipped.
fn code_braces(lines: &[&str]) -> Vec<CodeBrace> {
    let mut out = Vec::new();
    let mut state = Lexeme::Code;

    for (row, line) in lines.iter().enumerate() {
        // Only verbatim strings and block comments continue past a line end
        if matches!(state, Lexeme::Str { verbatim: false } | Lexeme::Char) {
            state = Lexeme::Code;
        }

        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();
            match state {
                Lexeme::Code => match b {
                    b'/' if next == Some(b'/') => break,
                    b'/' if next == Some(b'*') => {
                        state = Lexeme::BlockComment;
                        i += 1;
                    }
                    b'"' => {
                        let verbatim = bytes[..i].ends_with(b"@") || bytes[..i].ends_with(b"@$");
                        state = Lexeme::Str { verbatim };
                    }
                    b'\'' => state = Lexeme::Char,
                    b'{' | b'}' => out.push(CodeBrace {
                        row,
                        col: i,
                        brace: b as char,
                    }),
                    _ => {}
                },
                Lexeme::BlockComment => {
                    if b == b'*' && next == Some(b'/') {
                        state = Lexeme::Code;
                        i += 1;
                    }
                }
                Lexeme::Str { verbatim: true } => {
                    if b == b'"' {
                        if next == Some(b'"') {
                            i += 1;
                        } else {
                            state = Lexeme::Code;
                        }
                    }
                }
                Lexeme::Str { verbatim: false } | Lexeme::Char => match b {
                    b'\\' => i += 1,
                    b'"' if state != Lexeme::Char => state = Lexeme::Code,
                    b'\'' if state == Lexeme::Char => state = Lexeme::Code,
                    _ => {}
                },
            }
            i += 1;
        }
    }

    out
}

/// Strip the smallest indentation of the non-blank lines from every line.
pub fn dedent<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let width = lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|l| !is_blank(l))
        .map(|l| leading_whitespace(l).chars().count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            let l = l.as_ref();
            // Blank lines may be shorter than the indentation
            let cut = l.char_indices().nth(width).map_or(l.len(), |(i, _)| i);
            l[cut..].to_string()
        })
        .collect()
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.len() - line.trim_start().len();
    &line[..end]
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(source: &str) -> SourceSpan {
        SourceSpan::new(0, source.len())
    }

    #[test]
    fn full_member_trims_and_dedents() {
        let source = "\n\n    void Run()\n    {\n        Go();\n    }\n\n";
        let text = extract_span(source, whole(source), ExtractionMode::FullMember);
        assert_eq!(text, "void Run()\n{\n    Go();\n}");
    }

    #[test]
    fn span_widens_to_indentation() {
        let source = "class A\n{\n    void Run()\n    {\n    }\n}\n";
        let start = source.find("void").unwrap();
        let end = source.rfind("    }").unwrap() + 5;
        let text = extract_span(source, SourceSpan::new(start, end), ExtractionMode::FullMember);
        assert_eq!(text, "void Run()\n{\n}");
    }

    #[test]
    fn block_structure_collapses_body() {
        let source = "    public void Method()\n    {\n        // some content\n        Work();\n    }";
        let text = extract_span(source, whole(source), ExtractionMode::BlockStructureOnly);
        assert_eq!(text, "public void Method()\n{\n    // ...\n}");
        assert_eq!(text.matches(ELISION_MARKER).count(), 1);
    }

    #[test]
    fn block_structure_same_line_brace() {
        let source = "void Method() { Work(); }";
        let text = extract_span(source, whole(source), ExtractionMode::BlockStructureOnly);
        assert_eq!(text, "void Method() {\n    // ...\n}");
    }

    #[test]
    fn block_structure_without_block_body() {
        let cases = [
            ("    public int Count;", "public int Count\n{\n    // ...\n}"),
            (
                "    public int Twice(int x) => x * 2;",
                "public int Twice(int x)\n{\n    // ...\n}",
            ),
            (
                "public string Name\n    => first + last;",
                "public string Name\n{\n    // ...\n}",
            ),
        ];
        for (source, expected) in cases {
            let text = extract_span(source, whole(source), ExtractionMode::BlockStructureOnly);
            assert_eq!(text, expected, "source {source:?}");
            assert!(text.ends_with('}'));
            assert_eq!(text.matches(ELISION_MARKER).count(), 1);
        }
    }

    #[test]
    fn braces_in_attributes_and_literals_are_skipped() {
        let source = "[Route(\"api/{id}\")]\npublic string Get(char c = '{')\n{\n    return \"}\"; // }\n}";

        let stub = extract_span(source, whole(source), ExtractionMode::BlockStructureOnly);
        assert_eq!(
            stub,
            "[Route(\"api/{id}\")]\npublic string Get(char c = '{')\n{\n    // ...\n}"
        );

        let body = extract_span(source, whole(source), ExtractionMode::ContentOnly);
        assert_eq!(body, "return \"}\"; // }");
    }

    #[test]
    fn verbatim_strings_span_lines() {
        let source = "void Run()\n{\n    var s = @\"{\n    }\";\n}";
        let body = extract_span(source, whole(source), ExtractionMode::ContentOnly);
        assert_eq!(body, "var s = @\"{\n}\";");
    }

    #[test]
    fn content_only_keeps_interior() {
        let source = "    void Method()\n    {\n        First();\n\n        Second();\n    }";
        let text = extract_span(source, whole(source), ExtractionMode::ContentOnly);
        assert_eq!(text, "First();\n\nSecond();");
    }

    #[test]
    fn content_only_keeps_text_on_brace_lines() {
        let source = "void Method() { First();\n    Second(); }";
        let text = extract_span(source, whole(source), ExtractionMode::ContentOnly);
        assert_eq!(text, "First();\n    Second();");
    }

    #[test]
    fn content_only_empty_cases() {
        for source in ["remove { }", "int Count;", "get;"] {
            assert_eq!(
                extract_span(source, whole(source), ExtractionMode::ContentOnly),
                "",
                "source {source:?}"
            );
        }
        assert_eq!(
            extract_span("get { return 1; }", whole("get { return 1; }"), ExtractionMode::ContentOnly),
            "return 1;"
        );
    }

    #[test]
    fn multiple_spans_in_source_order() {
        let source = "int A;\nint B;\n";
        let spans = [SourceSpan::new(7, 13), SourceSpan::new(0, 6), SourceSpan::new(0, 6)];
        let text = extract_spans(source, &spans, ExtractionMode::FullMember);
        assert_eq!(text, "int A;\n\nint B;");
    }

    #[test]
    fn dedent_keeps_relative_indentation() {
        let lines = ["    a", "      b", "", "    c"];
        assert_eq!(dedent(&lines), vec!["a", "  b", "", "c"]);
    }
}
