//! Markdown host: replaces directive code fences with extracted snippets.
//!
//! A fenced block whose info string contains `[` is a directive such as
//! `` ```csharp[Foo.cs] Bar.Baz ``. Its body is replaced with the snippet and the
//! info string with the language hint. Blocks that fail are left untouched and
//! reported to the build with their line and column.

use crate::build::Build;
use crate::error::ExtractError;
use crate::report::GenerationError;
use crate::rule::ExtractionRule;
use std::path::Path;

/// An opening code fence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence<'a> {
    indent: usize,
    marker: char,
    width: usize,
    info: &'a str,
    /// Byte offset of `info` within the line
    info_offset: usize,
}

/// Render one Markdown document, substituting every directive block.
pub fn render(markdown: &str, document: &Path, build: &mut Build) -> String {
    let document_dir = document.parent().filter(|p| !p.as_os_str().is_empty());
    let lines: Vec<&str> = markdown.split_inclusive('\n').collect();
    let mut out = String::with_capacity(markdown.len());

    let mut i = 0;
    while i < lines.len() {
        let Some(fence) = opening_fence(lines[i]) else {
            out.push_str(lines[i]);
            i += 1;
            continue;
        };

        let close = (i + 1..lines.len()).find(|&j| is_closing_fence(lines[j], &fence));
        let end = close.map_or(lines.len(), |j| j + 1);

        if !fence.info.contains('[') {
            lines[i..end].iter().for_each(|l| out.push_str(l));
            i = end;
            continue;
        }

        match substitute(&fence, document_dir, build) {
            Ok(block) => {
                out.push_str(&block);
                if lines[end - 1].ends_with('\n') || close.is_none() {
                    out.push('\n');
                }
            }
            Err((err, offset)) => {
                let line = lines[i];
                let column = line[..offset.min(line.len())].chars().count() + 1;
                build.record(GenerationError {
                    source_file: document.to_path_buf(),
                    message: err.to_string(),
                    line: i + 1,
                    column,
                });
                lines[i..end].iter().for_each(|l| out.push_str(l));
            }
        }
        i = end;
    }

    out
}

/// Build the replacement block; on failure return the error with the byte
/// offset in the fence line it should be reported at.
fn substitute(
    fence: &Fence<'_>,
    document_dir: Option<&Path>,
    build: &mut Build,
) -> Result<String, (ExtractError, usize)> {
    let rule = ExtractionRule::parse(fence.info).map_err(|e| (e.into(), fence.info_offset))?;
    let snippet = build
        .extract_rule(&rule, document_dir)
        .map_err(|e| (e, fence.info_offset + rule.selector_offset()))?;

    let indent = " ".repeat(fence.indent);
    let marker: String = std::iter::repeat(fence.marker).take(fence.width).collect();

    let mut info = snippet.language_hint.clone();
    if !snippet.highlight_lines.is_empty() {
        let lines: Vec<String> = snippet.highlight_lines.iter().map(u32::to_string).collect();
        info.push_str(&format!(" {{{}}}", lines.join(",")));
    }

    let mut block = format!("{indent}{marker}{info}\n");
    for line in snippet.text.lines() {
        if !line.is_empty() {
            block.push_str(&indent);
        }
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(&format!("{indent}{marker}"));
    Ok(block)
}

fn opening_fence(line: &str) -> Option<Fence<'_>> {
    let content = line.trim_end_matches(['\n', '\r']);
    let indent = content.len() - content.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }

    let rest = &content[indent..];
    let marker = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let width = rest.len() - rest.trim_start_matches(marker).len();
    if width < 3 {
        return None;
    }

    let after = &rest[width..];
    let info = after.trim();
    if marker == '`' && info.contains('`') {
        return None;
    }
    let info_offset = indent + width + (after.len() - after.trim_start().len());

    Some(Fence {
        indent,
        marker,
        width,
        info,
        info_offset,
    })
}

fn is_closing_fence(line: &str, fence: &Fence<'_>) -> bool {
    let content = line.trim_end_matches(['\n', '\r']);
    let indent = content.len() - content.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }
    let rest = &content[indent..];
    let width = rest.len() - rest.trim_start_matches(fence.marker).len();
    width >= fence.width && rest[width..].trim().is_empty()
}
