//! Lightweight HTML minification.
//!
//! Each pass is a function `&str -> String` applied in sequence. This is a
//! whitespace/comment squeeze, not an HTML-aware minifier: it does not parse
//! tags and leaves attribute values and inline scripts structurally intact.

use std::sync::LazyLock;

use regex::Regex;

/// Run all minification passes on rendered HTML.
pub fn minify_html(html: &str) -> String {
    let mut result = strip_comments(html);

    result = collapse_blank_lines(&result);
    result = strip_indentation(&result);
    result = collapse_spaces(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Strip comments
// ---------------------------------------------------------------------------

/// Remove HTML comments, keeping IE conditional comments (`<!--[if ...`).
fn strip_comments(html: &str) -> String {
    static COMMENT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

    COMMENT_RE
        .replace_all(html, |caps: &regex::Captures| {
            let comment = &caps[0];
            if comment.starts_with("<!--[if") {
                comment.to_string()
            } else {
                String::new()
            }
        })
        .to_string()
}

// ---------------------------------------------------------------------------
// Pass 2: Collapse blank lines
// ---------------------------------------------------------------------------

/// Collapse two or more consecutive blank lines into one. Lines holding only
/// spaces or tabs count as blank.
fn collapse_blank_lines(html: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("valid regex"));

    MULTI_BLANK_RE.replace_all(html, "\n\n").to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Strip indentation
// ---------------------------------------------------------------------------

/// Remove leading spaces and tabs from every line.
fn strip_indentation(html: &str) -> String {
    static INDENT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^[ \t]+").expect("valid regex"));

    INDENT_RE.replace_all(html, "").to_string()
}

// ---------------------------------------------------------------------------
// Pass 4: Collapse horizontal whitespace
// ---------------------------------------------------------------------------

/// Replace runs of 2+ spaces/tabs with one space.
fn collapse_spaces(html: &str) -> String {
    static SPACES_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));

    SPACES_RE.replace_all(html, " ").to_string()
}
