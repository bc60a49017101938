//! User input sanitization.
//!
//! Stored values go through [`text()`] (or [`url()`] for links) once, at the
//! domain boundary. [`escape()`] is for rendering untrusted text into an HTML
//! context and is independent of the storage-side filtering.

use std::sync::LazyLock;

use regex::Regex;

/// Regular expression matching opening and closing HTML tags that must never
/// reach storage (`<script>`, `<iframe>`, `<svg>` and the like).
static DANGEROUS_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<\s*/?\s*(script|iframe|object|embed|form|input|link|meta|style|base|svg|math|details|marquee)[^>]*>",
    )
    .expect("valid regex")
});

/// Regular expression matching inline event handler attributes
/// (`onclick="..."`, `onerror='...'`).
static EVENT_HANDLERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on\w+\s*=\s*["'][^"']*["']"#).expect("valid regex")
});

/// Regular expression matching a `javascript:` scheme, with optional
/// whitespace before the colon.
static JAVASCRIPT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("valid regex"));

/// Regular expression matching a `data:text/html` payload.
static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)data\s*:\s*text/html").expect("valid regex")
});

/// Regular expression matching a CSS `expression(` construct.
static EXPRESSION_CSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expression\s*\(").expect("valid regex"));

/// Strips dangerous constructs out of the provided free-form `input` and
/// trims surrounding whitespace.
///
/// The result keeps ordinary markup characters intact, so it is storage-safe
/// but not display-safe. Escape with [`escape()`] when rendering.
///
/// Each pattern is applied in a single pass, so payloads split across a
/// removed region can reassemble (`<scr<script>ipt>` comes out as
/// `<script>`), and only quoted event handler attributes are matched. Both
/// behaviors match the original filter this one replaces; [`escape()`] at
/// render time is the backstop.
#[must_use]
pub fn text(input: &str) -> String {
    let out = DANGEROUS_TAGS.replace_all(input, "");
    let out = EVENT_HANDLERS.replace_all(&out, "");
    let out = JAVASCRIPT_URI.replace_all(&out, "");
    let out = DATA_URI.replace_all(&out, "");
    let out = EXPRESSION_CSS.replace_all(&out, "");
    out.trim().to_owned()
}

/// Escapes the provided `input` for interpolation into an HTML context.
///
/// Replaces `&`, `<`, `>`, `"`, `'` and `/` with their HTML entities.
#[must_use]
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Sanitizes the provided `input` as a URL.
///
/// Only `http://`, `https://` and `mailto:` URLs are admitted. Anything
/// else (including `javascript:` and `data:text/html` payloads smuggled
/// into an otherwise valid URL) collapses to an empty string.
#[must_use]
pub fn url(input: &str) -> String {
    /// Regular expression matching the allowed URL schemes.
    static ALLOWED_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)^(https?://|mailto:)").expect("valid regex")
    });

    let trimmed = input.trim();
    if !ALLOWED_SCHEME.is_match(trimmed) {
        return String::new();
    }

    let out = JAVASCRIPT_URI.replace_all(trimmed, "");
    let out = DATA_URI.replace_all(&out, "");
    out.into_owned()
}

#[cfg(test)]
mod text_spec {
    use super::text;

    #[test]
    fn removes_script_tags() {
        assert_eq!(text("<script>alert(1)</script>hello"), "alert(1)hello");
        assert_eq!(text("<ScRiPt src=x>payload</sCrIpT>"), "payload");
    }

    #[test]
    fn removes_tags_with_inner_whitespace() {
        assert_eq!(text("< script >x</ script >"), "x");
    }

    #[test]
    fn removes_event_handlers() {
        assert_eq!(
            text(r#"<img src=x onerror="alert(1)">"#),
            "<img src=x>",
        );
        assert_eq!(
            text(r"<a href=x onClick='go()'>link</a>"),
            "<a href=x>link</a>",
        );
    }

    #[test]
    fn removes_javascript_and_data_uris() {
        assert_eq!(text("javascript:alert(1)"), "alert(1)");
        assert_eq!(text("JaVaScRiPt  :alert(1)"), "alert(1)");
        assert_eq!(text("data : text/html,<p>"), ",<p>");
    }

    #[test]
    fn removes_css_expressions() {
        assert_eq!(text("width: expression (alert(1))"), "width: alert(1))");
    }

    #[test]
    fn trims_and_keeps_plain_text() {
        assert_eq!(text("  Analyse II, chapitre 3  "), "Analyse II, chapitre 3");
        assert_eq!(text("a < b && b > c"), "a < b && b > c");
    }

    #[test]
    fn output_is_stable_under_resanitization() {
        for input in [
            "<script>alert(1)</script>hello",
            r#"<img src=x onerror="alert(1)">"#,
            "javascript:alert(1)",
            "data : text/html,<p>",
            "  Analyse II, chapitre 3  ",
        ] {
            let once = text(input);
            assert_eq!(text(&once), once, "for input `{input}`");
        }
    }
}

#[cfg(test)]
mod escape_spec {
    use super::escape;

    #[test]
    fn escapes_html_significant_characters() {
        assert_eq!(
            escape(r#"<a href="/x">&'"#),
            "&lt;a href=&quot;&#x2F;x&quot;&gt;&amp;&#x27;",
        );
    }

    #[test]
    fn keeps_plain_text_intact() {
        assert_eq!(escape("révision du chapitre 3"), "révision du chapitre 3");
    }
}

#[cfg(test)]
mod url_spec {
    use super::url;

    #[test]
    fn admits_http_https_and_mailto() {
        assert_eq!(url("https://example.com/a"), "https://example.com/a");
        assert_eq!(url("  http://example.com  "), "http://example.com");
        assert_eq!(url("MAILTO:prof@example.com"), "MAILTO:prof@example.com");
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(url("javascript:alert(1)"), "");
        assert_eq!(url("ftp://example.com"), "");
        assert_eq!(url("//example.com"), "");
        assert_eq!(url(""), "");
    }

    #[test]
    fn strips_smuggled_payloads() {
        assert_eq!(
            url("https://example.com/?u=javascript:alert(1)"),
            "https://example.com/?u=alert(1)",
        );
    }
}
