//! Turns raw tweet text into HTML with linked URLs, @mentions and #hashtags.
//!
//! The text is split into typed spans and each pass (URLs, then mentions,
//! then hashtags) only looks at plain `Text` spans, so nothing inside a link
//! is linked twice. An anchor already present in the input is carried through
//! untouched only when it is exactly the anchor this module would emit for
//! its label (for example the output of a previous run), which makes
//! [`annotate`] idempotent on its own output. Any other markup is escaped.

use crate::config::{expand, LinkTemplates};
use once_cell::sync::Lazy;
use regex::Regex;

static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="([^"<>]*)">([^<>]*)</a>"#).expect("anchor regex pattern is valid")
});

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?|s?ftp|ssh)://[^"\s<>]*[^.,;'">:\s<>)\]!]"#)
        .expect("URL regex pattern is valid")
});

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("mention regex pattern is valid"));

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("hashtag regex pattern is valid"));

/// Escaped forms of characters that can never appear inside a URL.
const ESCAPED_DELIMITERS: [&str; 6] = ["&quot;", "&#34;", "&lt;", "&gt;", "&#39;", "&apos;"];

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', '\'', '"', ':', '!', ')', ']', '>'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    /// A pre-existing anchor element, emitted verbatim.
    Markup(String),
    Url(String),
    Mention(String),
    Hashtag(String),
}

impl Span {
    /// Last character of the source text this span covers.
    fn last_char(&self) -> Option<char> {
        match self {
            Span::Text(s) | Span::Markup(s) | Span::Url(s) | Span::Mention(s) | Span::Hashtag(s) => {
                s.chars().next_back()
            }
        }
    }
}

/// Annotate `text` with the given link templates.
pub fn annotate(text: &str, templates: &LinkTemplates) -> String {
    render_spans(&spans(text, templates), templates)
}

pub fn annotate_default(text: &str) -> String {
    annotate(text, &LinkTemplates::default())
}

/// Split `text` into spans: existing anchors, then URLs, mentions and hashtags.
/// `templates` decide which existing anchors are recognized as already linked.
pub fn spans(text: &str, templates: &LinkTemplates) -> Vec<Span> {
    let spans = split_anchors(text, templates);
    let spans = split_text(spans, find_url);
    let spans = split_text(spans, |text, from, prev| {
        find_tagged(&MENTION_RE, text, from, prev, false).map(|(s, e, h)| (s, e, Span::Mention(h)))
    });
    split_text(spans, |text, from, prev| {
        find_tagged(&HASHTAG_RE, text, from, prev, true).map(|(s, e, t)| (s, e, Span::Hashtag(t)))
    })
}

pub fn render_spans(spans: &[Span], templates: &LinkTemplates) -> String {
    let mut out = String::new();
    for span in spans {
        match span {
            Span::Text(text) => out.push_str(&escape_html(text)),
            Span::Markup(markup) => out.push_str(markup),
            Span::Mention(_) => {
                out.push('@');
                out.push_str(&anchor_for(span, templates).unwrap_or_default());
            }
            Span::Url(_) | Span::Hashtag(_) => {
                out.push_str(&anchor_for(span, templates).unwrap_or_default());
            }
        }
    }
    out
}

/// The `<a>` element emitted for a link span. A mention's leading `@` stays
/// outside the anchor.
fn anchor_for(span: &Span, templates: &LinkTemplates) -> Option<String> {
    let (href, label) = match span {
        Span::Text(_) | Span::Markup(_) => return None,
        Span::Url(url) => (
            expand(&templates.url_template, &[("url", url.as_str())]),
            escape_html(url),
        ),
        Span::Mention(handle) => {
            let encoded = urlencoding::encode(handle);
            (
                expand(&templates.mention_template, &[("handle", encoded.as_ref())]),
                escape_html(handle),
            )
        }
        Span::Hashtag(tag) => {
            let encoded = urlencoding::encode(tag);
            (
                expand(&templates.hashtag_template, &[("tag", encoded.as_ref())]),
                format!("#{}", escape_html(tag)),
            )
        }
    };
    Some(format!("<a href=\"{}\">{}</a>", escape_html(&href), label))
}

/// Escape HTML metacharacters, leaving existing entity references alone so
/// already-escaped text is not escaped twice.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        match c {
            '&' if starts_with_entity(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether `s` starts with a character reference (`&amp;`, `&#39;`, `&#x27;`).
fn starts_with_entity(s: &str) -> bool {
    let Some(body) = s.strip_prefix('&') else {
        return false;
    };
    let prefix = if body.starts_with("#x") || body.starts_with("#X") {
        2
    } else if body.starts_with('#') {
        1
    } else if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        0
    } else {
        return false;
    };
    let valid = |c: char| match prefix {
        2 => c.is_ascii_hexdigit(),
        1 => c.is_ascii_digit(),
        _ => c.is_ascii_alphanumeric(),
    };

    let name = &body[prefix..];
    let len = name.find(|c: char| !valid(c)).unwrap_or(name.len());
    len > 0 && name[len..].starts_with(';')
}

fn split_anchors(text: &str, templates: &LinkTemplates) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;
    for caps in ANCHOR_RE.captures_iter(text) {
        let whole = caps.get(0).expect("capture group 0 always matches");
        if !is_own_anchor(whole.as_str(), &caps[2], templates) {
            continue;
        }
        if whole.start() > last {
            spans.push(Span::Text(text[last..whole.start()].to_string()));
        }
        spans.push(Span::Markup(whole.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::Text(text[last..].to_string()));
    }
    spans
}

/// Whether `anchor` is byte-for-byte what [`anchor_for`] emits for `label`.
fn is_own_anchor(anchor: &str, label: &str, templates: &LinkTemplates) -> bool {
    let is_word = |s: &str| !s.is_empty() && s.chars().all(is_word_char);

    let span = match label.strip_prefix('#') {
        Some(tag) if is_word(tag) => Span::Hashtag(tag.to_string()),
        _ if is_word(label) => Span::Mention(label.to_string()),
        _ => {
            let url = unescape_html(label);
            match find_url(&url, 0, None) {
                Some((0, end, found)) if end == url.len() => found,
                _ => return false,
            }
        }
    };

    anchor_for(&span, templates).as_deref() == Some(anchor)
}

/// Reverse of the escapes [`escape_html`] produces.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Run `find` over every `Text` span, splitting out whatever it matches.
/// `find(text, from, prev)` returns `(start, end, span)` of the next match at
/// or after `from`; `prev` is the character preceding `text` in the source.
fn split_text<F>(spans: Vec<Span>, find: F) -> Vec<Span>
where
    F: Fn(&str, usize, Option<char>) -> Option<(usize, usize, Span)>,
{
    let mut out = Vec::with_capacity(spans.len());
    let mut prev = None;

    for span in spans {
        let next_prev = span.last_char().or(prev);
        let text = match span {
            Span::Text(text) => text,
            other => {
                out.push(other);
                prev = next_prev;
                continue;
            }
        };

        let mut last = 0;
        let mut from = 0;
        while let Some((start, end, found)) = find(&text, from, prev) {
            if start > last {
                out.push(Span::Text(text[last..start].to_string()));
            }
            out.push(found);
            last = end;
            from = end;
        }
        if last < text.len() {
            out.push(Span::Text(text[last..].to_string()));
        }
        prev = next_prev;
    }

    out
}

fn find_url(text: &str, start_at: usize, _prev: Option<char>) -> Option<(usize, usize, Span)> {
    let mut from = start_at;
    while let Some(m) = URL_RE.find_at(text, from) {
        let mut url = m.as_str();
        // The pattern may have trimmed the `;` of an escaped delimiter, so look
        // past the end of the match.
        let tail = &text[m.start()..];
        if let Some(cut) = ESCAPED_DELIMITERS
            .iter()
            .filter_map(|d| tail.find(d))
            .filter(|&i| i < url.len())
            .min()
        {
            url = url[..cut].trim_end_matches(TRAILING_PUNCTUATION);
        }

        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());
        if has_host {
            return Some((m.start(), m.start() + url.len(), Span::Url(url.to_string())));
        }
        from = m.end();
    }
    None
}

/// Find the next `@handle` / `#tag` at or after `from` whose marker is not
/// glued to a preceding word character.
fn find_tagged(
    re: &Regex,
    text: &str,
    start_at: usize,
    prev: Option<char>,
    skip_char_refs: bool,
) -> Option<(usize, usize, String)> {
    let mut from = start_at;
    while let Some(caps) = re.captures_at(text, from) {
        let whole = caps.get(0).expect("capture group 0 always matches");
        let before = text[..whole.start()].chars().next_back().or(prev);
        let glued = before.is_some_and(is_word_char);
        // `&#39;` is a character reference, but a bare `&#tag` is a hashtag.
        let in_entity = skip_char_refs
            && before == Some('&')
            && whole.start() > 0
            && starts_with_entity(&text[whole.start() - 1..]);
        if !glued && !in_entity {
            return Some((whole.start(), whole.end(), caps[1].to_string()));
        }
        from = whole.end();
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
