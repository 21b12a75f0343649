/// HTML escaping for text we generate ourselves (not for scraped markup,
/// which goes through the sanitizer instead)
pub mod html {
    /// Escape text for use between tags
    pub fn escape_text(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Escape text for use inside a double-quoted attribute value
    pub fn escape_attr(value: &str) -> String {
        escape_text(value).replace('"', "&quot;")
    }
}

/// String helpers for pulling values out of semi-structured page text
pub mod text {
    /// The text between the first `start` and the next `end` after it.
    pub fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
        let (_, rest) = text.split_once(start)?;
        let (inner, _) = rest.split_once(end)?;
        Some(inner)
    }

    /// Everything after the first `marker`, cut at `terminator` when present.
    pub fn after_marker<'a>(text: &'a str, marker: &str, terminator: &str) -> Option<&'a str> {
        let (_, rest) = text.split_once(marker)?;
        Some(rest.split_once(terminator).map_or(rest, |(payload, _)| payload))
    }
}

/// URL utilities
pub mod url {
    use ::url::Url;

    /// Extract domain from URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str).ok()?.domain().map(|d| d.to_string())
    }
}
