use crate::traits::Sanitize;
use ammonia::Builder;
use tracing::debug;

/// Allow-list sanitizer for scraped course fragments.
///
/// Starts from ammonia's default safe set (tables, lists, links, inline
/// formatting), then permits `class`/`style` on every element and the legacy
/// `<font>` element that old course pages still use for colouring. Scripts,
/// `<style>` blocks and `on*` handlers never survive.
#[derive(Debug)]
pub struct HtmlSanitizer {
    policy: Builder<'static>,
}

impl HtmlSanitizer {
    pub fn new() -> Self {
        Self { policy: Self::policy() }
    }

    fn policy() -> Builder<'static> {
        let mut builder = Builder::default();
        builder
            .add_tags(["font"])
            .add_tag_attributes("font", ["color", "face", "size"])
            .add_generic_attributes(["class", "style"]);
        builder
    }
}

impl Default for HtmlSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitize for HtmlSanitizer {
    fn sanitize(&self, raw_html: &str) -> String {
        let clean = self.policy.clean(raw_html).to_string();
        debug!("Sanitized fragment: {} -> {} bytes", raw_html.len(), clean.len());
        clean
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_and_handlers() {
        let clean = HtmlSanitizer::new()
            .sanitize(r#"<table onclick="x()"><tr><td>A1</td></tr></table><script>alert(1)</script>"#);
        assert!(clean.contains("<td>A1</td>"));
        assert!(!clean.contains("script"));
        assert!(!clean.contains("onclick"));
    }

    #[test]
    fn keeps_font_and_styling() {
        let clean = HtmlSanitizer::new()
            .sanitize(r#"<p class="homework" style="color: red"><font color="red">Due</font></p>"#);
        assert!(clean.contains(r#"<font color="red">Due</font>"#));
        assert!(clean.contains(r#"class="homework""#));
        assert!(clean.contains(r#"style="color: red""#));
    }

    #[test]
    fn one_sanitizer_serves_many_fragments() {
        let sanitizer = HtmlSanitizer::default();
        let first = sanitizer.sanitize(r#"<p onclick="x()">one</p>"#);
        let second = sanitizer.sanitize("<p>two</p><script>alert(2)</script>");
        assert_eq!(first, "<p>one</p>");
        assert_eq!(second, "<p>two</p>");
    }
}
