use crate::browser::{Form, FormMethod};
use crate::fetcher::Page;
use crate::types::{AggregatorError, Result};
use crate::utils::{html, text};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

/// Layout attributes old course pages put on their tables. They fight the
/// page stylesheet, so they are dropped from extracted fragments.
const PRESENTATIONAL_ATTRS: [&str; 5] = ["border", "cellspacing", "cellpadding", "width", "rules"];

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Options for [`PageParser::fragment`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentOptions {
    pub remove_images: bool,
}

impl FragmentOptions {
    pub fn without_images() -> Self {
        Self { remove_images: true }
    }
}

/// Read-only view over one fetched HTML document.
///
/// `Html` is not `Send`, so a parser must not be held across an `.await`;
/// parse, extract owned values, drop.
pub struct PageParser {
    document: Html,
    base_url: Url,
}

impl PageParser {
    pub fn new(page: &Page) -> Self {
        Self::parse(&page.body, page.url.clone())
    }

    pub fn parse(body: &str, base_url: Url) -> Self {
        debug!("Parsing page content ({} bytes) from {}", body.len(), base_url);
        Self {
            document: Html::parse_document(body),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| AggregatorError::General(format!("Invalid selector {:?}: {:?}", selector, e)))
    }

    fn first(&self, selector: &str) -> Result<ElementRef<'_>> {
        let parsed = Self::selector(selector)?;
        self.document
            .select(&parsed)
            .next()
            .ok_or_else(|| AggregatorError::protocol(format!("element {:?}", selector), self.base_url.as_str()))
    }

    /// Outer HTML of the first element matching `selector`, with every link
    /// made absolute against the page URL and table layout attributes removed.
    pub fn fragment(&self, selector: &str, options: FragmentOptions) -> Result<String> {
        let root = self.first(selector)?;
        let mut out = String::new();
        self.write_element(&mut out, root, options, true);
        Ok(out)
    }

    /// Value of `attr` on the first element matching `selector`.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Result<String> {
        let element = self.first(selector)?;
        element
            .value()
            .attr(attr)
            .map(str::to_string)
            .ok_or_else(|| {
                AggregatorError::protocol(format!("{} attribute on {:?}", attr, selector), self.base_url.as_str())
            })
    }

    /// Same as [`first_attr`](Self::first_attr), resolved against the page URL.
    pub fn first_link(&self, selector: &str) -> Result<Url> {
        let href = self.first_attr(selector, "href")?;
        Ok(self.base_url.join(&href)?)
    }

    /// Concatenated text of the first element matching `selector`.
    pub fn text_of(&self, selector: &str) -> Result<String> {
        Ok(self.first(selector)?.text().collect())
    }

    /// The part of the first `<script>` containing `marker` that follows it,
    /// up to `terminator`.
    pub fn script_payload(&self, marker: &str, terminator: &str) -> Result<String> {
        let scripts = Self::selector("script")?;
        self.document
            .select(&scripts)
            .map(|script| script.text().collect::<String>())
            .find_map(|body| text::after_marker(&body, marker, terminator).map(str::to_string))
            .ok_or_else(|| AggregatorError::protocol(format!("script marker {:?}", marker.trim()), self.base_url.as_str()))
    }

    /// Read the first form matching `selector` with its current field values.
    pub fn form(&self, selector: &str) -> Result<Form> {
        let form = self.first(selector)?;
        let action = match form.value().attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => self.base_url.join(action)?,
            _ => self.base_url.clone(),
        };
        let method = match form.value().attr("method") {
            Some(method) if method.eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        };

        let fields_selector = Self::selector("input[name], textarea[name], select[name]")?;
        let mut fields = Vec::new();
        for field in form.select(&fields_selector) {
            let element = field.value();
            let Some(name) = element.attr("name") else { continue };
            let value = match element.name() {
                "textarea" => field.text().collect::<String>(),
                "select" => Self::selected_option(field)?,
                _ => {
                    let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                    match kind.as_str() {
                        "submit" | "button" | "reset" | "image" | "file" => continue,
                        "checkbox" | "radio" if element.attr("checked").is_none() => continue,
                        "checkbox" | "radio" => element.attr("value").unwrap_or("on").to_string(),
                        _ => element.attr("value").unwrap_or_default().to_string(),
                    }
                }
            };
            fields.push((name.to_string(), value));
        }

        debug!("Found form {:?} -> {} with {} fields", selector, action, fields.len());
        Ok(Form::new(action, method, fields))
    }

    fn selected_option(select: ElementRef<'_>) -> Result<String> {
        let options = Self::selector("option")?;
        let mut first = None;
        for option in select.select(&options) {
            let value = option
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| option.text().collect());
            if option.value().attr("selected").is_some() {
                return Ok(value);
            }
            first.get_or_insert(value);
        }
        Ok(first.unwrap_or_default())
    }

    fn write_element(&self, out: &mut String, element: ElementRef<'_>, options: FragmentOptions, is_root: bool) {
        let value = element.value();
        let name = value.name();
        let strip_layout = is_root || name == "table";

        out.push('<');
        out.push_str(name);
        for (attr, attr_value) in value.attrs() {
            if strip_layout && PRESENTATIONAL_ATTRS.contains(&attr) {
                continue;
            }
            let attr_value = if name == "a" && attr == "href" {
                self.absolute_href(attr_value)
            } else {
                attr_value.to_string()
            };
            out.push(' ');
            out.push_str(attr);
            out.push_str("=\"");
            out.push_str(&html::escape_attr(&attr_value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&name) {
            return;
        }

        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(&html::escape_text(text)),
                Node::Element(child_element) => {
                    if options.remove_images && child_element.name() == "img" {
                        continue;
                    }
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        self.write_element(out, child_ref, options, false);
                    }
                }
                _ => {}
            }
        }

        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    fn absolute_href(&self, href: &str) -> String {
        match self.base_url.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                warn!("Failed to resolve href {:?} against {}: {}", href, self.base_url, e);
                href.to_string()
            }
        }
    }
}
