use crate::fetcher::{Fetcher, Page};
use crate::parser::PageParser;
use crate::types::{AggregatorError, FetchConfig, Result};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// A form read from the current page, ready to be filled in and submitted.
#[derive(Debug, Clone)]
pub struct Form {
    action: Url,
    method: FormMethod,
    fields: Vec<(String, String)>,
}

impl Form {
    pub fn new(action: Url, method: FormMethod, fields: Vec<(String, String)>) -> Self {
        Self { action, method, fields }
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an existing field. Fails if the form has no field called `name`,
    /// which usually means the site changed its login page.
    pub fn input(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .ok_or_else(|| AggregatorError::protocol(format!("form field {:?}", name), self.action.as_str()))?;
        field.1 = value.to_string();
        Ok(())
    }

    /// Set the first of `names` that exists on the form.
    pub fn input_any(&mut self, names: &[&str], value: &str) -> Result<()> {
        match names.iter().find(|name| self.value(name).is_some()) {
            Some(name) => self.input(name, value),
            None => Err(AggregatorError::protocol(
                format!("form field (any of {})", names.join(", ")),
                self.action.as_str(),
            )),
        }
    }
}

/// A cookie-keeping session for sites that need a login before the course
/// page can be read.
///
/// One browser belongs to one adapter invocation; it is never shared between
/// adapters or reused across aggregation requests.
pub struct Browser {
    fetcher: Fetcher,
    page: Option<Page>,
}

impl Browser {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::with_cookies(config)?,
            page: None,
        })
    }

    pub async fn open(&mut self, url: &str) -> Result<&Page> {
        let page = self.fetcher.fetch_page(url).await?;
        debug!("Browser at {} ({} bytes)", page.url, page.body.len());
        Ok(self.page.insert(page))
    }

    /// The page most recently loaded.
    pub fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| AggregatorError::General("Browser has not opened a page yet".to_string()))
    }

    pub fn parser(&self) -> Result<PageParser> {
        Ok(PageParser::new(self.page()?))
    }

    pub fn form(&self, selector: &str) -> Result<Form> {
        self.parser()?.form(selector)
    }

    pub async fn submit(&mut self, form: Form) -> Result<&Page> {
        debug!("Submitting form to {} ({:?})", form.action, form.method);
        let client = self.fetcher.client();
        let request = match form.method {
            FormMethod::Post => client.post(form.action).form(&form.fields),
            FormMethod::Get => client.get(form.action).query(&form.fields),
        };
        let page = self.fetcher.send(request).await?;
        Ok(self.page.insert(page))
    }
}
