use crate::fetcher::Fetcher;
use crate::parser::{FragmentOptions, PageParser};
use crate::traits::SourceAdapter;
use crate::types::{FetchConfig, Result};
use async_trait::async_trait;
use tracing::info;

/// A public course page where the schedule is a plain element, usually a
/// `<table>`, that can be lifted out as-is.
pub struct StaticTableSource {
    pub url: String,
    pub selector: String,
    fetcher: Fetcher,
}

impl StaticTableSource {
    pub fn new(url: impl Into<String>, selector: impl Into<String>, fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            selector: selector.into(),
            fetcher: Fetcher::new(fetch_config)?,
        })
    }
}

#[async_trait]
impl SourceAdapter for StaticTableSource {
    fn source_name(&self) -> String {
        crate::utils::url::extract_domain(&self.url)
            .map(|domain| format!("Static page ({})", domain))
            .unwrap_or_else(|| "Static page".to_string())
    }

    async fn fetch(&self) -> Result<String> {
        let page = self.fetcher.fetch_page(&self.url).await?;
        let fragment = PageParser::new(&page).fragment(&self.selector, FragmentOptions::default())?;
        info!("Extracted {:?} from {} ({} bytes)", self.selector, self.url, fragment.len());
        Ok(fragment)
    }
}
