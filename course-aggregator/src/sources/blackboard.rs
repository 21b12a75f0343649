use crate::browser::Browser;
use crate::config::Credentials;
use crate::parser::FragmentOptions;
use crate::traits::SourceAdapter;
use crate::types::{AggregatorError, FetchConfig, Result};
use crate::utils::text;
use async_trait::async_trait;
use tracing::{debug, info};

const CONTENT_LIST_SELECTOR: &str = "ul#content_listContainer";

/// A Blackboard course content list behind a CWL single sign-on.
///
/// The login is a fixed sequence: the course page links to the SSO entry
/// point, which hides the real login URL in a `<noscript>` block; the login
/// form is followed by a SAML relay form that has to be posted back before
/// the course page can be reopened with a session.
pub struct BlackboardSource {
    pub course_url: String,
    credentials: Credentials,
    fetch_config: FetchConfig,
}

impl BlackboardSource {
    pub fn new(course_url: impl Into<String>, credentials: Credentials, fetch_config: FetchConfig) -> Self {
        Self {
            course_url: course_url.into(),
            credentials,
            fetch_config,
        }
    }

    async fn log_in(&self, browser: &mut Browser) -> Result<()> {
        browser.open(&self.course_url).await?;

        // Step 1: the course page bounces anonymous users through a link.
        let redirect = browser.parser()?.first_link("a")?;
        debug!("Following login redirect to {}", redirect);
        browser.open(redirect.as_str()).await?;

        // Step 2: the SSO page only exposes the next hop to non-JS clients.
        let next_hop = {
            let parser = browser.parser()?;
            let noscript = parser.text_of("noscript")?;
            let href = text::between(&noscript, "href=\"", "\"")
                .ok_or_else(|| AggregatorError::protocol("redirect link in <noscript>", parser.base_url().as_str()))?;
            parser.base_url().join(href)?
        };
        debug!("Following noscript redirect to {}", next_hop);
        browser.open(next_hop.as_str()).await?;

        // Step 3: the CWL login form. Field names differ between IdP versions.
        let mut form = browser.form("form")?;
        form.input_any(&["username", "j_username"], &self.credentials.username)?;
        form.input_any(&["password", "j_password"], &self.credentials.password)?;
        browser.submit(form).await?;

        // Step 4: post the SAML response back to Blackboard.
        let relay = browser.form("form")?;
        let page = browser.submit(relay).await?;
        debug!("SAML relay landed on {}", page.url);
        Ok(())
    }
}

#[async_trait]
impl SourceAdapter for BlackboardSource {
    fn source_name(&self) -> String {
        "Blackboard (CWL)".to_string()
    }

    async fn fetch(&self) -> Result<String> {
        if !self.credentials.is_configured() {
            return Err(AggregatorError::protocol("CWL credentials", &self.course_url));
        }

        let mut browser = Browser::new(self.fetch_config.clone())?;
        self.log_in(&mut browser).await?;

        browser.open(&self.course_url).await?;
        let fragment = browser
            .parser()?
            .fragment(CONTENT_LIST_SELECTOR, FragmentOptions::without_images())?;

        info!("Extracted Blackboard content list from {}", self.course_url);
        Ok(fragment)
    }
}
