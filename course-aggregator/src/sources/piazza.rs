use crate::browser::Browser;
use crate::config::Credentials;
use crate::parser::PageParser;
use crate::traits::SourceAdapter;
use crate::types::{AggregatorError, FetchConfig, Result};
use crate::utils::html::{escape_attr, escape_text};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

pub const PIAZZA_LOGIN_URL: &str = "https://piazza.com/account/login";

/// The resources page inlines its data as `this.resource_data        = [...];`.
const RESOURCE_MARKER: &str = "this.resource_data        = ";
const RESOURCE_TERMINATOR: &str = ";\n";

/// Section name of resources that are assignments.
const HOMEWORK_SECTION: &str = "homework";

/// One entry of the inlined resource list.
#[derive(Debug, Clone, Deserialize)]
pub struct PiazzaResource {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub config: ResourceConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub date: String,
}

/// Homework listed on a Piazza class's resources page. Requires a login.
pub struct PiazzaResourceSource {
    pub login_url: String,
    pub resources_url: String,
    credentials: Credentials,
    fetch_config: FetchConfig,
}

impl PiazzaResourceSource {
    pub fn new(resources_url: impl Into<String>, credentials: Credentials, fetch_config: FetchConfig) -> Self {
        Self {
            login_url: PIAZZA_LOGIN_URL.to_string(),
            resources_url: resources_url.into(),
            credentials,
            fetch_config,
        }
    }

    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Parse the inlined resource JSON and render the homework as a table.
    pub fn render_homework(payload: &str) -> Result<String> {
        let resources: Vec<PiazzaResource> = serde_json::from_str(payload.trim())?;
        let homework: Vec<&PiazzaResource> = resources
            .iter()
            .filter(|resource| resource.config.section == HOMEWORK_SECTION)
            .collect();
        debug!("{} of {} resources are homework", homework.len(), resources.len());

        let mut html = String::from(
            "<table>\n<thead>\n<tr>\n<th>Assignment</th>\n<th>Out</th>\n<th>Due</th>\n</tr>\n</thead>\n<tbody>",
        );
        for resource in homework {
            html.push_str(&format!(
                "\n<tr>\n<td><a href=\"{}\">{}</a></td>\n<td>{}</td>\n<td>{}</td>\n</tr>",
                escape_attr(&resource.content),
                escape_text(&resource.subject),
                escape_text(&resource.created),
                escape_text(&resource.config.date),
            ));
        }
        html.push_str("\n</tbody></table>");
        Ok(html)
    }
}

#[async_trait]
impl SourceAdapter for PiazzaResourceSource {
    fn source_name(&self) -> String {
        "Piazza resources".to_string()
    }

    async fn fetch(&self) -> Result<String> {
        if !self.credentials.is_configured() {
            return Err(AggregatorError::protocol("Piazza credentials", &self.login_url));
        }

        let mut browser = Browser::new(self.fetch_config.clone())?;
        browser.open(&self.login_url).await?;

        let mut form = browser.form("form#login-form")?;
        form.input("email", &self.credentials.username)?;
        form.input("password", &self.credentials.password)?;
        browser.submit(form).await?;

        let page = browser.open(&self.resources_url).await?;
        let payload = PageParser::new(page).script_payload(RESOURCE_MARKER, RESOURCE_TERMINATOR)?;
        let html = Self::render_homework(&payload)?;

        info!("Rendered Piazza homework from {}", self.resources_url);
        Ok(html)
    }
}
