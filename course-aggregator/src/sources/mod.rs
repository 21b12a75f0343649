pub mod blackboard;
pub mod piazza;
pub mod static_page;

pub use blackboard::BlackboardSource;
pub use piazza::PiazzaResourceSource;
pub use static_page::StaticTableSource;

use crate::config::AppConfig;
use crate::registry::AdapterRegistry;
use crate::types::Result;
use std::sync::Arc;
use tracing::info;

/// The 2016W1 course pages this service was built around.
pub mod courses {
    pub const CS304_PAGE: &str = "http://www.ugrad.cs.ubc.ca/~cs304/2016W1/";
    pub const CS304_SCHEDULE: &str = "http://www.ugrad.cs.ubc.ca/~cs304/2016W1/schedule.html";

    pub const CS311_PAGE: &str = "http://www.ugrad.cs.ubc.ca/~cs311/2016W1/";
    pub const CS311_HOMEWORK: &str = "https://www.ugrad.cs.ubc.ca/~cs311/2016W1/_homework.php";

    pub const CS313_PAGE: &str = "https://piazza.com/class/isrvn2xyq3t69a";
    pub const CS313_RESOURCES: &str = "https://piazza.com/ubc.ca/winterterm12016/cpsc313/resources";

    pub const CS322_PAGE: &str =
        "https://connect.ubc.ca/webapps/blackboard/execute/content/blankPage?cmd=view&content_id=_3755785_1&course_id=_82806_1";
    pub const CS322_CONTENT: &str =
        "https://connect.ubc.ca/webapps/blackboard/content/listContent.jsp?course_id=_82806_1&content_id=_3510707_1";

    pub const CS340_PAGE: &str = "https://www.cs.ubc.ca/~schmidtm/Courses/340-F16/";
}

/// Registry of every course source. Sources that need a login are only
/// registered when their credentials are configured; their keys then fall
/// back to feed-only records.
pub fn default_registry(config: &AppConfig) -> Result<AdapterRegistry> {
    let fetch = &config.fetch;
    let mut registry = AdapterRegistry::new();

    registry.register(
        "cs304",
        courses::CS304_PAGE,
        Arc::new(StaticTableSource::new(courses::CS304_SCHEDULE, "table", fetch.clone())?),
    );
    registry.register(
        "cs311",
        courses::CS311_PAGE,
        Arc::new(StaticTableSource::new(courses::CS311_HOMEWORK, "table[rules]", fetch.clone())?),
    );
    registry.register(
        "cs340",
        courses::CS340_PAGE,
        Arc::new(StaticTableSource::new(courses::CS340_PAGE, "table", fetch.clone())?),
    );

    if config.piazza.is_configured() {
        registry.register(
            "cs313",
            courses::CS313_PAGE,
            Arc::new(PiazzaResourceSource::new(
                courses::CS313_RESOURCES,
                config.piazza.clone(),
                fetch.clone(),
            )),
        );
    } else {
        info!("No Piazza credentials, cs313 is feed-only");
    }

    if config.cwl.is_configured() {
        registry.register(
            "cs322",
            courses::CS322_PAGE,
            Arc::new(BlackboardSource::new(courses::CS322_CONTENT, config.cwl.clone(), fetch.clone())),
        );
    } else {
        info!("No CWL credentials, cs322 is feed-only");
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use crate::traits::SourceAdapter;
    use crate::types::CourseKey;

    fn key_names(registry: &AdapterRegistry) -> Vec<String> {
        registry.keys().into_iter().map(String::from).collect()
    }

    #[test]
    fn login_sources_need_credentials() {
        let registry = default_registry(&AppConfig::default()).unwrap();

        assert_eq!(key_names(&registry), vec!["cs304", "cs311", "cs340"]);
        assert!(!registry.contains(&CourseKey::new("cs313")));
        assert!(!registry.contains(&CourseKey::new("cs322")));
        let cs304 = registry.get(&CourseKey::new("cs304")).unwrap();
        assert_eq!(cs304.url, courses::CS304_PAGE);
        assert_eq!(cs304.adapter.source_name(), "Static page (www.ugrad.cs.ubc.ca)");
        assert_eq!(registry.get(&CourseKey::new("cs311")).unwrap().url, courses::CS311_PAGE);
        assert_eq!(registry.get(&CourseKey::new("cs340")).unwrap().url, courses::CS340_PAGE);
    }

    #[test]
    fn configured_credentials_register_login_sources() {
        let config = AppConfig {
            piazza: Credentials::new("me@example.com", "secret"),
            cwl: Credentials::new("cwl-user", "cwl-pass"),
            ..AppConfig::default()
        };
        let registry = default_registry(&config).unwrap();

        assert_eq!(key_names(&registry), vec!["cs304", "cs311", "cs313", "cs322", "cs340"]);
        let cs313 = registry.get(&CourseKey::new("CS313")).unwrap();
        assert_eq!(cs313.url, courses::CS313_PAGE);
        assert_eq!(cs313.adapter.source_name(), "Piazza resources");
        let cs322 = registry.get(&CourseKey::new("cs322")).unwrap();
        assert_eq!(cs322.url, courses::CS322_PAGE);
        assert_eq!(cs322.adapter.source_name(), "Blackboard (CWL)");
    }

    #[test]
    fn half_configured_credentials_stay_feed_only() {
        let config = AppConfig {
            piazza: Credentials::new("me@example.com", ""),
            ..AppConfig::default()
        };
        let registry = default_registry(&config).unwrap();
        assert!(!registry.contains(&CourseKey::new("cs313")));
    }
}
