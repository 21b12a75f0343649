use crate::types::{Assignment, CourseRecord};
use crate::utils::html::{escape_attr, escape_text};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Dark theme for the aggregated page. Scraped fragments bring their own
/// markup but no styles, so everything is themed from here.
const STYLESHEET: &str = r#"<style>
body { background-color: #002b36; color: #93a1a1; font-family: "Roboto", sans-serif; margin: 1em 2em; }
h1, h2 { color: #859900; background-color: #073642; border-radius: 5px; font-family: "Roboto Mono", monospace; padding: 0 .3em; }
h2 small a { font-size: .6em; }
a:link { color: #268bd2; }
a:visited { color: #6c71c4; }
a:hover { color: #b58900; }
table { width: 100% !important; }
th, table, td { text-align: left; border: 1px solid #586e75; border-collapse: collapse; padding: 5px; }
th { background: #073642; }
p.error { color: #dc322f; }
footer { color: #586e75; font-size: .8em; margin-top: 2em; }
.reading  { color: #088A29; }
.homework { color: #FF6600; }
.project  { color: #3333FF; }
.special  { color: #CC0033; }
.tutorial { color: #990099; }
</style>"#;

/// Render the full page for a list of records.
pub fn render_page(records: &[CourseRecord], generated_at: DateTime<Utc>) -> String {
    let mut html = String::from("<!doctype html>\n<meta charset=\"utf-8\">\n<title>Class Lists</title>\n");
    html.push_str(
        "<link href=\"https://fonts.googleapis.com/css?family=Roboto|Roboto+Mono\" rel=\"stylesheet\">\n",
    );
    html.push_str(STYLESHEET);
    html.push_str("\n<h1>Class Lists</h1>\n");
    for record in records {
        html.push_str(&render_course(record));
    }
    let _ = writeln!(
        html,
        "<footer>Generated {}</footer>",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    html
}

/// Render one course section. The record's content is already sanitized and
/// is emitted as-is; every other string is escaped.
pub fn render_course(record: &CourseRecord) -> String {
    let mut html = String::from("<section>\n");
    let key = escape_text(record.key.as_str());
    if record.source_url.is_empty() {
        let _ = writeln!(html, "<h2>{}</h2>", key);
    } else {
        let _ = writeln!(
            html,
            "<h2>{} <small><a href=\"{}\">Course Page</a></small></h2>",
            key,
            escape_attr(&record.source_url)
        );
    }

    for error in &record.errors {
        let _ = writeln!(html, "<p class=\"error\">Error: {}</p>", escape_text(&error.to_string()));
    }

    if !record.content.is_empty() {
        html.push_str(&record.content);
        html.push('\n');
    }

    if !record.assignments.is_empty() {
        html.push_str(&render_assignments(&record.assignments));
    }

    html.push_str("</section>\n");
    html
}

fn render_assignments(assignments: &[Assignment]) -> String {
    let mut html = String::from(
        "<table class=\"assignments\">\n<thead><tr><th>Name</th><th>Comment</th><th>Due</th><th>Late</th></tr></thead>\n<tbody>\n",
    );
    for assignment in assignments {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_text(&assignment.name),
            escape_text(&assignment.comment),
            escape_text(&assignment.due),
            escape_text(&assignment.late),
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CourseError, CourseKey};
    use chrono::TimeZone;

    fn record() -> CourseRecord {
        let mut record = CourseRecord::new(CourseKey::new("cs304"));
        record.source_url = "http://example.edu/cs304/?a=1&b=2".to_string();
        record.content = "<table><tbody><tr><td>Week 1</td></tr></tbody></table>".to_string();
        record.assignments = vec![Assignment::new("A1 <draft>", "", "2020-01-01", "")];
        record.errors = vec![CourseError::AdapterFetch("HTTP 500 from x".to_string())];
        record
    }

    #[test]
    fn course_section_escapes_everything_but_content() {
        let html = render_course(&record());

        assert!(html.contains(r#"<h2>cs304 <small><a href="http://example.edu/cs304/?a=1&amp;b=2">Course Page</a></small></h2>"#));
        assert!(html.contains("<p class=\"error\">Error: fetching course page failed: HTTP 500 from x</p>"));
        assert!(html.contains("<td>Week 1</td>"));
        assert!(html.contains("<td>A1 &lt;draft&gt;</td><td></td><td>2020-01-01</td>"));
    }

    #[test]
    fn feed_only_course_has_no_link() {
        let record = CourseRecord::new(CourseKey::new("cs2"));
        let html = render_course(&record);
        assert!(html.contains("<h2>cs2</h2>"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn page_lists_courses_in_order() {
        let generated_at = Utc.with_ymd_and_hms(2016, 9, 8, 12, 0, 0).unwrap();
        let html = render_page(&[record(), CourseRecord::new(CourseKey::new("cs311"))], generated_at);

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<h1>Class Lists</h1>"));
        assert!(html.find("<h2>cs304").unwrap() < html.find("<h2>cs311").unwrap());
        assert!(html.contains("Generated 2016-09-08 12:00:00 UTC"));
    }
}
