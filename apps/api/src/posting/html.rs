//! HTML → text lines for a job posting page.
//!
//! Prefers a schema.org `JobPosting` JSON-LD block when the page embeds one,
//! otherwise reads block-level elements in document order.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::posting::ParseError;

const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, dt, dd, td";
const BLOCK_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "li", "dt", "dd", "td",
];
/// Page chrome whose text never belongs to the posting.
const SKIPPED_CONTAINERS: &[&str] = &["nav", "footer", "script", "style", "noscript", "template"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    ListItem,
    Paragraph,
}

/// One block of visible text with whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Fields read from an embedded schema.org `JobPosting`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredPosting {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub qualifications: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub title: Option<String>,
    pub company: Option<String>,
    pub lines: Vec<Line>,
    pub structured: Option<StructuredPosting>,
}

/// Parses a posting page. Fails with [`ParseError::EmptyDocument`] when no
/// visible text can be recovered.
pub fn parse_page(html: &str) -> Result<PageContent, ParseError> {
    let document = Html::parse_document(html);
    let structured = find_structured_posting(&document)?;

    let title = match structured.as_ref().and_then(|s| s.title.clone()) {
        Some(title) => Some(title),
        None => first_text(&document, "h1")?
            .or(meta_content(&document, "og:title")?)
            .or(first_text(&document, "title")?),
    };
    let company = match structured.as_ref().and_then(|s| s.company.clone()) {
        Some(company) => Some(company),
        None => meta_content(&document, "og:site_name")?,
    };

    let mut lines = match structured.as_ref().and_then(|s| s.description.as_deref()) {
        Some(description) => fragment_lines(description)?,
        None => Vec::new(),
    };
    if lines.is_empty() {
        lines = block_lines(document.root_element())?;
    }
    if lines.is_empty() {
        let body = selector("body")?;
        lines = document
            .select(&body)
            .map(visible_text)
            .filter(|text| !text.is_empty())
            .map(|text| Line::new(text, LineKind::Paragraph))
            .collect();
    }
    if lines.is_empty() {
        return Err(ParseError::EmptyDocument);
    }

    Ok(PageContent {
        title,
        company,
        lines,
        structured,
    })
}

fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector(e.to_string()))
}

/// Joins the text nodes of an element and collapses runs of whitespace.
fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of every descendant outside page chrome, collapsed.
fn visible_text(el: ElementRef<'_>) -> String {
    let texts = el.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|a| SKIPPED_CONTAINERS.contains(&a.name()));
        (!hidden).then_some(&**text)
    });
    collapse(texts)
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>, ParseError> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .map(|el| collapse(el.text()))
        .find(|text| !text.is_empty()))
}

fn meta_content(document: &Html, property: &str) -> Result<Option<String>, ParseError> {
    let sel = selector(&format!(r#"meta[property="{property}"]"#))?;
    Ok(document
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty()))
}

/// Visible block elements under `root`, outermost only.
fn block_lines(root: ElementRef<'_>) -> Result<Vec<Line>, ParseError> {
    let blocks = selector(BLOCK_SELECTOR)?;
    Ok(root
        .select(&blocks)
        .filter(|el| !is_nested_or_hidden(el))
        .filter_map(|el| {
            let text = collapse(el.text());
            (!text.is_empty()).then(|| Line::new(text, line_kind(el.value().name())))
        })
        .collect())
}

fn is_nested_or_hidden(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(|node| node.value().as_element())
        .any(|ancestor| {
            let name = ancestor.name();
            BLOCK_TAGS.contains(&name) || SKIPPED_CONTAINERS.contains(&name)
        })
}

fn line_kind(tag: &str) -> LineKind {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => LineKind::Heading,
        "li" => LineKind::ListItem,
        _ => LineKind::Paragraph,
    }
}

/// Lines of an HTML (or plain text) fragment such as a JSON-LD description.
fn fragment_lines(fragment: &str) -> Result<Vec<Line>, ParseError> {
    // Some sites escape the markup inside JSON-LD strings.
    let decoded = if fragment.contains("&lt;") {
        Html::parse_fragment(fragment)
            .root_element()
            .text()
            .collect::<String>()
    } else {
        fragment.to_string()
    };

    let html = Html::parse_fragment(&decoded);
    let lines = block_lines(html.root_element())?;
    if !lines.is_empty() {
        return Ok(lines);
    }

    Ok(html
        .root_element()
        .text()
        .collect::<String>()
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .map(|line| Line::new(line, LineKind::Paragraph))
        .collect())
}

// ────────────────────────────────────────────────────────────────────────────
// JSON-LD
// ────────────────────────────────────────────────────────────────────────────

fn find_structured_posting(document: &Html) -> Result<Option<StructuredPosting>, ParseError> {
    let scripts = selector(r#"script[type="application/ld+json"]"#)?;
    let Some(posting) = document
        .select(&scripts)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .find_map(|value| find_job_posting(&value).cloned())
    else {
        return Ok(None);
    };

    let mut qualifications = Vec::new();
    for key in ["qualifications", "experienceRequirements", "educationRequirements"] {
        qualifications.extend(list_field(&posting, key, &['\n'])?);
    }

    Ok(Some(StructuredPosting {
        title: string_field(&posting, "title"),
        company: organization_name(&posting),
        description: string_field(&posting, "description"),
        qualifications,
        skills: list_field(&posting, "skills", &['\n', ',', ';'])?,
    }))
}

fn find_job_posting(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_job_posting),
        Value::Object(_) if is_job_posting(value) => Some(value),
        Value::Object(map) => map.get("@graph").and_then(find_job_posting),
        _ => None,
    }
}

fn is_job_posting(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => kind == "JobPosting",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("JobPosting")),
        _ => false,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn organization_name(posting: &Value) -> Option<String> {
    match posting.get("hiringOrganization")? {
        Value::String(name) => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        org => string_field(org, "name"),
    }
}

/// Reads a field that may be a string, an array of strings, or an array of
/// `{ "name": .. }` objects. Markup inside strings is reduced to its lines.
fn list_field(value: &Value, key: &str, separators: &[char]) -> Result<Vec<String>, ParseError> {
    let mut items = Vec::new();
    match value.get(key) {
        Some(Value::String(text)) if text.contains('<') => {
            items.extend(fragment_lines(text)?.into_iter().map(|line| line.text));
        }
        Some(Value::String(text)) => {
            items.extend(text.split(separators).map(str::to_string));
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                match entry {
                    Value::String(text) => items.push(text.clone()),
                    other => items.extend(string_field(other, "name")),
                }
            }
        }
        _ => {}
    }
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN_PAGE: &str = r#"
        <html>
          <head>
            <title>Careers | Acme</title>
            <meta property="og:site_name" content="Acme Corp">
          </head>
          <body>
            <nav><ul><li>Home</li><li>Jobs</li></ul></nav>
            <h1>Senior Project Manager</h1>
            <h2>Requirements</h2>
            <ul>
              <li><p>5+ years of <b>Agile</b> experience</p></li>
              <li>PMP   Certification</li>
            </ul>
            <script>var tracking = "Kubernetes";</script>
            <footer><p>Copyright Acme</p></footer>
          </body>
        </html>
    "#;

    #[test]
    fn test_plain_page_lines_skip_chrome_and_nesting() {
        let page = parse_page(PLAIN_PAGE).unwrap();
        assert_eq!(page.title.as_deref(), Some("Senior Project Manager"));
        assert_eq!(page.company.as_deref(), Some("Acme Corp"));
        assert_eq!(
            page.lines,
            vec![
                Line::new("Senior Project Manager", LineKind::Heading),
                Line::new("Requirements", LineKind::Heading),
                Line::new("5+ years of Agile experience", LineKind::ListItem),
                Line::new("PMP Certification", LineKind::ListItem),
            ]
        );
        assert!(page.structured.is_none());
    }

    #[test]
    fn test_title_falls_back_to_og_title_then_title_tag() {
        let page = parse_page(
            r#"<html><head><meta property="og:title" content="Data Analyst"><title>Jobs</title></head>
               <body><p>Work with SQL daily.</p></body></html>"#,
        )
        .unwrap();
        assert_eq!(page.title.as_deref(), Some("Data Analyst"));

        let page = parse_page("<html><head><title>Jobs</title></head><body><p>SQL</p></body></html>")
            .unwrap();
        assert_eq!(page.title.as_deref(), Some("Jobs"));
    }

    #[test]
    fn test_json_ld_posting_is_preferred() {
        let html = r#"
            <html><head>
              <script type="application/ld+json">
              {"@context": "https://schema.org", "@graph": [
                {"@type": "Organization", "name": "Ignored"},
                {"@type": "JobPosting",
                 "title": "Scrum Master",
                 "hiringOrganization": {"@type": "Organization", "name": "Tech Innovations Inc."},
                 "description": "<h3>What you'll need</h3><ul><li>Jira</li><li>Kanban</li></ul>",
                 "qualifications": "Certified ScrumMaster\nThree years coaching teams",
                 "skills": "Jira, Confluence; Facilitation"}
              ]}
              </script>
            </head><body><h1>Other title</h1><p>Page chrome</p></body></html>
        "#;
        let page = parse_page(html).unwrap();

        assert_eq!(page.title.as_deref(), Some("Scrum Master"));
        assert_eq!(page.company.as_deref(), Some("Tech Innovations Inc."));
        assert_eq!(page.lines[0], Line::new("What you'll need", LineKind::Heading));
        assert_eq!(page.lines.len(), 3);

        let structured = page.structured.unwrap();
        assert_eq!(
            structured.qualifications,
            vec!["Certified ScrumMaster", "Three years coaching teams"]
        );
        assert_eq!(structured.skills, vec!["Jira", "Confluence", "Facilitation"]);
    }

    #[test]
    fn test_escaped_json_ld_description_is_decoded() {
        let lines = fragment_lines("&lt;ul&gt;&lt;li&gt;Python&lt;/li&gt;&lt;/ul&gt;").unwrap();
        assert_eq!(lines, vec![Line::new("Python", LineKind::ListItem)]);
    }

    #[test]
    fn test_plain_text_description_splits_on_newlines() {
        let lines = fragment_lines("Lead sprint planning.\n\n  Report to the PMO.").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "Report to the PMO.");
    }

    #[test]
    fn test_loose_body_text_becomes_one_paragraph() {
        let page = parse_page("<html><body><div>Agile   coach wanted</div></body></html>").unwrap();
        assert_eq!(page.lines, vec![Line::new("Agile coach wanted", LineKind::Paragraph)]);
    }

    #[test]
    fn test_empty_page_is_a_parse_error() {
        let err = parse_page("<html><body><script>1</script></body></html>").unwrap_err();
        assert!(matches!(err, ParseError::EmptyDocument));
    }

    #[test]
    fn test_hiring_organization_may_be_a_string() {
        let posting: Value = serde_json::json!({
            "@type": ["JobPosting"],
            "hiringOrganization": "Acme"
        });
        assert!(is_job_posting(&posting));
        assert_eq!(organization_name(&posting).as_deref(), Some("Acme"));
    }
}
