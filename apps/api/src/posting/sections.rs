//! Section detection and requirement extraction over posting lines.

use std::collections::HashSet;

use crate::matching::normalize::phrase_key;
use crate::models::Requirement;
use crate::posting::html::{Line, LineKind};

/// Weight of text found in the posting title.
pub const TITLE_WEIGHT: f32 = 1.0;
/// Requirement statements kept per posting.
const MAX_REQUIREMENTS: usize = 30;
/// Longest label (in words) recognized before an inline colon.
const MAX_LABEL_WORDS: usize = 4;
/// Longest heading (in words) matched against the section vocabulary.
const MAX_HEADING_WORDS: usize = 8;

const BULLETS: &[char] = &['•', '·', '▪', '◦', '‣', '-', '*', '–'];

/// Part of a posting a line belongs to. Drives keyword position weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Requirements,
    Preferred,
    Responsibilities,
    About,
    Other,
}

impl Section {
    pub fn weight(self) -> f32 {
        match self {
            Section::Requirements => 0.8,
            Section::Preferred => 0.7,
            Section::Responsibilities => 0.6,
            Section::About => 0.3,
            Section::Other => 0.5,
        }
    }

    fn is_requirement_list(self) -> bool {
        matches!(self, Section::Requirements | Section::Preferred)
    }
}

// Checked in this order: "preferred qualifications" must not land in Requirements.
const SECTION_MARKERS: &[(Section, &[&str])] = &[
    (
        Section::Preferred,
        &[
            "preferred", "nice to have", "nice-to-have", "bonus", "desired", "plus if",
            "good to have", "would be great",
        ],
    ),
    (
        Section::Requirements,
        &[
            "requirement", "qualification", "what you'll need", "what you need",
            "what you will need", "what we're looking for", "what we are looking for",
            "must have", "must-have", "who you are", "you have", "you bring", "required",
            "skills", "experience",
        ],
    ),
    (
        Section::Responsibilities,
        &[
            "responsibilit", "what you'll do", "what you will do", "the role", "your role",
            "duties", "day to day", "day-to-day", "in this role", "your impact", "you will",
        ],
    ),
    (
        Section::About,
        &[
            "about", "who we are", "benefits", "perks", "why join", "our team", "our company",
            "compensation", "salary", "equal opportunity", "culture", "what we offer",
        ],
    ),
];

/// A posting line tagged with the section it sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionedLine {
    pub text: String,
    pub kind: LineKind,
    pub section: Section,
}

/// Section named by a heading, or `None` when the text is no known heading.
pub fn detect_heading(text: &str) -> Option<Section> {
    let label = text.trim().trim_end_matches(':').trim().to_lowercase();
    if label.is_empty() || label.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }
    let label = label.replace('’', "'");
    SECTION_MARKERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| label.contains(m)))
        .map(|(section, _)| *section)
}

/// Splits `"Required: Java, SQL"` into its section and the text after the colon.
fn split_inline_label(text: &str) -> Option<(Section, &str)> {
    let (label, rest) = text.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() || label.split_whitespace().count() > MAX_LABEL_WORDS {
        return None;
    }
    detect_heading(label).map(|section| (section, rest))
}

fn strip_bullet(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let stripped = trimmed.trim_start_matches(BULLETS);
    (stripped.len() < trimmed.len()).then(|| stripped.trim())
}

/// Assigns every line to a section.
///
/// Headings open a section; unknown headings fall back to `Other`. A short
/// paragraph ending with a colon counts as a heading. Inline labels such as
/// `Preferred: Kubernetes, Kafka` become list items of that section, and
/// bulleted paragraphs become list items of the current section.
pub fn assign_sections(lines: &[Line]) -> Vec<SectionedLine> {
    let mut current = Section::Other;
    let mut out = Vec::with_capacity(lines.len());

    for line in lines {
        let text = line.text.trim();

        let heading_like = line.kind == LineKind::Heading
            || (text.ends_with(':') && text.split_whitespace().count() <= MAX_LABEL_WORDS);
        if heading_like {
            current = detect_heading(text).unwrap_or(Section::Other);
            out.push(SectionedLine {
                text: text.to_string(),
                kind: LineKind::Heading,
                section: current,
            });
            continue;
        }

        if let Some((section, rest)) = split_inline_label(text) {
            for item in rest.split([',', ';']).map(str::trim).filter(|i| !i.is_empty()) {
                out.push(SectionedLine {
                    text: item.trim_end_matches('.').to_string(),
                    kind: LineKind::ListItem,
                    section,
                });
            }
            continue;
        }

        let (text, kind) = match strip_bullet(text) {
            Some(stripped) => (stripped, LineKind::ListItem),
            None => (text, line.kind),
        };
        if text.is_empty() {
            continue;
        }
        out.push(SectionedLine {
            text: text.to_string(),
            kind,
            section: current,
        });
    }
    out
}

/// Requirement statements from the requirements and preferred sections.
///
/// When the posting has no such section, every list item is taken as a
/// required statement. Duplicates (by normalized text) are dropped.
pub fn extract_requirements(lines: &[SectionedLine]) -> Vec<Requirement> {
    let sectioned: Vec<&SectionedLine> = lines
        .iter()
        .filter(|l| l.kind == LineKind::ListItem && l.section.is_requirement_list())
        .collect();

    let candidates: Vec<Requirement> = if sectioned.is_empty() {
        lines
            .iter()
            .filter(|l| l.kind == LineKind::ListItem)
            .map(|l| Requirement::required(clean_statement(&l.text)))
            .collect()
    } else {
        sectioned
            .into_iter()
            .map(|l| {
                let text = clean_statement(&l.text);
                if l.section == Section::Preferred {
                    Requirement::preferred(text)
                } else {
                    Requirement::required(text)
                }
            })
            .collect()
    };

    dedup_requirements(candidates)
}

/// Drops statements with no content words or seen before, then caps the list.
pub fn dedup_requirements(candidates: impl IntoIterator<Item = Requirement>) -> Vec<Requirement> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|r| {
            let key = phrase_key(&r.text);
            !key.is_empty() && seen.insert(key)
        })
        .take(MAX_REQUIREMENTS)
        .collect()
}

fn clean_statement(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', ';', ','])
        .trim()
        .to_string()
}

/// Raw posting text: one line per block, headings included.
pub fn raw_text(lines: &[SectionedLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(text: &str) -> Line {
        Line::new(text, LineKind::Heading)
    }

    fn item(text: &str) -> Line {
        Line::new(text, LineKind::ListItem)
    }

    fn para(text: &str) -> Line {
        Line::new(text, LineKind::Paragraph)
    }

    #[test]
    fn test_detect_heading_vocabulary() {
        assert_eq!(detect_heading("Requirements"), Some(Section::Requirements));
        assert_eq!(detect_heading("What You’ll Need:"), Some(Section::Requirements));
        assert_eq!(detect_heading("Preferred Qualifications"), Some(Section::Preferred));
        assert_eq!(detect_heading("Key Responsibilities"), Some(Section::Responsibilities));
        assert_eq!(detect_heading("About Us"), Some(Section::About));
        assert_eq!(detect_heading("Senior Project Manager"), None);
    }

    #[test]
    fn test_long_lines_are_never_headings() {
        assert_eq!(
            detect_heading("We are looking for someone with experience in agile delivery and more"),
            None
        );
    }

    #[test]
    fn test_section_weights() {
        assert!(TITLE_WEIGHT > Section::Requirements.weight());
        assert!(Section::Requirements.weight() > Section::Preferred.weight());
        assert!(Section::Preferred.weight() > Section::Responsibilities.weight());
        assert!(Section::Other.weight() > Section::About.weight());
    }

    #[test]
    fn test_assign_sections_follows_headings() {
        let lines = assign_sections(&[
            heading("Senior Project Manager"),
            para("Join our growing team."),
            heading("Requirements"),
            item("PMP Certification"),
            para("Benefits:"),
            item("Dental"),
        ]);

        let sections: Vec<Section> = lines.iter().map(|l| l.section).collect();
        assert_eq!(
            sections,
            vec![
                Section::Other,
                Section::Other,
                Section::Requirements,
                Section::Requirements,
                Section::About,
                Section::About,
            ]
        );
        assert_eq!(lines[4].kind, LineKind::Heading);
    }

    #[test]
    fn test_inline_labels_split_into_items() {
        let lines = assign_sections(&[para(
            "Required: Java, Spring Boot, SQL.",
        ), para("Preferred: Kubernetes; CI/CD experience")]);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Java", "Spring Boot", "SQL", "Kubernetes", "CI/CD experience"]);
        assert_eq!(lines[0].section, Section::Requirements);
        assert_eq!(lines[4].section, Section::Preferred);
        assert!(lines.iter().all(|l| l.kind == LineKind::ListItem));
    }

    #[test]
    fn test_bulleted_paragraphs_become_items() {
        let lines = assign_sections(&[heading("Qualifications"), para("• 5+ years with Scrum")]);
        assert_eq!(lines[1].kind, LineKind::ListItem);
        assert_eq!(lines[1].text, "5+ years with Scrum");
    }

    #[test]
    fn test_extract_requirements_marks_preferred() {
        let lines = assign_sections(&[
            heading("Requirements"),
            item("PMP Certification."),
            item("pmp certification"),
            heading("Nice to have"),
            item("Experience with Confluence"),
            heading("Responsibilities"),
            item("Run sprint planning"),
        ]);
        let requirements = extract_requirements(&lines);

        assert_eq!(
            requirements,
            vec![
                Requirement::required("PMP Certification"),
                Requirement::preferred("Experience with Confluence"),
            ]
        );
    }

    #[test]
    fn test_extract_requirements_falls_back_to_all_items() {
        let lines = assign_sections(&[
            heading("The Job"),
            item("Lead Agile ceremonies"),
            item("Maintain the Jira board"),
        ]);
        let requirements = extract_requirements(&lines);
        assert_eq!(requirements.len(), 2);
        assert!(requirements.iter().all(|r| r.is_required));
    }

    #[test]
    fn test_requirements_are_capped() {
        let candidates = (0..50).map(|i| Requirement::required(format!("Skill number{i}")));
        assert_eq!(dedup_requirements(candidates).len(), MAX_REQUIREMENTS);
    }

    #[test]
    fn test_raw_text_joins_lines() {
        let lines = assign_sections(&[heading("Requirements"), item("Jira")]);
        assert_eq!(raw_text(&lines), "Requirements\nJira");
    }
}
