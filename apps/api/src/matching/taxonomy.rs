//! Curated skills taxonomy used for the skills sub-score.

use std::collections::HashSet;

use crate::matching::normalize::{contains_all, normalize, phrase_key};

/// Canonical skill name and the aliases that also count as a mention.
const BUILTIN_SKILLS: &[(&str, &[&str])] = &[
    // Languages
    ("Rust", &[]),
    ("Python", &[]),
    ("Java", &[]),
    ("JavaScript", &["js", "ecmascript"]),
    ("TypeScript", &["ts"]),
    ("Golang", &[]),
    ("C++", &["cpp"]),
    ("C#", &["csharp"]),
    ("Ruby", &[]),
    ("PHP", &[]),
    ("Kotlin", &[]),
    ("Swift", &[]),
    ("Scala", &[]),
    ("SQL", &[]),
    ("Bash", &["shell scripting"]),
    // Frameworks and runtimes
    ("React", &["react.js", "reactjs"]),
    ("Angular", &[]),
    ("Vue", &["vue.js", "vuejs"]),
    ("Node.js", &["nodejs"]),
    ("Django", &[]),
    ("Flask", &[]),
    ("Spring Boot", &[]),
    ("ASP.NET", &["dotnet"]),
    ("GraphQL", &[]),
    ("REST APIs", &["rest api"]),
    // Data
    ("PostgreSQL", &["postgres"]),
    ("MySQL", &[]),
    ("MongoDB", &["mongo"]),
    ("Redis", &[]),
    ("Kafka", &[]),
    ("Spark", &["pyspark"]),
    ("Hadoop", &[]),
    ("Snowflake", &[]),
    ("Tableau", &[]),
    ("Power BI", &["powerbi"]),
    ("Excel", &["microsoft excel"]),
    ("Data Analysis", &["data analytics"]),
    ("Machine Learning", &["ml"]),
    ("Deep Learning", &[]),
    ("PyTorch", &[]),
    ("TensorFlow", &[]),
    ("Statistics", &["statistical analysis"]),
    // Infrastructure
    ("AWS", &["amazon web services"]),
    ("Azure", &["microsoft azure"]),
    ("GCP", &["google cloud"]),
    ("Docker", &[]),
    ("Kubernetes", &["k8s"]),
    ("Terraform", &[]),
    ("Ansible", &[]),
    ("Linux", &[]),
    ("CI/CD", &["continuous integration", "continuous delivery"]),
    ("Jenkins", &[]),
    ("Git", &["github", "gitlab"]),
    ("DevOps", &[]),
    ("Microservices", &["microservice"]),
    ("Distributed Systems", &[]),
    // Delivery and process
    ("Agile", &[]),
    ("Scrum", &[]),
    ("Kanban", &[]),
    ("Jira", &[]),
    ("Confluence", &[]),
    ("Project Management", &[]),
    ("Program Management", &[]),
    ("Product Management", &[]),
    ("PMP Certification", &["pmp"]),
    ("Risk Management", &[]),
    ("Budget Management", &["budgeting"]),
    ("Stakeholder Management", &["stakeholder communication"]),
    ("Strategic Planning", &[]),
    ("Process Improvement", &[]),
    ("Six Sigma", &["lean six sigma"]),
    ("Change Management", &[]),
    ("Vendor Management", &[]),
    // Business tools
    ("Microsoft Office", &["ms office", "office 365"]),
    ("PowerPoint", &[]),
    ("Salesforce", &[]),
    ("SAP", &[]),
    ("Figma", &[]),
    // Interpersonal
    ("Communication", &[]),
    ("Leadership", &[]),
    ("Team Leadership", &["team lead"]),
    ("Team Building", &[]),
    ("Mentoring", &["coaching"]),
    ("Problem Solving", &[]),
    ("Negotiation", &[]),
    ("Collaboration", &[]),
    ("Customer Service", &[]),
    ("Public Speaking", &[]),
];

/// A taxonomy entry with its name and aliases pre-normalized.
#[derive(Debug, Clone)]
pub struct SkillTerm {
    pub name: String,
    forms: Vec<Vec<String>>,
}

impl SkillTerm {
    fn new(name: &str, aliases: &[&str]) -> Self {
        let forms = std::iter::once(name)
            .chain(aliases.iter().copied())
            .map(normalize)
            .filter(|tokens| !tokens.is_empty())
            .collect();
        Self {
            name: name.to_string(),
            forms,
        }
    }

    /// Normalized token sequences of the name and every alias.
    pub fn forms(&self) -> &[Vec<String>] {
        &self.forms
    }

    /// True when any form of the skill is present in the token set.
    pub fn is_present(&self, tokens: &HashSet<String>) -> bool {
        self.forms.iter().any(|form| contains_all(tokens, form))
    }

    /// Mentions of the skill inside a normalized token sequence, under any
    /// form. Overlapping forms ("excel" inside "microsoft excel") count once.
    pub fn occurrences(&self, sequence: &[String]) -> usize {
        let mut count = 0;
        let mut i = 0;
        while i < sequence.len() {
            let longest = self
                .forms
                .iter()
                .filter(|form| sequence[i..].starts_with(form.as_slice()))
                .map(Vec::len)
                .max();
            match longest {
                Some(len) => {
                    count += 1;
                    i += len;
                }
                None => i += 1,
            }
        }
        count
    }
}

#[derive(Debug, Clone)]
pub struct SkillsTaxonomy {
    terms: Vec<SkillTerm>,
}

impl SkillsTaxonomy {
    pub fn builtin() -> Self {
        Self {
            terms: BUILTIN_SKILLS
                .iter()
                .map(|(name, aliases)| SkillTerm::new(name, aliases))
                .filter(|term| !term.forms.is_empty())
                .collect(),
        }
    }

    /// Appends extra skills; names already covered by an existing entry are skipped.
    pub fn with_extra_skills(mut self, extra: &[String]) -> Self {
        let mut known: HashSet<String> = self.terms.iter().map(|t| phrase_key(&t.name)).collect();
        for name in extra.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let term = SkillTerm::new(name, &[]);
            if !term.forms.is_empty() && known.insert(phrase_key(name)) {
                self.terms.push(term);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[SkillTerm] {
        &self.terms
    }

    /// Entry by canonical name.
    pub fn find(&self, name: &str) -> Option<&SkillTerm> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// Skills mentioned in the token set, in taxonomy order.
    pub fn present_in<'a>(&'a self, tokens: &HashSet<String>) -> Vec<&'a SkillTerm> {
        self.terms.iter().filter(|t| t.is_present(tokens)).collect()
    }
}

impl Default for SkillsTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
