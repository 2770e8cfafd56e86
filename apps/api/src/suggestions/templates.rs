// Suggestion copy. Placeholders in braces are replaced by the generator.

pub const MISSING_KEYWORDS_TEXT: &str = "Add missing keywords to your resume";

/// Replace `{terms}` before use.
pub const MISSING_KEYWORDS_RATIONALE: &str = "Your resume is missing terms that appear \
    prominently in the job description: {terms}.";

pub const SECONDARY_KEYWORDS_TEXT: &str = "Work secondary posting terms into your experience";

/// Replace `{terms}` before use.
pub const SECONDARY_KEYWORDS_RATIONALE: &str = "The job description also mentions {terms}. \
    Wherever your real experience matches, use the posting's wording in your bullet points.";

pub const CRITICAL_SKILLS_TEXT: &str = "Show the skills this posting asks for most";

/// Replace `{terms}` before use.
pub const CRITICAL_SKILLS_RATIONALE: &str = "The job posting repeatedly asks for {terms}, \
    which your resume never mentions.";

pub const SKILLS_SECTION_TEXT: &str = "Add skill section with the missing technical skills";

/// Replace `{terms}` before use.
pub const SKILLS_SECTION_RATIONALE: &str = "Create a dedicated skills section that includes \
    {terms} and other tools mentioned in the job posting.";

/// Replace `{requirement}` before use.
pub const REQUIRED_TEXT: &str = "Address the requirement: {requirement}";

pub const REQUIRED_RATIONALE: &str = "The posting lists this as a requirement and your resume \
    does not clearly cover it. Add a bullet that demonstrates it in the posting's own terms.";

/// Replace `{requirement}` before use.
pub const PREFERRED_TEXT: &str = "Consider covering: {requirement}";

pub const PREFERRED_RATIONALE: &str = "This is listed as a nice-to-have. Mentioning related \
    experience can set you apart from other applicants.";

pub const HIGHLIGHT_EXPERIENCE_TEXT: &str = "Highlight relevant experience more prominently";

/// Replace `{covered}` and `{total}` before use.
pub const HIGHLIGHT_EXPERIENCE_RATIONALE: &str = "Your resume covers {covered} of {total} \
    listed requirements. Feature the experience that matches this job's primary requirements \
    at the top of your resume.";

pub const QUANTIFY_TEXT: &str = "Quantify your achievements";

pub const QUANTIFY_RATIONALE: &str = "Add specific metrics to demonstrate your impact, such as \
    \"Reduced project delivery time by 20%\" or \"Managed a team of 12 developers\".";

pub const SUMMARY_TEXT: &str = "Customize your professional summary";

/// Replace `{role}` before use.
pub const SUMMARY_RATIONALE: &str = "Tailor your professional summary to specifically address \
    the key requirements of {role}.";

pub const FORMAT_TEXT: &str = "Streamline your resume format";

pub const FORMAT_RATIONALE: &str = "Consider using a cleaner, more modern template that makes \
    it easier for hiring managers to scan your qualifications quickly.";
