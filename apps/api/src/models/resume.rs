use bytes::Bytes;
use serde::Serialize;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Largest accepted upload, inclusive.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Document formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    /// Maps a declared MIME type to a document kind. Parameters such as
    /// `; charset=binary` and letter case are ignored.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(Self::Pdf),
            MIME_DOC => Some(Self::Doc),
            MIME_DOCX => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => MIME_PDF,
            Self::Doc => MIME_DOC,
            Self::Docx => MIME_DOCX,
        }
    }
}

/// An uploaded resume that already passed type and size checks.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    file_name: String,
    kind: DocumentKind,
    data: Bytes,
}

impl ResumeFile {
    pub(crate) fn new(file_name: impl Into<String>, kind: DocumentKind, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            data,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn summary(&self) -> ResumeSummary {
        ResumeSummary {
            file_name: self.file_name.clone(),
            mime_type: self.kind.mime_type(),
            size: self.size(),
        }
    }
}

/// Metadata about the current resume, without the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub file_name: String,
    pub mime_type: &'static str,
    pub size: usize,
}
