use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A generated resume as returned by the generate and history endpoints.
/// Only `id` and `name` are guaranteed; the rest depends on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResume {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tailored_resume_content: Option<Value>,
}

/// The hiring-manager analysis stored alongside a tailored resume.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub strength: Vec<String>,
    #[serde(default)]
    pub weakness: Vec<String>,
}

impl GeneratedResume {
    pub fn analysis(&self) -> Option<ResumeAnalysis> {
        self.tailored_resume_content
            .as_ref()?
            .get("analysis")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

/// Predefined resume layouts. Opaque to the client beyond id and display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
}

impl TemplateId {
    pub const ALL: [TemplateId; 2] = [TemplateId::Classic, TemplateId::Modern];

    pub fn id(&self) -> u8 {
        match self {
            TemplateId::Classic => 1,
            TemplateId::Modern => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateId::Classic => "Template - 1",
            TemplateId::Modern => "Template - 2",
        }
    }
}

impl TryFrom<u8> for TemplateId {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| format!("unknown template id {id} (expected 1 or 2)"))
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("template id must be a number, got '{s}'"))?;
        TemplateId::try_from(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeLength {
    #[default]
    OnePage,
    TwoPages,
}

impl ResumeLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeLength::OnePage => "1 page",
            ResumeLength::TwoPages => "2 pages",
        }
    }
}

impl FromStr for ResumeLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1 page" | "1-page" => Ok(ResumeLength::OnePage),
            "2" | "2 pages" | "2-pages" => Ok(ResumeLength::TwoPages),
            other => Err(format!("unknown resume length '{other}' (expected '1 page' or '2 pages')")),
        }
    }
}

impl fmt::Display for ResumeLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Pdf,
    Docx,
}

impl DownloadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Docx => "docx",
        }
    }
}

impl FromStr for DownloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(DownloadFormat::Pdf),
            "docx" => Ok(DownloadFormat::Docx),
            other => Err(format!("unknown format '{other}' (expected pdf or docx)")),
        }
    }
}

impl fmt::Display for DownloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
