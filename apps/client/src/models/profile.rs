use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Server-assigned profile id, or the placeholder used before the first upload.
/// On the wire the placeholder is `0`; the backend never assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ProfileId {
    Unsaved,
    Saved(i64),
}

impl From<i64> for ProfileId {
    fn from(id: i64) -> Self {
        if id == 0 {
            ProfileId::Unsaved
        } else {
            ProfileId::Saved(id)
        }
    }
}

impl From<ProfileId> for i64 {
    fn from(id: ProfileId) -> Self {
        match id {
            ProfileId::Unsaved => 0,
            ProfileId::Saved(id) => id,
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileId::Unsaved => f.write_str("unsaved"),
            ProfileId::Saved(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_data: ProfileData,
}

impl UserProfile {
    /// The in-memory profile shown before anything has been uploaded.
    pub fn placeholder() -> Self {
        Self {
            id: ProfileId::Unsaved,
            name: "New Profile".to_string(),
            profile_data: ProfileData::default(),
        }
    }
}

/// The profile document. Each key is replaced wholesale by a section save.
///
/// Keys the client does not model (`projects`, `publications`, ...) are kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub basic_info: BasicInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub about: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub certificates: Vec<Certificate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BasicInfo {
    fn has(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Name, email and phone are all present and non-empty.
    pub fn is_complete(&self) -> bool {
        Self::has(&self.name) && Self::has(&self.email) && Self::has(&self.phone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Award {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    BasicInfo,
    About,
    Skills,
    Experience,
    Education,
    Certificates,
    Awards,
}

impl Section {
    /// The document key this section owns.
    pub fn key(&self) -> &'static str {
        match self {
            Section::BasicInfo => "basic_info",
            Section::About => "about",
            Section::Skills => "skills",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Certificates => "certificates",
            Section::Awards => "awards",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The full contents of one section, as sent on save.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    BasicInfo(BasicInfo),
    About(String),
    Skills(Vec<SkillGroup>),
    Experience(Vec<Experience>),
    Education(Vec<Education>),
    Certificates(Vec<Certificate>),
    Awards(Vec<Award>),
}

impl SectionData {
    pub fn section(&self) -> Section {
        match self {
            SectionData::BasicInfo(_) => Section::BasicInfo,
            SectionData::About(_) => Section::About,
            SectionData::Skills(_) => Section::Skills,
            SectionData::Experience(_) => Section::Experience,
            SectionData::Education(_) => Section::Education,
            SectionData::Certificates(_) => Section::Certificates,
            SectionData::Awards(_) => Section::Awards,
        }
    }
}

impl ProfileData {
    /// Replaces exactly one key of the document; siblings are untouched.
    pub fn replace_section(&mut self, data: SectionData) {
        match data {
            SectionData::BasicInfo(v) => self.basic_info = v,
            SectionData::About(v) => self.about = v,
            SectionData::Skills(v) => self.skills = v,
            SectionData::Experience(v) => self.experience = v,
            SectionData::Education(v) => self.education = v,
            SectionData::Certificates(v) => self.certificates = v,
            SectionData::Awards(v) => self.awards = v,
        }
    }

    #[allow(dead_code)]
    pub fn section(&self, section: Section) -> SectionData {
        match section {
            Section::BasicInfo => SectionData::BasicInfo(self.basic_info.clone()),
            Section::About => SectionData::About(self.about.clone()),
            Section::Skills => SectionData::Skills(self.skills.clone()),
            Section::Experience => SectionData::Experience(self.experience.clone()),
            Section::Education => SectionData::Education(self.education.clone()),
            Section::Certificates => SectionData::Certificates(self.certificates.clone()),
            Section::Awards => SectionData::Awards(self.awards.clone()),
        }
    }

    pub fn total_skills(&self) -> usize {
        self.skills.iter().map(|group| group.skills.len()).sum()
    }
}

/// Treats an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
