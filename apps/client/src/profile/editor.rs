//! Section-level edits. Every function here produces the complete new value
//! of one section; the session then replaces that key wholesale.

use crate::errors::ClientError;
use crate::models::profile::{
    Award, Certificate, Education, Experience, ProfileData, Section, SkillGroup,
};
use crate::profile::keyed::KeyedList;

/// Appends a skill to an existing category.
pub fn add_skill(
    skills: &[SkillGroup],
    category: &str,
    skill: &str,
) -> Result<Vec<SkillGroup>, ClientError> {
    let skill = skill.trim();
    if skill.is_empty() {
        return Err(ClientError::Validation("Skill cannot be empty".to_string()));
    }
    if !skills.iter().any(|group| group.category == category) {
        return Err(ClientError::Validation(format!(
            "No skill category named '{category}'"
        )));
    }

    Ok(skills
        .iter()
        .map(|group| {
            let mut group = group.clone();
            if group.category == category {
                group.skills.push(skill.to_string());
            }
            group
        })
        .collect())
}

/// Removes a skill from a category. A category left with no skills is dropped
/// entirely; the order of everything else is preserved.
pub fn remove_skill(skills: &[SkillGroup], category: &str, skill: &str) -> Vec<SkillGroup> {
    skills
        .iter()
        .map(|group| {
            let mut group = group.clone();
            if group.category == category {
                group.skills.retain(|s| s != skill);
            }
            group
        })
        .filter(|group| !group.skills.is_empty())
        .collect()
}

/// Adds a new category together with its first skill. Both are required.
pub fn add_category(
    skills: &[SkillGroup],
    category: &str,
    first_skill: &str,
) -> Result<Vec<SkillGroup>, ClientError> {
    let (category, first_skill) = (category.trim(), first_skill.trim());
    if category.is_empty() || first_skill.is_empty() {
        return Err(ClientError::Validation(
            "Both a category and its first skill are required".to_string(),
        ));
    }

    let mut updated = skills.to_vec();
    updated.push(SkillGroup {
        category: category.to_string(),
        skills: vec![first_skill.to_string()],
    });
    Ok(updated)
}

/// Keyed views of the list-typed sections, rebuilt whenever a profile is loaded.
#[derive(Debug, Clone, Default)]
pub struct SectionLists {
    pub experience: KeyedList<Experience>,
    pub education: KeyedList<Education>,
    pub certificates: KeyedList<Certificate>,
    pub awards: KeyedList<Award>,
}

impl SectionLists {
    pub fn from_document(data: &ProfileData) -> Self {
        Self {
            experience: KeyedList::from_items(data.experience.clone()),
            education: KeyedList::from_items(data.education.clone()),
            certificates: KeyedList::from_items(data.certificates.clone()),
            awards: KeyedList::from_items(data.awards.clone()),
        }
    }

    /// Re-keys one section after it was replaced wholesale. Keys of the
    /// other sections stay valid.
    pub fn resync(&mut self, data: &ProfileData, section: Section) {
        match section {
            Section::Experience => self.experience = KeyedList::from_items(data.experience.clone()),
            Section::Education => self.education = KeyedList::from_items(data.education.clone()),
            Section::Certificates => {
                self.certificates = KeyedList::from_items(data.certificates.clone())
            }
            Section::Awards => self.awards = KeyedList::from_items(data.awards.clone()),
            Section::BasicInfo | Section::About | Section::Skills => {}
        }
    }
}

/// An entry type of one of the list-typed sections.
pub trait ListItem: Clone + Send + Sync + 'static {
    const SECTION: Section;

    fn list(lists: &SectionLists) -> &KeyedList<Self>;

    fn list_mut(lists: &mut SectionLists) -> &mut KeyedList<Self>;

    fn write_back(data: &mut ProfileData, items: Vec<Self>);
}

impl ListItem for Experience {
    const SECTION: Section = Section::Experience;

    fn list(lists: &SectionLists) -> &KeyedList<Self> {
        &lists.experience
    }

    fn list_mut(lists: &mut SectionLists) -> &mut KeyedList<Self> {
        &mut lists.experience
    }

    fn write_back(data: &mut ProfileData, items: Vec<Self>) {
        data.experience = items;
    }
}

impl ListItem for Education {
    const SECTION: Section = Section::Education;

    fn list(lists: &SectionLists) -> &KeyedList<Self> {
        &lists.education
    }

    fn list_mut(lists: &mut SectionLists) -> &mut KeyedList<Self> {
        &mut lists.education
    }

    fn write_back(data: &mut ProfileData, items: Vec<Self>) {
        data.education = items;
    }
}

impl ListItem for Certificate {
    const SECTION: Section = Section::Certificates;

    fn list(lists: &SectionLists) -> &KeyedList<Self> {
        &lists.certificates
    }

    fn list_mut(lists: &mut SectionLists) -> &mut KeyedList<Self> {
        &mut lists.certificates
    }

    fn write_back(data: &mut ProfileData, items: Vec<Self>) {
        data.certificates = items;
    }
}

impl ListItem for Award {
    const SECTION: Section = Section::Awards;

    fn list(lists: &SectionLists) -> &KeyedList<Self> {
        &lists.awards
    }

    fn list_mut(lists: &mut SectionLists) -> &mut KeyedList<Self> {
        &mut lists.awards
    }

    fn write_back(data: &mut ProfileData, items: Vec<Self>) {
        data.awards = items;
    }
}
