use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub score: u8,
    pub checklist: Vec<ChecklistItem>,
}

struct Rule {
    weight: u8,
    done: &'static str,
    todo: &'static str,
    check: fn(&ProfileData) -> bool,
}

const MIN_ABOUT_CHARS: usize = 50;
const MIN_SKILLS: usize = 5;

const RULES: &[Rule] = &[
    Rule {
        weight: 20,
        done: "Basic Info completed",
        todo: "Add Name, Email and Phone",
        check: |d| d.basic_info.is_complete(),
    },
    Rule {
        weight: 15,
        done: "About section > 50 chars",
        todo: "Add a summary (> 50 chars)",
        check: |d| d.about.chars().count() > MIN_ABOUT_CHARS,
    },
    Rule {
        weight: 15,
        done: "Added 5+ skills",
        todo: "Add at least 5 skills",
        check: |d| d.total_skills() >= MIN_SKILLS,
    },
    Rule {
        weight: 20,
        done: "Added experience",
        todo: "Add work experience",
        check: |d| !d.experience.is_empty(),
    },
    Rule {
        weight: 15,
        done: "Added education",
        todo: "Add education",
        check: |d| !d.education.is_empty(),
    },
    Rule {
        weight: 15,
        done: "Added certificates or awards",
        todo: "Add certificates or awards",
        check: |d| !d.certificates.is_empty() || !d.awards.is_empty(),
    },
];

/// Scores how filled-out a profile document is, 0 to 100.
/// Pure and recomputed on demand; never persisted and never gates anything.
pub fn compute_completeness(data: &ProfileData) -> CompletenessReport {
    let mut score: u32 = 0;
    let mut checklist = Vec::with_capacity(RULES.len());

    for rule in RULES {
        let completed = (rule.check)(data);
        if completed {
            score += u32::from(rule.weight);
        }
        checklist.push(ChecklistItem {
            label: if completed { rule.done } else { rule.todo }.to_string(),
            completed,
        });
    }

    CompletenessReport {
        score: score.min(100) as u8,
        checklist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{Award, BasicInfo, Certificate, Education, Experience, SkillGroup};

    fn skills(n: usize) -> Vec<SkillGroup> {
        vec![
            SkillGroup {
                category: "Backend".to_string(),
                skills: (0..n / 2).map(|i| format!("b{i}")).collect(),
            },
            SkillGroup {
                category: "Cloud".to_string(),
                skills: (0..n - n / 2).map(|i| format!("c{i}")).collect(),
            },
        ]
    }

    fn full_basic_info() -> BasicInfo {
        BasicInfo {
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0000".to_string()),
            location: None,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_document_scores_zero() {
        let report = compute_completeness(&ProfileData::default());
        assert_eq!(report.score, 0);
        assert_eq!(report.checklist.len(), 6);
        assert!(report.checklist.iter().all(|item| !item.completed));
    }

    #[test]
    fn test_worked_example_scores_85() {
        let data = ProfileData {
            basic_info: full_basic_info(),
            about: "a".repeat(60),
            skills: skills(6),
            experience: vec![Experience::default()],
            education: vec![],
            certificates: vec![],
            awards: vec![Award::default()],
            ..Default::default()
        };
        let report = compute_completeness(&data);
        assert_eq!(report.score, 85);
        assert_eq!(report.checklist[4].label, "Add education");
        assert!(!report.checklist[4].completed);
    }

    #[test]
    fn test_full_profile_caps_at_100() {
        let data = ProfileData {
            basic_info: full_basic_info(),
            about: "x".repeat(51),
            skills: skills(5),
            experience: vec![Experience::default()],
            education: vec![Education::default()],
            certificates: vec![Certificate::default()],
            awards: vec![Award::default()],
            ..Default::default()
        };
        let report = compute_completeness(&data);
        assert_eq!(report.score, 100);
        assert!(report.checklist.iter().all(|item| item.completed));
    }

    #[test]
    fn test_about_threshold_is_strict() {
        let data = ProfileData {
            about: "y".repeat(50),
            ..Default::default()
        };
        assert_eq!(compute_completeness(&data).score, 0);
    }

    #[test]
    fn test_four_skills_not_enough() {
        let data = ProfileData {
            skills: skills(4),
            ..Default::default()
        };
        assert_eq!(compute_completeness(&data).score, 0);
    }

    #[test]
    fn test_partial_basic_info_earns_nothing() {
        let data = ProfileData {
            basic_info: BasicInfo {
                name: Some("Ada".to_string()),
                email: Some("ada@example.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = compute_completeness(&data);
        assert_eq!(report.score, 0);
        assert_eq!(report.checklist[0].label, "Add Name, Email and Phone");
    }

    #[test]
    fn test_deterministic() {
        let data = ProfileData {
            basic_info: full_basic_info(),
            education: vec![Education::default()],
            ..Default::default()
        };
        assert_eq!(compute_completeness(&data), compute_completeness(&data));
        assert_eq!(compute_completeness(&data).score, 35);
    }
}
