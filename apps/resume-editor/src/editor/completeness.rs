use serde::{Deserialize, Serialize};

use crate::editor::collection::EntityCollection;
use crate::editor::document::ResumeDocument;
use crate::editor::entity::{Entity, EntityKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: EntityKind,
    pub score: f64,
    pub entry_count: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

/// Advisory overview of how filled-in a résumé is. Never blocks a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub total_entries: usize,
    pub missing_sections: Vec<EntityKind>,
    pub has_summary: bool,
}

/// (section, weight, entries for a full score)
const SECTION_TARGETS: &[(EntityKind, f64, usize)] = &[
    (EntityKind::Experience, 0.30, 2),
    (EntityKind::Education, 0.20, 1),
    (EntityKind::Skill, 0.15, 5),
    (EntityKind::Project, 0.15, 2),
    (EntityKind::Language, 0.08, 1),
    (EntityKind::Certification, 0.07, 1),
    (EntityKind::Achievement, 0.05, 1),
];

const SUMMARY_WEIGHT: f64 = 0.10;

/// Records whose required text is all filled in; blank placeholders
/// added by the UI do not count.
fn filled<T: Entity>(collection: &EntityCollection<T>) -> usize {
    collection
        .all()
        .into_iter()
        .filter(|record| {
            record
                .required_text()
                .iter()
                .all(|(_, value)| !value.trim().is_empty())
        })
        .count()
}

fn entry_count(doc: &ResumeDocument, kind: EntityKind) -> usize {
    match kind {
        EntityKind::Skill => filled(doc.skills()),
        EntityKind::Experience => filled(doc.experiences()),
        EntityKind::Education => filled(doc.educations()),
        EntityKind::Project => filled(doc.projects()),
        EntityKind::Achievement => filled(doc.achievements()),
        EntityKind::Language => filled(doc.languages()),
        EntityKind::Certification => filled(doc.certifications()),
        EntityKind::Resume => 0,
    }
}

pub fn assess(doc: &ResumeDocument) -> CompletenessReport {
    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut total_entries = 0;
    let mut weighted_score_sum = 0.0;

    for &(kind, weight, target) in SECTION_TARGETS {
        let count = entry_count(doc, kind);
        total_entries += count;

        if count == 0 {
            missing_sections.push(kind);
            sections.push(SectionHealth {
                section: kind,
                score: 0.0,
                entry_count: 0,
                status: SectionStatus::Missing,
                recommendations: vec![format!("Add at least one {kind} entry")],
            });
            continue;
        }

        let score = (count as f64 / target as f64).clamp(0.0, 1.0);
        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            _ => SectionStatus::Weak,
        };

        let mut recommendations = Vec::new();
        if count < target {
            recommendations.push(format!(
                "{} more {kind} entr{} would round out this section",
                target - count,
                if target - count == 1 { "y" } else { "ies" }
            ));
        }

        weighted_score_sum += score * weight;
        sections.push(SectionHealth {
            section: kind,
            score,
            entry_count: count,
            status,
            recommendations,
        });
    }

    let has_summary = doc.summary().is_some_and(|s| !s.trim().is_empty());
    if has_summary {
        weighted_score_sum += SUMMARY_WEIGHT;
    }

    let total_weight: f64 = SECTION_TARGETS.iter().map(|(_, w, _)| w).sum::<f64>() + SUMMARY_WEIGHT;
    let overall_score = (weighted_score_sum / total_weight).clamp(0.0, 1.0);

    CompletenessReport {
        overall_score,
        sections,
        total_entries,
        missing_sections,
        has_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::document::ScalarField;
    use crate::editor::entities::{Education, Experience, Skill};

    fn experience() -> Experience {
        Experience {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: "2020-01-01".into(),
            ..Default::default()
        }
    }

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.into(),
            ..Default::default()
        }
    }

    fn section(report: &CompletenessReport, kind: EntityKind) -> &SectionHealth {
        report.sections.iter().find(|s| s.section == kind).unwrap()
    }

    #[test]
    fn test_empty_document_is_all_missing() {
        let report = assess(&ResumeDocument::new());
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.missing_sections.len(), SECTION_TARGETS.len());
        assert!(!report.has_summary);
    }

    #[test]
    fn test_partial_section_is_moderate() {
        let mut doc = ResumeDocument::new();
        doc.add(experience());
        let report = assess(&doc);
        let exp = section(&report, EntityKind::Experience);
        assert_eq!(exp.status, SectionStatus::Moderate);
        assert_eq!(exp.recommendations.len(), 1);
        assert!(!report.missing_sections.contains(&EntityKind::Experience));
    }

    #[test]
    fn test_blank_placeholders_do_not_count() {
        let mut doc = ResumeDocument::new();
        doc.add(Experience::default());
        doc.add(Experience {
            company: "Acme".into(),
            ..Default::default()
        });
        let report = assess(&doc);
        assert_eq!(section(&report, EntityKind::Experience).status, SectionStatus::Missing);
        assert!(report.missing_sections.contains(&EntityKind::Experience));
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.overall_score, 0.0);
    }

    #[test]
    fn test_score_grows_with_content() {
        let mut doc = ResumeDocument::new();
        let before = assess(&doc).overall_score;
        doc.add(Education {
            institution: "MIT".into(),
            degree: "BSc".into(),
            field: "CS".into(),
            ..Default::default()
        });
        for name in ["Rust", "Go", "SQL", "Kafka", "Linux"] {
            doc.add(skill(name));
        }
        doc.set_scalar(ScalarField::Summary, "Engineer").unwrap();
        let report = assess(&doc);
        assert!(report.overall_score > before);
        assert!(report.has_summary);
        assert_eq!(report.total_entries, 6);
        assert_eq!(section(&report, EntityKind::Skill).status, SectionStatus::Strong);
    }
}
