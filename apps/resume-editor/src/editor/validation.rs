//! Pre-save checks over a whole [`ResumeDocument`].
//!
//! Every problem is collected; nothing short-circuits, so the user sees
//! all of them at once. Violations come out grouped by pass, in this
//! order:
//! 1. required fields (the title first, then each entity's required text)
//! 2. date validity for every date-bearing field
//! 3. value ranges (skill level, language level, GPA)
//! 4. start/end ordering
//!
//! Within a pass, sections are visited in document order and records in
//! collection order.

use serde::Serialize;

use crate::editor::dates::{self, MAX_YEAR, MIN_YEAR};
use crate::editor::document::{ResumeDocument, Section};
use crate::editor::entities::{
    Achievement, Certification, Education, Experience, Language, Project, Skill,
};
use crate::editor::entity::EntityKind;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    InvalidDate,
    OutOfRange,
    DateOrder,
}

/// One field-addressable problem found before save.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Violation {
    pub kind: EntityKind,
    /// `None` for the document's own fields.
    pub entity_id: Option<u64>,
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Required,
    Dates,
    Ranges,
    Order,
}

/// Returns every violation in `doc`; an empty list means it may be saved.
pub fn validate(doc: &ResumeDocument) -> Vec<Violation> {
    let mut out = Vec::new();

    if doc.title().trim().is_empty() {
        out.push(Violation {
            kind: EntityKind::Resume,
            entity_id: None,
            field: "title",
            rule: Rule::Required,
            message: "Title is required".to_string(),
        });
    }

    for pass in [Pass::Required, Pass::Dates, Pass::Ranges, Pass::Order] {
        check_section::<Skill>(doc, pass, &mut out);
        check_section::<Experience>(doc, pass, &mut out);
        check_section::<Education>(doc, pass, &mut out);
        check_section::<Project>(doc, pass, &mut out);
        check_section::<Achievement>(doc, pass, &mut out);
        check_section::<Language>(doc, pass, &mut out);
        check_section::<Certification>(doc, pass, &mut out);
    }

    out
}

pub fn is_valid(doc: &ResumeDocument) -> bool {
    validate(doc).is_empty()
}

fn check_section<T: Section>(doc: &ResumeDocument, pass: Pass, out: &mut Vec<Violation>) {
    for (id, record) in doc.section::<T>().iter() {
        let violation = |field: &'static str, rule: Rule, message: String| Violation {
            kind: T::KIND,
            entity_id: Some(id.raw()),
            field,
            rule,
            message,
        };

        match pass {
            Pass::Required => {
                for (field, value) in record.required_text() {
                    if value.trim().is_empty() {
                        out.push(violation(
                            field,
                            Rule::Required,
                            format!("{} {field} is required", T::KIND),
                        ));
                    }
                }
            }
            Pass::Dates => {
                for slot in record.dates() {
                    if slot.value.trim().is_empty() {
                        if slot.required {
                            out.push(violation(
                                slot.field,
                                Rule::Required,
                                format!("{} {} is required", T::KIND, slot.field),
                            ));
                        }
                    } else if !dates::is_valid(slot.value) {
                        out.push(violation(
                            slot.field,
                            Rule::InvalidDate,
                            format!(
                                "'{}' is not a valid date (expected YYYY-MM-DD between {MIN_YEAR} and {MAX_YEAR})",
                                slot.value
                            ),
                        ));
                    }
                }
            }
            Pass::Ranges => {
                for issue in record.check_ranges() {
                    out.push(violation(issue.field, Rule::OutOfRange, issue.message));
                }
            }
            Pass::Order => {
                let Some(period) = record.period() else {
                    continue;
                };
                if period.is_current {
                    continue;
                }
                // Unparseable or out-of-range dates were already reported.
                let start = dates::normalize(period.start);
                let end = dates::normalize(period.end);
                if !start.is_empty() && !end.is_empty() && end < start {
                    out.push(violation(
                        "endDate",
                        Rule::DateOrder,
                        format!("End date {end} is before start date {start}"),
                    ));
                }
            }
        }
    }
}
