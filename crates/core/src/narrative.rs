//! Clinician-facing text summary.
//!
//! The summary is a fixed template filled from a validated questionnaire. It contains no
//! timestamps or other varying data, so the same answers always render byte-identical text.

use crate::catalog::{Condition, Symptom};
use crate::questionnaire::ValidatedQuestionnaire;

pub const SYMPTOMS_HEADER: &str = "[Symptoms]";
pub const ONSET_HEADER: &str = "[Since when]";
pub const CHECKLIST_HEADER: &str = "[Condition]";
pub const HISTORY_HEADER: &str = "[Conditions and medication]";
pub const MEMO_HEADER: &str = "[Notes]";

const RULE: &str = "────────────────────────────────────────";
const DISCLAIMER: &str = "This summary is for reference only and is not a diagnosis.\n\
                          Please be examined by a doctor.";

/// Checklist rows, in print order.
const CHECKLIST: &[(&str, Symptom)] = &[
    ("Pain", Symptom::Pain),
    ("Lump", Symptom::LumpSwelling),
    ("Fever", Symptom::Fever),
    ("Itch", Symptom::Itchy),
    ("Redness/swelling", Symptom::RedSwollen),
    ("Cough", Symptom::Cough),
    ("Breathlessness", Symptom::ShortOfBreath),
    ("Dizziness", Symptom::Dizziness),
];

/// Render the summary for a validated questionnaire.
///
/// Memo lines are indented by two spaces so free text can never read as a section header.
pub fn describe(q: &ValidatedQuestionnaire) -> String {
    let mut lines = vec![
        SYMPTOMS_HEADER.to_string(),
        format!("I am concerned about: {}.", join(q.locations())),
        format!("Symptoms: {}.", join(q.symptoms())),
        String::new(),
        ONSET_HEADER.to_string(),
        format!("It started {}.", q.duration()),
        String::new(),
        CHECKLIST_HEADER.to_string(),
    ];

    for (label, symptom) in CHECKLIST {
        let present = q.has_symptom(*symptom);
        let mut row = format!("- {label}: {}", yes_no(present));
        if *symptom == Symptom::LumpSwelling && present {
            if let Some(size) = q.lump_size() {
                row.push_str(&format!(" (size: {size})"));
            }
        }
        lines.push(row);
    }

    let conditions = if q.conditions().is_empty() {
        Condition::None.to_string()
    } else {
        join(q.conditions())
    };
    lines.extend([
        String::new(),
        HISTORY_HEADER.to_string(),
        format!("Pre-existing conditions: {conditions}"),
        format!("Medicine: {}", q.medicine()),
    ]);

    if let Some(memo) = q.memo() {
        lines.push(String::new());
        lines.push(MEMO_HEADER.to_string());
        lines.extend(memo.lines().map(|line| format!("  {line}")));
    }

    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.push(DISCLAIMER.to_string());
    lines.push(RULE.to_string());
    lines.join("\n")
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(present: bool) -> &'static str {
    if present {
        "yes"
    } else {
        "no"
    }
}
