//! Descriptive names for generated phases.
//!
//! Only work-carrying elements (tasks and sub-processes) contribute names.
//! The heuristic tries, in order: a shared action verb, a shared first word,
//! a short join, and finally a "first through last" range.

use std::collections::HashMap;

use phaseline_core::model::Element;

/// Name used when no member has a usable name.
pub const FALLBACK_PHASE_NAME: &str = "Process Phase";

/// Action verbs and the theme they give a phase, checked in this order.
const VERB_THEMES: [(&str, &str); 18] = [
    ("prepare", "Preparation"),
    ("setup", "Setup"),
    ("initialize", "Initialization"),
    ("configure", "Configuration"),
    ("validate", "Validation"),
    ("verify", "Verification"),
    ("review", "Review"),
    ("approve", "Approval"),
    ("clean", "Cleaning"),
    ("inspect", "Inspection"),
    ("test", "Testing"),
    ("assemble", "Assembly"),
    ("disassemble", "Disassembly"),
    ("remove", "Removal"),
    ("install", "Installation"),
    ("adjust", "Adjustment"),
    ("finalize", "Finalization"),
    ("complete", "Completion"),
];

/// Suggest a name for a phase made of `members`.
///
/// # Examples
///
/// ```
/// # use phaseline::{identifier::Id, model::{Element, ElementKind}, suggest_phase_name};
/// let a = Element::new(Id::new("a"), "Validate input", ElementKind::Task);
/// let b = Element::new(Id::new("b"), "Validate schema", ElementKind::ServiceTask);
///
/// assert_eq!(suggest_phase_name(&[&a, &b]), "Validation");
/// ```
pub fn suggest_phase_name(members: &[&Element]) -> String {
    let names: Vec<&str> = members
        .iter()
        .filter(|element| element.kind().is_nameable())
        .filter_map(|element| element.display_name())
        .collect();

    match names.as_slice() {
        [] => members
            .first()
            .and_then(|element| element.display_name())
            .unwrap_or(FALLBACK_PHASE_NAME)
            .to_string(),
        [only] => (*only).to_string(),
        _ => verb_theme(&names)
            .map(str::to_string)
            .or_else(|| shared_first_word(&names))
            .unwrap_or_else(|| summarize(&names)),
    }
}

/// `true` when `hits` is at least half of `total`.
fn at_least_half(hits: usize, total: usize) -> bool {
    hits * 2 >= total
}

fn verb_theme(names: &[&str]) -> Option<&'static str> {
    let lowered: Vec<String> = names.iter().map(|name| name.to_lowercase()).collect();

    VERB_THEMES.iter().find_map(|(verb, theme)| {
        let hits = lowered.iter().filter(|name| name.contains(verb)).count();
        at_least_half(hits, names.len()).then_some(*theme)
    })
}

fn shared_first_word(names: &[&str]) -> Option<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for word in names.iter().filter_map(|name| name.split_whitespace().next()) {
        let word = word.to_lowercase();
        let count = counts.entry(word.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(word);
        }
        *count += 1;
    }

    first_seen
        .into_iter()
        .find(|word| counts[word] > 1 && at_least_half(counts[word], names.len()))
        .map(|word| title_case(&word))
}

fn summarize(names: &[&str]) -> String {
    match names {
        [first, last] => format!("{first} & {last}"),
        [first, .., last] => format!("{first} through {last}"),
        [only] => (*only).to_string(),
        [] => FALLBACK_PHASE_NAME.to_string(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use phaseline_core::{identifier::Id, model::ElementKind};

    use super::*;

    fn element(name: &str, kind: ElementKind) -> Element {
        Element::new(Id::new(&format!("id::{name}")), name, kind)
    }

    fn name_of(elements: &[Element]) -> String {
        let refs: Vec<&Element> = elements.iter().collect();
        suggest_phase_name(&refs)
    }

    fn tasks(names: &[&str]) -> Vec<Element> {
        names.iter().map(|name| element(name, ElementKind::Task)).collect()
    }

    #[test]
    fn test_shared_verb_gives_theme() {
        assert_eq!(
            name_of(&tasks(&["Validate order", "validate payment"])),
            "Validation"
        );
    }

    #[test]
    fn test_verb_needs_half_of_names() {
        assert_eq!(
            name_of(&tasks(&["Review draft", "Sign contract", "Archive copy"])),
            "Review draft through Archive copy"
        );
        assert_eq!(
            name_of(&tasks(&["Review draft", "Sign contract", "Review terms", "File"])),
            "Review"
        );
    }

    #[test]
    fn test_verb_matches_substrings() {
        // "Pretest" contains "test"
        assert_eq!(name_of(&tasks(&["Pretest rig", "Load rig"])), "Testing");
    }

    #[test]
    fn test_verbs_checked_in_vocabulary_order() {
        // "disassemble" contains "assemble", which is listed first
        assert_eq!(
            name_of(&tasks(&["Disassemble pump", "Disassemble valve"])),
            "Assembly"
        );
        // both "prepare" and "review" match every name; "prepare" wins
        assert_eq!(
            name_of(&tasks(&["Prepare review", "Review prepared kit"])),
            "Preparation"
        );
    }

    #[test]
    fn test_shared_first_word_title_cased() {
        assert_eq!(
            name_of(&tasks(&["SHIP parcel", "ship letter", "Print label"])),
            "Ship"
        );
    }

    #[test]
    fn test_first_word_must_be_shared() {
        // each first word covers half of two names, but none is shared
        assert_eq!(
            name_of(&tasks(&["Ship parcel", "Print label"])),
            "Ship parcel & Print label"
        );
    }

    #[test]
    fn test_two_unrelated_names_joined() {
        assert_eq!(
            name_of(&tasks(&["Collect feedback", "Publish report"])),
            "Collect feedback & Publish report"
        );
    }

    #[test]
    fn test_many_unrelated_names_use_range() {
        assert_eq!(
            name_of(&tasks(&["Collect feedback", "Publish report", "Send invoice"])),
            "Collect feedback through Send invoice"
        );
    }

    #[test]
    fn test_single_qualifying_name_verbatim() {
        let members = vec![
            element("Start", ElementKind::Start),
            element("Approve budget", ElementKind::UserTask),
            element("Done", ElementKind::End),
        ];

        assert_eq!(name_of(&members), "Approve budget");
    }

    #[test]
    fn test_only_nameable_kinds_count() {
        let members = vec![
            element("Validate?", ElementKind::Decision),
            element("Ship order", ElementKind::ServiceTask),
            element("Charge card", ElementKind::Subprocess),
            element("Validate again", ElementKind::Gateway),
        ];

        assert_eq!(name_of(&members), "Ship order & Charge card");
    }

    #[test]
    fn test_falls_back_to_first_member_name() {
        let members = vec![
            element("Begin", ElementKind::Start),
            element("Fork", ElementKind::ParallelSplit),
        ];

        assert_eq!(name_of(&members), "Begin");
    }

    #[test]
    fn test_falls_back_to_default_name() {
        let members = vec![
            element("", ElementKind::Start),
            element("Fork", ElementKind::ParallelSplit),
        ];

        assert_eq!(name_of(&members), FALLBACK_PHASE_NAME);
        assert_eq!(suggest_phase_name(&[]), FALLBACK_PHASE_NAME);
    }

    #[test]
    fn test_unnamed_tasks_are_ignored() {
        let members = vec![
            element("  ", ElementKind::Task),
            element("Pack box", ElementKind::Task),
        ];

        assert_eq!(name_of(&members), "Pack box");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("hELLO"), "Hello");
        assert_eq!(title_case(""), "");
    }
}
