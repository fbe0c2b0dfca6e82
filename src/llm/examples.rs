//! Few-shot example store.
//!
//! Built once at startup from the configuration's per-program example lists
//! and read-only afterwards. Lookup is an exact, case-sensitive match on the
//! application name reported by the focus resolver — `"iTerm2"` and
//! `"iterm2"` are different programs.

use std::collections::HashMap;

use crate::config::{FewShotExample, ProgramExamples};

// ---------------------------------------------------------------------------
// ExampleStore
// ---------------------------------------------------------------------------

/// Read-only mapping from application name to its ordered few-shot examples.
#[derive(Debug, Default)]
pub struct ExampleStore {
    by_program: HashMap<String, Vec<FewShotExample>>,
}

impl ExampleStore {
    /// Build the store from configuration entries.
    ///
    /// Multiple entries for the same program name are concatenated in
    /// configuration order.
    pub fn from_programs(programs: &[ProgramExamples]) -> Self {
        let mut by_program: HashMap<String, Vec<FewShotExample>> = HashMap::new();
        for entry in programs {
            by_program
                .entry(entry.program.clone())
                .or_default()
                .extend(entry.examples.iter().cloned());
        }
        Self { by_program }
    }

    /// The ordered examples for `program`, or an empty slice when none are
    /// registered. Matching is exact and case-sensitive.
    pub fn for_program(&self, program: &str) -> &[FewShotExample] {
        self.by_program
            .get(program)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(program: &str, pairs: &[(&str, &str)]) -> ProgramExamples {
        ProgramExamples {
            program: program.into(),
            examples: pairs
                .iter()
                .map(|(i, o)| FewShotExample {
                    input: (*i).into(),
                    output: (*o).into(),
                })
                .collect(),
        }
    }

    #[test]
    fn lookup_returns_registered_examples_in_order() {
        let store = ExampleStore::from_programs(&[entry(
            "iTerm2",
            &[("new tab", "{Command}+t"), ("go home", "cd ~")],
        )]);

        let examples = store.for_program("iTerm2");
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].output, "{Command}+t");
        assert_eq!(examples[1].output, "cd ~");
    }

    #[test]
    fn unknown_program_yields_empty_slice() {
        let store = ExampleStore::from_programs(&[entry("iTerm2", &[("a", "b")])]);
        assert!(store.for_program("Google Chrome").is_empty());
    }

    #[test]
    fn match_is_case_sensitive() {
        let store = ExampleStore::from_programs(&[entry("iTerm2", &[("a", "b")])]);
        assert!(store.for_program("iterm2").is_empty());
        assert!(!store.for_program("iTerm2").is_empty());
    }

    #[test]
    fn duplicate_entries_concatenate_in_order() {
        let store = ExampleStore::from_programs(&[
            entry("Slack", &[("a", "1")]),
            entry("Slack", &[("b", "2")]),
        ]);

        let examples = store.for_program("Slack");
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].output, "1");
        assert_eq!(examples[1].output, "2");
    }

    #[test]
    fn empty_config_yields_empty_store() {
        let store = ExampleStore::from_programs(&[]);
        assert!(store.for_program("anything").is_empty());
    }
}
