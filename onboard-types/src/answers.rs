use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::{QuestionCatalog, QuestionId, Selection, ToggleOutcome};

/// The visitor's current selections, keyed by question id.
///
/// Every question of the catalog has an entry from the start (initially
/// empty). Selections only change through [`AnswerSet::toggle`], which applies
/// the question's selection cap, so a selection never holds an option the
/// question does not offer and never exceeds the cap.
///
/// Serializes as a JSON object mapping question ids to arrays of option labels,
/// e.g. `{"1": ["B"], "2": ["X", "Y"]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSet {
    catalog: Arc<QuestionCatalog>,
    selections: BTreeMap<QuestionId, Selection>,
}

impl AnswerSet {
    /// Create an answer set with an empty selection for every question.
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        let selections = catalog.ids().map(|id| (id, Selection::new())).collect();
        Self {
            catalog,
            selections,
        }
    }

    /// Toggle `option` for question `id`, returning the updated selection and
    /// what the toggle did.
    ///
    /// A toggle that would exceed a multi-choice question's cap leaves the
    /// selection unchanged and reports [`ToggleOutcome::LimitReached`].
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the catalog or `option` is not one of the
    /// question's options.
    #[track_caller]
    pub fn toggle(&mut self, id: QuestionId, option: &str) -> (&Selection, ToggleOutcome) {
        let question = self.catalog.at(id);
        assert!(
            question.has_option(option),
            "option {option:?} is not offered by question {id}"
        );
        let max_selections = question.max_selections();

        let selection = self.selections.entry(id).or_default();
        let outcome = selection.toggle(option, max_selections);
        (selection, outcome)
    }

    /// Get the selection for question `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the catalog.
    #[track_caller]
    pub fn get(&self, id: QuestionId) -> &Selection {
        match self.selections.get(&id) {
            Some(selection) => selection,
            None => panic!(
                "question id {id} out of range (catalog has {} questions)",
                self.catalog.count()
            ),
        }
    }

    /// Check if question `id` has at least one selected option.
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.selections.get(&id).is_some_and(|s| !s.is_empty())
    }

    /// Clear every selection.
    pub fn reset(&mut self) {
        for selection in self.selections.values_mut() {
            selection.clear();
        }
    }

    /// The catalog these answers belong to.
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Iterate over `(id, selection)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &Selection)> {
        self.selections.iter().map(|(id, s)| (*id, s))
    }

    /// Number of questions with at least one selected option.
    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|s| !s.is_empty()).count()
    }
}

impl Serialize for AnswerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.selections)
    }
}
