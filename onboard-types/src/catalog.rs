use std::collections::HashSet;

use serde::Deserialize;

use crate::{CatalogError, Question, QuestionId};

/// The ordered list of questions a visitor walks through.
///
/// Catalog order is traversal order. Question ids are contiguous starting at 1,
/// which `new` enforces, so `at(n)` for `n` in `1..=count()` always succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    /// Optional message shown on the welcome screen.
    prelude: Option<String>,

    /// All questions, in traversal order.
    questions: Vec<Question>,

    /// Optional message shown once the flow is completed.
    epilogue: Option<String>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    prelude: Option<String>,
    questions: Vec<Question>,
    #[serde(default)]
    epilogue: Option<String>,
}

impl QuestionCatalog {
    /// Create a catalog from the given questions.
    ///
    /// Fails if the list is empty, ids are not `1, 2, ..., n` in order, a
    /// question has no options or repeats an option label, or a selection cap
    /// is zero.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (index, question) in questions.iter().enumerate() {
            let expected = index + 1;
            if question.id() != expected {
                return Err(CatalogError::NonContiguousId {
                    expected,
                    found: question.id(),
                });
            }
            if question.options().is_empty() {
                return Err(CatalogError::NoOptions(question.id()));
            }
            if question.max_selections() == 0 {
                return Err(CatalogError::ZeroMaxSelections(question.id()));
            }
            let mut seen = HashSet::new();
            for option in question.options() {
                if !seen.insert(option.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        question: question.id(),
                        option: option.clone(),
                    });
                }
            }
        }

        Ok(Self {
            prelude: None,
            questions,
            epilogue: None,
        })
    }

    /// Load a catalog from JSON.
    ///
    /// Expects an object with a `questions` array and optional `prelude` and
    /// `epilogue` strings.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let mut catalog = Self::new(raw.questions)?;
        catalog.prelude = raw.prelude;
        catalog.epilogue = raw.epilogue;
        Ok(catalog)
    }

    /// Set the prelude message.
    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }

    /// Set the epilogue message.
    pub fn with_epilogue(mut self, epilogue: impl Into<String>) -> Self {
        self.epilogue = Some(epilogue.into());
        self
    }

    /// Get the prelude message.
    pub fn prelude(&self) -> Option<&str> {
        self.prelude.as_deref()
    }

    /// Get the epilogue message.
    pub fn epilogue(&self) -> Option<&str> {
        self.epilogue.as_deref()
    }

    /// Number of questions.
    pub fn count(&self) -> usize {
        self.questions.len()
    }

    /// Get the question with id `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not in `1..=count()`.
    #[track_caller]
    pub fn at(&self, n: QuestionId) -> &Question {
        match self.get(n) {
            Some(question) => question,
            None => panic!(
                "question id {n} out of range (catalog has {} questions)",
                self.count()
            ),
        }
    }

    /// Get the question with id `n`, if it exists.
    pub fn get(&self, n: QuestionId) -> Option<&Question> {
        n.checked_sub(1).and_then(|index| self.questions.get(index))
    }

    /// Check if `n` names a question in this catalog.
    pub fn contains(&self, n: QuestionId) -> bool {
        (1..=self.count()).contains(&n)
    }

    /// All questions in traversal order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Iterate over the ids in traversal order.
    pub fn ids(&self) -> impl Iterator<Item = QuestionId> {
        1..=self.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_questions() -> Vec<Question> {
        vec![
            Question::single(1, "First", ["A", "B"]),
            Question::multi(2, "Second", ["X", "Y", "Z"], 2),
        ]
    }

    #[test]
    fn count_and_at() {
        let catalog = QuestionCatalog::new(two_questions()).unwrap();
        assert_eq!(catalog.count(), 2);
        assert_eq!(catalog.at(1).title(), "First");
        assert_eq!(catalog.at(2).max_selections(), 2);
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(3).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn at_out_of_range_panics() {
        let catalog = QuestionCatalog::new(two_questions()).unwrap();
        let _ = catalog.at(3);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            QuestionCatalog::new(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn rejects_gaps_in_ids() {
        let questions = vec![
            Question::single(1, "First", ["A"]),
            Question::single(3, "Third", ["B"]),
        ];
        assert!(matches!(
            QuestionCatalog::new(questions),
            Err(CatalogError::NonContiguousId {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn rejects_duplicate_options() {
        let questions = vec![Question::multi(1, "Dup", ["A", "A"], 2)];
        assert!(matches!(
            QuestionCatalog::new(questions),
            Err(CatalogError::DuplicateOption { question: 1, .. })
        ));
    }

    #[test]
    fn rejects_zero_cap() {
        let questions = vec![Question::new(1, "None", ["A"], 0)];
        assert!(matches!(
            QuestionCatalog::new(questions),
            Err(CatalogError::ZeroMaxSelections(1))
        ));
    }

    #[test]
    fn from_json() {
        let json = r#"{
            "prelude": "Welcome!",
            "questions": [
                {"id": 1, "title": "Gender", "options": ["Male", "Female"]},
                {"id": 2, "title": "Goals", "options": ["Career", "Hobby", "School"], "max_selections": 2}
            ]
        }"#;
        let catalog = QuestionCatalog::from_json(json).unwrap();
        assert_eq!(catalog.prelude(), Some("Welcome!"));
        assert_eq!(catalog.epilogue(), None);
        assert_eq!(catalog.count(), 2);
        assert!(catalog.at(1).is_single_choice());
        assert_eq!(catalog.at(2).max_selections(), 2);
    }

    #[test]
    fn from_json_malformed() {
        assert!(matches!(
            QuestionCatalog::from_json("{"),
            Err(CatalogError::Json(_))
        ));
    }
}
