use serde::{Deserialize, Serialize};

/// Identifier of a question inside a catalog.
///
/// Identifiers are 1-based and dense: the first question is `1`, the last is
/// `catalog.count()`.
pub type QuestionId = usize;

/// A single question in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Position of this question in the catalog (1-based).
    id: QuestionId,

    /// The title shown to the visitor.
    title: String,

    /// The options the visitor can pick from, in display order.
    options: Vec<String>,

    /// How many options may be selected at the same time.
    #[serde(default = "one")]
    max_selections: usize,
}

fn one() -> usize {
    1
}

impl Question {
    /// Create a new question.
    pub fn new<I, S>(
        id: QuestionId,
        title: impl Into<String>,
        options: I,
        max_selections: usize,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            title: title.into(),
            options: options.into_iter().map(Into::into).collect(),
            max_selections,
        }
    }

    /// Create a single-choice question.
    pub fn single<I, S>(id: QuestionId, title: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, title, options, 1)
    }

    /// Create a multi-choice question allowing up to `max_selections` options.
    pub fn multi<I, S>(
        id: QuestionId,
        title: impl Into<String>,
        options: I,
        max_selections: usize,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(id, title, options, max_selections)
    }

    /// Get the question id.
    pub fn id(&self) -> QuestionId {
        self.id
    }

    /// Get the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the options in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Get the selection cap.
    pub fn max_selections(&self) -> usize {
        self.max_selections
    }

    /// Check if only one option can be selected at a time.
    pub fn is_single_choice(&self) -> bool {
        self.max_selections == 1
    }

    /// Check if `option` is one of this question's options.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_choice() {
        let q = Question::single(1, "Pick one", ["A", "B"]);
        assert!(q.is_single_choice());
        assert_eq!(q.options(), ["A", "B"]);
        assert!(q.has_option("B"));
        assert!(!q.has_option("C"));
    }

    #[test]
    fn max_selections_defaults_to_one() {
        let q: Question =
            serde_json::from_str(r#"{"id": 1, "title": "Age", "options": ["<18", "18+"]}"#)
                .unwrap();
        assert_eq!(q.max_selections(), 1);
    }
}
