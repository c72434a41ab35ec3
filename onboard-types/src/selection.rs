use serde::{Deserialize, Serialize};

/// The options chosen for one question, in the order they were picked.
///
/// Removing an option never reorders the remaining ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    options: Vec<String>,
}

/// What a toggle did to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The option was not selected and has been appended.
    Added,

    /// The option was selected and has been removed.
    Removed,

    /// Single-choice question: the previous option was evicted in favour of this one.
    Replaced,

    /// The selection is full; nothing changed.
    LimitReached,
}

impl ToggleOutcome {
    /// Check if the toggle left the selection untouched.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::LimitReached)
    }
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `option` is selected.
    pub fn contains(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Number of selected options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The selected options in pick order.
    pub fn as_slice(&self) -> &[String] {
        &self.options
    }

    /// Iterate over the selected options in pick order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    /// Remove every option.
    pub fn clear(&mut self) {
        self.options.clear();
    }

    /// Toggle `option` under a cap of `max_selections`.
    ///
    /// - A selected option is always removed.
    /// - With a cap of 1, an unselected option replaces whatever was selected.
    /// - With a larger cap, an unselected option is appended only while the
    ///   selection holds fewer than `max_selections` options.
    pub fn toggle(&mut self, option: &str, max_selections: usize) -> ToggleOutcome {
        if let Some(pos) = self.options.iter().position(|o| o == option) {
            self.options.remove(pos);
            return ToggleOutcome::Removed;
        }

        if max_selections == 1 {
            let replaced = !self.options.is_empty();
            self.options.clear();
            self.options.push(option.to_string());
            return if replaced {
                ToggleOutcome::Replaced
            } else {
                ToggleOutcome::Added
            };
        }

        if self.options.len() < max_selections {
            self.options.push(option.to_string());
            ToggleOutcome::Added
        } else {
            ToggleOutcome::LimitReached
        }
    }
}

/// Pure form of [`Selection::toggle`]: returns the selection that results from
/// toggling `option` in `current`.
pub fn toggle_selection(current: &Selection, option: &str, max_selections: usize) -> Selection {
    let mut next = current.clone();
    next.toggle(option, max_selections);
    next
}

impl<S: Into<String>> FromIterator<S> for Selection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(options: &[&str]) -> Selection {
        options.iter().copied().collect()
    }

    #[test]
    fn single_choice_replaces() {
        let mut s = Selection::new();
        assert_eq!(s.toggle("A", 1), ToggleOutcome::Added);
        assert_eq!(s.toggle("B", 1), ToggleOutcome::Replaced);
        assert_eq!(s, sel(&["B"]));
    }

    #[test]
    fn single_choice_toggle_off() {
        let mut s = sel(&["A"]);
        assert_eq!(s.toggle("A", 1), ToggleOutcome::Removed);
        assert!(s.is_empty());
    }

    #[test]
    fn multi_choice_respects_cap() {
        let mut s = Selection::new();
        s.toggle("X", 2);
        s.toggle("Y", 2);
        assert_eq!(s.toggle("Z", 2), ToggleOutcome::LimitReached);
        assert_eq!(s, sel(&["X", "Y"]));
    }

    #[test]
    fn removal_keeps_order() {
        let mut s = sel(&["X", "Y", "Z"]);
        s.toggle("Y", 3);
        assert_eq!(s.as_slice(), ["X", "Z"]);
        s.toggle("Y", 3);
        assert_eq!(s.as_slice(), ["X", "Z", "Y"]);
    }

    #[test]
    fn removal_ignores_cap() {
        let mut s = sel(&["X", "Y"]);
        assert_eq!(s.toggle("X", 2), ToggleOutcome::Removed);
        assert_eq!(s.as_slice(), ["Y"]);
    }

    #[test]
    fn pure_toggle_leaves_input_alone() {
        let current = sel(&["A"]);
        let next = toggle_selection(&current, "B", 1);
        assert_eq!(current, sel(&["A"]));
        assert_eq!(next, sel(&["B"]));
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&sel(&["X", "Y"])).unwrap();
        assert_eq!(json, r#"["X","Y"]"#);
    }
}
