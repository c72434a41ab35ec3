//! Terminal menus over the flow controller.

use dialoguer::{Select, theme::ColorfulTheme};
use onboard::{Flow, FlowError, FlowState, Question, Selection, Session, ToggleOutcome};
use thiserror::Error;
use tracing::debug;

/// Error type for the Dialoguer front end.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the questionnaire (e.g., pressed Escape or Ctrl+C).
    #[error("Questionnaire cancelled by user")]
    Cancelled,

    /// The access token was turned away.
    #[error("{0}")]
    Rejected(String),

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// The flow refused an event.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

/// A row of a question menu.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Answer(String),
    Next,
    Back,
    Skip,
}

fn question_menu(question: &Question) -> Vec<Entry> {
    question
        .options()
        .iter()
        .cloned()
        .map(Entry::Answer)
        .chain([Entry::Next, Entry::Back, Entry::Skip])
        .collect()
}

fn entry_label(entry: &Entry, selection: &Selection) -> String {
    match entry {
        Entry::Answer(option) if selection.contains(option) => format!("[✓] {option}"),
        Entry::Answer(option) => format!("[ ] {option}"),
        Entry::Next if selection.is_empty() => "Next (pick an answer first)".to_string(),
        Entry::Next => "Next".to_string(),
        Entry::Back => "Back".to_string(),
        Entry::Skip => "Skip the rest".to_string(),
    }
}

fn question_prompt(question: &Question, (n, total): (usize, usize)) -> String {
    if question.is_single_choice() {
        format!("[{n}/{total}] {}", question.title())
    } else {
        format!(
            "[{n}/{total}] {} (pick up to {})",
            question.title(),
            question.max_selections()
        )
    }
}

/// Dialoguer front end for interactive CLI sessions.
#[derive(Debug, Default, Clone)]
pub struct DialoguerFrontend {
    /// Use colorful theme for prompts.
    colorful: bool,
}

impl DialoguerFrontend {
    /// Create a front end with the default (colorful) theme.
    pub fn new() -> Self {
        Self { colorful: true }
    }

    /// Create a front end with plain (no color) theme.
    pub fn plain() -> Self {
        Self { colorful: false }
    }

    /// Walk `flow` from wherever it is to `Completed`.
    ///
    /// The token is only used if the flow is still unauthenticated. A rejected
    /// token ends the run with [`DialoguerError::Rejected`] carrying the
    /// message meant for the visitor.
    pub async fn run(&self, flow: &mut Flow, token: &str) -> Result<FlowState, DialoguerError> {
        loop {
            match flow.state() {
                FlowState::Unauthenticated => {
                    if flow.authenticate(token).await? == FlowState::Unauthenticated {
                        let message = flow
                            .auth_error()
                            .map(ToString::to_string)
                            .unwrap_or_default();
                        return Err(DialoguerError::Rejected(message));
                    }
                }
                FlowState::Welcome => self.welcome(flow).await?,
                FlowState::Question(_) => self.question(flow).await?,
                FlowState::Completed => {
                    if let Some(epilogue) = flow.catalog().epilogue() {
                        println!();
                        println!("{epilogue}");
                    }
                    return Ok(FlowState::Completed);
                }
            }
        }
    }

    async fn welcome(&self, flow: &mut Flow) -> Result<(), DialoguerError> {
        let name = flow.session().map(Session::short_id).unwrap_or_default();
        println!("Hello {name}");
        if let Some(prelude) = flow.catalog().prelude() {
            println!("{prelude}");
        }
        println!();

        let items = [
            "Start".to_string(),
            format!("Skip ({} questions)", flow.catalog().count()),
        ];
        match self.select("Ready?", &items, 0)? {
            0 => flow.start()?,
            _ => flow.skip().await?,
        };
        Ok(())
    }

    /// Stay on one question screen until the flow moves off it.
    async fn question(&self, flow: &mut Flow) -> Result<(), DialoguerError> {
        let screen = flow.state();
        let mut cursor = 0;

        while flow.state() == screen {
            let (Some(question), Some(progress)) = (flow.current_question(), flow.progress())
            else {
                break;
            };
            let selection = flow.current_selection().cloned().unwrap_or_default();
            let entries = question_menu(question);
            let labels: Vec<String> = entries
                .iter()
                .map(|entry| entry_label(entry, &selection))
                .collect();
            let prompt = question_prompt(question, progress);
            let max = question.max_selections();

            cursor = self.select(&prompt, &labels, cursor)?;
            match &entries[cursor] {
                Entry::Answer(option) => {
                    let (_, outcome) = flow.toggle(option)?;
                    debug!(option = %option, ?outcome, "toggled");
                    if outcome == ToggleOutcome::LimitReached {
                        println!("You can pick at most {max} answers here.");
                    }
                }
                Entry::Next => match flow.next().await {
                    Ok(_) => {}
                    Err(err @ FlowError::SelectionRequired { .. }) => println!("{err}"),
                    Err(err) => return Err(err.into()),
                },
                Entry::Back => {
                    flow.prev()?;
                }
                Entry::Skip => {
                    flow.skip().await?;
                }
            }
        }
        Ok(())
    }

    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<usize, DialoguerError> {
        let theme = ColorfulTheme::default();
        let builder = if self.colorful {
            Select::with_theme(&theme)
        } else {
            Select::new()
        };

        match builder
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()
        {
            Ok(Some(index)) => Ok(index),
            Ok(None) => Err(DialoguerError::Cancelled),
            Err(e) if is_cancelled(&e) => Err(DialoguerError::Cancelled),
            Err(e) => Err(DialoguerError::Dialoguer(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Question {
        Question::multi(2, "Favourite colours?", ["Red", "Green", "Blue"], 2)
    }

    #[test]
    fn menu_lists_options_then_navigation() {
        let menu = question_menu(&colors());
        assert_eq!(
            menu,
            [
                Entry::Answer("Red".to_string()),
                Entry::Answer("Green".to_string()),
                Entry::Answer("Blue".to_string()),
                Entry::Next,
                Entry::Back,
                Entry::Skip,
            ]
        );
    }

    #[test]
    fn labels_mark_selection() {
        let selection: Selection = ["Green"].into_iter().collect();
        let labels: Vec<_> = question_menu(&colors())
            .iter()
            .map(|entry| entry_label(entry, &selection))
            .collect();
        assert_eq!(labels[0], "[ ] Red");
        assert_eq!(labels[1], "[✓] Green");
        assert_eq!(labels[3], "Next");
    }

    #[test]
    fn next_label_hints_when_empty() {
        assert_eq!(
            entry_label(&Entry::Next, &Selection::default()),
            "Next (pick an answer first)"
        );
    }

    #[test]
    fn prompts_show_progress_and_cap() {
        assert_eq!(
            question_prompt(&colors(), (2, 5)),
            "[2/5] Favourite colours? (pick up to 2)"
        );
        let single = Question::single(1, "Pick one", ["A", "B"]);
        assert_eq!(question_prompt(&single, (1, 5)), "[1/5] Pick one");
    }
}
