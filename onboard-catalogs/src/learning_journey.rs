//! The "personalized learning journey" onboarding questionnaire.
//!
//! Two variants are in use: the standard ten-question catalog, and an
//! extended one that asks about region and offers more gender options.

use onboard::{Question, QuestionCatalog};

const PRELUDE: &str = "Welcome to your personalized learning journey";
const EPILOGUE: &str = "Thanks! Your learning path is being prepared.";

static GENDER: [&str; 2] = ["Male", "Female"];
static GENDER_EXTENDED: [&str; 5] = [
    "Male",
    "Female",
    "Non-binary",
    "Other",
    "Prefer not to say",
];

type Row = (&'static str, &'static [&'static str], usize);

fn row(title: &'static str, options: &'static [&'static str], max_selections: usize) -> Row {
    (title, options, max_selections)
}

/// Build a catalog from rows, numbering them in order.
fn numbered(rows: Vec<Row>) -> QuestionCatalog {
    let questions = rows
        .into_iter()
        .enumerate()
        .map(|(index, (title, options, max))| {
            Question::new(index + 1, title, options.iter().copied(), max)
        })
        .collect();
    QuestionCatalog::new(questions)
        .expect("built-in catalog has contiguous ids and unique options")
        .with_prelude(PRELUDE)
        .with_epilogue(EPILOGUE)
}

fn common_rows() -> Vec<Row> {
    vec![
        row(
            "How old are you?",
            &["Under 18", "18-24", "25-34", "35-44", "45+"],
            1,
        ),
        row(
            "What is your highest level of education?",
            &[
                "High school",
                "Bachelor's degree",
                "Master's degree",
                "Doctorate",
                "Other",
            ],
            1,
        ),
        row(
            "What best describes your current situation?",
            &[
                "Student",
                "Employed",
                "Self-employed",
                "Looking for work",
                "Other",
            ],
            1,
        ),
        row(
            "What would you like to learn?",
            &[
                "Programming",
                "Data science",
                "Design",
                "Languages",
                "Business",
                "Music",
            ],
            3,
        ),
        row(
            "What are your main goals?",
            &[
                "Career change",
                "Skill upgrade",
                "Personal interest",
                "Certification",
            ],
            2,
        ),
        row(
            "How much time can you dedicate each week?",
            &[
                "Less than 2 hours",
                "2-5 hours",
                "5-10 hours",
                "More than 10 hours",
            ],
            1,
        ),
        row(
            "How do you prefer to learn?",
            &["Videos", "Reading", "Interactive exercises", "Live sessions"],
            2,
        ),
        row(
            "How would you rate your current experience?",
            &["Beginner", "Intermediate", "Advanced"],
            1,
        ),
        row(
            "How did you hear about us?",
            &[
                "Friend",
                "Social media",
                "Search engine",
                "Advertisement",
                "Other",
            ],
            1,
        ),
    ]
}

/// The standard ten-question catalog.
pub fn learning_journey() -> QuestionCatalog {
    let mut rows = vec![row("What is your gender?", &GENDER, 1)];
    rows.extend(common_rows());
    numbered(rows)
}

/// The eleven-question catalog with a region question and five gender options.
pub fn learning_journey_extended() -> QuestionCatalog {
    let mut rows = vec![row("What is your gender?", &GENDER_EXTENDED, 1)];
    let mut common = common_rows().into_iter();
    rows.extend(common.next());
    rows.push(row(
        "Where are you based?",
        &[
            "Europe",
            "North America",
            "South America",
            "Africa",
            "Asia",
            "Oceania",
        ],
        1,
    ));
    rows.extend(common);
    numbered(rows)
}
