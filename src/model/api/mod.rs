//! Types exchanged with the browser: page contexts for the templates, and
//! submitted forms.

mod form;
pub use form::{QuestionForm, VoteForm};

mod question;
pub use question::{ChoiceDesc, PollDesc, QuestionSummary};

/// Shown when a vote arrives without a valid choice.
pub const NO_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// Shown when a question is submitted without any text.
pub const BLANK_QUESTION_MESSAGE: &str = "Please enter a valid question.";
