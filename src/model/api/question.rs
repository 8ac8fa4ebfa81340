use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::db::{Choice, ChoiceId, Poll, Question, QuestionId};

/// How publication dates are shown on the pages.
const PUB_DATE_FORMAT: &str = "%B %-d, %Y, %H:%M";

/// A question as listed on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub id: QuestionId,
    pub question_text: String,
    pub pub_date: String,
    pub published_recently: bool,
}

impl QuestionSummary {
    pub fn new(question: &Question, now: DateTime<Utc>) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            pub_date: question.pub_date.format(PUB_DATE_FORMAT).to_string(),
            published_recently: question.was_published_recently(now),
        }
    }
}

/// A choice with its current tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceDesc {
    pub id: ChoiceId,
    pub choice_text: String,
    pub votes: u32,
    /// "vote" or "votes", to agree with the tally.
    pub votes_label: &'static str,
}

impl From<&Choice> for ChoiceDesc {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            choice_text: choice.choice_text.clone(),
            votes: choice.votes,
            votes_label: if choice.votes == 1 { "vote" } else { "votes" },
        }
    }
}

/// A question and its choices, as shown by the detail and results pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollDesc {
    #[serde(flatten)]
    pub question: QuestionSummary,
    pub choices: Vec<ChoiceDesc>,
    pub total_votes: u64,
}

impl PollDesc {
    pub fn new(poll: &Poll, now: DateTime<Utc>) -> Self {
        Self {
            question: QuestionSummary::new(&poll.question, now),
            choices: poll.choices.iter().map(ChoiceDesc::from).collect(),
            total_votes: poll.total_votes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    use crate::model::db::{ChoiceCore, QuestionCore};

    fn poll(pub_date: DateTime<Utc>) -> Poll {
        let question = Question {
            id: 3,
            question: QuestionCore::new("What's up?", pub_date),
        };
        let choices = [(1, "Not much", 1), (2, "The sky", 4)]
            .into_iter()
            .map(|(id, text, votes)| Choice {
                id,
                choice: ChoiceCore::new(question.id, text, votes),
            })
            .collect();
        Poll { question, choices }
    }

    #[test]
    fn describes_poll() {
        let pub_date = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let desc = PollDesc::new(&poll(pub_date), pub_date + Duration::hours(1));

        assert_eq!(desc.question.id, 3);
        assert_eq!(desc.question.pub_date, "March 7, 2024, 09:05");
        assert!(desc.question.published_recently);
        assert_eq!(desc.total_votes, 5);
        assert_eq!(desc.choices[0].votes_label, "vote");
        assert_eq!(desc.choices[1].votes_label, "votes");
    }

    #[test]
    fn old_poll_is_not_recent() {
        let pub_date = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        let desc = PollDesc::new(&poll(pub_date), pub_date + Duration::days(3));
        assert!(!desc.question.published_recently);
    }
}
