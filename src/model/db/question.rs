use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Duration, Utc};
use mongodb::{
    bson::{doc, serde_helpers::chrono_datetime_as_bson_datetime},
    options::FindOptions,
};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::mongodb::{Coll, Counter, QUESTION_ID_COUNTER};

pub type QuestionId = u32;

/// Core question data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// The poll prompt.
    pub question_text: String,
    /// When the question becomes visible.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub pub_date: DateTime<Utc>,
}

impl QuestionCore {
    pub fn new(question_text: impl Into<String>, pub_date: DateTime<Utc>) -> Self {
        Self {
            question_text: question_text.into(),
            pub_date,
        }
    }

    /// True iff published within the day before `now`, and not in the future.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

/// A question without an ID.
pub type NewQuestion = QuestionCore;

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    #[serde(flatten)]
    pub question: QuestionCore,
}

impl Question {
    /// Allocate an ID for the new question and insert it.
    pub async fn create(
        questions: &Coll<Question>,
        counters: &Coll<Counter>,
        question: NewQuestion,
    ) -> Result<Question> {
        let id = Counter::next(counters, QUESTION_ID_COUNTER).await?;
        let question = Question { id, question };
        questions.insert_one(&question, None).await?;
        Ok(question)
    }

    /// Every question, published or not, newest first.
    pub async fn newest_first(questions: &Coll<Question>) -> Result<Vec<Question>> {
        let options = FindOptions::builder()
            .sort(doc! { "pub_date": -1, "_id": -1 })
            .build();
        let all = questions.find(None, options).await?.try_collect().await?;
        Ok(all)
    }
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.question
    }
}

impl DerefMut for Question {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.question
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_question_is_not_recent() {
        let now = Utc::now();
        let question = QuestionCore::new("Future", now + Duration::days(30));
        assert!(!question.was_published_recently(now));
    }

    #[test]
    fn old_question_is_not_recent() {
        let now = Utc::now();
        let question = QuestionCore::new("Old", now - Duration::days(1) - Duration::seconds(1));
        assert!(!question.was_published_recently(now));
    }

    #[test]
    fn recent_question_is_recent() {
        let now = Utc::now();
        let pub_date = now - Duration::hours(23) - Duration::minutes(59) - Duration::seconds(59);
        let question = QuestionCore::new("Recent", pub_date);
        assert!(question.was_published_recently(now));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = Utc::now();
        assert!(QuestionCore::new("Now", now).was_published_recently(now));
        assert!(QuestionCore::new("Day old", now - Duration::days(1)).was_published_recently(now));
    }

    #[backend_test]
    async fn create_allocates_sequential_ids(questions: Coll<Question>, counters: Coll<Counter>) {
        let first = Question::create(&questions, &counters, NewQuestion::example("One", -1))
            .await
            .unwrap();
        let second = Question::create(&questions, &counters, NewQuestion::example("Two", -1))
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let stored = questions
            .find_one(doc! { "_id": second.id }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.question_text, "Two");
        // BSON datetimes only keep milliseconds.
        assert!((stored.pub_date - second.pub_date).num_milliseconds().abs() < 1);
    }

    #[backend_test]
    async fn newest_first_includes_unpublished(
        questions: Coll<Question>,
        counters: Coll<Counter>,
    ) {
        for (text, days) in [("Old", -10), ("Future", 3), ("Recent", -1)] {
            Question::create(&questions, &counters, NewQuestion::example(text, days))
                .await
                .unwrap();
        }

        let texts = Question::newest_first(&questions)
            .await
            .unwrap()
            .into_iter()
            .map(|question| question.question.question_text)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["Future", "Recent", "Old"]);
    }
}
