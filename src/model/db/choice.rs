use std::ops::{Deref, DerefMut};

use mongodb::{bson::doc, options::FindOptions};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::db::{Question, QuestionId};
use crate::model::mongodb::{Coll, Counter, CHOICE_ID_COUNTER};

pub type ChoiceId = u32;

/// Core choice data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCore {
    /// The question this is an answer to.
    pub question_id: QuestionId,
    /// The answer text.
    pub choice_text: String,
    /// Votes cast so far.
    pub votes: u32,
}

impl ChoiceCore {
    pub fn new(question_id: QuestionId, choice_text: impl Into<String>, votes: u32) -> Self {
        Self {
            question_id,
            choice_text: choice_text.into(),
            votes,
        }
    }
}

/// A choice without an ID.
pub type NewChoice = ChoiceCore;

/// A choice from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "_id")]
    pub id: ChoiceId,
    #[serde(flatten)]
    pub choice: ChoiceCore,
}

impl Choice {
    /// Allocate an ID for the new choice and insert it.
    /// Fails with a 404 if the owning question does not exist.
    pub async fn create(
        choices: &Coll<Choice>,
        questions: &Coll<Question>,
        counters: &Coll<Counter>,
        choice: NewChoice,
    ) -> Result<Choice> {
        let owner = questions
            .count_documents(doc! { "_id": choice.question_id }, None)
            .await?;
        if owner == 0 {
            return Err(Error::not_found(format!(
                "Question with ID '{}'",
                choice.question_id
            )));
        }

        let id = Counter::next(counters, CHOICE_ID_COUNTER).await?;
        let choice = Choice { id, choice };
        choices.insert_one(&choice, None).await?;
        Ok(choice)
    }

    /// Atomically add one vote to the choice, server-side.
    ///
    /// Returns false, changing nothing, unless the choice exists and belongs
    /// to the given question.
    pub async fn add_vote(
        choices: &Coll<Choice>,
        question_id: QuestionId,
        choice_id: ChoiceId,
    ) -> Result<bool> {
        let filter = doc! {
            "_id": choice_id,
            "question_id": question_id,
        };
        let update = doc! {
            "$inc": { "votes": 1 }
        };
        let result = choices.update_one(filter, update, None).await?;
        Ok(result.matched_count == 1)
    }

    /// All choices of the given question, in creation order.
    pub async fn of_question(
        choices: &Coll<Choice>,
        question_id: QuestionId,
    ) -> Result<Vec<Choice>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let found = choices
            .find(doc! { "question_id": question_id }, options)
            .await?
            .try_collect()
            .await?;
        Ok(found)
    }
}

impl Deref for Choice {
    type Target = ChoiceCore;

    fn deref(&self) -> &Self::Target {
        &self.choice
    }
}

impl DerefMut for Choice {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.choice
    }
}
