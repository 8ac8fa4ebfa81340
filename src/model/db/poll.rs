use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, DateTime as BsonDateTime, Document};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::db::{Choice, Question, QuestionId};
use crate::model::mongodb::{Coll, MongoCollection};

/// A question together with all of its choices, ordered by choice ID.
///
/// Only questions that are visible can be loaded as a `Poll`: those published
/// no later than the given instant, with at least one choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub question: Question,
    pub choices: Vec<Choice>,
}

impl Poll {
    /// The `limit` most recently published visible polls, newest first.
    pub async fn latest(
        questions: &Coll<Question>,
        now: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Poll>> {
        let mut pipeline = visible_pipeline(doc! {}, now);
        pipeline.push(doc! { "$limit": i64::from(limit) });

        let docs = questions
            .aggregate(pipeline, None)
            .await?
            .try_collect::<Vec<Document>>()
            .await?;
        let polls = docs
            .into_iter()
            .map(bson::from_document)
            .collect::<std::result::Result<Vec<Poll>, _>>()?;
        Ok(polls)
    }

    /// The poll with the given question ID, if it is visible.
    pub async fn visible_by_id(
        questions: &Coll<Question>,
        question_id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<Option<Poll>> {
        let pipeline = visible_pipeline(doc! { "_id": question_id }, now);
        let mut cursor = questions.aggregate(pipeline, None).await?;
        match cursor.try_next().await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Total votes across all choices.
    pub fn total_votes(&self) -> u64 {
        self.choices.iter().map(|c| u64::from(c.votes)).sum()
    }
}

/// Aggregation stages matching visible questions (plus any extra `filter`),
/// each joined with its choices and reshaped into a [`Poll`] document.
///
/// Choices are joined per question rather than question rows per choice, so
/// a question with many choices still appears once.
fn visible_pipeline(mut filter: Document, now: DateTime<Utc>) -> Vec<Document> {
    filter.insert("pub_date", doc! { "$lte": BsonDateTime::from_chrono(now) });
    vec![
        doc! { "$match": filter },
        doc! { "$sort": { "pub_date": -1, "_id": -1 } },
        doc! {
            "$lookup": {
                "from": Choice::NAME,
                "let": { "question_id": "$_id" },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$question_id", "$$question_id"] } } },
                    { "$sort": { "_id": 1 } }
                ],
                "as": "choices",
            }
        },
        doc! { "$match": { "choices.0": { "$exists": true } } },
        doc! {
            "$project": {
                "_id": 0,
                "question": {
                    "_id": "$_id",
                    "question_text": "$question_text",
                    "pub_date": "$pub_date",
                },
                "choices": 1,
            }
        },
    ]
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use mongodb::Database;

    use super::*;

    use crate::model::db::{NewChoice, NewQuestion};
    use crate::model::mongodb::Counter;

    impl Poll {
        /// Insert a question published `days` from now (negative for the
        /// past), with the given choices, each starting at zero votes.
        pub async fn insert_example(db: &Database, text: &str, days: i64, choices: &[&str]) -> Poll {
            let questions = Coll::<Question>::from_db(db);
            let counters = Coll::<Counter>::from_db(db);
            let question = Question::create(&questions, &counters, NewQuestion::example(text, days))
                .await
                .unwrap();
            let mut created = Vec::new();
            for choice_text in choices {
                let choice = Choice::create(
                    &Coll::from_db(db),
                    &questions,
                    &counters,
                    NewChoice::new(question.id, *choice_text, 0),
                )
                .await
                .unwrap();
                created.push(choice);
            }
            Poll {
                question,
                choices: created,
            }
        }
    }
}
