use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::mongodb::Coll;

/// Counter allocating question IDs.
pub const QUESTION_ID_COUNTER: &str = "question_id";

/// Counter allocating choice IDs.
pub const CHOICE_ID_COUNTER: &str = "choice_id";

/// A counter object used to implement auto-increment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Atomically take the next value of the counter with the given name.
    ///
    /// A counter that does not exist yet is created, so the first value is 1.
    pub async fn next(counters: &Coll<Counter>, name: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": name }, update, options)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    format!("Failed to find counter '{name}'"),
                )
            })?;
        Ok(counter.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[backend_test]
    async fn counter_starts_at_one_and_increments(counters: Coll<Counter>) {
        assert_eq!(Counter::next(&counters, QUESTION_ID_COUNTER).await.unwrap(), 1);
        assert_eq!(Counter::next(&counters, QUESTION_ID_COUNTER).await.unwrap(), 2);

        // Counters are independent.
        assert_eq!(Counter::next(&counters, CHOICE_ID_COUNTER).await.unwrap(), 1);

        let stored = counters
            .find_one(doc! { "_id": QUESTION_ID_COUNTER }, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.next, 2);
    }
}
