//! DB-compatible (e.g. de/serialisable) types.
//!
//! IDs are small integers allocated from the `counters` collection, and
//! datetimes are serialised in MongoDB's own format.

mod choice;
pub use choice::{Choice, ChoiceCore, ChoiceId, NewChoice};

mod poll;
pub use poll::Poll;

mod question;
pub use question::{NewQuestion, Question, QuestionCore, QuestionId};
