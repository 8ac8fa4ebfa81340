//! Data types, split by where they live.
//!
//! - [`db`]: documents as stored in MongoDB, plus the queries over them.
//! - [`api`]: what the templates see, and what the forms submit.
//! - [`mongodb`]: collection plumbing shared by the above.

pub mod api;
pub mod db;
pub mod mongodb;
