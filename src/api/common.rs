use chrono::{DateTime, Utc};
use rocket::{response::Redirect, Request};
use rocket_dyn_templates::{context, Template};

use crate::error::{Error, Result};
use crate::model::{
    db::{Poll, Question, QuestionId},
    mongodb::Coll,
};

/// The outcome of a form submission: the form again with an error message,
/// or a redirect once the submission has been acted on.
#[derive(Debug, Responder)]
pub enum FormResponse {
    Rerender(Template),
    Redirect(Redirect),
}

/// Load a poll that may be shown at `now`, or 404.
///
/// Unpublished questions and those without choices are reported exactly like
/// missing ones.
pub async fn visible_poll(
    question_id: QuestionId,
    questions: &Coll<Question>,
    now: DateTime<Utc>,
) -> Result<Poll> {
    Poll::visible_by_id(questions, question_id, now)
        .await?
        .ok_or_else(|| Error::not_found(format!("Question with ID '{question_id}'")))
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Template {
    Template::render("error/404", context! { path: req.uri().path().to_string() })
}
