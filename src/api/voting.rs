use chrono::Utc;
use rocket::{form::Form, response::Redirect, Route};
use rocket_dyn_templates::{context, Template};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::{PollDesc, VoteForm, NO_CHOICE_MESSAGE},
    db::{Choice, Question, QuestionId},
    mongodb::Coll,
};

use super::common::{visible_poll, FormResponse};

pub fn routes() -> Vec<Route> {
    routes![vote]
}

#[post("/<question_id>/vote", data = "<vote>")]
pub async fn vote(
    req_id: &RequestId,
    question_id: QuestionId,
    vote: Form<VoteForm>,
    questions: Coll<Question>,
    choices: Coll<Choice>,
) -> Result<FormResponse> {
    let now = Utc::now();
    let poll = visible_poll(question_id, &questions, now).await?;

    let counted = match vote.choice {
        Some(choice_id) => Choice::add_vote(&choices, question_id, choice_id).await?,
        None => false,
    };
    if !counted {
        debug!("req{req_id}: no valid choice in vote for question {question_id}");
        return Ok(FormResponse::Rerender(Template::render(
            "polls/detail",
            context! {
                question: PollDesc::new(&poll, now),
                error_message: NO_CHOICE_MESSAGE,
            },
        )));
    }

    info!(
        "req{req_id}: vote counted for choice {:?} on question {question_id}",
        vote.choice
    );
    Ok(FormResponse::Redirect(Redirect::to(uri!(
        super::public::results(question_id)
    ))))
}
