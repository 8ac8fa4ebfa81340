use chrono::Utc;
use rocket::{Route, State};
use rocket_dyn_templates::{context, Template};

use crate::error::Result;
use crate::model::{
    api::{PollDesc, QuestionSummary},
    db::{Poll, Question, QuestionId},
    mongodb::Coll,
};
use crate::Config;

use super::common::visible_poll;

pub fn routes() -> Vec<Route> {
    routes![index, detail, results]
}

#[get("/")]
pub async fn index(questions: Coll<Question>, config: &State<Config>) -> Result<Template> {
    let now = Utc::now();
    let latest_question_list = Poll::latest(&questions, now, config.latest_questions())
        .await?
        .iter()
        .map(|poll| QuestionSummary::new(&poll.question, now))
        .collect::<Vec<_>>();

    Ok(Template::render(
        "polls/index",
        context! { latest_question_list },
    ))
}

#[get("/<question_id>")]
pub async fn detail(question_id: QuestionId, questions: Coll<Question>) -> Result<Template> {
    let now = Utc::now();
    let poll = visible_poll(question_id, &questions, now).await?;

    Ok(Template::render(
        "polls/detail",
        context! { question: PollDesc::new(&poll, now) },
    ))
}

#[get("/<question_id>/results")]
pub async fn results(question_id: QuestionId, questions: Coll<Question>) -> Result<Template> {
    let now = Utc::now();
    let poll = visible_poll(question_id, &questions, now).await?;

    Ok(Template::render(
        "polls/results",
        context! { question: PollDesc::new(&poll, now) },
    ))
}
