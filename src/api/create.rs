use chrono::Utc;
use rocket::{form::Form, response::Redirect, Route};
use rocket_dyn_templates::{context, Template};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::{QuestionForm, BLANK_QUESTION_MESSAGE},
    db::{NewQuestion, Question},
    mongodb::{Coll, Counter},
};

use super::common::FormResponse;

pub fn routes() -> Vec<Route> {
    routes![create_form, create_question]
}

#[get("/create")]
pub fn create_form() -> Template {
    Template::render("polls/create", context! {})
}

/// Create a question published now. It has no choices yet, so it stays off
/// the public pages until some are added.
#[post("/create", data = "<form>")]
pub async fn create_question(
    req_id: &RequestId,
    form: Form<QuestionForm>,
    questions: Coll<Question>,
    counters: Coll<Counter>,
) -> Result<FormResponse> {
    let Some(question_text) = form.question_text() else {
        debug!("req{req_id}: rejected blank question");
        return Ok(FormResponse::Rerender(Template::render(
            "polls/create",
            context! { error_message: BLANK_QUESTION_MESSAGE },
        )));
    };

    let question = Question::create(
        &questions,
        &counters,
        NewQuestion::new(question_text, Utc::now()),
    )
    .await?;
    info!("req{req_id}: created question {}", question.id);

    Ok(FormResponse::Redirect(Redirect::to(uri!(super::public::index))))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mongodb::{bson::doc, Database};
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::{Client, LocalResponse},
    };

    use super::*;

    async fn post_question<'c>(client: &'c Client, body: &str) -> LocalResponse<'c> {
        client
            .post(uri!(create_question))
            .header(ContentType::Form)
            .body(body.to_string())
            .dispatch()
            .await
    }

    #[backend_test]
    async fn form_is_shown(client: Client) {
        let response = client.get(uri!(create_form)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert!(response.into_string().await.unwrap().contains("name=\"q\""));
    }

    #[backend_test]
    async fn blank_question_is_rejected(client: Client, questions: Coll<Question>) {
        for body in ["", "q=", "q=+++"] {
            let response = post_question(&client, body).await;
            assert_eq!(response.status(), Status::Ok);
            let page = response.into_string().await.unwrap();
            assert!(page.contains(BLANK_QUESTION_MESSAGE));
        }

        assert_eq!(questions.count_documents(None, None).await.unwrap(), 0);
    }

    #[backend_test]
    async fn question_is_created_and_redirects(client: Client, db: Database) {
        let questions = Coll::<Question>::from_db(&db);
        let before = Utc::now();

        let response = post_question(&client, "q=What%27s+new%3F").await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(response.headers().get_one("Location"), Some("/"));

        assert_eq!(questions.count_documents(None, None).await.unwrap(), 1);
        let question = questions
            .find_one(doc! { "question_text": "What's new?" }, None)
            .await
            .unwrap()
            .unwrap();
        assert!(question.pub_date >= before - Duration::seconds(1));
        assert!(question.pub_date <= Utc::now());

        // No choices yet, so it is not listed.
        let index = client.get(uri!(super::super::public::index)).dispatch().await;
        let page = index.into_string().await.unwrap();
        assert!(page.contains("No polls are available."));
    }

    #[backend_test]
    async fn paths_with_trailing_slash_reach_create(client: Client, questions: Coll<Question>) {
        let response = client.get("/create/").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .post("/create/")
            .header(ContentType::Form)
            .body("q=Slashed")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(questions.count_documents(None, None).await.unwrap(), 1);
    }

    #[backend_test]
    async fn created_questions_get_distinct_ids(client: Client, questions: Coll<Question>) {
        post_question(&client, "q=First").await;
        post_question(&client, "q=Second").await;

        let first = questions
            .find_one(doc! { "question_text": "First" }, None)
            .await
            .unwrap()
            .unwrap();
        let second = questions
            .find_one(doc! { "question_text": "Second" }, None)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(first.id, second.id);
    }
}
