//! A small CLI for managing polls directly in the database.
//! Questions can be created through the site, but choices can only be added here.

use chrono::{Duration, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use thiserror::Error;

use polls::config::DbConfig;
use polls::model::{
    db::{Choice, NewChoice, NewQuestion, Question, QuestionId},
    mongodb::{ensure_indexes_exist, Coll, Counter},
};

const PROGRAM_NAME: &str = "polls-admin";

const ABOUT_TEXT: &str = "Manage the questions and choices of the polls site.

The database is the one configured for the server, via `Rocket.toml`
or `ROCKET_DB_URI` and `ROCKET_DB_NAME`.";

const ADD_QUESTION: &str = "add-question";
const ADD_CHOICE: &str = "add-choice";
const LIST: &str = "list";

const TEXT: &str = "TEXT";
const DAYS: &str = "DAYS";
const QUESTION_ID: &str = "QUESTION_ID";
const VOTES: &str = "VOTES";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .subcommand(
            Command::new(ADD_QUESTION)
                .about("Create a question")
                .arg(
                    Arg::new(TEXT)
                        .help("The question to ask")
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(DAYS)
                        .long("days")
                        .help("Publish this many days from now; negative for the past")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .default_value("0"),
                ),
        )
        .subcommand(
            Command::new(ADD_CHOICE)
                .about("Add a choice to an existing question")
                .arg(
                    Arg::new(QUESTION_ID)
                        .help("The question to add the choice to")
                        .value_parser(value_parser!(QuestionId))
                        .required(true),
                )
                .arg(
                    Arg::new(TEXT)
                        .help("The answer text")
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(VOTES)
                        .long("votes")
                        .help("Starting vote count")
                        .value_parser(value_parser!(u32))
                        .default_value("0"),
                ),
        )
        .subcommand(Command::new(LIST).about("List every question with its choices"))
}

/// Errors that this program may produce.
#[derive(Debug, Error)]
enum Error {
    #[error("Invalid database config: {0}")]
    Config(#[from] rocket::figment::Error),
    #[error("Database error: {0}")]
    Db(#[from] mongodb::error::Error),
    #[error("{0}")]
    Polls(#[from] polls::error::Error),
}

/// One line of `list` output.
fn describe(question: &Question, choices: &[Choice]) -> String {
    let now = Utc::now();
    let status = if question.pub_date > now {
        "scheduled"
    } else if choices.is_empty() {
        "hidden, no choices"
    } else {
        "visible"
    };
    format!(
        "{}: {} [{}, {}]",
        question.id,
        question.question_text,
        question.pub_date.format("%Y-%m-%d %H:%M"),
        status
    )
}

async fn run(args: &ArgMatches) -> Result<(), Error> {
    let config: DbConfig = rocket::Config::figment().extract()?;
    let (_client, db) = config.connect().await?;
    ensure_indexes_exist(&db).await?;

    let questions = Coll::<Question>::from_db(&db);
    let choices = Coll::<Choice>::from_db(&db);
    let counters = Coll::<Counter>::from_db(&db);

    // `subcommand_required` guarantees a match, and required arguments are present.
    match args.subcommand() {
        Some((ADD_QUESTION, sub)) => {
            let text: &String = sub.get_one(TEXT).unwrap();
            let days: i64 = *sub.get_one(DAYS).unwrap();
            let question = NewQuestion::new(text.as_str(), Utc::now() + Duration::days(days));
            let question = Question::create(&questions, &counters, question).await?;
            println!("Created question {}", question.id);
        }
        Some((ADD_CHOICE, sub)) => {
            let question_id: QuestionId = *sub.get_one(QUESTION_ID).unwrap();
            let text: &String = sub.get_one(TEXT).unwrap();
            let votes: u32 = *sub.get_one(VOTES).unwrap();
            let choice = NewChoice::new(question_id, text.as_str(), votes);
            let choice = Choice::create(&choices, &questions, &counters, choice).await?;
            println!("Created choice {} for question {question_id}", choice.id);
        }
        Some((LIST, _)) => {
            for question in Question::newest_first(&questions).await? {
                let question_choices = Choice::of_question(&choices, question.id).await?;
                println!("{}", describe(&question, &question_choices));
                for choice in question_choices {
                    println!("    {}: {} ({})", choice.id, choice.choice_text, choice.votes);
                }
            }
        }
        _ => unreachable!(),
    }
    Ok(())
}

#[rocket::main]
async fn main() {
    let args = cli().get_matches();
    if let Err(err) = run(&args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
