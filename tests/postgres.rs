//! Round trips against a real Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored` on a disposable database.

use rust_survey_api::results::compute_results;
use rust_survey_api::store::{PgStore, SurveyStore};
use rust_survey_api::surveys::{create_answer, create_option, create_question, create_survey};
use sqlx::postgres::PgPoolOptions;

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrate");
    PgStore::new(pool)
}

async fn count(store: &PgStore, sql: &str, id: i64) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(store.pool())
        .await
        .expect("count query")
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable Postgres"]
async fn grouped_tally_matches_answers() {
    let store = store().await;
    let survey = create_survey(&store, "Color", None).await.unwrap();
    let question = create_question(&store, survey.id, "Favorite color?")
        .await
        .unwrap();
    let red = create_option(&store, question.id, "Red").await.unwrap();
    let blue = create_option(&store, question.id, "Blue").await.unwrap();
    let empty = create_question(&store, survey.id, "No options").await.unwrap();

    for _ in 0..3 {
        create_answer(&store, survey.id, question.id, red.id)
            .await
            .unwrap();
    }
    create_answer(&store, survey.id, question.id, blue.id)
        .await
        .unwrap();

    let results = compute_results(&store, survey.id).await.unwrap();
    assert_eq!(results.title, "Color");
    assert_eq!(results.questions.len(), 2);

    let votes: Vec<_> = results.questions[0]
        .options
        .iter()
        .map(|o| (o.option_text.as_str(), o.vote_count))
        .collect();
    assert_eq!(votes, [("Red", 3), ("Blue", 1)]);

    assert_eq!(results.questions[1].question_id, empty.id);
    assert!(results.questions[1].options.is_empty());
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable Postgres"]
async fn deleting_a_survey_cascades() {
    let store = store().await;
    let survey = create_survey(&store, "Doomed", Some("cascade")).await.unwrap();
    let question = create_question(&store, survey.id, "Still here?")
        .await
        .unwrap();
    let option = create_option(&store, question.id, "No").await.unwrap();
    create_answer(&store, survey.id, question.id, option.id)
        .await
        .unwrap();

    sqlx::query("DELETE FROM surveys WHERE id = $1")
        .bind(survey.id)
        .execute(store.pool())
        .await
        .unwrap();

    assert!(store.find_survey(survey.id).await.unwrap().is_none());
    assert!(store.find_question(question.id).await.unwrap().is_none());
    assert!(store.find_option(option.id).await.unwrap().is_none());
    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM answers WHERE option_id = $1", option.id).await,
        0
    );
}

#[tokio::test]
#[ignore = "needs DATABASE_URL pointing at a disposable Postgres"]
async fn deleting_an_option_removes_its_answers() {
    let store = store().await;
    let survey = create_survey(&store, "Partial", None).await.unwrap();
    let question = create_question(&store, survey.id, "Pick").await.unwrap();
    let keep = create_option(&store, question.id, "Keep").await.unwrap();
    let drop = create_option(&store, question.id, "Drop").await.unwrap();
    create_answer(&store, survey.id, question.id, keep.id)
        .await
        .unwrap();
    create_answer(&store, survey.id, question.id, drop.id)
        .await
        .unwrap();

    sqlx::query("DELETE FROM options WHERE id = $1")
        .bind(drop.id)
        .execute(store.pool())
        .await
        .unwrap();

    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM answers WHERE survey_id = $1", survey.id).await,
        1
    );
}
