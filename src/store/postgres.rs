use async_trait::async_trait;
use sqlx::PgPool;

use super::SurveyStore;
use crate::models::{Answer, Question, Survey, SurveyOption, TallyRow};

/// `SurveyStore` over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SurveyStore for PgStore {
    async fn list_surveys(&self) -> Result<Vec<Survey>, sqlx::Error> {
        sqlx::query_as("SELECT id, title, description, created_at FROM surveys ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_survey(&self, id: i64) -> Result<Option<Survey>, sqlx::Error> {
        sqlx::query_as("SELECT id, title, description, created_at FROM surveys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as("SELECT id, survey_id, text FROM questions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_option(&self, id: i64) -> Result<Option<SurveyOption>, sqlx::Error> {
        sqlx::query_as("SELECT id, question_id, text FROM options WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn questions_for_survey(&self, survey_id: i64) -> Result<Vec<Question>, sqlx::Error> {
        sqlx::query_as("SELECT id, survey_id, text FROM questions WHERE survey_id = $1 ORDER BY id")
            .bind(survey_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn options_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<SurveyOption>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, question_id, text FROM options WHERE question_id = $1 ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_survey(&self, title: &str, description: &str) -> Result<Survey, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO surveys (title, description) VALUES ($1, $2)
             RETURNING id, title, description, created_at",
        )
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_question(&self, survey_id: i64, text: &str) -> Result<Question, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO questions (survey_id, text) VALUES ($1, $2)
             RETURNING id, survey_id, text",
        )
        .bind(survey_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_option(
        &self,
        question_id: i64,
        text: &str,
    ) -> Result<SurveyOption, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO options (question_id, text) VALUES ($1, $2)
             RETURNING id, question_id, text",
        )
        .bind(question_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }

    async fn insert_answer(
        &self,
        survey_id: i64,
        question_id: i64,
        option_id: i64,
    ) -> Result<Answer, sqlx::Error> {
        sqlx::query_as(
            "INSERT INTO answers (survey_id, question_id, option_id) VALUES ($1, $2, $3)
             RETURNING id, survey_id, question_id, option_id, created_at",
        )
        .bind(survey_id)
        .bind(question_id)
        .bind(option_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn tally_rows(&self, survey_id: i64) -> Result<Vec<TallyRow>, sqlx::Error> {
        // Answers are matched on option_id alone; their survey_id/question_id
        // columns are not consulted.
        sqlx::query_as(
            r#"
            SELECT q.id        AS question_id,
                   q.text      AS question_text,
                   o.id        AS option_id,
                   o.text      AS option_text,
                   COUNT(a.id) AS votes
            FROM questions q
            LEFT JOIN options o ON o.question_id = q.id
            LEFT JOIN answers a ON a.option_id = o.id
            WHERE q.survey_id = $1
            GROUP BY q.id, q.text, o.id, o.text
            ORDER BY q.id, o.id
            "#,
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await
    }
}
