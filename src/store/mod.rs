//! Storage seam between the API and the relational data store.

mod postgres;

#[cfg(test)]
pub(crate) mod memory;

pub use postgres::PgStore;

use async_trait::async_trait;

use crate::models::{Answer, Question, Survey, SurveyOption, TallyRow};

/// Create/read access to the four survey tables.
///
/// Every method is a single self-contained call against the store; lookups
/// return `Ok(None)` for unknown ids and leave the not-found policy to the
/// callers in `surveys` and `results`. Child collections come back in id
/// (insertion) order.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    async fn list_surveys(&self) -> Result<Vec<Survey>, sqlx::Error>;
    async fn find_survey(&self, id: i64) -> Result<Option<Survey>, sqlx::Error>;
    async fn find_question(&self, id: i64) -> Result<Option<Question>, sqlx::Error>;
    async fn find_option(&self, id: i64) -> Result<Option<SurveyOption>, sqlx::Error>;

    async fn questions_for_survey(&self, survey_id: i64) -> Result<Vec<Question>, sqlx::Error>;
    async fn options_for_question(&self, question_id: i64)
        -> Result<Vec<SurveyOption>, sqlx::Error>;

    async fn insert_survey(&self, title: &str, description: &str) -> Result<Survey, sqlx::Error>;
    async fn insert_question(&self, survey_id: i64, text: &str) -> Result<Question, sqlx::Error>;
    async fn insert_option(&self, question_id: i64, text: &str)
        -> Result<SurveyOption, sqlx::Error>;
    async fn insert_answer(
        &self,
        survey_id: i64,
        question_id: i64,
        option_id: i64,
    ) -> Result<Answer, sqlx::Error>;

    /// One row per (question, option) of the survey with the number of
    /// answers whose `option_id` matches, ordered by question id then option id.
    /// Questions without options yield a single row with `option_id = None`.
    async fn tally_rows(&self, survey_id: i64) -> Result<Vec<TallyRow>, sqlx::Error>;
}
