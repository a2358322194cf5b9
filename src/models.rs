//! Entity rows and aggregation result shapes.
//!
//! The same structs are read from Postgres (`FromRow`) and exposed as GraphQL
//! object types; relation fields (`questions`, `options`, `survey`, ...) are
//! resolved lazily in `schema.rs`.

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A named collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(name = "SurveyType", complex)]
pub struct Survey {
    #[graphql(skip)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A single prompt within a survey.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(name = "QuestionType", complex)]
pub struct Question {
    #[graphql(skip)]
    pub id: i64,
    #[graphql(skip)]
    pub survey_id: i64,
    pub text: String,
}

/// One selectable choice for a question.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(name = "OptionType", complex)]
pub struct SurveyOption {
    #[graphql(skip)]
    pub id: i64,
    #[graphql(skip)]
    pub question_id: i64,
    pub text: String,
}

/// One recorded vote. Nothing ties `option_id` to `question_id` or
/// `question_id` to `survey_id`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, SimpleObject)]
#[graphql(name = "AnswerType", complex)]
pub struct Answer {
    #[graphql(skip)]
    pub id: i64,
    #[graphql(skip)]
    pub survey_id: i64,
    #[graphql(skip)]
    pub question_id: i64,
    #[graphql(skip)]
    pub option_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Flat output of the grouped tally query: one row per question/option pair,
/// or a single row with no option for a question that has none.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TallyRow {
    pub question_id: i64,
    pub question_text: String,
    pub option_id: Option<i64>,
    pub option_text: Option<String>,
    pub votes: i64,
}

/// Vote count for one option.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[graphql(name = "ResultType")]
pub struct OptionResult {
    pub option_id: i64,
    pub option_text: String,
    #[graphql(name = "votos")]
    pub vote_count: i64,
}

/// Per-question group of option tallies.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[graphql(name = "ResultadoPreguntaType")]
pub struct QuestionResults {
    pub question_id: i64,
    pub question_text: String,
    #[graphql(name = "resultados")]
    pub options: Vec<OptionResult>,
}

/// Full nested tally for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, SimpleObject)]
#[graphql(name = "ResultadosEncuestaType")]
pub struct SurveyResults {
    pub survey_id: i64,
    #[graphql(name = "titulo")]
    pub title: String,
    #[graphql(name = "preguntas")]
    pub questions: Vec<QuestionResults>,
}
