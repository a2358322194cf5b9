//! GraphQL schema: queries, mutations and relation resolvers.
//!
//! Field and type names follow the public wire contract (`allSurveys`,
//! `resultadosEncuesta`, `SurveyType`, ...), so existing clients keep working.

use std::sync::Arc;

use async_graphql::{
    ComplexObject, Context, EmptySubscription, ErrorExtensions, Object, Result, Schema,
    SimpleObject, ID,
};

use crate::errors::{SurveyError, SurveyResult};
use crate::models::{Answer, Question, Survey, SurveyOption, SurveyResults};
use crate::results::compute_results;
use crate::store::SurveyStore;
use crate::surveys;

pub type SurveySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema over `store`.
pub fn build_schema(store: Arc<dyn SurveyStore>) -> SurveySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

fn store<'a>(ctx: &'a Context<'_>) -> &'a dyn SurveyStore {
    ctx.data_unchecked::<Arc<dyn SurveyStore>>().as_ref()
}

fn gql<T>(result: SurveyResult<T>) -> Result<T> {
    result.map_err(|e| e.extend())
}

fn parse_id(id: &ID) -> SurveyResult<i64> {
    id.trim()
        .parse()
        .map_err(|_| SurveyError::InvalidId(id.to_string()))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn all_surveys(&self, ctx: &Context<'_>) -> Result<Vec<Survey>> {
        gql(surveys::list_surveys(store(ctx)).await)
    }

    /// Nullable on the wire: a missing survey yields `null` plus an error entry.
    async fn survey(&self, ctx: &Context<'_>, id: i64) -> Result<Option<Survey>> {
        gql(surveys::get_survey(store(ctx), id).await).map(Some)
    }

    /// Vote counts per option, grouped by question.
    async fn resultados_encuesta(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> Result<Option<SurveyResults>> {
        gql(compute_results(store(ctx), id).await).map(Some)
    }
}

#[derive(SimpleObject)]
#[graphql(name = "CreateSurvey")]
pub struct CreateSurveyPayload {
    pub survey: Survey,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateQuestion")]
pub struct CreateQuestionPayload {
    pub question: Question,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateOption")]
pub struct CreateOptionPayload {
    pub option: SurveyOption,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateAnswer")]
pub struct CreateAnswerPayload {
    pub answer: Answer,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_survey(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: Option<String>,
    ) -> Result<CreateSurveyPayload> {
        let survey =
            gql(surveys::create_survey(store(ctx), &title, description.as_deref()).await)?;
        Ok(CreateSurveyPayload { survey })
    }

    async fn create_question(
        &self,
        ctx: &Context<'_>,
        survey_id: ID,
        text: String,
    ) -> Result<CreateQuestionPayload> {
        let survey_id = gql(parse_id(&survey_id))?;
        let question = gql(surveys::create_question(store(ctx), survey_id, &text).await)?;
        Ok(CreateQuestionPayload { question })
    }

    async fn create_option(
        &self,
        ctx: &Context<'_>,
        question_id: ID,
        text: String,
    ) -> Result<CreateOptionPayload> {
        let question_id = gql(parse_id(&question_id))?;
        let option = gql(surveys::create_option(store(ctx), question_id, &text).await)?;
        Ok(CreateOptionPayload { option })
    }

    async fn create_answer(
        &self,
        ctx: &Context<'_>,
        survey_id: i64,
        question_id: i64,
        option_id: i64,
    ) -> Result<CreateAnswerPayload> {
        let answer = gql(
            surveys::create_answer(store(ctx), survey_id, question_id, option_id).await,
        )?;
        Ok(CreateAnswerPayload { answer })
    }
}

#[ComplexObject]
impl Survey {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn questions(&self, ctx: &Context<'_>) -> Result<Vec<Question>> {
        gql(surveys::questions_of(store(ctx), self.id).await)
    }
}

#[ComplexObject]
impl Question {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn survey(&self, ctx: &Context<'_>) -> Result<Survey> {
        gql(surveys::get_survey(store(ctx), self.survey_id).await)
    }

    async fn options(&self, ctx: &Context<'_>) -> Result<Vec<SurveyOption>> {
        gql(surveys::options_of(store(ctx), self.id).await)
    }
}

#[ComplexObject]
impl SurveyOption {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn question(&self, ctx: &Context<'_>) -> Result<Question> {
        gql(surveys::get_question(store(ctx), self.question_id).await)
    }
}

#[ComplexObject]
impl Answer {
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn survey(&self, ctx: &Context<'_>) -> Result<Survey> {
        gql(surveys::get_survey(store(ctx), self.survey_id).await)
    }

    async fn question(&self, ctx: &Context<'_>) -> Result<Question> {
        gql(surveys::get_question(store(ctx), self.question_id).await)
    }

    async fn option(&self, ctx: &Context<'_>) -> Result<SurveyOption> {
        gql(surveys::get_option(store(ctx), self.option_id).await)
    }
}
