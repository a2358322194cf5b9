//! Entity access: typed create and lookup operations for surveys, questions,
//! options and answers.

use tracing::info;

use crate::errors::{SurveyError, SurveyResult};
use crate::metrics::ENTITIES_CREATED;
use crate::models::{Answer, Question, Survey, SurveyOption};
use crate::store::SurveyStore;

/// All surveys in storage order. No pagination.
pub async fn list_surveys(store: &dyn SurveyStore) -> SurveyResult<Vec<Survey>> {
    Ok(store.list_surveys().await?)
}

pub async fn get_survey(store: &dyn SurveyStore, id: i64) -> SurveyResult<Survey> {
    store
        .find_survey(id)
        .await?
        .ok_or_else(|| SurveyError::not_found("Survey", id))
}

pub async fn get_question(store: &dyn SurveyStore, id: i64) -> SurveyResult<Question> {
    store
        .find_question(id)
        .await?
        .ok_or_else(|| SurveyError::not_found("Question", id))
}

pub async fn get_option(store: &dyn SurveyStore, id: i64) -> SurveyResult<SurveyOption> {
    store
        .find_option(id)
        .await?
        .ok_or_else(|| SurveyError::not_found("Option", id))
}

pub async fn questions_of(store: &dyn SurveyStore, survey_id: i64) -> SurveyResult<Vec<Question>> {
    Ok(store.questions_for_survey(survey_id).await?)
}

pub async fn options_of(
    store: &dyn SurveyStore,
    question_id: i64,
) -> SurveyResult<Vec<SurveyOption>> {
    Ok(store.options_for_question(question_id).await?)
}

/// Create a survey; an absent description is stored as the empty string.
pub async fn create_survey(
    store: &dyn SurveyStore,
    title: &str,
    description: Option<&str>,
) -> SurveyResult<Survey> {
    let survey = store
        .insert_survey(title, description.unwrap_or_default())
        .await?;

    ENTITIES_CREATED.with_label_values(&["survey"]).inc();
    info!(survey_id = survey.id, title = %survey.title, "Created survey");
    Ok(survey)
}

pub async fn create_question(
    store: &dyn SurveyStore,
    survey_id: i64,
    text: &str,
) -> SurveyResult<Question> {
    let survey = get_survey(store, survey_id).await?;
    let question = store.insert_question(survey.id, text).await?;

    ENTITIES_CREATED.with_label_values(&["question"]).inc();
    info!(survey_id, question_id = question.id, "Created question");
    Ok(question)
}

pub async fn create_option(
    store: &dyn SurveyStore,
    question_id: i64,
    text: &str,
) -> SurveyResult<SurveyOption> {
    let question = get_question(store, question_id).await?;
    let option = store.insert_option(question.id, text).await?;

    ENTITIES_CREATED.with_label_values(&["option"]).inc();
    info!(question_id, option_id = option.id, "Created option");
    Ok(option)
}

/// Record one vote.
///
/// Each of the three ids must exist, checked in survey, question, option
/// order. Whether the option belongs to the question, or the question to the
/// survey, is not checked.
pub async fn create_answer(
    store: &dyn SurveyStore,
    survey_id: i64,
    question_id: i64,
    option_id: i64,
) -> SurveyResult<Answer> {
    get_survey(store, survey_id).await?;
    get_question(store, question_id).await?;
    get_option(store, option_id).await?;

    let answer = store
        .insert_answer(survey_id, question_id, option_id)
        .await?;

    ENTITIES_CREATED.with_label_values(&["answer"]).inc();
    info!(
        survey_id,
        question_id,
        option_id,
        answer_id = answer.id,
        "Recorded answer"
    );
    Ok(answer)
}
