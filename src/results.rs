//! Vote tallies per option, grouped by question, for one survey.

use crate::errors::SurveyResult;
use crate::models::{OptionResult, QuestionResults, Survey, SurveyResults, TallyRow};
use crate::store::SurveyStore;
use crate::surveys::get_survey;

/// Compute the nested tally for `survey_id`.
///
/// Read-only. Every option of every question appears, with zero when it has
/// no answers. Votes are counted by `option_id` only.
pub async fn compute_results(store: &dyn SurveyStore, survey_id: i64) -> SurveyResult<SurveyResults> {
    let survey = get_survey(store, survey_id).await?;
    let rows = store.tally_rows(survey.id).await?;
    Ok(assemble(survey, rows))
}

/// Fold flat tally rows (sorted by question) into the nested result shape.
pub fn assemble(survey: Survey, rows: Vec<TallyRow>) -> SurveyResults {
    let mut questions: Vec<QuestionResults> = Vec::new();

    for row in rows {
        let starts_new_group = questions
            .last()
            .map_or(true, |q| q.question_id != row.question_id);
        if starts_new_group {
            questions.push(QuestionResults {
                question_id: row.question_id,
                question_text: row.question_text,
                options: Vec::new(),
            });
        }

        // A row without an option stands for a question that has none.
        if let (Some(option_id), Some(option_text), Some(current)) =
            (row.option_id, row.option_text, questions.last_mut())
        {
            current.options.push(OptionResult {
                option_id,
                option_text,
                vote_count: row.votes,
            });
        }
    }

    SurveyResults {
        survey_id: survey.id,
        title: survey.title,
        questions,
    }
}
