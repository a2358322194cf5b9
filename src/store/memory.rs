//! In-process `SurveyStore` used by the unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::SurveyStore;
use crate::models::{Answer, Question, Survey, SurveyOption, TallyRow};

#[derive(Default)]
struct Tables {
    surveys: Vec<Survey>,
    questions: Vec<Question>,
    options: Vec<SurveyOption>,
    answers: Vec<Answer>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_count(&self) -> usize {
        self.tables.lock().unwrap().answers.len()
    }

    pub fn question_count(&self) -> usize {
        self.tables.lock().unwrap().questions.len()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn list_surveys(&self) -> Result<Vec<Survey>, sqlx::Error> {
        Ok(self.tables.lock().unwrap().surveys.clone())
    }

    async fn find_survey(&self, id: i64) -> Result<Option<Survey>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.surveys.iter().find(|s| s.id == id).cloned())
    }

    async fn find_question(&self, id: i64) -> Result<Option<Question>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.questions.iter().find(|q| q.id == id).cloned())
    }

    async fn find_option(&self, id: i64) -> Result<Option<SurveyOption>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.options.iter().find(|o| o.id == id).cloned())
    }

    async fn questions_for_survey(&self, survey_id: i64) -> Result<Vec<Question>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.survey_id == survey_id)
            .cloned()
            .collect())
    }

    async fn options_for_question(
        &self,
        question_id: i64,
    ) -> Result<Vec<SurveyOption>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .options
            .iter()
            .filter(|o| o.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn insert_survey(&self, title: &str, description: &str) -> Result<Survey, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let survey = Survey {
            id: tables.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        tables.surveys.push(survey.clone());
        Ok(survey)
    }

    async fn insert_question(&self, survey_id: i64, text: &str) -> Result<Question, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let question = Question {
            id: tables.next_id(),
            survey_id,
            text: text.to_string(),
        };
        tables.questions.push(question.clone());
        Ok(question)
    }

    async fn insert_option(
        &self,
        question_id: i64,
        text: &str,
    ) -> Result<SurveyOption, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let option = SurveyOption {
            id: tables.next_id(),
            question_id,
            text: text.to_string(),
        };
        tables.options.push(option.clone());
        Ok(option)
    }

    async fn insert_answer(
        &self,
        survey_id: i64,
        question_id: i64,
        option_id: i64,
    ) -> Result<Answer, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let answer = Answer {
            id: tables.next_id(),
            survey_id,
            question_id,
            option_id,
            created_at: Utc::now(),
        };
        tables.answers.push(answer.clone());
        Ok(answer)
    }

    async fn tally_rows(&self, survey_id: i64) -> Result<Vec<TallyRow>, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        let mut rows = Vec::new();
        for question in tables.questions.iter().filter(|q| q.survey_id == survey_id) {
            let mut options = tables
                .options
                .iter()
                .filter(|o| o.question_id == question.id)
                .peekable();

            if options.peek().is_none() {
                rows.push(TallyRow {
                    question_id: question.id,
                    question_text: question.text.clone(),
                    option_id: None,
                    option_text: None,
                    votes: 0,
                });
                continue;
            }

            for option in options {
                let votes = tables
                    .answers
                    .iter()
                    .filter(|a| a.option_id == option.id)
                    .count() as i64;
                rows.push(TallyRow {
                    question_id: question.id,
                    question_text: question.text.clone(),
                    option_id: Some(option.id),
                    option_text: Some(option.text.clone()),
                    votes,
                });
            }
        }
        Ok(rows)
    }
}
