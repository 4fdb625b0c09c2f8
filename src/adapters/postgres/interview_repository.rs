//! PostgreSQL implementations of the interview and answer repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{AnswerId, MockId, Timestamp, UserId};
use crate::domain::generation::NormalizedQuestionSet;
use crate::domain::interview::{AnswerFilter, AnswerRecord, InterviewFilter, MockInterview};
use crate::ports::{AnswerRepository, InterviewRepository, RepositoryError};

fn database_error(context: &str, e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Duplicate(format!("{context}: {db}"))
        }
        _ => RepositoryError::Database(format!("{context}: {e}")),
    }
}

fn decode_error(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Decode(e.to_string())
}

/// PostgreSQL implementation of InterviewRepository.
#[derive(Clone)]
pub struct PostgresInterviewRepository {
    pool: PgPool,
}

impl PostgresInterviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewRepository for PostgresInterviewRepository {
    async fn insert(&self, interview: &MockInterview) -> Result<MockId, RepositoryError> {
        let experience = i32::try_from(interview.job_experience).map_err(decode_error)?;

        sqlx::query(
            r#"
            INSERT INTO mock_interviews (
                mock_id, job_position, job_desc, job_experience, questions, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(interview.mock_id.as_uuid())
        .bind(&interview.job_position)
        .bind(&interview.job_desc)
        .bind(experience)
        .bind(Json(&interview.questions))
        .bind(interview.created_by.as_str())
        .bind(interview.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to insert interview", e))?;

        Ok(interview.mock_id)
    }

    async fn select(&self, filter: &InterviewFilter) -> Result<Vec<MockInterview>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT mock_id, job_position, job_desc, job_experience, questions, created_by, created_at
            FROM mock_interviews
            WHERE ($1::uuid IS NULL OR mock_id = $1)
              AND ($2::text IS NULL OR created_by = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.mock_id.map(|id| *id.as_uuid()))
        .bind(filter.created_by.as_ref().map(|user| user.as_str().to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to select interviews", e))?;

        rows.into_iter().map(row_to_interview).collect()
    }
}

fn row_to_interview(row: PgRow) -> Result<MockInterview, RepositoryError> {
    let mock_id: Uuid = row.try_get("mock_id").map_err(decode_error)?;
    let experience: i32 = row.try_get("job_experience").map_err(decode_error)?;
    let questions: Json<NormalizedQuestionSet> = row.try_get("questions").map_err(decode_error)?;
    let created_by: String = row.try_get("created_by").map_err(decode_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode_error)?;

    Ok(MockInterview {
        mock_id: MockId::from_uuid(mock_id),
        job_position: row.try_get("job_position").map_err(decode_error)?,
        job_desc: row.try_get("job_desc").map_err(decode_error)?,
        job_experience: u32::try_from(experience).map_err(decode_error)?,
        questions: questions.0,
        created_by: UserId::new(created_by).map_err(decode_error)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}

/// PostgreSQL implementation of AnswerRepository.
#[derive(Clone)]
pub struct PostgresAnswerRepository {
    pool: PgPool,
}

impl PostgresAnswerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerRepository for PostgresAnswerRepository {
    async fn insert(&self, answer: &AnswerRecord) -> Result<AnswerId, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO interview_answers (
                id, mock_id_ref, question, correct_answer, user_answer, rating,
                feedback, strengths, improvements, created_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(answer.id.as_uuid())
        .bind(answer.mock_id_ref.as_uuid())
        .bind(&answer.question)
        .bind(&answer.correct_answer)
        .bind(&answer.user_answer)
        .bind(i16::from(answer.rating))
        .bind(&answer.feedback)
        .bind(Json(&answer.strengths))
        .bind(Json(&answer.improvements))
        .bind(answer.created_by.as_str())
        .bind(answer.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to insert answer", e))?;

        Ok(answer.id)
    }

    async fn select(&self, filter: &AnswerFilter) -> Result<Vec<AnswerRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, mock_id_ref, question, correct_answer, user_answer, rating,
                   feedback, strengths, improvements, created_by, created_at
            FROM interview_answers
            WHERE ($1::uuid IS NULL OR mock_id_ref = $1)
              AND ($2::text IS NULL OR created_by = $2)
            ORDER BY created_at ASC
            "#,
        )
        .bind(filter.mock_id_ref.map(|id| *id.as_uuid()))
        .bind(filter.created_by.as_ref().map(|user| user.as_str().to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to select answers", e))?;

        rows.into_iter().map(row_to_answer).collect()
    }
}

fn row_to_answer(row: PgRow) -> Result<AnswerRecord, RepositoryError> {
    let id: Uuid = row.try_get("id").map_err(decode_error)?;
    let mock_id_ref: Uuid = row.try_get("mock_id_ref").map_err(decode_error)?;
    let rating: i16 = row.try_get("rating").map_err(decode_error)?;
    let strengths: Json<Vec<String>> = row.try_get("strengths").map_err(decode_error)?;
    let improvements: Json<Vec<String>> = row.try_get("improvements").map_err(decode_error)?;
    let created_by: String = row.try_get("created_by").map_err(decode_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode_error)?;

    Ok(AnswerRecord {
        id: AnswerId::from_uuid(id),
        mock_id_ref: MockId::from_uuid(mock_id_ref),
        question: row.try_get("question").map_err(decode_error)?,
        correct_answer: row.try_get("correct_answer").map_err(decode_error)?,
        user_answer: row.try_get("user_answer").map_err(decode_error)?,
        rating: u8::try_from(rating).map_err(decode_error)?,
        feedback: row.try_get("feedback").map_err(decode_error)?,
        strengths: strengths.0,
        improvements: improvements.0,
        created_by: UserId::new(created_by).map_err(decode_error)?,
        created_at: Timestamp::from_datetime(created_at),
    })
}
