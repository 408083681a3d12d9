use async_trait::async_trait;
use chrono::{DateTime, Utc};
use overflow_shared::types::{
    Answer, Comment, CommentParent, ConversionError, ModerationStatus, NewAnswer, NewComment,
    NewQuestion, Question, VotableId, VotableKind,
};
use uuid::Uuid;

use crate::errors::RepositoryError;
use crate::interfaces::ContentRepository;
use crate::postgres::table_for;

const QUESTION_COLUMNS: &str =
    "id, author_id, title, text, tags, vote_count, moderation, created_at";
const ANSWER_COLUMNS: &str = "id, question_id, author_id, text, vote_count, moderation, created_at";
const COMMENT_COLUMNS: &str = "id, parent_kind, parent_id, author_id, text, vote_count, created_at";

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    tags: Vec<String>,
    vote_count: i64,
    moderation: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = ConversionError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            text: row.text,
            tags: row.tags,
            vote_count: row.vote_count,
            moderation: ModerationStatus::try_from(row.moderation)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AnswerRow {
    id: Uuid,
    question_id: Uuid,
    author_id: Uuid,
    text: String,
    vote_count: i64,
    moderation: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<AnswerRow> for Answer {
    type Error = ConversionError;

    fn try_from(row: AnswerRow) -> Result<Self, Self::Error> {
        Ok(Answer {
            id: row.id,
            question_id: row.question_id,
            author_id: row.author_id,
            text: row.text,
            vote_count: row.vote_count,
            moderation: ModerationStatus::try_from(row.moderation)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    parent_kind: i16,
    parent_id: Uuid,
    author_id: Uuid,
    text: String,
    vote_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = ConversionError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: row.id,
            parent: CommentParent {
                kind: VotableKind::try_from(row.parent_kind)?,
                id: row.parent_id,
            },
            author_id: row.author_id,
            text: row.text,
            vote_count: row.vote_count,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL implementation of `ContentRepository`.
pub struct PostgresContentRepository {
    pool: sqlx::PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn create_question(&self, question: &NewQuestion) -> Result<Question, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO questions (id, author_id, title, text, tags) VALUES ($1, $2, $3, $4, $5)
            RETURNING {QUESTION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, QuestionRow>(&query)
            .bind(Uuid::new_v4())
            .bind(question.author_id)
            .bind(&question.title)
            .bind(&question.text)
            .bind(&question.tags)
            .fetch_one(&self.pool)
            .await?;
        Ok(Question::try_from(row)?)
    }

    /// Inserts the answer only if its question exists, in one statement.
    async fn create_answer(&self, answer: &NewAnswer) -> Result<Answer, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO answers (id, question_id, author_id, text)
            SELECT $1::uuid, $2::uuid, $3::uuid, $4::text
            WHERE EXISTS (SELECT 1 FROM questions WHERE id = $2::uuid)
            RETURNING {ANSWER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, AnswerRow>(&query)
            .bind(Uuid::new_v4())
            .bind(answer.question_id)
            .bind(answer.author_id)
            .bind(&answer.text)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found(VotableKind::Question, answer.question_id))?;
        Ok(Answer::try_from(row)?)
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment, RepositoryError> {
        let parent = comment.parent;
        if parent.kind == VotableKind::Comment {
            return Err(RepositoryError::InvalidCommentParent(parent.kind));
        }

        let query = format!(
            r#"
            INSERT INTO comments (id, parent_kind, parent_id, author_id, text)
            SELECT $1::uuid, $2::smallint, $3::uuid, $4::uuid, $5::text
            WHERE EXISTS (SELECT 1 FROM {parent_table} WHERE id = $3::uuid)
            RETURNING {COMMENT_COLUMNS}
            "#,
            parent_table = table_for(parent.kind),
        );
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(Uuid::new_v4())
            .bind(i16::from(parent.kind))
            .bind(parent.id)
            .bind(comment.author_id)
            .bind(&comment.text)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found(parent.kind, parent.id))?;
        Ok(Comment::try_from(row)?)
    }

    async fn get_question(&self, id: VotableId) -> Result<Option<Question>, RepositoryError> {
        let query = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
        let row = sqlx::query_as::<_, QuestionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Question::try_from).transpose()?)
    }

    async fn get_answer(&self, id: VotableId) -> Result<Option<Answer>, RepositoryError> {
        let query = format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE id = $1");
        let row = sqlx::query_as::<_, AnswerRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Answer::try_from).transpose()?)
    }

    async fn get_comment(&self, id: VotableId) -> Result<Option<Comment>, RepositoryError> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");
        let row = sqlx::query_as::<_, CommentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Comment::try_from).transpose()?)
    }

    async fn set_moderation(
        &self,
        kind: VotableKind,
        id: VotableId,
        status: ModerationStatus,
    ) -> Result<ModerationStatus, RepositoryError> {
        if !kind.is_moderated() {
            return Err(RepositoryError::NotModerated(kind));
        }

        let query = format!(
            "UPDATE {} SET moderation = $1 WHERE id = $2 RETURNING moderation",
            table_for(kind)
        );
        let stored = sqlx::query_scalar::<_, i16>(&query)
            .bind(i16::from(status))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::not_found(kind, id))?;
        Ok(ModerationStatus::try_from(stored)?)
    }
}
