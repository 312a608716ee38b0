use axum::async_trait;
use sqlx::PgPool;

use super::repo_types::{AccountComment, Comment, VehicleComment};
use crate::db::RepoResult;

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, account_id: i32, inv_id: i32, text: &str) -> RepoResult<Comment>;
    /// Comments on a vehicle, newest first.
    async fn list_for_vehicle(&self, inv_id: i32) -> RepoResult<Vec<VehicleComment>>;
    /// An account's comments, newest first.
    async fn list_for_account(&self, account_id: i32) -> RepoResult<Vec<AccountComment>>;
    async fn find(&self, comment_id: i32) -> RepoResult<Option<Comment>>;
    /// Replace the text and refresh the date. Only touches the row when
    /// `account_id` still owns it; returns the number of rows changed.
    async fn update(&self, comment_id: i32, account_id: i32, text: &str) -> RepoResult<u64>;
    /// Owner-scoped physical delete; returns the number of rows removed.
    async fn delete(&self, comment_id: i32, account_id: i32) -> RepoResult<u64>;
}

#[derive(Clone)]
pub struct PgCommentRepo {
    db: PgPool,
}

impl PgCommentRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn create(&self, account_id: i32, inv_id: i32, text: &str) -> RepoResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comment (account_id, inv_id, comment_text)
            VALUES ($1, $2, $3)
            RETURNING comment_id, comment_text, comment_date, account_id, inv_id
            "#,
        )
        .bind(account_id)
        .bind(inv_id)
        .bind(text)
        .fetch_one(&self.db)
        .await?;
        Ok(comment)
    }

    async fn list_for_vehicle(&self, inv_id: i32) -> RepoResult<Vec<VehicleComment>> {
        let rows = sqlx::query_as::<_, VehicleComment>(
            r#"
            SELECT c.comment_id, c.comment_text, c.comment_date, c.account_id,
                   a.account_firstname, a.account_lastname
            FROM comment c
            JOIN account a ON c.account_id = a.account_id
            WHERE c.inv_id = $1
            ORDER BY c.comment_date DESC, c.comment_id DESC
            "#,
        )
        .bind(inv_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_for_account(&self, account_id: i32) -> RepoResult<Vec<AccountComment>> {
        let rows = sqlx::query_as::<_, AccountComment>(
            r#"
            SELECT c.comment_id, c.comment_text, c.comment_date,
                   i.inv_id, i.inv_make, i.inv_model
            FROM comment c
            JOIN inventory i ON c.inv_id = i.inv_id
            WHERE c.account_id = $1
            ORDER BY c.comment_date DESC, c.comment_id DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, comment_id: i32) -> RepoResult<Option<Comment>> {
        let row = sqlx::query_as::<_, Comment>(
            r#"
            SELECT comment_id, comment_text, comment_date, account_id, inv_id
            FROM comment
            WHERE comment_id = $1
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, comment_id: i32, account_id: i32, text: &str) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE comment SET comment_text = $1, comment_date = NOW()
            WHERE comment_id = $2 AND account_id = $3
            "#,
        )
        .bind(text)
        .bind(comment_id)
        .bind(account_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, comment_id: i32, account_id: i32) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM comment WHERE comment_id = $1 AND account_id = $2")
            .bind(comment_id)
            .bind(account_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
