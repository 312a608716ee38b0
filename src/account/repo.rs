use axum::async_trait;
use sqlx::PgPool;

use super::repo_types::{Account, NewAccount, ProfileUpdate};
use crate::db::RepoResult;

#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;
    async fn find_by_id(&self, account_id: i32) -> RepoResult<Option<Account>>;
    /// Whether any account other than `except` uses `email`.
    async fn email_taken(&self, email: &str, except: Option<i32>) -> RepoResult<bool>;
    /// Insert a new `Client` account.
    async fn create(&self, account: NewAccount) -> RepoResult<Account>;
    async fn update_profile(
        &self,
        account_id: i32,
        profile: ProfileUpdate,
    ) -> RepoResult<Option<Account>>;
    /// Returns the number of rows changed.
    async fn update_password(&self, account_id: i32, password_hash: &str) -> RepoResult<u64>;
}

#[derive(Clone)]
pub struct PgAccountRepo {
    db: PgPool,
}

impl PgAccountRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepo for PgAccountRepo {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, account_firstname, account_lastname, account_email,
                   account_password, account_type
            FROM account
            WHERE account_email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_id(&self, account_id: i32) -> RepoResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, account_firstname, account_lastname, account_email,
                   account_password, account_type
            FROM account
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn email_taken(&self, email: &str, except: Option<i32>) -> RepoResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM account
                WHERE account_email = $1
                  AND ($2::INT IS NULL OR account_id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.db)
        .await?;
        Ok(taken)
    }

    async fn create(&self, account: NewAccount) -> RepoResult<Account> {
        let created = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO account (account_firstname, account_lastname, account_email,
                                 account_password, account_type)
            VALUES ($1, $2, $3, $4, 'Client')
            RETURNING account_id, account_firstname, account_lastname, account_email,
                      account_password, account_type
            "#,
        )
        .bind(&account.firstname)
        .bind(&account.lastname)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update_profile(
        &self,
        account_id: i32,
        profile: ProfileUpdate,
    ) -> RepoResult<Option<Account>> {
        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE account
            SET account_firstname = $1, account_lastname = $2, account_email = $3
            WHERE account_id = $4
            RETURNING account_id, account_firstname, account_lastname, account_email,
                      account_password, account_type
            "#,
        )
        .bind(&profile.firstname)
        .bind(&profile.lastname)
        .bind(&profile.email)
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(updated)
    }

    async fn update_password(&self, account_id: i32, password_hash: &str) -> RepoResult<u64> {
        let result = sqlx::query("UPDATE account SET account_password = $1 WHERE account_id = $2")
            .bind(password_hash)
            .bind(account_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
