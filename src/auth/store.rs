use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    AlreadyExists,

    #[error("no user with that username and password")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Username/password table. Passwords are stored and compared as given.
#[derive(Clone)]
pub struct Credentials {
    db_pool: SqlitePool,
}

impl Credentials {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO users (username,password) VALUES (?,?)")
            .bind(username)
            .bind(password)
            .execute(&self.db_pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => Err(StoreError::AlreadyExists),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<(), StoreError> {
        sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE username=? AND password=?")
            .bind(username)
            .bind(password)
            .fetch_optional(&self.db_pool)
            .await?
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[tokio::test]
    async fn register_twice_conflicts() {
        let store = Credentials::new(db::memory_pool().await);

        store.register("alice", "hunter2").await.unwrap();
        let err = store.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn verify_matches_exact_password() {
        let store = Credentials::new(db::memory_pool().await);
        store.register("alice", "hunter2").await.unwrap();

        store.verify("alice", "hunter2").await.unwrap();
        assert!(matches!(store.verify("alice", "Hunter2").await, Err(StoreError::NotFound)));
        assert!(matches!(store.verify("bob", "hunter2").await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn database_failure_is_not_a_conflict() {
        let db_pool = db::memory_pool().await;
        sqlx::query("DROP TABLE users").execute(&db_pool).await.unwrap();
        let store = Credentials::new(db_pool);

        let err = store.register("alice", "hunter2").await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
