//! User account storage.
//!
//! Accounts are deliberately thin: the interesting parts of this system are
//! bookmarks and metadata enrichment. Email and username are unique
//! case-insensitively, and login resolves either one.

use super::connection::Db;
use crate::Error;
use serde::Serialize;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A registered account.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        username: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "id, name, email, username, password_hash, created_at";

impl Db {
    /// Create a user.
    ///
    /// The password must already be hashed by the caller; this layer never
    /// sees plaintext credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::Conflict` if the email or username is already taken
    /// (compared case-insensitively).
    pub async fn create_user(
        &self, name: &str, email: &str, username: &str, password_hash: &str,
    ) -> Result<User, Error> {
        let name = name.to_string();
        let email = email.to_string();
        let username = username.to_string();
        let password_hash = password_hash.to_string();

        self.conn
            .call(move |conn| -> Result<User, Error> {
                let created_at = chrono::Utc::now().to_rfc3339();
                let result = conn.execute(
                    "INSERT INTO users (name, email, username, password_hash, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![name, email, username, password_hash, created_at],
                );

                match result {
                    Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                        return Err(Error::Conflict("a user with that email or username already exists".into()));
                    }
                    other => {
                        other.map_err(Error::from)?;
                    }
                }

                let id = conn.last_insert_rowid();
                let user = conn
                    .query_row(
                        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                        params![id],
                        row_to_user,
                    )
                    .map_err(Error::from)?;
                Ok(user)
            })
            .await
            .map_err(Error::from)
    }

    /// Look up a user by email or username, case-insensitively.
    ///
    /// Returns None if no account matches.
    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, Error> {
        let login = login.to_string();
        self.conn
            .call(move |conn| -> Result<Option<User>, Error> {
                let result = conn.query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1 OR username = ?1"),
                    params![login],
                    row_to_user,
                );

                match result {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<User>, Error> {
                let result = conn.query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    params![id],
                    row_to_user,
                );

                match result {
                    Ok(user) => Ok(Some(user)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Db::open_in_memory().await.unwrap();
        let user = db
            .create_user("Ada", "ada@example.com", "ada", "hash")
            .await
            .unwrap();
        assert_eq!(user.email, "ada@example.com");

        let fetched = db.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.username, "ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let db = Db::open_in_memory().await.unwrap();
        db.create_user("Ada", "ada@example.com", "ada", "hash").await.unwrap();

        let result = db.create_user("Other", "ADA@example.com", "other", "hash").await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflict() {
        let db = Db::open_in_memory().await.unwrap();
        db.create_user("Ada", "ada@example.com", "ada", "hash").await.unwrap();

        let result = db.create_user("Other", "other@example.com", "Ada", "hash").await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_case_insensitive() {
        let db = Db::open_in_memory().await.unwrap();
        db.create_user("Ada", "Ada@Example.com", "AdaL", "hash").await.unwrap();

        let by_email = db.find_user_by_login("ada@example.com").await.unwrap();
        assert!(by_email.is_some());

        let by_username = db.find_user_by_login("adal").await.unwrap();
        assert!(by_username.is_some());

        let missing = db.find_user_by_login("nobody").await.unwrap();
        assert!(missing.is_none());
    }
}
