use rusqlite::OptionalExtension;

use crate::db::Database;
use crate::error::AppError;
use crate::models::UserRecord;

/// Account storage used by registration and sign-in.
pub trait UserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
    fn create(&self, user: &UserRecord) -> Result<(), AppError>;
}

pub struct SqliteUserRepository<'a> {
    db: &'a Database,
}

impl<'a> SqliteUserRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

fn map_row_to_user(row: &rusqlite::Row) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let conn = self.db.conn.lock().map_err(|e| AppError::Database(e.to_string()))?;
        let user = conn
            .query_row(
                "SELECT id, email, name, password_hash, created_at FROM users WHERE email = ?",
                [email],
                map_row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn create(&self, user: &UserRecord) -> Result<(), AppError> {
        let conn = self.db.conn.lock().map_err(|e| AppError::Database(e.to_string()))?;
        conn.execute(
            "INSERT INTO users (id, email, name, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
            rusqlite::params![user.id, user.email, user.name, user.password_hash, user.created_at],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                AppError::Duplicate("Email".to_string())
            }
            other => AppError::from(other),
        })?;
        Ok(())
    }
}
