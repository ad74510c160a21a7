use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::user::User,
};

pub const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT,
        username TEXT,
        email TEXT,
        phone TEXT,
        website TEXT
    );
"#;

/// Store for the persisted users snapshot
#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    /// Create a new UserStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Whether a refresh has ever created the snapshot table
    pub async fn snapshot_exists(&self) -> std::result::Result<bool, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(USERS_TABLE)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Replace the whole snapshot with `users` and return the resulting row count.
    ///
    /// Drop, recreate and insert run in one transaction, so a failure leaves the
    /// previous snapshot untouched.
    pub async fn replace_all(&self, users: &[User]) -> std::result::Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;

        for user in users {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO users (id, name, username, email, phone, website)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.website)
            .execute(&mut *tx)
            .await?;
        }

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Get every user in the snapshot, ordered by id
    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        if !self.snapshot_exists().await? {
            return Err(AppError::NoData);
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, phone, website FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        Ok(users)
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        if !self.snapshot_exists().await? {
            return Err(AppError::NoData);
        }

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, username, email, phone, website FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }
}
