//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Role, Timestamp, UserId};
use crate::domain::notification::NotificationSettings;
use crate::domain::user::{AccountStatus, UserAccount, UserPatch};
use crate::ports::UserDirectory;

/// PostgreSQL account store.
#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one(&self, id: &UserId) -> Result<UserAccount, DomainError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT id, username, password_hash, role, name, email, student_no,
           phone, department, major, avatar, skills, settings, status, created_at
    FROM users
"#;

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_ACCOUNT))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE username = $1", SELECT_ACCOUNT))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(row_to_account).transpose()
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id", SELECT_ACCOUNT))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserAccount>, DomainError> {
        let pattern = format!("%{}%", query.to_lowercase());
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE id <> $1
              AND status = 'active'
              AND lower(name || ' ' || username || ' ' || email) LIKE $2
            ORDER BY name
            LIMIT $3"#,
            SELECT_ACCOUNT
        ))
        .bind(exclude.as_str())
        .bind(pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(row_to_account).collect()
    }

    async fn create(&self, account: UserAccount) -> Result<UserAccount, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, role, name, email, student_no,
                phone, department, major, avatar, skills, settings, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.student_no)
        .bind(&account.phone)
        .bind(&account.department)
        .bind(&account.major)
        .bind(&account.avatar)
        .bind(sqlx::types::Json(&account.skills))
        .bind(sqlx::types::Json(&account.settings))
        .bind(match account.status {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        })
        .bind(account.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::Duplicate,
                "Username already exists",
            ));
        }
        Ok(account)
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<UserAccount, DomainError> {
        // Load-modify-store keeps the patch semantics in the domain type.
        let mut account = self.fetch_one(id).await?;
        account.apply(patch);

        sqlx::query(
            r#"
            UPDATE users SET
                name = $2, email = $3, phone = $4, department = $5, major = $6,
                skills = $7, settings = $8, status = $9, role = $10
            WHERE id = $1
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.department)
        .bind(&account.major)
        .bind(sqlx::types::Json(&account.skills))
        .bind(sqlx::types::Json(&account.settings))
        .bind(match account.status {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        })
        .bind(account.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(account)
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User"));
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User"));
        }
        Ok(())
    }

    async fn list_tutors(&self) -> Result<Vec<UserAccount>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} WHERE role = 'tutor' AND status = 'active' ORDER BY name",
            SELECT_ACCOUNT
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.into_iter().map(row_to_account).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::server(format!("Database error: {}", e))
}

fn row_to_account(row: sqlx::postgres::PgRow) -> Result<UserAccount, DomainError> {
    let field = |e: sqlx::Error| DomainError::server(format!("Failed to read user row: {}", e));

    let id: String = row.try_get("id").map_err(field)?;
    let role: String = row.try_get("role").map_err(field)?;
    let status: String = row.try_get("status").map_err(field)?;
    let skills: sqlx::types::Json<Vec<String>> = row.try_get("skills").map_err(field)?;
    let settings: sqlx::types::Json<NotificationSettings> =
        row.try_get("settings").map_err(field)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(field)?;

    Ok(UserAccount {
        id: UserId::new(id).map_err(|e| DomainError::server(e.to_string()))?,
        username: row.try_get("username").map_err(field)?,
        password_hash: row.try_get("password_hash").map_err(field)?,
        role: Role::parse(&role)
            .ok_or_else(|| DomainError::server(format!("Bad role: {role}")))?,
        name: row.try_get("name").map_err(field)?,
        email: row.try_get("email").map_err(field)?,
        student_no: row.try_get("student_no").map_err(field)?,
        phone: row.try_get("phone").map_err(field)?,
        department: row.try_get("department").map_err(field)?,
        major: row.try_get("major").map_err(field)?,
        avatar: row.try_get("avatar").map_err(field)?,
        skills: skills.0,
        settings: settings.0,
        status: match status.as_str() {
            "inactive" => AccountStatus::Inactive,
            _ => AccountStatus::Active,
        },
        created_at: Timestamp::from_datetime(created_at),
    })
}
