//! PostgreSQL implementation of SessionRepository.
//!
//! The atomicity contract is carried by two mechanisms:
//!
//! - creates/updates take `pg_advisory_xact_lock(hashtext(tutor_id))`
//!   before the overlap query, serializing all schedule mutations for one
//!   tutor within their transactions;
//! - registration takes `SELECT ... FOR UPDATE` on the session row before
//!   counting the roster and inserting the participant, so concurrent
//!   registrations serialize on the row lock.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::domain::foundation::{SessionId, SessionStatus, Timestamp, UserId};
use crate::domain::scheduling::{
    ClockTime, Modality, SchedulingError, Session, SessionDate, TimeSlot,
};
use crate::ports::SessionRepository;

/// PostgreSQL session store.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    pool: PgPool,
}

impl PostgresSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'_, Postgres>, SchedulingError> {
        self.pool.begin().await.map_err(db_err)
    }

    /// Serializes schedule mutations per tutor for the rest of the
    /// transaction.
    async fn lock_tutor(
        tx: &mut Transaction<'_, Postgres>,
        tutor: &UserId,
    ) -> Result<(), SchedulingError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(tutor.as_str())
            .execute(&mut **tx)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Strict half-open overlap against the tutor's other scheduled
    /// sessions.
    async fn tutor_conflict(
        tx: &mut Transaction<'_, Postgres>,
        session: &Session,
    ) -> Result<bool, SchedulingError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM sessions
                WHERE tutor_id = $1
                  AND status = 'scheduled'
                  AND session_date = $2
                  AND start_min < $4
                  AND $3 < end_min
                  AND id <> $5
            )
            "#,
        )
        .bind(session.tutor_id().as_str())
        .bind(session.slot().date().as_naive())
        .bind(session.slot().start().minutes() as i16)
        .bind(session.slot().end().minutes() as i16)
        .bind(session.id().as_uuid())
        .fetch_one(&mut **tx)
        .await
        .map_err(db_err)?;

        Ok(exists)
    }

    async fn roster(
        tx: &mut Transaction<'_, Postgres>,
        id: &SessionId,
    ) -> Result<Vec<UserId>, SchedulingError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT student_id FROM session_participants WHERE session_id = $1 ORDER BY registered_at",
        )
        .bind(id.as_uuid())
        .fetch_all(&mut **tx)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(s,)| UserId::new(s).map_err(|e| SchedulingError::infrastructure(e.to_string())))
            .collect()
    }

    /// Replaces the stored roster with the aggregate's.
    async fn sync_roster(
        tx: &mut Transaction<'_, Postgres>,
        session: &Session,
    ) -> Result<(), SchedulingError> {
        sqlx::query("DELETE FROM session_participants WHERE session_id = $1")
            .bind(session.id().as_uuid())
            .execute(&mut **tx)
            .await
            .map_err(db_err)?;

        for student in session.roster() {
            sqlx::query(
                "INSERT INTO session_participants (session_id, student_id) VALUES ($1, $2)",
            )
            .bind(session.id().as_uuid())
            .bind(student.as_str())
            .execute(&mut **tx)
            .await
            .map_err(db_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: Session) -> Result<Session, SchedulingError> {
        let mut tx = self.begin().await?;
        Self::lock_tutor(&mut tx, session.tutor_id()).await?;

        if Self::tutor_conflict(&mut tx, &session).await? {
            return Err(SchedulingError::conflict(
                "Overlaps one of your scheduled sessions",
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, tutor_id, tutor_name, subject, session_date,
                start_min, end_min, location, modality, link,
                max_students, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.tutor_id().as_str())
        .bind(session.tutor_name())
        .bind(session.subject())
        .bind(session.slot().date().as_naive())
        .bind(session.slot().start().minutes() as i16)
        .bind(session.slot().end().minutes() as i16)
        .bind(session.location())
        .bind(session.modality().as_str())
        .bind(session.link())
        .bind(session.max_students() as i32)
        .bind(session.status().as_str())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        Self::sync_roster(&mut tx, &session).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(session)
    }

    async fn update(&self, session: Session) -> Result<Session, SchedulingError> {
        let mut tx = self.begin().await?;
        Self::lock_tutor(&mut tx, session.tutor_id()).await?;

        if Self::tutor_conflict(&mut tx, &session).await? {
            return Err(SchedulingError::conflict(
                "Overlaps one of your scheduled sessions",
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                subject = $2,
                session_date = $3,
                start_min = $4,
                end_min = $5,
                location = $6,
                modality = $7,
                link = $8,
                max_students = $9,
                status = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.subject())
        .bind(session.slot().date().as_naive())
        .bind(session.slot().start().minutes() as i16)
        .bind(session.slot().end().minutes() as i16)
        .bind(session.location())
        .bind(session.modality().as_str())
        .bind(session.link())
        .bind(session.max_students() as i32)
        .bind(session.status().as_str())
        .bind(session.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(SchedulingError::NotFound(*session.id()));
        }

        Self::sync_roster(&mut tx, &session).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(session)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SchedulingError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(SchedulingError::NotFound(*id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SchedulingError> {
        let row = sqlx::query(&format!("{} WHERE s.id = $1 {}", SELECT_HYDRATED, GROUP_BY))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.map(row_to_session).transpose()
    }

    async fn list(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, SchedulingError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "{} WHERE s.status = $1 {} ORDER BY s.session_date, s.start_min",
                    SELECT_HYDRATED, GROUP_BY
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "{} {} ORDER BY s.session_date, s.start_min",
                    SELECT_HYDRATED, GROUP_BY
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn register_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError> {
        let mut tx = self.begin().await?;

        // Row lock: concurrent registrations for this session serialize here.
        let row = sqlx::query("SELECT * FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or(SchedulingError::NotFound(*id))?;

        let roster = Self::roster(&mut tx, id).await?;
        let mut session = row_to_session_with_roster(row, roster)?;

        match session.register(student.clone())? {
            crate::domain::scheduling::RegistrationOutcome::AlreadyRegistered => {
                tx.commit().await.map_err(db_err)?;
                Ok(session)
            }
            crate::domain::scheduling::RegistrationOutcome::Added => {
                // Student overlap among their other scheduled registrations.
                let (conflict,): (bool,) = sqlx::query_as(
                    r#"
                    SELECT EXISTS(
                        SELECT 1
                        FROM sessions s
                        JOIN session_participants p ON p.session_id = s.id
                        WHERE p.student_id = $1
                          AND s.status = 'scheduled'
                          AND s.session_date = $2
                          AND s.start_min < $4
                          AND $3 < s.end_min
                          AND s.id <> $5
                    )
                    "#,
                )
                .bind(student.as_str())
                .bind(session.slot().date().as_naive())
                .bind(session.slot().start().minutes() as i16)
                .bind(session.slot().end().minutes() as i16)
                .bind(id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?;

                if conflict {
                    return Err(SchedulingError::conflict(
                        "Overlaps a session you are already registered for",
                    ));
                }

                sqlx::query(
                    "INSERT INTO session_participants (session_id, student_id) VALUES ($1, $2)",
                )
                .bind(id.as_uuid())
                .bind(student.as_str())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;

                sqlx::query("UPDATE sessions SET updated_at = $2 WHERE id = $1")
                    .bind(id.as_uuid())
                    .bind(session.updated_at().as_datetime())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err)?;

                tx.commit().await.map_err(db_err)?;
                Ok(session)
            }
        }
    }

    async fn unregister_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError> {
        let mut tx = self.begin().await?;

        let row = sqlx::query("SELECT * FROM sessions WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?
            .ok_or(SchedulingError::NotFound(*id))?;

        let roster = Self::roster(&mut tx, id).await?;
        let mut session = row_to_session_with_roster(row, roster)?;

        if session.unregister(student) {
            sqlx::query(
                "DELETE FROM session_participants WHERE session_id = $1 AND student_id = $2",
            )
            .bind(id.as_uuid())
            .bind(student.as_str())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            sqlx::query("UPDATE sessions SET updated_at = $2 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(session.updated_at().as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(session)
    }

    async fn list_completed_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Session>, SchedulingError> {
        let rows = sqlx::query(&format!(
            r#"{}
            WHERE s.status = 'completed'
              AND s.id IN (SELECT session_id FROM session_participants WHERE student_id = $1)
            {} ORDER BY s.session_date, s.start_min"#,
            SELECT_HYDRATED, GROUP_BY
        ))
        .bind(student.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn count(&self) -> Result<u64, SchedulingError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(count as u64)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

const SELECT_HYDRATED: &str = r#"
    SELECT s.id, s.tutor_id, s.tutor_name, s.subject, s.session_date,
           s.start_min, s.end_min, s.location, s.modality, s.link,
           s.max_students, s.status, s.created_at, s.updated_at,
           COALESCE(array_agg(p.student_id) FILTER (WHERE p.student_id IS NOT NULL), '{}') AS roster
    FROM sessions s
    LEFT JOIN session_participants p ON p.session_id = s.id
"#;

const GROUP_BY: &str = r#"
    GROUP BY s.id, s.tutor_id, s.tutor_name, s.subject, s.session_date,
             s.start_min, s.end_min, s.location, s.modality, s.link,
             s.max_students, s.status, s.created_at, s.updated_at
"#;

fn db_err(e: sqlx::Error) -> SchedulingError {
    SchedulingError::infrastructure(format!("Database error: {}", e))
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<Session, SchedulingError> {
    let roster_ids: Vec<String> = row.try_get("roster").map_err(field_err)?;
    let roster = roster_ids
        .into_iter()
        .map(|s| UserId::new(s).map_err(|e| SchedulingError::infrastructure(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    row_to_session_with_roster(row, roster)
}

fn row_to_session_with_roster(
    row: sqlx::postgres::PgRow,
    roster: Vec<UserId>,
) -> Result<Session, SchedulingError> {
    let id: uuid::Uuid = row.try_get("id").map_err(field_err)?;
    let tutor_id: String = row.try_get("tutor_id").map_err(field_err)?;
    let tutor_name: String = row.try_get("tutor_name").map_err(field_err)?;
    let subject: String = row.try_get("subject").map_err(field_err)?;
    let session_date: chrono::NaiveDate = row.try_get("session_date").map_err(field_err)?;
    let start_min: i16 = row.try_get("start_min").map_err(field_err)?;
    let end_min: i16 = row.try_get("end_min").map_err(field_err)?;
    let location: String = row.try_get("location").map_err(field_err)?;
    let modality: String = row.try_get("modality").map_err(field_err)?;
    let link: Option<String> = row.try_get("link").map_err(field_err)?;
    let max_students: i32 = row.try_get("max_students").map_err(field_err)?;
    let status: String = row.try_get("status").map_err(field_err)?;
    let created_at: chrono::DateTime<chrono::Utc> =
        row.try_get("created_at").map_err(field_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> =
        row.try_get("updated_at").map_err(field_err)?;

    let slot = TimeSlot::new(
        SessionDate::from_naive(session_date),
        clock(start_min)?,
        clock(end_min)?,
    )?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        UserId::new(tutor_id).map_err(|e| SchedulingError::infrastructure(e.to_string()))?,
        tutor_name,
        subject,
        slot,
        location,
        Modality::parse(&modality)
            .ok_or_else(|| SchedulingError::infrastructure(format!("Bad modality: {modality}")))?,
        link,
        max_students as u32,
        SessionStatus::parse(&status)
            .ok_or_else(|| SchedulingError::infrastructure(format!("Bad status: {status}")))?,
        roster,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn clock(minutes: i16) -> Result<ClockTime, SchedulingError> {
    ClockTime::from_minutes(minutes as u16)
        .map_err(|e| SchedulingError::infrastructure(e.to_string()))
}

fn field_err(e: sqlx::Error) -> SchedulingError {
    SchedulingError::infrastructure(format!("Failed to read session row: {}", e))
}
