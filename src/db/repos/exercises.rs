use sqlx::PgExecutor;
use uuid::Uuid;

use crate::db::models::Exercise;

const COLUMNS: &str =
    "id, name, muscle_group, equipment_type, is_compound, created_by, is_global, created_at";

pub async fn create(
    conn: impl PgExecutor<'_>,
    name: &str,
    muscle_group: &str,
    equipment_type: Option<&str>,
    is_compound: bool,
) -> Result<Exercise, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(&format!(
        r#"
        INSERT INTO exercises (name, muscle_group, equipment_type, is_compound, is_global, created_by)
        VALUES ($1, $2, $3, $4, TRUE, NULL)
        RETURNING {COLUMNS}
        "#,
    ))
    .bind(name)
    .bind(muscle_group)
    .bind(equipment_type)
    .bind(is_compound)
    .fetch_one(conn)
    .await
}

pub async fn get(conn: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(&format!("SELECT {COLUMNS} FROM exercises WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Global exercises, optionally filtered by a case-insensitive name match.
pub async fn list_global(
    conn: impl PgExecutor<'_>,
    search: Option<&str>,
) -> Result<Vec<Exercise>, sqlx::Error> {
    match search {
        Some(query) => {
            sqlx::query_as::<_, Exercise>(&format!(
                "SELECT {COLUMNS} FROM exercises WHERE is_global AND name ILIKE $1 ORDER BY name"
            ))
            .bind(format!("%{query}%"))
            .fetch_all(conn)
            .await
        }
        None => {
            sqlx::query_as::<_, Exercise>(&format!(
                "SELECT {COLUMNS} FROM exercises WHERE is_global ORDER BY name"
            ))
            .fetch_all(conn)
            .await
        }
    }
}

pub async fn count_global(conn: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(id) FROM exercises WHERE is_global")
        .fetch_one(conn)
        .await
}
