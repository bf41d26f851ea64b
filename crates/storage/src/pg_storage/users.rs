//! UserStore implementation for PgStorage.

use async_trait::async_trait;
use kaname_core::{NewUser, User, UserFilter};
use kaname_pagination::CursorValue;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};

use super::{PgStorage, u64_to_i64};
use crate::error::StorageError;
use crate::traits::{UserCursorColumn, UserStore};

const USER_COLUMNS: &str = "id, name, email, age, created_at";

fn row_to_user(row: &PgRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        age: row.try_get("age")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Appends the filter's WHERE clause; returns whether one was written.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) -> bool {
    let Some(pattern) = filter.like_pattern() else {
        return false;
    };
    qb.push(" WHERE (LOWER(name) LIKE ")
        .push_bind(pattern.clone())
        .push(" ESCAPE '\\' OR LOWER(email) LIKE ")
        .push_bind(pattern)
        .push(" ESCAPE '\\')");
    true
}

#[async_trait]
impl UserStore for PgStorage {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (name, email, age) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .fetch_one(&self.pool)
        .await?;
        let created = row_to_user(&row)?;
        tracing::debug!(id = created.id, "inserted user");
        Ok(created)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64, StorageError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_filter(&mut qb, filter);
        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id ASC LIMIT ")
            .push_bind(u64_to_i64(limit))
            .push(" OFFSET ")
            .push_bind(u64_to_i64(offset));
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_user).collect()
    }

    async fn list_users_after(
        &self,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        column.check(after)?;
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        let filtered = push_filter(&mut qb, filter);
        if let Some(value) = after {
            qb.push(if filtered { " AND " } else { " WHERE " }).push(column.as_sql()).push(" > ");
            match value {
                CursorValue::Int(v) => qb.push_bind(*v),
                CursorValue::Text(v) => qb.push_bind(v.clone()),
            };
        }
        qb.push(" ORDER BY ")
            .push(column.as_sql())
            .push(" ASC LIMIT ")
            .push_bind(u64_to_i64(limit));
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_user).collect()
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
