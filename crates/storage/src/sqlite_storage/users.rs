use async_trait::async_trait;
use chrono::Utc;
use kaname_core::{NewUser, User, UserFilter};
use kaname_pagination::CursorValue;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};

use super::{SqliteStorage, UNICODE_LOWER};
use crate::error::StorageError;
use crate::traits::{UserCursorColumn, UserStore};

const USER_COLUMNS: &str = "id, name, email, age, created_at";

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        age: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Saturating `u64` → `i64` for LIMIT/OFFSET binds.
fn to_i64(val: u64) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

/// WHERE conditions and binds for a user filter.
fn filter_conditions(filter: &UserFilter) -> (Vec<String>, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();
    if let Some(pattern) = filter.like_pattern() {
        conditions.push(format!(
            "({UNICODE_LOWER}(name) LIKE ? ESCAPE '\\' OR {UNICODE_LOWER}(email) LIKE ? ESCAPE '\\')"
        ));
        binds.push(Value::Text(pattern.clone()));
        binds.push(Value::Text(pattern));
    }
    (conditions, binds)
}

fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() { String::new() } else { format!(" WHERE {}", conditions.join(" AND ")) }
}

fn cursor_bind(value: &CursorValue) -> Value {
    match value {
        CursorValue::Int(v) => Value::Integer(*v),
        CursorValue::Text(v) => Value::Text(v.clone()),
    }
}

fn query_users(conn: &Connection, sql: &str, binds: Vec<Value>) -> Result<Vec<User>, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let users = stmt.query_map(params_from_iter(binds), map_user)?.collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

impl SqliteStorage {
    fn insert_user(conn: &Connection, user: &NewUser) -> Result<User, StorageError> {
        let created = conn.query_row(
            &format!(
                "INSERT INTO users (name, email, age, created_at) VALUES (?1, ?2, ?3, ?4)
                 RETURNING {USER_COLUMNS}"
            ),
            params![user.name, user.email, user.age, Utc::now()],
            map_user,
        )?;
        tracing::debug!(id = created.id, "inserted user");
        Ok(created)
    }

    fn select_user(conn: &Connection, id: i64) -> Result<Option<User>, StorageError> {
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                map_user,
            )
            .optional()?;
        Ok(user)
    }

    fn count_filtered(conn: &Connection, filter: &UserFilter) -> Result<u64, StorageError> {
        let (conditions, binds) = filter_conditions(filter);
        let sql = format!("SELECT COUNT(*) FROM users{}", where_clause(&conditions));
        let count: i64 = conn.query_row(&sql, params_from_iter(binds), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn select_window(
        conn: &Connection,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        let (conditions, mut binds) = filter_conditions(filter);
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users{} ORDER BY id ASC LIMIT ? OFFSET ?",
            where_clause(&conditions)
        );
        binds.push(Value::Integer(to_i64(limit)));
        binds.push(Value::Integer(to_i64(offset)));
        query_users(conn, &sql, binds)
    }

    fn select_after(
        conn: &Connection,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        let (mut conditions, mut binds) = filter_conditions(filter);
        if let Some(value) = after {
            conditions.push(format!("{} > ?", column.as_sql()));
            binds.push(cursor_bind(value));
        }
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users{} ORDER BY {} ASC LIMIT ?",
            where_clause(&conditions),
            column.as_sql()
        );
        binds.push(Value::Integer(to_i64(limit)));
        query_users(conn, &sql, binds)
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        let user = user.clone();
        self.blocking(move |conn| Self::insert_user(conn, &user)).await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.blocking(move |conn| Self::select_user(conn, id)).await
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64, StorageError> {
        let filter = filter.clone();
        self.blocking(move |conn| Self::count_filtered(conn, &filter)).await
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        let filter = filter.clone();
        self.blocking(move |conn| Self::select_window(conn, &filter, offset, limit)).await
    }

    async fn list_users_after(
        &self,
        filter: &UserFilter,
        column: UserCursorColumn,
        after: Option<&CursorValue>,
        limit: u64,
    ) -> Result<Vec<User>, StorageError> {
        column.check(after)?;
        let filter = filter.clone();
        let after = after.cloned();
        self.blocking(move |conn| Self::select_after(conn, &filter, column, after.as_ref(), limit))
            .await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.blocking(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await
    }
}
