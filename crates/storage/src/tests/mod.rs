//! Test utilities and module declarations for storage tests.


use kaname_core::NewUser;
use tempfile::TempDir;

use crate::SqliteStorage;
use crate::traits::UserStore;

pub fn create_test_storage() -> (SqliteStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = SqliteStorage::new(&db_path, 4).unwrap();
    (storage, temp_dir)
}

pub fn test_user(n: usize) -> NewUser {
    NewUser::new(format!("User {n:02}"), format!("user{n:02}@example.com"), 20 + (n % 50) as i32)
}

/// Inserts `count` users named `User 01`.. in id order.
pub async fn seed_users(storage: &SqliteStorage, count: usize) {
    for n in 1..=count {
        storage.create_user(&test_user(n)).await.unwrap();
    }
}
