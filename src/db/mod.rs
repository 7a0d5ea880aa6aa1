// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User record storage.
//!
//! `UserStore` is the seam between the user service and persistence.
//! Firestore backs production; the in-memory store backs tests and
//! local development without GCP credentials.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryUserStore;

use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Keyed persistence of user records over a flat collection.
///
/// No transactions span calls: a `get` followed by `put` can interleave
/// with another writer, and the last `put` wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create or fully replace the record stored under `id`.
    async fn put(&self, id: &str, user: &User) -> Result<(), AppError>;

    /// Fetch a record, `None` if absent.
    async fn get(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Every stored record, in no particular order.
    async fn get_all(&self) -> Result<Vec<User>, AppError>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}
