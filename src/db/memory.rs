// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process `UserStore` backed by a concurrent map.

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;
use dashmap::DashMap;

/// User records held in memory. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: std::sync::Arc<DashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn put(&self, id: &str, user: &User) -> Result<(), AppError> {
        self.users.insert(id.to_string(), user.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.users.remove(id).is_some())
    }
}
