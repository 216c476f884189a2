//! Access Service Library
//!
//! Roles, capability grants and the capability resolver that every other
//! component asks before showing or doing something.

pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repository::{RoleStore, UserStore};
use crate::service::{AccessControl, RoleManager};

/// Access components wired to one connection.
#[derive(Clone)]
pub struct AccessServices {
    pub resolver: Arc<AccessControl>,
    pub roles: Arc<RoleManager>,
    pub users: Arc<UserStore>,
}

impl AccessServices {
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let role_repo = Arc::new(RoleStore::new(db.clone()));

        Self {
            resolver: Arc::new(AccessControl::new(role_repo.clone())),
            roles: Arc::new(RoleManager::new(role_repo)),
            users: Arc::new(UserStore::new(db)),
        }
    }
}
