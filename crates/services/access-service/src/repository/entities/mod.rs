//! SeaORM entities for users and grants.

pub mod role;
pub mod role_capability;
pub mod user;
pub mod user_role;
