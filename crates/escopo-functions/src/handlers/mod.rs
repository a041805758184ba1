//! The two callables, one module each.

pub mod list_users;
pub mod set_user_status;
