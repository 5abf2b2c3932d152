//! Authentication primitives.
//!
//! Only password hashing lives here; token issuance and validation are
//! in `amanah-shared` and session handling is outside this system.

pub mod password;

pub use password::{PasswordError, hash_password, verify_password};
