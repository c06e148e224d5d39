//! Accounts, sessions and password resets.
//!
//! This module owns the credential store ([`UserService`]) and the token
//! services ([`SessionService`], [`PasswordResetService`]).
//!
//! ## Error reporting
//!
//! Every operation returns [`AuthError`]. Callers facing end users should show
//! [`AuthError::public_message`] instead of the error itself: unknown accounts
//! and wrong passwords collapse to the same "invalid credentials" text so
//! responses cannot be used to probe which emails are registered.

mod config;
mod error;
mod models;
pub mod password;
mod password_reset;
mod sessions;
pub mod token;
mod users;
mod utils;

pub use config::{AuthConfig, SessionPolicy};
pub use error::AuthError;
pub use models::{Account, NewPasswordReset, NewSession};
pub use password::PasswordParams;
pub use password_reset::PasswordResetService;
pub use sessions::SessionService;
pub use token::TokenHash;
pub use users::UserService;
pub use utils::normalize_email;
