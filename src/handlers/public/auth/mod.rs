// handlers/public/auth/mod.rs - Credential and token endpoints
//
// POST /register         create an account
// POST /login            exchange credentials for an access token
// POST /forgot-password  obtain a short-lived reset token
// POST /reset-password   set a new password with a reset token
pub mod login;
pub mod password;
pub mod register;

pub use login::login_post;
pub use password::{forgot_password_post, reset_password_post};
pub use register::register_post;
