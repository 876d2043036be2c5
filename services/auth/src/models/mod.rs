//! Authentication service models

pub mod user;

// Re-export for convenience
pub use user::{
    AuthResponse, AuthUser, LoginRequest, NewUser, RegisterRequest, User, UserSummary,
};
