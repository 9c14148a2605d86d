pub mod claims;
pub mod error;
pub mod jwt_validator;

pub use claims::Claims;
pub use error::{AuthError, Result};
pub use jwt_validator::JwtValidator;

#[cfg(test)]
mod tests;
