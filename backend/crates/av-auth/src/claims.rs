use crate::{AuthError, Result as AuthErrorResult};

use av_core::Identity;

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

const MAX_CLAIM_LENGTH: usize = 128;

/// Claims issued by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,
    /// Display name shown to other viewers
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Validate claims after signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        for (claim, value) in [("sub", &self.sub), ("username", &self.username)] {
            if value.is_empty() {
                return Err(AuthError::InvalidClaim {
                    claim: claim.to_string(),
                    message: format!("{claim} cannot be empty"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            if value.len() > MAX_CLAIM_LENGTH {
                return Err(AuthError::InvalidClaim {
                    claim: claim.to_string(),
                    message: format!("{claim} exceeds maximum length"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(())
    }

    pub fn identity(&self) -> Identity {
        Identity::new(&self.sub, &self.username, &self.role)
    }
}
