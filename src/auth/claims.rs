use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity embedded in the token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserClaim {
    pub id: Uuid,
}

/// JWT payload: `{user: {id}, iat, exp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: UserClaim,
    pub iat: i64, // issued at (unix timestamp)
    pub exp: i64, // expires at (unix timestamp)
}
