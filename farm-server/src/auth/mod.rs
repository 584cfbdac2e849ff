//! Authentication
//!
//! PIN-based login: the PIN is hashed into a deterministic lookup key
//! ([`pin`]), the matching user receives a JWT access token ([`jwt`]),
//! and every API request is checked by the middleware ([`middleware`]).

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod pin;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use pin::pin_index;
