//! Bearer-token plumbing shared by the abacus modules.
//!
//! [`TokenCodec`] signs and validates the HS256 access tokens issued by the
//! accounts module; [`AuthUser`] is the axum extractor protected routes use
//! to learn who is calling.

mod codec;
mod extract;

pub use codec::{AuthTokenError, Claims, TokenCodec};
pub use extract::AuthUser;
