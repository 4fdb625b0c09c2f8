//! Session validator adapters.
//!
//! - `JwtSessionValidator` - HS256 tokens signed with a shared secret
//! - `MockSessionValidator` - fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
