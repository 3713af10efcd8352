/// Authentication
///
/// Password hashing, session tokens, and the extractor that gates every
/// protected endpoint on a live session.
///
/// A client signs in with `POST /accounts/login` and presents the returned
/// token on later requests, either as the `sessionid` cookie or as an
/// `Authorization: Bearer <token>` header.

pub mod password;
pub mod token;
mod extractor;

pub use extractor::CurrentDriver;
pub use token::{SESSION_COOKIE, generate_session_token, hash_session_token};
