//! # formkit-session
//!
//! Session storage for formkit. [`SessionData`] keeps regular values plus
//! flash values that survive exactly one request boundary, and [`Session`] is
//! a cheap shared handle over it. [`SessionBackend`] persists sessions between
//! requests; [`SessionCookie`] names the cookie that carries the session key
//! and sets how long new sessions live.

pub mod backend;
pub mod cookie;
pub mod session;

pub use backend::{generate_session_key, InMemorySessionBackend, SessionBackend};
pub use cookie::SessionCookie;
pub use session::{Session, SessionData};
