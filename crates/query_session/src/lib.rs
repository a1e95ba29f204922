//! Construction of the immutable per-query session.
//!
//! A [`SessionFactory`] merges the request context, server configuration and
//! authorization results into a [`Session`] that planning and execution read
//! from for the lifetime of the query.

pub mod access;
pub mod config;
pub mod context;
pub mod errors;
pub mod factory;
pub mod functions;
pub mod identity;
pub mod ids;
pub mod locale;
pub mod properties;
pub mod representation;
pub mod session;
pub mod timezone;
pub mod tracer;
pub mod transaction;
pub mod warnings;

pub use errors::{Result, SessionError, SessionErrorKind};
pub use factory::SessionFactory;
pub use session::{Session, SessionBuilder};
