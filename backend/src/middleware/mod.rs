//! Request middleware.
//!
//! [`Trace`] scopes a [`crate::TraceId`] to every request.

pub mod trace;

pub use trace::Trace;
