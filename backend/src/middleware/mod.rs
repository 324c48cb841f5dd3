//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently
//! request correlation.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace, TraceId};
