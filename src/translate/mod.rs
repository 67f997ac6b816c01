//! Translate module
//!
//! Turns a [`ParsedRequest`](crate::capture::ParsedRequest) into a replayable
//! [`RequestTemplate`]: the endpoint without its query, the decoded query
//! parameters, and the credentials every page request has to carry.
//!
//! The capture must be the *first* page of a timeline: its `variables`
//! parameter names the subject (`userId`) and carries no `cursor` yet.

mod translator;
mod types;

pub use translator::translate;
pub use types::{
    QueryParams, RequestTemplate, AUTH_HEADER, CSRF_COOKIE, CSRF_HEADER, CURSOR_FIELD,
    SESSION_COOKIE, SUBJECT_FIELD, VARIABLES_PARAM,
};
