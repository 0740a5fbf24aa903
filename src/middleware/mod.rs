//! Request pipeline stages.
//!
//! - [`auth`]: the Authorization Gate, which resolves the caller from the
//!   bearer token and checks the route access table before a handler runs.
//!
//! Handlers behind the gate read the caller through [`auth::CurrentUser`]
//! (identity required) or [`auth::RequestContext`] (guests allowed).

pub mod auth;
