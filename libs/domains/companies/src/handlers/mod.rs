//! HTTP endpoints for companies and users.
//!
//! Each submodule exposes a `router` taking its service and an `ApiDoc` that
//! the application nests under the matching path.

pub mod companies;
pub mod users;
