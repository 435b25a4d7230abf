/// Middleware for the API server
///
/// Session gates live next to the router in `app`; this module holds the
/// tower layers applied to every response.

pub mod security;
