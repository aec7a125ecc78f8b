//! Web server and authentication gateway for the wayfarer travel app.
//!
//! The server fronts a browser SPA: it serves the built frontend from
//! `dist/`, exposes the OAuth2 login/callback/logout endpoints under
//! `/auth`, and gates everything under `/api` behind the [`auth::RequireAuth`]
//! extractor.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod router;
