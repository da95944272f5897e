//! Surge dashboard: caches per-group stock surge predictions pulled from the
//! analysis API, keeps them fresh on a timer, and serves the reconciled view
//! to a browser front end.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
