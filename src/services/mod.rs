pub mod auto_refresh;
pub mod dashboard_service;
pub mod group_cache;
pub mod search;
