pub(crate) mod dashboard;
pub(crate) mod health;
pub(crate) mod screener;
pub(crate) mod search;
