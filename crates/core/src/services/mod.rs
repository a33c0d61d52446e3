pub mod history_service;
pub mod rate_service;
