// Library for tests to access modules

pub mod aggregator;
pub mod chain_repo;
pub mod config;
pub mod models;
pub mod price_repo;
pub mod render;
pub mod routes;
pub mod scheduler;
pub mod series;
pub mod sources;
pub mod version;
