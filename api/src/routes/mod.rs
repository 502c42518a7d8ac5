pub mod generate;
pub mod health_route;
pub mod indexing;
pub mod models;
