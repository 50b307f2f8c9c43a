pub mod config;
pub mod database;
pub mod graphql;
pub mod resolver;
pub mod seed;
