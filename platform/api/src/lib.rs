pub mod api;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod database;
pub mod global;
pub mod places;
pub mod vision;

#[cfg(test)]
mod tests;
