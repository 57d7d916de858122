pub mod auth;
pub mod common;
pub mod matches;
pub mod payment;
pub mod prediction;
pub mod user;
