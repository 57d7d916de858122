pub mod match_handler;
pub mod payment_handler;
pub mod user_handler;
