pub mod helpers;
pub mod payments;
pub mod users;
