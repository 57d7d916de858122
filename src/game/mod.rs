pub mod lock_window;
pub mod scoring;

pub use lock_window::LockWindow;
pub use scoring::score;
