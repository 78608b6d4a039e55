pub mod log_setup;

pub use self::log_setup::*;
