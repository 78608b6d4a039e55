/// Sightline Library
///
/// 2D 可見區域計算：觀察者在線段牆之間能看到的範圍

pub mod comp;
pub mod vision;
pub mod config;
pub mod util;
pub mod state;

// Re-export commonly used types
pub use crate::comp::*;
pub use crate::vision::*;
pub use crate::config::{EngineSetting, SimSetting, VisibilityConfig};
pub use crate::state::State;
