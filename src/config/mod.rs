/// 設定模組
///
/// 可見區域調校常數與模擬設定檔
pub mod engine_config;

pub use self::engine_config::*;
