/// 模擬狀態管理模塊
///
/// 負責場景、觀察者與時間循環，每幀先更新牆的運動再計算可見區域

pub mod core;
pub mod time_management;

pub use self::core::State;
pub use self::time_management::TimeManager;
