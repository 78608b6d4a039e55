/// 時間管理器 - 限制單幀 dt 並累計模擬時間

use std::time::Duration;

/// 時間管理器
#[derive(Debug, Clone)]
pub struct TimeManager {
    /// 最大增量時間（秒）
    max_delta_time: f32,
    /// 累計模擬時間（秒）
    elapsed: f64,
}

impl TimeManager {
    pub fn new(max_delta_time: f32) -> Self {
        Self {
            max_delta_time,
            elapsed: 0.0,
        }
    }

    /// 推進一幀，回傳實際使用的 dt
    ///
    /// 卡頓後的大 dt 會被截到 `max_delta_time`，避免移動牆一次跳太遠。
    pub fn advance(&mut self, dt: Duration) -> f32 {
        let dt = dt.as_secs_f32().min(self.max_delta_time);
        self.elapsed += f64::from(dt);
        dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn max_delta_time(&self) -> f32 {
        self.max_delta_time
    }

    pub fn set_max_delta_time(&mut self, max_dt: f32) {
        self.max_delta_time = max_dt;
        log::info!("最大增量時間設置為: {}", max_dt);
    }
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new(0.25)
    }
}
