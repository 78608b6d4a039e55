use failure::{err_msg, Error};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 預設設定檔路徑
pub const DEFAULT_CONFIG_PATH: &str = "sightline.toml";

/// 角點夾擊偏移（弧度）。越小越貼近真正的遮擋邊界，候選角度數不變
pub const CORNER_EPSILON: f32 = 1e-3;
/// 外積小於此值視為平行。調高會讓斜掠的射線更容易漏判
pub const PARALLEL_THRESHOLD: f32 = 1e-6;
/// 候選角度去重時保留的小數位數。位數越少，越多相近角度被合併
pub const DEDUP_DECIMALS: u32 = 4;
/// 360 度模式均勻取樣數。越多多邊形越平滑，成本越高
pub const FULL_CIRCLE_SAMPLES: usize = 64;
/// FOV 模式的分段數，實際取樣數為分段數 + 1
pub const FOV_SAMPLE_STEPS: usize = 32;
/// 射線最大距離
pub const MAX_RAY_DISTANCE: f32 = 1000.0;
/// FOV 邊界判斷的容許誤差（弧度），吸收正規化時的 f32 捨入，讓兩端的取樣不被濾掉
pub const FOV_EDGE_TOLERANCE: f32 = 1e-5;

/// 可見區域計算參數
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct VisibilityConfig {
    pub corner_epsilon: f32,
    pub parallel_threshold: f32,
    pub dedup_decimals: u32,
    pub full_circle_samples: usize,
    pub fov_sample_steps: usize,
    pub max_distance: f32,
    /// 以 rayon 平行投射射線，結果與循序版本相同
    pub parallel_rays: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            corner_epsilon: CORNER_EPSILON,
            parallel_threshold: PARALLEL_THRESHOLD,
            dedup_decimals: DEDUP_DECIMALS,
            full_circle_samples: FULL_CIRCLE_SAMPLES,
            fov_sample_steps: FOV_SAMPLE_STEPS,
            max_distance: MAX_RAY_DISTANCE,
            parallel_rays: false,
        }
    }
}

/// 無視窗模擬設定
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimSetting {
    /// 每秒 tick 數
    pub tps: u32,
    /// 模擬總幀數
    pub frames: u64,
    /// 是否按真實時間節奏執行
    pub realtime: bool,
    pub world_width: f32,
    pub world_height: f32,
    /// 外牆與畫面邊緣的距離
    pub wall_margin: f32,
    /// 移動牆的反彈邊界
    pub bounce_margin: f32,
    /// 觀察者不可超出的邊距
    pub observer_clamp: f32,
    /// 起始位置，預設避開中央旋轉牆的樞軸
    pub observer_x: f32,
    pub observer_y: f32,
    pub observer_speed: f32,
    /// 觀察者每幀的移動方向（會被正規化）
    pub move_x: f32,
    pub move_y: f32,
    pub facing_degrees: f32,
    /// 轉向速度（弧度/秒）
    pub turn_rate: f32,
    pub fov_degrees: f32,
    pub full_360: bool,
    /// 單幀 dt 上限（秒）
    pub max_delta_time: f32,
    pub log_level: String,
    pub log_file: Option<String>,
    /// 每幀輸出 JSON lines 的檔案
    pub output_path: Option<String>,
}

impl Default for SimSetting {
    fn default() -> Self {
        Self {
            tps: 60,
            frames: 600,
            realtime: false,
            world_width: 800.0,
            world_height: 600.0,
            wall_margin: 50.0,
            bounce_margin: 80.0,
            observer_clamp: 60.0,
            observer_x: 400.0,
            observer_y: 380.0,
            observer_speed: 200.0,
            move_x: 0.0,
            move_y: 0.0,
            facing_degrees: 0.0,
            turn_rate: 0.0,
            fov_degrees: 90.0,
            full_360: false,
            max_delta_time: 0.25,
            log_level: "info".to_string(),
            log_file: None,
            output_path: None,
        }
    }
}

impl SimSetting {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn facing_radians(&self) -> f32 {
        self.facing_degrees.to_radians()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct EngineSetting {
    pub sim: SimSetting,
    pub visibility: VisibilityConfig,
}

impl EngineSetting {
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| err_msg(format!("設定檔解析失敗: {}", e)))
    }

    /// 讀取設定檔
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| err_msg(format!("無法開啟設定檔 {}: {}", path.display(), e)))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| err_msg(format!("無法讀取設定檔 {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 讀取設定檔，失敗時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(setting) => setting,
            Err(e) => {
                log::warn!("{}，使用預設設定", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_visibility_config_matches_constants() {
        let config = VisibilityConfig::default();
        assert_eq!(config.corner_epsilon, 1e-3);
        assert_eq!(config.parallel_threshold, 1e-6);
        assert_eq!(config.dedup_decimals, 4);
        assert_eq!(config.full_circle_samples, 64);
        assert_eq!(config.fov_sample_steps, 32);
        assert_eq!(config.max_distance, 1000.0);
        assert!(!config.parallel_rays);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let setting = EngineSetting::from_toml_str(
            r#"
            [sim]
            frames = 10
            full_360 = true

            [visibility]
            full_circle_samples = 128
            "#,
        )
        .expect("valid toml");

        assert_eq!(setting.sim.frames, 10);
        assert!(setting.sim.full_360);
        assert_eq!(setting.sim.tps, 60);
        assert_eq!(setting.visibility.full_circle_samples, 128);
        assert_eq!(setting.visibility.corner_epsilon, CORNER_EPSILON);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let setting = EngineSetting::from_toml_str("").expect("empty toml");
        assert_eq!(setting, EngineSetting::default());
    }

    /// 隨附的設定檔與內建預設值一致，有沒有設定檔跑起來都一樣
    #[test]
    fn test_shipped_config_matches_defaults() {
        let setting = EngineSetting::from_toml_str(include_str!("../../sightline.toml")).expect("shipped toml");
        assert_eq!(setting, EngineSetting::default());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(EngineSetting::from_toml_str("[sim]\nframes = \"many\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let setting = EngineSetting::load_or_default("does/not/exist/sightline.toml");
        assert_eq!(setting, EngineSetting::default());
        assert!(EngineSetting::load("does/not/exist/sightline.toml").is_err());
    }

    #[test]
    fn test_angle_settings_convert_to_radians() {
        let sim = SimSetting::default();
        assert!((sim.fov_radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(sim.facing_radians(), 0.0);
    }
}
