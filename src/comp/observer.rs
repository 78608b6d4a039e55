/// 觀察者
use vek::Vec2;
use serde::{Deserialize, Serialize};

use crate::vision::geometry_utils::{Bounds, GeometryUtils};
use crate::vision::VisionMode;

/// 觀察者狀態（位置、朝向、視角、模式）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub position: Vec2<f32>,
    /// 朝向（弧度），不做環繞
    pub facing_angle: f32,
    /// 視角寬度（弧度）
    pub fov_angle: f32,
    pub full_360: bool,
    /// 移動速度（單位/秒）
    pub speed: f32,
    /// 可活動範圍
    pub bounds: Option<Bounds>,
}

impl Observer {
    pub fn new(position: Vec2<f32>, facing_angle: f32, fov_angle: f32) -> Self {
        Self {
            position,
            facing_angle,
            fov_angle,
            full_360: false,
            speed: 200.0,
            bounds: None,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// 朝 direction 移動 dt 秒，方向會先正規化
    pub fn steer(&mut self, direction: Vec2<f32>, dt: f32) {
        let velocity = GeometryUtils::normalize_or_zero(direction) * self.speed;
        self.position = self.position + velocity * dt;
        if let Some(bounds) = self.bounds {
            self.position = bounds.clamp(self.position);
        }
    }

    pub fn turn(&mut self, delta: f32) {
        self.facing_angle += delta;
    }

    pub fn set_mode(&mut self, full_360: bool) {
        self.full_360 = full_360;
    }

    pub fn mode(&self) -> VisionMode {
        VisionMode::from_flag(self.full_360)
    }

    pub fn facing_direction(&self) -> Vec2<f32> {
        GeometryUtils::from_angle(self.facing_angle)
    }
}
