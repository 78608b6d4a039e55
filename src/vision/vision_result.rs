/// 可見區域計算結果
use std::collections::BTreeSet;
use vek::Vec2;
use serde::{Deserialize, Serialize};

use crate::comp::WallId;
use crate::vision::geometry_utils::GeometryUtils;

/// 視野模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisionMode {
    /// 全方位，依絕對角度排序
    Full360,
    /// 有限視角，依相對朝向的有號角度排序
    FieldOfView,
}

impl VisionMode {
    pub fn from_flag(full_360: bool) -> Self {
        if full_360 {
            VisionMode::Full360
        } else {
            VisionMode::FieldOfView
        }
    }

    pub fn is_full_360(&self) -> bool {
        *self == VisionMode::Full360
    }
}

/// 單次計算的輸出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityResult {
    /// 觀察者位置
    pub observer_pos: Vec2<f32>,
    pub facing_angle: f32,
    pub fov_angle: f32,
    pub mode: VisionMode,
    /// 可見區域頂點，依取樣順序排列
    pub visible_area: Vec<Vec2<f32>>,
    /// 至少被一條射線擊中的牆
    pub hit_walls: BTreeSet<WallId>,
}

impl VisibilityResult {
    /// 沒有任何命中的結果
    pub fn empty(observer_pos: Vec2<f32>, facing_angle: f32, fov_angle: f32, mode: VisionMode) -> Self {
        Self {
            observer_pos,
            facing_angle,
            fov_angle,
            mode,
            visible_area: Vec::new(),
            hit_walls: BTreeSet::new(),
        }
    }

    pub fn is_hit(&self, wall: WallId) -> bool {
        self.hit_walls.contains(&wall)
    }

    /// 繪製用的多邊形
    ///
    /// FOV 模式下在最前面補上觀察者位置，讓扇形在觀察者處閉合。
    pub fn render_polygon(&self) -> Vec<Vec2<f32>> {
        match self.mode {
            VisionMode::Full360 => self.visible_area.clone(),
            VisionMode::FieldOfView => {
                let mut polygon = Vec::with_capacity(self.visible_area.len() + 1);
                polygon.push(self.observer_pos);
                polygon.extend_from_slice(&self.visible_area);
                polygon
            }
        }
    }

    /// 可見區域面積
    pub fn area(&self) -> f32 {
        GeometryUtils::polygon_area(&self.render_polygon())
    }

    /// 檢查點是否在可見多邊形內
    pub fn contains_point(&self, point: Vec2<f32>) -> bool {
        GeometryUtils::point_in_polygon(point, &self.render_polygon())
    }
}
