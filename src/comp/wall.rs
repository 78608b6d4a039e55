/// 牆（遮擋線段）
///
/// 靜態或移動中的牆，每個 tick 重新計算目前的線段位置
use vek::Vec2;
use serde::{Deserialize, Serialize};

use crate::vision::geometry_utils::GeometryUtils;

/// 牆在場景中的穩定識別碼（牆列表中的索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WallId(pub usize);

/// 某一瞬間的牆線段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Vec2<f32>,
    pub p2: Vec2<f32>,
}

impl Segment {
    pub fn new(p1: Vec2<f32>, p2: Vec2<f32>) -> Self {
        Self { p1, p2 }
    }

    pub fn points(&self) -> (Vec2<f32>, Vec2<f32>) {
        (self.p1, self.p2)
    }

    pub fn length(&self) -> f32 {
        (self.p2 - self.p1).magnitude()
    }

    /// 長度為 0 的線段不會擋住任何射線
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }

    pub fn translated(&self, delta: Vec2<f32>) -> Self {
        Self {
            p1: self.p1 + delta,
            p2: self.p2 + delta,
        }
    }
}

/// 牆組件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// 建立時的基準端點，之後不再改變
    rest_p1: Vec2<f32>,
    rest_p2: Vec2<f32>,
    /// 目前位置
    current: Segment,
    dynamic: bool,
    /// 旋轉中心
    pivot: Option<Vec2<f32>>,
    /// 角速度（弧度/秒）
    angular_speed: f32,
    /// 累積旋轉角度，不做環繞
    accumulated_angle: f32,
    /// 線性速度（單位/秒），外部可以隨時改寫（例如反彈）
    pub velocity: Vec2<f32>,
}

impl Wall {
    pub fn new(
        p1: Vec2<f32>,
        p2: Vec2<f32>,
        dynamic: bool,
        pivot: Option<Vec2<f32>>,
        angular_speed: f32,
        velocity: Vec2<f32>,
    ) -> Self {
        Self {
            rest_p1: p1,
            rest_p2: p2,
            current: Segment::new(p1, p2),
            dynamic,
            pivot,
            angular_speed,
            accumulated_angle: 0.0,
            velocity,
        }
    }

    /// 靜態牆
    pub fn fixed(p1: Vec2<f32>, p2: Vec2<f32>) -> Self {
        Self::new(p1, p2, false, None, 0.0, Vec2::zero())
    }

    /// 繞 pivot 旋轉的牆
    pub fn rotating(p1: Vec2<f32>, p2: Vec2<f32>, pivot: Vec2<f32>, angular_speed: f32) -> Self {
        Self::new(p1, p2, true, Some(pivot), angular_speed, Vec2::zero())
    }

    /// 等速平移的牆
    pub fn translating(p1: Vec2<f32>, p2: Vec2<f32>, velocity: Vec2<f32>) -> Self {
        Self::new(p1, p2, true, None, 0.0, velocity)
    }

    /// 推進 dt 秒
    ///
    /// 旋轉由基準端點與累積角度重新算出絕對位置；平移則是疊加在目前位置上。
    /// 兩者同時啟用時，旋轉會蓋掉之前累積的平移，平移只在當幀生效。
    pub fn update(&mut self, dt: f32) {
        if !self.dynamic {
            return;
        }

        if let Some(pivot) = self.rotation_pivot() {
            self.accumulated_angle += self.angular_speed * dt;
            self.current = Segment::new(
                GeometryUtils::rotate_around(self.rest_p1, pivot, self.accumulated_angle),
                GeometryUtils::rotate_around(self.rest_p2, pivot, self.accumulated_angle),
            );
        }

        if self.velocity.x != 0.0 || self.velocity.y != 0.0 {
            self.current = self.current.translated(self.velocity * dt);
        }
    }

    /// 目前的線段
    pub fn current_segment(&self) -> Segment {
        self.current
    }

    /// 基準姿態的線段
    pub fn rest_segment(&self) -> Segment {
        Segment::new(self.rest_p1, self.rest_p2)
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// 旋轉只有在同時有 pivot 與非零角速度時才生效
    pub fn rotation_active(&self) -> bool {
        self.rotation_pivot().is_some()
    }

    fn rotation_pivot(&self) -> Option<Vec2<f32>> {
        match self.pivot {
            Some(pivot) if self.angular_speed != 0.0 => Some(pivot),
            _ => None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.dynamic && self.velocity.magnitude_squared() > 0.0
    }

    pub fn pivot(&self) -> Option<Vec2<f32>> {
        self.pivot
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    pub fn accumulated_angle(&self) -> f32 {
        self.accumulated_angle
    }
}
