use vek::Vec2;
use std::f32::consts::PI;

use crate::config::FOV_EDGE_TOLERANCE;

pub struct GeometryUtils;

impl GeometryUtils {
    /// 二維外積（純量）：`a.x * b.y - a.y * b.x`
    pub fn cross(a: Vec2<f32>, b: Vec2<f32>) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// 向量的方位角，`atan2(y, x)`
    pub fn heading(v: Vec2<f32>) -> f32 {
        v.y.atan2(v.x)
    }

    /// 由角度建立單位方向向量
    pub fn from_angle(theta: f32) -> Vec2<f32> {
        Vec2::new(theta.cos(), theta.sin())
    }

    /// 向量正規化，長度為 0 時回傳零向量
    pub fn normalize_or_zero(v: Vec2<f32>) -> Vec2<f32> {
        let len = v.magnitude();
        if len == 0.0 {
            return Vec2::zero();
        }
        v / len
    }

    /// 以 center 為中心旋轉 point
    pub fn rotate_around(point: Vec2<f32>, center: Vec2<f32>, angle: f32) -> Vec2<f32> {
        let translated = point - center;
        let (s, c) = angle.sin_cos();
        let rotated = Vec2::new(
            translated.x * c - translated.y * s,
            translated.x * s + translated.y * c,
        );
        center + rotated
    }

    /// 標準化角度到 (-π, π] 範圍
    pub fn normalize_angle(angle: f32) -> f32 {
        angle.sin().atan2(angle.cos())
    }

    /// 計算角度差（考慮環形性質）
    ///
    /// 回傳從 `b` 轉到 `a` 的最短有號角位移，落在 (-π, π]。
    pub fn signed_difference(a: f32, b: f32) -> f32 {
        let diff = (a - b).rem_euclid(2.0 * PI);
        if diff > PI {
            diff - 2.0 * PI
        } else {
            diff
        }
    }

    /// 檢查角度是否在以 facing 為中心、寬度 fov 的視角內（含邊界）
    pub fn angle_in_fov(angle: f32, facing: f32, fov: f32) -> bool {
        Self::signed_difference(angle, facing).abs() <= fov / 2.0 + FOV_EDGE_TOLERANCE
    }

    /// 多邊形面積（鞋帶公式），不論繞行方向都回傳正值
    pub fn polygon_area(vertices: &[Vec2<f32>]) -> f32 {
        let n = vertices.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += vertices[i].x * vertices[j].y;
            area -= vertices[j].x * vertices[i].y;
        }
        area.abs() / 2.0
    }

    /// 射線法判斷點是否在多邊形內
    pub fn point_in_polygon(point: Vec2<f32>, vertices: &[Vec2<f32>]) -> bool {
        let n = vertices.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = vertices[i];
            let vj = vertices[j];
            if (vi.y > point.y) != (vj.y > point.y) {
                let intersect_x = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
                if point.x < intersect_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// 軸對齊矩形邊界
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub min: Vec2<f32>,
    pub max: Vec2<f32>,
}

impl Bounds {
    pub fn new(min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Self { min, max }
    }

    /// 由外框尺寸往內縮 margin 得到的邊界
    pub fn inset(width: f32, height: f32, margin: f32) -> Self {
        Self {
            min: Vec2::new(margin, margin),
            max: Vec2::new(width - margin, height - margin),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains_point(&self, point: Vec2<f32>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// 把點夾回邊界內
    pub fn clamp(&self, point: Vec2<f32>) -> Vec2<f32> {
        Vec2::new(
            point.x.max(self.min.x).min(self.max.x),
            point.y.max(self.min.y).min(self.max.y),
        )
    }
}
