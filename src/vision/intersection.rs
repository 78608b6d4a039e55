/// 射線與線段相交
///
/// 所有視線測試共用的幾何基本運算
use vek::Vec2;
use serde::{Deserialize, Serialize};

use crate::comp::WallId;
use crate::config::PARALLEL_THRESHOLD;
use crate::vision::geometry_utils::GeometryUtils;

/// 相交參數
///
/// 交點同時滿足 `origin + t * direction` 與 `a + u * (b - a)`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    /// 沿射線的距離（方向為單位向量時）
    pub t: f32,
    /// 在線段上的相對位置，0..=1 代表落在線段內
    pub u: f32,
}

impl SegmentIntersection {
    /// 交點是否落在線段兩端點之間
    pub fn within_segment(&self) -> bool {
        self.u >= 0.0 && self.u <= 1.0
    }
}

/// 單條射線的最近命中
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// 命中點
    pub point: Vec2<f32>,
    /// 射線起點到命中點的距離
    pub distance: f32,
    /// 被擊中的牆
    pub wall: WallId,
}

/// 射線與線段相交檢測，使用預設的平行門檻
pub fn ray_segment_intersection(
    origin: Vec2<f32>,
    direction: Vec2<f32>,
    a: Vec2<f32>,
    b: Vec2<f32>,
) -> Option<SegmentIntersection> {
    ray_segment_intersection_with_threshold(origin, direction, a, b, PARALLEL_THRESHOLD)
}

/// 射線與線段相交檢測
///
/// `|direction × (b - a)|` 小於 `parallel_threshold` 時視為平行（或線段退化），不相交。
/// 交點在射線起點後方（`t < 0`）也不算。`u` 不在此檢查，由呼叫端決定。
pub fn ray_segment_intersection_with_threshold(
    origin: Vec2<f32>,
    direction: Vec2<f32>,
    a: Vec2<f32>,
    b: Vec2<f32>,
    parallel_threshold: f32,
) -> Option<SegmentIntersection> {
    let to_origin = origin - a;
    let edge = b - a;
    let denom = GeometryUtils::cross(direction, edge);

    if denom.abs() < parallel_threshold {
        return None;
    }

    let t = GeometryUtils::cross(edge, to_origin) / denom;
    let u = GeometryUtils::cross(direction, to_origin) / denom;

    if t < 0.0 {
        return None;
    }
    Some(SegmentIntersection { t, u })
}
