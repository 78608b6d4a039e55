/// 可見區域引擎
///
/// 以離散角度取樣近似觀察者的可見多邊形（360 度）或可見扇形（有限視角）。
/// 每個牆端點左右各偏移一個小角度取樣，讓視線掠過角點時能看到後方。
use std::f32::consts::PI;
use hashbrown::HashSet;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use rayon::ThreadPool;
use vek::Vec2;

use crate::comp::{Wall, WallId};
use crate::config::VisibilityConfig;
use crate::vision::geometry_utils::GeometryUtils;
use crate::vision::intersection::{ray_segment_intersection_with_threshold, RayHit};
use crate::vision::vision_result::{VisibilityResult, VisionMode};

/// 可見區域引擎
///
/// 只借用場景的牆列表，不擁有它。借用期間牆不能被更新，
/// 因此運動更新與可見區域計算自然分成前後兩個階段。
pub struct VisibilityEngine<'a> {
    walls: &'a [Wall],
    config: VisibilityConfig,
    thread_pool: Option<&'a ThreadPool>,
}

impl<'a> VisibilityEngine<'a> {
    pub fn new(walls: &'a [Wall]) -> Self {
        Self::with_config(walls, VisibilityConfig::default())
    }

    pub fn with_config(walls: &'a [Wall], config: VisibilityConfig) -> Self {
        Self {
            walls,
            config,
            thread_pool: None,
        }
    }

    /// 平行投射時使用指定的執行緒池，未指定則用 rayon 全域池
    pub fn with_thread_pool(mut self, pool: &'a ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    pub fn config(&self) -> &VisibilityConfig {
        &self.config
    }

    pub fn walls(&self) -> &'a [Wall] {
        self.walls
    }

    /// 計算可見多邊形
    ///
    /// `full_360` 為 true 時忽略 `facing_angle` 與 `fov_angle` 的限制。
    pub fn compute_visibility_polygon(
        &self,
        origin: Vec2<f32>,
        facing_angle: f32,
        fov_angle: f32,
        full_360: bool,
    ) -> VisibilityResult {
        self.compute(origin, facing_angle, fov_angle, VisionMode::from_flag(full_360))
    }

    pub fn compute(
        &self,
        origin: Vec2<f32>,
        facing_angle: f32,
        fov_angle: f32,
        mode: VisionMode,
    ) -> VisibilityResult {
        let mut result = VisibilityResult::empty(origin, facing_angle, fov_angle, mode);
        if self.walls.is_empty() {
            return result;
        }

        let angles = self.candidate_angles(origin, facing_angle, fov_angle, mode);
        let hits = self.cast_all(origin, &angles);

        // 沒打到任何牆的射線不補點
        for hit in hits.into_iter().flatten() {
            result.visible_area.push(hit.point);
            result.hit_walls.insert(hit.wall);
        }

        log::trace!(
            "可見區域: 候選角度 {} 條, 命中點 {} 個, 命中牆 {} 面",
            angles.len(),
            result.visible_area.len(),
            result.hit_walls.len()
        );
        result
    }

    /// 產生排序好的候選角度
    ///
    /// 1. 每個牆端點取 `angle - ε`、`angle`、`angle + ε`
    /// 2. 依模式加入均勻取樣
    /// 3. 正規化到 (-π, π] 後依四捨五入的值去重，保留第一次出現者
    /// 4. FOV 模式濾掉視角外的角度
    /// 5. 360 度依絕對角度排序；FOV 依相對朝向的有號角度排序
    pub fn candidate_angles(
        &self,
        origin: Vec2<f32>,
        facing_angle: f32,
        fov_angle: f32,
        mode: VisionMode,
    ) -> Vec<f32> {
        // 朝向可能累積得很大，先正規化，取樣與排序都以此為準
        let facing_angle = GeometryUtils::normalize_angle(facing_angle);
        let eps = self.config.corner_epsilon;
        let mut raw = Vec::with_capacity(self.walls.len() * 6 + self.config.full_circle_samples.max(self.config.fov_sample_steps + 1));

        for wall in self.walls {
            let (p1, p2) = wall.current_segment().points();
            for p in [p1, p2] {
                let angle = GeometryUtils::heading(p - origin);
                raw.extend_from_slice(&[angle - eps, angle, angle + eps]);
            }
        }

        match mode {
            VisionMode::Full360 => {
                // f32 的 -PI 比 -π 略小，正規化後會跳到 +π。起點改用範圍內最接近 -π 的值
                let start = f32::from_bits((-PI).to_bits() - 1);
                let steps = self.config.full_circle_samples;
                for i in 0..steps {
                    raw.push(start + 2.0 * PI * i as f32 / steps as f32);
                }
            },
            VisionMode::FieldOfView => {
                let steps = self.config.fov_sample_steps.max(1);
                let half = fov_angle / 2.0;
                for i in 0..=steps {
                    let offset = -half + fov_angle * i as f32 / steps as f32;
                    raw.push(facing_angle + offset);
                }
            },
        }

        let scale = 10f64.powi(self.config.dedup_decimals as i32);
        let mut seen = HashSet::with_capacity(raw.len());
        let mut angles = Vec::with_capacity(raw.len());
        for angle in raw {
            let angle = GeometryUtils::normalize_angle(angle);
            let key = (f64::from(angle) * scale).round() as i64;
            if !seen.insert(key) {
                continue;
            }
            if mode == VisionMode::FieldOfView && !GeometryUtils::angle_in_fov(angle, facing_angle, fov_angle) {
                continue;
            }
            angles.push(angle);
        }

        match mode {
            VisionMode::Full360 => angles.sort_by_key(|a| OrderedFloat(*a)),
            VisionMode::FieldOfView => {
                angles.sort_by_key(|a| OrderedFloat(GeometryUtils::signed_difference(*a, facing_angle)))
            },
        }
        angles
    }

    /// 依序對每個角度投射射線，結果順序與輸入相同
    fn cast_all(&self, origin: Vec2<f32>, angles: &[f32]) -> Vec<Option<RayHit>> {
        if !self.config.parallel_rays {
            return angles.iter().map(|&angle| self.cast_ray(origin, angle)).collect();
        }

        let cast = || {
            angles
                .par_iter()
                .map(|&angle| self.cast_ray(origin, angle))
                .collect::<Vec<_>>()
        };
        match self.thread_pool {
            Some(pool) => pool.install(cast),
            None => cast(),
        }
    }

    /// 以預設最大距離投射單條射線
    pub fn cast_ray(&self, origin: Vec2<f32>, angle: f32) -> Option<RayHit> {
        self.cast_ray_within(origin, angle, self.config.max_distance)
    }

    /// 投射單條射線，回傳 `max_distance` 內最近的命中
    pub fn cast_ray_within(&self, origin: Vec2<f32>, angle: f32, max_distance: f32) -> Option<RayHit> {
        let direction = GeometryUtils::from_angle(angle);
        let mut closest_t = max_distance;
        let mut hit = None;

        for (index, wall) in self.walls.iter().enumerate() {
            let (a, b) = wall.current_segment().points();
            if let Some(ix) = ray_segment_intersection_with_threshold(
                origin,
                direction,
                a,
                b,
                self.config.parallel_threshold,
            ) {
                if ix.t >= 0.0 && ix.t < closest_t && ix.within_segment() {
                    closest_t = ix.t;
                    hit = Some(RayHit {
                        point: origin + direction * ix.t,
                        distance: ix.t,
                        wall: WallId(index),
                    });
                }
            }
        }

        hit
    }
}
