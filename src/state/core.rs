/// 模擬狀態核心結構

use std::sync::Arc;
use std::time::Duration;
use failure::{err_msg, Error};
use rayon::{ThreadPool, ThreadPoolBuilder};
use vek::Vec2;

use crate::comp::{Observer, Scene};
use crate::config::{EngineSetting, VisibilityConfig};
use crate::vision::{Bounds, FrameSnapshot, VisibilityEngine, VisibilityResult};

use super::TimeManager;

/// 模擬核心狀態
pub struct State {
    /// 場景（擁有所有牆）
    scene: Scene,
    observer: Observer,
    vision_config: VisibilityConfig,
    /// 時間管理器
    time_manager: TimeManager,
    /// 平行投射用的執行緒池，只在開啟 `parallel_rays` 時建立
    thread_pool: Option<Arc<ThreadPool>>,
    /// 觀察者每幀的移動方向
    steering: Vec2<f32>,
    /// 轉向速度（弧度/秒）
    turn_rate: f32,
    frame: u64,
}

impl State {
    pub fn new(scene: Scene, observer: Observer, vision_config: VisibilityConfig) -> Self {
        let thread_pool = if vision_config.parallel_rays {
            match Self::create_thread_pool() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    log::warn!("{}，改用全域執行緒池", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            scene,
            observer,
            vision_config,
            time_manager: TimeManager::default(),
            thread_pool,
            steering: Vec2::zero(),
            turn_rate: 0.0,
            frame: 0,
        }
    }

    /// 依設定建立預設場景與觀察者
    pub fn from_setting(setting: &EngineSetting) -> Self {
        let sim = &setting.sim;
        let scene = Scene::default_scene(sim.world_width, sim.world_height, sim.wall_margin, sim.bounce_margin);

        let mut observer = Observer::new(
            Vec2::new(sim.observer_x, sim.observer_y),
            sim.facing_radians(),
            sim.fov_radians(),
        )
        .with_speed(sim.observer_speed)
        .with_bounds(Bounds::inset(sim.world_width, sim.world_height, sim.observer_clamp));
        observer.set_mode(sim.full_360);

        let mut state = Self::new(scene, observer, setting.visibility);
        state.time_manager = TimeManager::new(sim.max_delta_time);
        state.steering = Vec2::new(sim.move_x, sim.move_y);
        state.turn_rate = sim.turn_rate;

        log::info!(
            "場景建立完成: {} 面牆, 觀察者 ({}, {}), 模式 {:?}",
            state.scene.len(),
            sim.observer_x,
            sim.observer_y,
            state.observer.mode()
        );
        state
    }

    fn create_thread_pool() -> Result<Arc<ThreadPool>, Error> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_cpus::get())
            .thread_name(move |i| format!("rayon-{}", i))
            .build()
            .map_err(|e| err_msg(format!("執行緒池建立失敗: {}", e)))?;
        Ok(Arc::new(pool))
    }

    /// 模擬主循環 tick
    ///
    /// 先移動觀察者與牆，再以更新後的牆計算可見區域。
    pub fn tick(&mut self, dt: Duration) -> VisibilityResult {
        let dt = self.time_manager.advance(dt);

        self.observer.steer(self.steering, dt);
        self.observer.turn(self.turn_rate * dt);
        self.scene.update(dt);
        self.frame += 1;

        self.compute_visibility()
    }

    /// 以目前狀態計算可見區域，不推進時間
    pub fn compute_visibility(&self) -> VisibilityResult {
        let mut engine = VisibilityEngine::with_config(self.scene.walls(), self.vision_config);
        if let Some(pool) = &self.thread_pool {
            engine = engine.with_thread_pool(pool.as_ref());
        }

        engine.compute(
            self.observer.position,
            self.observer.facing_angle,
            self.observer.fov_angle,
            self.observer.mode(),
        )
    }

    /// 目前幀的輸出快照
    pub fn snapshot(&self, result: &VisibilityResult) -> FrameSnapshot {
        FrameSnapshot::capture(self.frame, self.time_manager.elapsed(), result, &self.scene)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut Observer {
        &mut self.observer
    }

    pub fn set_steering(&mut self, direction: Vec2<f32>) {
        self.steering = direction;
    }

    pub fn set_turn_rate(&mut self, turn_rate: f32) {
        self.turn_rate = turn_rate;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed(&self) -> f64 {
        self.time_manager.elapsed()
    }

    pub fn vision_config(&self) -> &VisibilityConfig {
        &self.vision_config
    }

    /// 獲取執行緒池
    pub fn thread_pool(&self) -> Option<&Arc<ThreadPool>> {
        self.thread_pool.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comp::{Wall, WallId};
    use crate::vision::VisionMode;
    use std::f32::consts::PI;

    fn default_state() -> State {
        State::from_setting(&EngineSetting::default())
    }

    #[test]
    fn test_from_setting_builds_default_scene() {
        let state = default_state();

        assert_eq!(state.scene().len(), 10);
        assert_eq!(state.scene().walls().iter().filter(|w| w.is_dynamic()).count(), 2);
        assert_eq!(state.observer().position, Vec2::new(400.0, 380.0));
        assert_eq!(state.observer().mode(), VisionMode::FieldOfView);
        assert!((state.observer().fov_angle - PI / 2.0).abs() < 1e-6);
        assert!(state.thread_pool().is_none());
        assert_eq!(state.frame(), 0);
    }

    #[test]
    fn test_tick_moves_walls_before_computing() {
        let mut state = default_state();
        let result = state.tick(Duration::from_millis(100));

        assert_eq!(state.frame(), 1);
        assert!((state.elapsed() - 0.1).abs() < 1e-6);

        let rotating = state.scene().wall(WallId(8)).expect("rotating wall");
        assert!((rotating.accumulated_angle() - 0.05).abs() < 1e-5);
        let sliding = state.scene().wall(WallId(9)).expect("sliding wall");
        assert!((sliding.current_segment().p1.x - 305.0).abs() < 1e-3);

        // tick 的結果與直接用更新後的牆計算一致
        assert_eq!(result, state.compute_visibility());
        assert!(!result.visible_area.is_empty());
    }

    #[test]
    fn test_tick_clamps_delta_time() {
        let mut state = default_state();
        state.tick(Duration::from_secs(10));
        assert!((state.elapsed() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_steering_and_turning() {
        let mut state = default_state();
        state.set_steering(Vec2::new(-1.0, 0.0));
        state.set_turn_rate(1.0);

        for _ in 0..20 {
            state.tick(Duration::from_millis(250));
        }

        // 200 單位/秒 * 5 秒 遠超過邊界，被限制在 x = 60
        assert_eq!(state.observer().position.x, 60.0);
        assert!((state.observer().facing_angle - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_full_360_setting() {
        let mut setting = EngineSetting::default();
        setting.sim.full_360 = true;
        setting.visibility.parallel_rays = true;

        let mut state = State::from_setting(&setting);
        let result = state.tick(Duration::from_millis(16));

        assert_eq!(result.mode, VisionMode::Full360);
        assert!(result.contains_point(state.observer().position));
        for p in &result.visible_area {
            assert!(p.x >= 50.0 - 1e-2 && p.x <= 750.0 + 1e-2);
            assert!(p.y >= 50.0 - 1e-2 && p.y <= 550.0 + 1e-2);
        }
    }

    #[test]
    fn test_snapshot_reflects_current_frame() {
        let scene = {
            let mut scene = Scene::new();
            scene.add_wall(Wall::fixed(Vec2::new(10.0, -5.0), Vec2::new(10.0, 5.0)));
            scene
        };
        let observer = Observer::new(Vec2::zero(), 0.0, PI / 2.0);
        let mut state = State::new(scene, observer, VisibilityConfig::default());

        let result = state.tick(Duration::from_millis(50));
        let snapshot = state.snapshot(&result);

        assert_eq!(snapshot.frame, 1);
        assert!((snapshot.elapsed - 0.05).abs() < 1e-6);
        assert_eq!(snapshot.hit_walls, vec![WallId(0)]);
        assert_eq!(snapshot.walls.len(), 1);
        assert_eq!(snapshot.visible_area, result.visible_area);
    }
}
