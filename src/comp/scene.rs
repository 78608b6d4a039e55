/// 場景
///
/// 擁有所有牆，負責每幀推進牆的運動與反彈規則
use vek::Vec2;

use crate::comp::wall::{Wall, WallId};
use crate::vision::geometry_utils::Bounds;

/// 牆的集合，牆建立後不會被移除
#[derive(Debug, Clone, Default)]
pub struct Scene {
    walls: Vec<Wall>,
    /// 移動牆的反彈範圍，None 表示不反彈
    bounce_area: Option<Bounds>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounce_area(mut self, area: Bounds) -> Self {
        self.bounce_area = Some(area);
        self
    }

    /// 預設展示場景
    ///
    /// 外圍四面牆、內部四面靜態牆、一面繞中心旋轉的牆、一面左右往返的牆。
    pub fn default_scene(width: f32, height: f32, wall_margin: f32, bounce_margin: f32) -> Self {
        let mut scene = Self::new().with_bounce_area(Bounds::inset(width, height, bounce_margin));

        let corners = [
            Vec2::new(wall_margin, wall_margin),
            Vec2::new(width - wall_margin, wall_margin),
            Vec2::new(width - wall_margin, height - wall_margin),
            Vec2::new(wall_margin, height - wall_margin),
        ];
        for i in 0..corners.len() {
            scene.add_wall(Wall::fixed(corners[i], corners[(i + 1) % corners.len()]));
        }

        // 內部牆
        scene.add_wall(Wall::fixed(Vec2::new(200.0, 150.0), Vec2::new(600.0, 150.0)));
        scene.add_wall(Wall::fixed(Vec2::new(200.0, 450.0), Vec2::new(600.0, 450.0)));
        scene.add_wall(Wall::fixed(Vec2::new(250.0, 200.0), Vec2::new(250.0, 400.0)));
        scene.add_wall(Wall::fixed(Vec2::new(550.0, 200.0), Vec2::new(550.0, 400.0)));

        scene.add_wall(Wall::rotating(
            Vec2::new(350.0, 300.0),
            Vec2::new(450.0, 300.0),
            Vec2::new(400.0, 300.0),
            0.5,
        ));
        scene.add_wall(Wall::translating(
            Vec2::new(300.0, 250.0),
            Vec2::new(350.0, 250.0),
            Vec2::new(50.0, 0.0),
        ));

        log::debug!("預設場景建立完成，共 {} 面牆", scene.walls.len());
        scene
    }

    pub fn add_wall(&mut self, wall: Wall) -> WallId {
        let id = WallId(self.walls.len());
        self.walls.push(wall);
        id
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.get(id.0)
    }

    pub fn wall_mut(&mut self, id: WallId) -> Option<&mut Wall> {
        self.walls.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// 推進所有牆並處理反彈
    pub fn update(&mut self, dt: f32) {
        for wall in &mut self.walls {
            wall.update(dt);
            if let Some(area) = self.bounce_area {
                Self::bounce(wall, &area);
            }
        }
    }

    /// 端點超出範圍且速度仍朝外時反轉該軸速度
    fn bounce(wall: &mut Wall, area: &Bounds) {
        if !wall.is_moving() {
            return;
        }

        let (p1, p2) = wall.current_segment().points();
        let mut flipped = false;
        for p in [p1, p2] {
            if (p.x < area.min.x && wall.velocity.x < 0.0) || (p.x > area.max.x && wall.velocity.x > 0.0) {
                wall.velocity.x = -wall.velocity.x;
                flipped = true;
            }
            if (p.y < area.min.y && wall.velocity.y < 0.0) || (p.y > area.max.y && wall.velocity.y > 0.0) {
                wall.velocity.y = -wall.velocity.y;
                flipped = true;
            }
        }

        if flipped {
            log::trace!("牆反彈，新速度 {:?}", wall.velocity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene_layout() {
        let scene = Scene::default_scene(800.0, 600.0, 50.0, 80.0);
        assert_eq!(scene.len(), 10);

        let dynamic = scene.walls().iter().filter(|w| w.is_dynamic()).count();
        assert_eq!(dynamic, 2);

        let top = scene.wall(WallId(0)).expect("outer wall").current_segment();
        assert_eq!(top.p1, Vec2::new(50.0, 50.0));
        assert_eq!(top.p2, Vec2::new(750.0, 50.0));

        let closing = scene.wall(WallId(3)).expect("outer wall").current_segment();
        assert_eq!(closing.p2, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_add_wall_returns_sequential_ids() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());
        let a = scene.add_wall(Wall::fixed(Vec2::zero(), Vec2::one()));
        let b = scene.add_wall(Wall::fixed(Vec2::one(), Vec2::new(2.0, 2.0)));
        assert_eq!(a, WallId(0));
        assert_eq!(b, WallId(1));
        assert!(scene.wall(WallId(2)).is_none());
    }

    #[test]
    fn test_moving_wall_bounces_off_area() {
        let area = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let mut scene = Scene::new().with_bounce_area(area);
        let id = scene.add_wall(Wall::translating(
            Vec2::new(80.0, 50.0),
            Vec2::new(95.0, 50.0),
            Vec2::new(10.0, 0.0),
        ));

        // 1 秒後右端點到 105，超出範圍
        scene.update(1.0);
        assert_eq!(scene.wall(id).expect("wall").velocity, Vec2::new(-10.0, 0.0));

        // 已經朝內移動，不再反轉
        scene.update(0.1);
        assert_eq!(scene.wall(id).expect("wall").velocity, Vec2::new(-10.0, 0.0));
    }

    #[test]
    fn test_both_endpoints_outside_flip_once() {
        let area = Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
        let mut scene = Scene::new().with_bounce_area(area);
        let id = scene.add_wall(Wall::translating(
            Vec2::new(50.0, 98.0),
            Vec2::new(60.0, 98.0),
            Vec2::new(0.0, 5.0),
        ));

        scene.update(1.0);
        assert_eq!(scene.wall(id).expect("wall").velocity, Vec2::new(0.0, -5.0));
    }

    #[test]
    fn test_without_bounce_area_walls_keep_going() {
        let mut scene = Scene::new();
        let id = scene.add_wall(Wall::translating(Vec2::zero(), Vec2::one(), Vec2::new(1000.0, 0.0)));
        scene.update(1.0);
        let wall = scene.wall(id).expect("wall");
        assert_eq!(wall.velocity, Vec2::new(1000.0, 0.0));
        assert_eq!(wall.current_segment().p1, Vec2::new(1000.0, 0.0));
    }

    #[test]
    fn test_wall_mut_allows_external_velocity_policy() {
        let mut scene = Scene::new();
        let id = scene.add_wall(Wall::translating(Vec2::zero(), Vec2::one(), Vec2::new(1.0, 0.0)));
        scene.wall_mut(id).expect("wall").velocity = Vec2::new(0.0, 2.0);
        scene.update(1.0);
        assert_eq!(scene.wall(id).expect("wall").current_segment().p1, Vec2::new(0.0, 2.0));
    }
}
