/// 視野輸出
///
/// 每幀的可見區域快照，序列化為 JSON lines
use failure::{err_msg, Error};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use vek::Vec2;

use crate::comp::{Scene, Segment, WallId};
use crate::vision::vision_result::{VisibilityResult, VisionMode};

/// 單幀快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// 模擬經過時間（秒）
    pub elapsed: f64,
    pub observer_pos: Vec2<f32>,
    pub facing_angle: f32,
    pub fov_angle: f32,
    pub mode: VisionMode,
    pub visible_area: Vec<Vec2<f32>>,
    pub hit_walls: Vec<WallId>,
    /// 當幀所有牆的位置
    pub walls: Vec<Segment>,
}

impl FrameSnapshot {
    pub fn capture(frame: u64, elapsed: f64, result: &VisibilityResult, scene: &Scene) -> Self {
        Self {
            frame,
            elapsed,
            observer_pos: result.observer_pos,
            facing_angle: result.facing_angle,
            fov_angle: result.fov_angle,
            mode: result.mode,
            visible_area: result.visible_area.clone(),
            hit_walls: result.hit_walls.iter().copied().collect(),
            walls: scene.walls().iter().map(|w| w.current_segment()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| err_msg(format!("快照序列化失敗: {}", e)))
    }
}

/// 以 JSON lines 寫出快照
pub struct FrameWriter<W: Write> {
    out: W,
    written: u64,
}

impl FrameWriter<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| err_msg(format!("無法建立輸出檔 {}: {}", path.display(), e)))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write(&mut self, snapshot: &FrameSnapshot) -> Result<(), Error> {
        let line = snapshot.to_json()?;
        writeln!(self.out, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.out.flush()?;
        Ok(self.out)
    }
}
