use failure::Error;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use sightline::config::{EngineSetting, DEFAULT_CONFIG_PATH};
use sightline::state::State;
use sightline::util::setup_logger;
use sightline::vision::FrameWriter;

/// 固定步長時鐘，realtime 模式下用 spin_sleep 補足每幀剩餘時間
struct Clock {
    step: Duration,
    last: Instant,
}

impl Clock {
    fn new(step: Duration) -> Self {
        Self {
            step,
            last: Instant::now(),
        }
    }

    fn dt(&self) -> Duration {
        self.step
    }

    fn tick(&mut self) {
        let spent = self.last.elapsed();
        if spent < self.step {
            spin_sleep::sleep(self.step - spent);
        }
        self.last = Instant::now();
    }
}

fn main() -> Result<(), Error> {
    let config_path = std::env::var("SIGHTLINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loaded = EngineSetting::load(&config_path);
    let setting = match &loaded {
        Ok(setting) => setting.clone(),
        Err(_) => EngineSetting::default(),
    };

    setup_logger(&setting.sim.log_level, setting.sim.log_file.as_deref())?;
    if let Err(e) = &loaded {
        warn!("{}，使用預設設定", e);
    }

    let sim = &setting.sim;
    let mut state = State::from_setting(&setting);
    let mut writer = match &sim.output_path {
        Some(path) => Some(FrameWriter::create(path)?),
        None => None,
    };

    let tps = sim.tps.max(1);
    let mut clock = Clock::new(Duration::from_secs_f64(1.0 / f64::from(tps)));
    let started = Instant::now();
    let mut total_points = 0usize;
    let mut total_hits = 0usize;

    info!("開始模擬: {} 幀, {} tps, realtime {}", sim.frames, tps, sim.realtime);
    for _ in 0..sim.frames {
        let result = state.tick(clock.dt());
        total_points += result.visible_area.len();
        total_hits += result.hit_walls.len();

        debug!(
            "frame {}: 觀察者 ({:.1}, {:.1}) 可見點 {} 個, 命中牆 {:?}, 面積 {:.1}",
            state.frame(),
            state.observer().position.x,
            state.observer().position.y,
            result.visible_area.len(),
            result.hit_walls,
            result.area()
        );

        if let Some(writer) = writer.as_mut() {
            writer.write(&state.snapshot(&result))?;
        }

        if sim.realtime {
            clock.tick();
        }
    }

    if let Some(writer) = writer {
        let written = writer.written();
        writer.finish()?;
        info!("已寫出 {} 幀快照", written);
    }

    let frames = state.frame().max(1) as f64;
    info!(
        "模擬結束: {} 幀, 模擬時間 {:.2}s, 實際耗時 {:.2?}, 平均可見點 {:.1}, 平均命中牆 {:.1}",
        state.frame(),
        state.elapsed(),
        started.elapsed(),
        total_points as f64 / frames,
        total_hits as f64 / frames
    );

    Ok(())
}
