//! # Headless 模块
//!
//! 固定步长的无窗口运行：等待资源加载，按时间表触发爆炸/收拢，
//! 逐帧推进并交给渲染后端。

use glam::Vec3;
use tracing::info;

use crate::app::{App, AppError};
use crate::backend::RenderBackend;
use crate::control::ControlAction;

/// 运行计划
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPlan {
    /// 运行时长（秒）
    pub seconds: f32,
    /// 帧率
    pub fps: u32,
    /// 触发爆炸的时间点（秒）
    pub explode_at: Option<f32>,
    /// 触发收拢的时间点（秒）
    pub collapse_at: Option<f32>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            seconds: 8.0,
            fps: 60,
            explode_at: Some(0.0),
            collapse_at: None,
        }
    }
}

impl RunPlan {
    /// 总帧数
    pub fn frame_count(&self) -> u64 {
        if self.fps == 0 || !(self.seconds > 0.0) {
            return 0;
        }
        (self.seconds * self.fps as f32).round() as u64
    }

    pub fn step(&self) -> f32 {
        if self.fps == 0 {
            0.0
        } else {
            1.0 / self.fps as f32
        }
    }
}

/// 运行结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub progress: f32,
    pub strength: f32,
    pub rotation: f32,
    pub camera_position: Vec3,
}

/// 按计划运行
pub fn run(
    app: &mut App,
    backend: &mut dyn RenderBackend,
    plan: &RunPlan,
) -> Result<RunSummary, AppError> {
    app.wait_until_loaded(backend)?;

    let dt = plan.step();
    let mut explode_pending = plan.explode_at;
    let mut collapse_pending = plan.collapse_at;
    let mut frames = 0;
    let mut last = None;

    for index in 0..plan.frame_count() {
        let now = index as f32 * dt;
        if explode_pending.is_some_and(|at| now >= at) {
            explode_pending = None;
            app.handle(ControlAction::Explode);
        }
        if collapse_pending.is_some_and(|at| now >= at) {
            collapse_pending = None;
            app.handle(ControlAction::Collapse);
        }

        if let Some(output) = app.tick(dt, backend)? {
            frames += 1;
            last = Some(output);
        }
    }

    let summary = match last {
        Some(output) => RunSummary {
            frames,
            progress: output.state.progress,
            strength: output.state.strength,
            rotation: output.explosion.rotation,
            camera_position: output.camera.position,
        },
        None => {
            let pending = app
                .driver()
                .map(|driver| *driver.state())
                .unwrap_or_default();
            let camera = app.config().driver_settings().camera.evaluate(pending.progress);
            RunSummary {
                frames,
                progress: pending.progress,
                strength: pending.strength,
                rotation: shatter_core::explosion::rotation(pending.progress),
                camera_position: camera.position,
            }
        }
    };

    info!(
        frames = summary.frames,
        progress = summary.progress,
        strength = summary.strength,
        rotation = summary.rotation,
        camera = ?summary.camera_position,
        "运行结束"
    );
    Ok(summary)
}
