//! # Backend 模块
//!
//! 渲染后端抽象。后端只消费场景状态：整体旋转、碎片位置、相机姿态，
//! 灯光和阴影在 `configure` 时设置一次。
//!
//! `HeadlessBackend` 不做任何绘制，只记录帧数和最后一次提交的状态，
//! 用于命令行运行和测试。

use glam::{Mat4, Vec3};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::RendererConfig;
use crate::scene::{LightRig, SceneGraph};
use crate::viewport::ViewportState;

/// 后端错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// 尚未调用 configure
    #[error("渲染后端尚未初始化")]
    NotConfigured,

    /// 绘制失败
    #[error("绘制失败: {0}")]
    DrawFailed(String),
}

/// 渲染后端
pub trait RenderBackend {
    /// 初始化：清屏颜色、抗锯齿、灯光与阴影
    fn configure(
        &mut self,
        renderer: &RendererConfig,
        lights: &LightRig,
        viewport: &ViewportState,
    ) -> Result<(), BackendError>;

    /// 视口尺寸变化
    fn resize(&mut self, viewport: &ViewportState);

    /// 绘制一帧
    fn draw(&mut self, scene: &SceneGraph, viewport: &ViewportState) -> Result<(), BackendError>;
}

/// headless 后端记录的单帧快照
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub rotation: f32,
    pub bob: f32,
    /// 碎片世界坐标（按碎片集顺序）
    pub fragment_positions: Vec<Vec3>,
    pub camera_position: Vec3,
    pub view_projection: Mat4,
}

/// 不绘制的后端
#[derive(Debug, Clone, Default)]
pub struct HeadlessBackend {
    configured: bool,
    clear_color: u32,
    shadow_map_size: u32,
    output_size: (u32, u32),
    frames: u64,
    last: Option<FrameSnapshot>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// 已绘制的帧数
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// 最后一帧
    pub fn last_frame(&self) -> Option<&FrameSnapshot> {
        self.last.as_ref()
    }

    pub fn output_size(&self) -> (u32, u32) {
        self.output_size
    }

    pub fn clear_color(&self) -> u32 {
        self.clear_color
    }

    pub fn shadow_map_size(&self) -> u32 {
        self.shadow_map_size
    }
}

impl RenderBackend for HeadlessBackend {
    fn configure(
        &mut self,
        renderer: &RendererConfig,
        lights: &LightRig,
        viewport: &ViewportState,
    ) -> Result<(), BackendError> {
        self.clear_color = renderer.clear_color;
        self.shadow_map_size = lights.directional.shadow.map_size;
        self.output_size = viewport.viewport().output_size();
        self.configured = true;
        info!(
            clear_color = %format!("{:#08x}", renderer.clear_color),
            antialias = renderer.antialias,
            shadow_map = self.shadow_map_size,
            width = self.output_size.0,
            height = self.output_size.1,
            "headless 后端初始化完成"
        );
        Ok(())
    }

    fn resize(&mut self, viewport: &ViewportState) {
        self.output_size = viewport.viewport().output_size();
        debug!(width = self.output_size.0, height = self.output_size.1, "输出尺寸更新");
    }

    fn draw(&mut self, scene: &SceneGraph, viewport: &ViewportState) -> Result<(), BackendError> {
        if !self.configured {
            return Err(BackendError::NotConfigured);
        }

        let stone = scene.stone();
        let camera = scene.camera();
        let view_projection = viewport.projection().matrix() * camera.view_matrix();
        if !view_projection.is_finite() {
            return Err(BackendError::DrawFailed("观察投影矩阵包含非有限值".to_string()));
        }

        self.last = Some(FrameSnapshot {
            rotation: stone.rotation_y,
            bob: stone.position.y,
            fragment_positions: scene
                .fragment_nodes()
                .iter()
                .map(|id| scene.world_position(*id))
                .collect(),
            camera_position: camera.position,
            view_projection,
        });
        self.frames += 1;
        Ok(())
    }
}
