//! # Viewport 模块
//!
//! 视口尺寸与透视投影。窗口缩放只重新计算宽高比和输出尺寸，
//! 不会影响动画状态。

use glam::Mat4;
use tracing::debug;

use crate::config::{AppConfig, CameraConfig};

/// 视口（逻辑像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// 实际使用的像素比（已按上限截断）
    pub pixel_ratio: f32,
}

impl Viewport {
    /// 创建视口；像素比按 `max_pixel_ratio` 截断
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: cap_pixel_ratio(device_pixel_ratio, max_pixel_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// 渲染输出尺寸（物理像素）
    pub fn output_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.pixel_ratio).round() as u32,
            (self.height as f32 * self.pixel_ratio).round() as u32,
        )
    }
}

fn cap_pixel_ratio(device_pixel_ratio: f32, max_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(max_pixel_ratio)
    } else {
        1.0_f32.min(max_pixel_ratio)
    }
}

/// 透视投影
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// 竖直视角（度）
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(camera: &CameraConfig, aspect: f32) -> Self {
        Self {
            fov_degrees: camera.fov_degrees,
            aspect,
            near: camera.near,
            far: camera.far,
        }
    }

    /// 右手系透视矩阵
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// 视口 + 投影，统一处理窗口缩放
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    viewport: Viewport,
    projection: Projection,
    resize_max_pixel_ratio: f32,
}

impl ViewportState {
    /// 按配置中的窗口尺寸创建，像素比使用启动时的上限
    pub fn from_config(config: &AppConfig, device_pixel_ratio: f32) -> Self {
        let viewport = Viewport::new(
            config.window.width,
            config.window.height,
            device_pixel_ratio,
            config.renderer.initial_max_pixel_ratio,
        );
        Self {
            viewport,
            projection: Projection::new(&config.camera, viewport.aspect()),
            resize_max_pixel_ratio: config.renderer.resize_max_pixel_ratio,
        }
    }

    /// 窗口缩放
    ///
    /// 宽或高为 0（例如窗口最小化）时忽略，返回 `false`。
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> bool {
        if width == 0 || height == 0 {
            debug!(width, height, "忽略零尺寸的缩放");
            return false;
        }

        self.viewport = Viewport::new(width, height, device_pixel_ratio, self.resize_max_pixel_ratio);
        self.projection.aspect = self.viewport.aspect();
        debug!(
            width,
            height,
            pixel_ratio = self.viewport.pixel_ratio,
            aspect = self.projection.aspect,
            "视口尺寸更新"
        );
        true
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }
}
