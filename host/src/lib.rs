//! # Host 层
//!
//! 碎片爆炸动画的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 配置加载
//! - 资源加载（glTF 模型、纹理），在后台线程完成
//! - 场景组装与灯光
//! - 视口与投影
//! - 控制面板适配
//! - 渲染后端抽象（附带 headless 实现）
//!
//! 动画本身的求值全部在 `shatter-core` 中完成，Host 层只负责把结果送到屏幕上。

pub mod app;
pub mod backend;
pub mod config;
pub mod control;
pub mod headless;
pub mod resources;
pub mod scene;
pub mod viewport;

pub use app::{App, AppError, AppPhase};
pub use backend::{BackendError, FrameSnapshot, HeadlessBackend, RenderBackend};
pub use config::{AppConfig, ConfigError};
pub use control::{ControlAction, ControlPanel};
pub use headless::{RunPlan, RunSummary};
pub use resources::{
    AssetBundle, AssetLoader, FsSource, MemorySource, ResourceError, ResourceSource,
};
pub use scene::{LightRig, SceneGraph};
pub use viewport::{Projection, Viewport, ViewportState};
