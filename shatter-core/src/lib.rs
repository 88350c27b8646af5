//! # Shatter Core
//!
//! "爆炸"物体动画的核心库：纯逻辑，不依赖任何 IO 或渲染后端。
//!
//! ## 架构概述
//!
//! ```text
//! 加载完成 ──► FragmentSet::build ──► AnimationDriver::new
//!                                          │
//!   explode()/collapse()/set_progress() ──►│
//!                                          │ tick(dt)
//!                                          ▼
//!                 explosion::evaluate + CameraRig::evaluate
//!                                          │
//!                                          ▼
//!                            FrameOutput ──► Scene Assembly
//! ```
//!
//! ## 模块结构
//!
//! - [`fragment`]：碎片集构建（方向、进度阈值、竖直跨度）
//! - [`explosion`]：爆炸求值（径向位移、整体旋转、浮动）
//! - [`camera`]：相机轨道求值
//! - [`tween`]：缓动函数与进度过渡
//! - [`driver`]：动画驱动器（每帧 tick）
//! - [`state`]：动画状态
//! - [`error`]：错误类型定义

pub mod camera;
pub mod driver;
pub mod error;
pub mod explosion;
pub mod fragment;
pub mod state;
pub mod tween;

// 重导出核心类型
pub use camera::{CameraPose, CameraRig, evaluate_camera, lerp};
pub use driver::{
    AnimationDriver, DEFAULT_TRANSITION_DURATION, DriverSettings, FrameClock, FrameOutput,
};
pub use error::{FragmentError, FragmentResult};
pub use explosion::ExplosionFrame;
pub use fragment::{Fragment, FragmentSet, MeshHandle, SourceMesh};
pub use state::{AnimationState, DEFAULT_STRENGTH, PROGRESS_RANGE, STRENGTH_RANGE};
pub use tween::{EasingFunction, ProgressTransition, TransitionKind, TransitionSample};

// 数学类型来自 glam
pub use glam;
