//! # Tween 模块
//!
//! 进度过渡：缓动曲线 + 显式的过渡状态记录。
//!
//! ## 核心概念
//!
//! - `EasingFunction`: 缓动函数
//! - `ProgressTransition`: 一次进度过渡（起始值、起始时间、时长、缓动）
//! - `TransitionKind`: 过渡方向（驱向 1 / 驱向 0）

mod easing;
mod transition;

pub use easing::EasingFunction;
pub use transition::{ProgressTransition, TransitionKind, TransitionSample};
