//! # Control 模块
//!
//! 控制面板适配层，把 UI 事件转换为对动画驱动器的写入。
//!
//! ## 设计说明
//!
//! - 两个滑块：`progress` [0, 1]，步长 0.001；`strength` [0, 30]，步长 0.1
//! - 两个动作：`explode`、`collapse`
//! - 滑块值先截断到范围内再按步长量化
//! - 非有限值（NaN / ∞）直接丢弃并打印警告，不会到达驱动器
//! - 拖动进度滑块会取消进行中的过渡

use std::fmt;
use std::ops::RangeInclusive;

use shatter_core::{AnimationDriver, AnimationState, PROGRESS_RANGE, STRENGTH_RANGE};
use tracing::warn;

/// 进度滑块步长
pub const PROGRESS_STEP: f32 = 0.001;
/// 强度滑块步长
pub const STRENGTH_STEP: f32 = 0.1;

/// 滑块描述
#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub name: &'static str,
    pub range: RangeInclusive<f32>,
    pub step: f32,
}

impl SliderSpec {
    /// 截断并量化
    pub fn snap(&self, value: f32) -> f32 {
        let (min, max) = (*self.range.start(), *self.range.end());
        let quantized = (value.clamp(min, max) / self.step).round() * self.step;
        quantized.clamp(min, max)
    }
}

/// 控制面板描述（供 UI 层构建控件）
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPanel {
    pub progress: SliderSpec,
    pub strength: SliderSpec,
    pub actions: [&'static str; 2],
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            progress: SliderSpec {
                name: "progress",
                range: PROGRESS_RANGE,
                step: PROGRESS_STEP,
            },
            strength: SliderSpec {
                name: "strength",
                range: STRENGTH_RANGE,
                step: STRENGTH_STEP,
            },
            actions: ["explode", "collapse"],
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 规范化动作；非有限的滑块值返回 `None`
    pub fn sanitize(&self, action: ControlAction) -> Option<ControlAction> {
        match action {
            ControlAction::SetProgress(value) => finite(self.progress.name, value)
                .map(|v| ControlAction::SetProgress(self.progress.snap(v))),
            ControlAction::SetStrength(value) => finite(self.strength.name, value)
                .map(|v| ControlAction::SetStrength(self.strength.snap(v))),
            other => Some(other),
        }
    }

    /// 把动作写入驱动器，返回是否被接受
    pub fn apply(&self, action: ControlAction, driver: &mut AnimationDriver) -> bool {
        let Some(action) = self.sanitize(action) else {
            return false;
        };

        match action {
            ControlAction::SetProgress(value) => driver.set_progress(value),
            ControlAction::SetStrength(value) => driver.set_strength(value),
            ControlAction::Explode => driver.explode(),
            ControlAction::Collapse => driver.collapse(),
        }
        true
    }

    /// 加载完成前把滑块写入待用状态
    ///
    /// 返回被接受的动作；`Explode` / `Collapse` 原样返回，由调用方暂存。
    pub fn apply_pending(
        &self,
        action: ControlAction,
        state: &mut AnimationState,
    ) -> Option<ControlAction> {
        let action = self.sanitize(action)?;
        match action {
            ControlAction::SetProgress(value) => state.progress = value,
            ControlAction::SetStrength(value) => state.strength = value,
            ControlAction::Explode | ControlAction::Collapse => {}
        }
        Some(action)
    }
}

fn finite(name: &str, value: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value)
    } else {
        warn!(slider = name, value = %value, "忽略非有限的滑块值");
        None
    }
}

/// 控制动作
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    SetProgress(f32),
    SetStrength(f32),
    Explode,
    Collapse,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::SetProgress(v) => write!(f, "progress={}", v),
            ControlAction::SetStrength(v) => write!(f, "strength={}", v),
            ControlAction::Explode => write!(f, "explode"),
            ControlAction::Collapse => write!(f, "collapse"),
        }
    }
}
