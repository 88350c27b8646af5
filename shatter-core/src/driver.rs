//! # Driver 模块
//!
//! 动画驱动器：持有 `AnimationState`，管理进度过渡，并在每帧 tick 中
//! 调用爆炸求值器和相机求值器。
//!
//! ## 过渡规则
//!
//! - `explode()`：从当前进度驱向 1
//! - `collapse()`：从当前进度驱向 0
//! - 新的请求直接替换进行中的过渡（后到者生效），不排队
//! - 直接设置进度同样会取消进行中的过渡
//!
//! ## 时间
//!
//! 驱动器自带帧时钟，只由 `tick(dt)` 推进。
//! 测试中直接传入固定步长即可，不依赖真实时钟。

use tracing::debug;

use crate::camera::{CameraPose, CameraRig};
use crate::explosion::{self, ExplosionFrame};
use crate::fragment::FragmentSet;
use crate::state::AnimationState;
use crate::tween::{EasingFunction, ProgressTransition, TransitionKind};

/// 默认过渡时长（秒）
pub const DEFAULT_TRANSITION_DURATION: f32 = 6.0;

/// 驱动器设置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    /// 爆炸/收拢的时长（秒）
    pub transition_duration: f32,
    /// 爆炸/收拢的缓动曲线
    pub easing: EasingFunction,
    /// 相机轨道
    pub camera: CameraRig,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            easing: EasingFunction::EaseOutExpo,
            camera: CameraRig::default(),
        }
    }
}

/// 单调帧时钟
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 推进时钟；负的 dt 被忽略
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0) as f64;
    }

    /// 已经过的时间（秒）
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// 单帧输出，交给 Scene Assembly 提交
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// 帧序号（从 1 开始）
    pub frame: u64,
    /// 本帧使用的动画状态
    pub state: AnimationState,
    /// 爆炸求值结果
    pub explosion: ExplosionFrame,
    /// 相机姿态
    pub camera: CameraPose,
}

/// 动画驱动器
///
/// 只能在碎片集构建完成后创建，因此加载屏障在类型层面得到保证。
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    fragments: FragmentSet,
    state: AnimationState,
    settings: DriverSettings,
    clock: FrameClock,
    transition: Option<ProgressTransition>,
    frame: u64,
}

impl AnimationDriver {
    /// 创建驱动器
    pub fn new(fragments: FragmentSet, state: AnimationState, settings: DriverSettings) -> Self {
        Self {
            fragments,
            state,
            settings,
            clock: FrameClock::new(),
            transition: None,
            frame: 0,
        }
    }

    /// 开始爆炸：进度驱向 1
    pub fn explode(&mut self) {
        self.start(TransitionKind::TowardOne);
    }

    /// 开始收拢：进度驱向 0
    pub fn collapse(&mut self) {
        self.start(TransitionKind::TowardZero);
    }

    fn start(&mut self, kind: TransitionKind) {
        if let Some(previous) = self.transition.take() {
            debug!(previous = %previous.kind, next = %kind, "替换进行中的进度过渡");
        }

        let transition = ProgressTransition::new(
            kind,
            self.state.progress,
            self.clock.elapsed(),
            self.settings.transition_duration,
            self.settings.easing,
        );
        debug!(
            kind = %kind,
            from = self.state.progress,
            duration = transition.duration,
            "开始进度过渡"
        );
        self.transition = Some(transition);
    }

    /// 直接设置进度（控制面板拖动滑块），会取消进行中的过渡
    pub fn set_progress(&mut self, progress: f32) {
        if let Some(previous) = self.transition.take() {
            debug!(previous = %previous.kind, "直接设置进度，取消进行中的过渡");
        }
        self.state.progress = progress;
    }

    /// 设置强度
    pub fn set_strength(&mut self, strength: f32) {
        self.state.strength = strength;
    }

    /// 推进一帧并求值
    pub fn tick(&mut self, dt: f32) -> FrameOutput {
        self.clock.advance(dt);
        let now = self.clock.elapsed();

        if let Some(transition) = self.transition {
            let sample = transition.sample(now);
            self.state.progress = sample.value;
            if sample.finished {
                debug!(kind = %transition.kind, "进度过渡完成");
                self.transition = None;
            }
        }

        self.state.elapsed_time = now as f32;
        self.frame += 1;
        self.evaluate()
    }

    /// 用当前状态求值，不推进时钟
    pub fn evaluate(&self) -> FrameOutput {
        let state = self.state;
        FrameOutput {
            frame: self.frame,
            state,
            explosion: explosion::evaluate(
                &self.fragments,
                state.progress,
                state.strength,
                state.elapsed_time,
            ),
            camera: self.settings.camera.evaluate(state.progress),
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn fragments(&self) -> &FragmentSet {
        &self.fragments
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// 进行中的过渡
    pub fn active_transition(&self) -> Option<&ProgressTransition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// 已执行的帧数
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// 时钟时间（秒）
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }
}
