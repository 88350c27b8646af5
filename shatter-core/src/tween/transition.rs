//! # Transition 模块
//!
//! 进度过渡的显式状态记录。
//!
//! 过渡不在后台修改任何共享字段：它只记录起始值、起始时间、时长和缓动曲线，
//! 由每帧 tick 用当前时间采样得到确定的进度值。

use super::EasingFunction;

/// 过渡方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// 驱向 1（爆炸）
    TowardOne,
    /// 驱向 0（收拢）
    TowardZero,
}

impl TransitionKind {
    /// 目标值
    pub fn target(&self) -> f32 {
        match self {
            TransitionKind::TowardOne => 1.0,
            TransitionKind::TowardZero => 0.0,
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::TowardOne => write!(f, "toward_one"),
            TransitionKind::TowardZero => write!(f, "toward_zero"),
        }
    }
}

/// 一次采样的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSample {
    /// 当前进度
    pub value: f32,
    /// 是否已到达目标
    pub finished: bool,
}

/// 进度过渡
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTransition {
    /// 方向
    pub kind: TransitionKind,
    /// 起始值
    pub from: f32,
    /// 起始时间（秒，驱动器时钟）
    pub start_time: f64,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub easing: EasingFunction,
}

impl ProgressTransition {
    /// 创建新的过渡
    pub fn new(
        kind: TransitionKind,
        from: f32,
        start_time: f64,
        duration: f32,
        easing: EasingFunction,
    ) -> Self {
        Self {
            kind,
            from,
            start_time,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// 目标值
    pub fn target(&self) -> f32 {
        self.kind.target()
    }

    /// 线性时间进度 (0.0 - 1.0)
    pub fn time_fraction(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.start_time).max(0.0);
        ((elapsed / self.duration as f64) as f32).min(1.0)
    }

    /// 在 `now` 时刻采样
    pub fn sample(&self, now: f64) -> TransitionSample {
        let t = self.time_fraction(now);
        if t >= 1.0 {
            return TransitionSample {
                value: self.target(),
                finished: true,
            };
        }

        let eased = self.easing.apply(t);
        TransitionSample {
            value: self.from + (self.target() - self.from) * eased,
            finished: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(kind: TransitionKind, from: f32) -> ProgressTransition {
        ProgressTransition::new(kind, from, 10.0, 2.0, EasingFunction::Linear)
    }

    #[test]
    fn test_sample_linear() {
        let transition = linear(TransitionKind::TowardOne, 0.0);
        assert_eq!(transition.sample(10.0).value, 0.0);
        assert_eq!(transition.sample(11.0).value, 0.5);
        assert!(!transition.sample(11.0).finished);

        let end = transition.sample(12.0);
        assert_eq!(end.value, 1.0);
        assert!(end.finished);
    }

    #[test]
    fn test_sample_from_midpoint() {
        let transition = linear(TransitionKind::TowardZero, 0.8);
        assert_eq!(transition.sample(10.0).value, 0.8);
        assert!((transition.sample(11.0).value - 0.4).abs() < 1e-6);
        assert_eq!(transition.sample(20.0).value, 0.0);
    }

    #[test]
    fn test_sample_before_start_is_clamped() {
        let transition = linear(TransitionKind::TowardOne, 0.25);
        assert_eq!(transition.sample(5.0).value, 0.25);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let transition =
            ProgressTransition::new(TransitionKind::TowardOne, 0.0, 0.0, 0.0, EasingFunction::Linear);
        let sample = transition.sample(0.0);
        assert!(sample.finished);
        assert_eq!(sample.value, 1.0);
    }

    #[test]
    fn test_decelerating_curve_front_loads() {
        let transition =
            ProgressTransition::new(TransitionKind::TowardOne, 0.0, 0.0, 6.0, EasingFunction::EaseOutExpo);
        // 一半时间时已经远超一半进度
        assert!(transition.sample(3.0).value > 0.9);
    }

    #[test]
    fn test_kind() {
        assert_eq!(TransitionKind::TowardOne.target(), 1.0);
        assert_eq!(TransitionKind::TowardZero.target(), 0.0);
        assert_eq!(TransitionKind::TowardZero.to_string(), "toward_zero");
    }
}
