//! # State 模块
//!
//! 动画状态：驱动器唯一持有，求值器只读。

use std::ops::RangeInclusive;

/// 进度的名义范围
pub const PROGRESS_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// 强度的取值范围
pub const STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=30.0;
/// 默认强度
pub const DEFAULT_STRENGTH: f32 = 15.0;

/// 动画状态
///
/// `progress` 名义上在 [0, 1]，但这里不强制限制；
/// 求值器通过 `max(progress - pct, 0)` 处理越界值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// 爆炸进度
    pub progress: f32,
    /// 满进度时的最大径向位移
    pub strength: f32,
    /// 驱动器时钟（秒），驱动浮动效果
    pub elapsed_time: f32,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            strength: DEFAULT_STRENGTH,
            elapsed_time: 0.0,
        }
    }
}

impl AnimationState {
    pub fn new(progress: f32, strength: f32) -> Self {
        Self {
            progress,
            strength,
            elapsed_time: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = AnimationState::default();
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.strength, 15.0);
        assert!(PROGRESS_RANGE.contains(&state.progress));
        assert!(STRENGTH_RANGE.contains(&state.strength));
    }

    #[test]
    fn test_out_of_range_progress_is_kept() {
        let state = AnimationState::new(1.4, 10.0);
        assert_eq!(state.progress, 1.4);
        assert!(!PROGRESS_RANGE.contains(&state.progress));
    }
}
