//! # Easing 模块
//!
//! 进度过渡使用的时间曲线。爆炸和收拢都用指数缓出：
//! 起步几乎瞬间完成大部分位移，随后长时间缓慢收尾。

use serde::{Deserialize, Serialize};

/// 时间曲线
///
/// 配置中以 snake_case 书写，例如 `"ease_out_expo"`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// 匀速
    Linear,
    /// 指数缓出，`1 - 2^(-10t)`，t = 1 时精确为 1
    #[default]
    EaseOutExpo,
}

impl EasingFunction {
    /// 把归一化时间映射为归一化进度；输入先限制到 [0, 1]
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseOutExpo if t >= 1.0 => 1.0,
            EasingFunction::EaseOutExpo => 1.0 - (-10.0 * t).exp2(),
        }
    }
}
