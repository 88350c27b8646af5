//! # Explosion 模块
//!
//! 爆炸求值器：纯函数，把 (progress, strength, elapsed_time) 映射为
//! 每个碎片的世界位置、整体旋转和竖直浮动。
//!
//! 没有隐藏状态：相同输入总是得到逐位相同的输出，
//! 因此可以以任意频率调用，跳帧也不会累积误差。

use std::f32::consts::PI;

use glam::Vec3;

use crate::fragment::{Fragment, FragmentSet};

/// 浮动角频率
pub const BOB_FREQUENCY: f32 = 0.5;
/// 浮动振幅
pub const BOB_AMPLITUDE: f32 = 0.2;

/// 单帧爆炸求值结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplosionFrame {
    /// 每个碎片的世界位置（与碎片集顺序一致）
    pub positions: Vec<Vec3>,
    /// 主物体与伴随物体共享的 Y 轴旋转（弧度）
    pub rotation: f32,
    /// 主物体的竖直浮动
    pub bob: f32,
}

/// 求值整帧
pub fn evaluate(
    fragments: &FragmentSet,
    progress: f32,
    strength: f32,
    elapsed_time: f32,
) -> ExplosionFrame {
    let mut frame = ExplosionFrame {
        positions: Vec::with_capacity(fragments.len()),
        rotation: 0.0,
        bob: 0.0,
    };
    evaluate_into(fragments, progress, strength, elapsed_time, &mut frame);
    frame
}

/// 求值整帧，复用已有缓冲区
pub fn evaluate_into(
    fragments: &FragmentSet,
    progress: f32,
    strength: f32,
    elapsed_time: f32,
    frame: &mut ExplosionFrame,
) {
    frame.positions.clear();
    frame.positions.extend(
        fragments
            .iter()
            .map(|fragment| displaced_position(fragment, progress, strength)),
    );
    frame.rotation = rotation(progress);
    frame.bob = bob(elapsed_time);
}

/// 碎片沿径向的移动距离：`strength * max(progress - pct, 0)`
pub fn travel(fragment: &Fragment, progress: f32, strength: f32) -> f32 {
    strength * (progress - fragment.pct).max(0.0)
}

/// 碎片的世界位置
///
/// 只在水平面内径向移动，Y 保持静止位置。
pub fn displaced_position(fragment: &Fragment, progress: f32, strength: f32) -> Vec3 {
    let value = travel(fragment, progress, strength);
    let rest = fragment.rest_position;
    Vec3::new(
        rest.x + fragment.direction.x * value,
        rest.y,
        rest.z + fragment.direction.z * value,
    )
}

/// 整体旋转：`-progress * π`
pub fn rotation(progress: f32) -> f32 {
    -progress * PI
}

/// 竖直浮动：`sin(elapsed_time * 0.5) * 0.2`，与进度无关
pub fn bob(elapsed_time: f32) -> f32 {
    (elapsed_time * BOB_FREQUENCY).sin() * BOB_AMPLITUDE
}
