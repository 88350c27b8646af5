//! # Camera 模块
//!
//! 相机轨道求值器：随进度从正视位置扫到俯视位置，始终看向原点。
//!
//! 每帧从当前进度重新求值，没有速度或惯性；
//! 进度反向时相机路径也会立即、平滑地反向。

use glam::{Mat4, Vec3};

/// 默认俯视高度
pub const DEFAULT_ELEVATION: f32 = 8.0;
/// 默认正视距离
pub const DEFAULT_DISTANCE: f32 = 8.0;

/// 线性插值
pub fn lerp(start: f32, end: f32, amount: f32) -> f32 {
    (1.0 - amount) * start + amount * end
}

/// 相机姿态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// 相机位置
    pub position: Vec3,
    /// 观察目标
    pub target: Vec3,
}

impl CameraPose {
    /// 右手系观察矩阵
    ///
    /// 相机在目标正上方时 Y 轴与视线平行，改用 -Z 作为上方向。
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.target - self.position;
        let up = if forward.cross(Vec3::Y).length_squared() <= f32::EPSILON {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }
}

/// 相机轨道参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// progress = 1 时的高度
    pub elevation: f32,
    /// progress = 0 时的距离
    pub distance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            elevation: DEFAULT_ELEVATION,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl CameraRig {
    pub fn new(elevation: f32, distance: f32) -> Self {
        Self {
            elevation,
            distance,
        }
    }

    /// 求值相机姿态
    pub fn evaluate(&self, progress: f32) -> CameraPose {
        CameraPose {
            position: Vec3::new(
                0.0,
                lerp(0.0, self.elevation, progress),
                lerp(self.distance, 0.0, progress),
            ),
            target: Vec3::ZERO,
        }
    }
}

/// 使用默认轨道求值相机姿态
pub fn evaluate_camera(progress: f32) -> CameraPose {
    CameraRig::default().evaluate(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_endpoints() {
        assert_eq!(evaluate_camera(0.0).position, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(evaluate_camera(1.0).position, Vec3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn test_camera_midpoint() {
        let pose = evaluate_camera(0.5);
        assert_eq!(pose.position, Vec3::new(0.0, 4.0, 4.0));
    }

    #[test]
    fn test_target_is_origin() {
        for step in 0..=10 {
            let pose = evaluate_camera(step as f32 / 10.0);
            assert_eq!(pose.target, Vec3::ZERO);
        }
    }

    #[test]
    fn test_custom_rig() {
        let rig = CameraRig::new(10.0, 5.0);
        assert_eq!(rig.evaluate(0.0).position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(rig.evaluate(1.0).position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_reversal_is_continuous() {
        // 无状态：同一进度总是同一位置，与到达方向无关
        let forward = evaluate_camera(0.3);
        let _ = evaluate_camera(0.9);
        let back = evaluate_camera(0.3);
        assert_eq!(forward, back);
    }

    #[test]
    fn test_view_matrix_is_finite() {
        for progress in [0.0, 0.5, 1.0] {
            let view = evaluate_camera(progress).view_matrix();
            assert!(view.is_finite());
            // 原点应位于相机正前方（-Z）
            let origin = view.transform_point3(Vec3::ZERO);
            assert!(origin.x.abs() < 1e-4);
            assert!(origin.y.abs() < 1e-4);
            assert!(origin.z < 0.0);
        }
    }
}
