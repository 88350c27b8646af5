//! 灯光配置：环境光 + 一盏投射阴影的平行光，启动时设置一次。

use glam::Vec3;

use crate::config::LightingConfig;

/// 环境光
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f32,
}

/// 阴影相机（正交）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// 平行光
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadow: bool,
    pub shadow: ShadowCamera,
}

impl DirectionalLight {
    /// 光线方向（从光源指向原点）
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// 场景灯光
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl LightRig {
    pub fn from_config(config: &LightingConfig) -> Self {
        let extent = config.shadow_extent;
        Self {
            ambient: AmbientLight {
                color: 0xffffff,
                intensity: config.ambient_intensity,
            },
            directional: DirectionalLight {
                color: 0xffffff,
                intensity: config.directional_intensity,
                position: Vec3::from_array(config.directional_position),
                cast_shadow: true,
                shadow: ShadowCamera {
                    map_size: config.shadow_map_size,
                    near: 0.5,
                    far: config.shadow_far,
                    left: -extent,
                    right: extent,
                    top: extent,
                    bottom: -extent,
                },
            },
        }
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default())
    }
}
