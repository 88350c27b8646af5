//! # Config 模块
//!
//! 运行时配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use shatter_core::{
    CameraRig, DriverSettings, EasingFunction, PROGRESS_RANGE, STRENGTH_RANGE,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 资源根目录
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// 碎片模型路径（相对于 assets_root）
    #[serde(default = "default_fragments_model")]
    pub fragments_model: String,

    /// 伴随 Logo 模型路径（相对于 assets_root）
    #[serde(default = "default_companion_model")]
    pub companion_model: String,

    /// 纹理路径（相对于 assets_root），同时贴到所有碎片和伴随模型上
    #[serde(default = "default_texture_path")]
    pub texture: String,

    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 动画配置
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 相机配置
    #[serde(default)]
    pub camera: CameraConfig,

    /// 纹理采样配置
    #[serde(default)]
    pub texture_sampling: TextureConfig,

    /// 灯光配置
    #[serde(default)]
    pub lighting: LightingConfig,

    /// 渲染器配置
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_window_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// 动画配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 初始进度 (0.0 - 1.0)
    #[serde(default)]
    pub initial_progress: f32,

    /// 初始强度 (0.0 - 30.0)
    #[serde(default = "default_strength")]
    pub strength: f32,

    /// 爆炸/收拢时长（秒）
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f32,

    /// 爆炸/收拢缓动曲线
    #[serde(default)]
    pub easing: EasingFunction,
}

/// 相机配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 竖直视角（度）
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,

    /// 近裁剪面
    #[serde(default = "default_near")]
    pub near: f32,

    /// 远裁剪面
    #[serde(default = "default_far")]
    pub far: f32,

    /// progress = 1 时相机高度
    #[serde(default = "default_camera_elevation")]
    pub elevation: f32,

    /// progress = 0 时相机距离
    #[serde(default = "default_camera_distance")]
    pub distance: f32,
}

/// 纹理采样配置
///
/// 环绕方式固定为镜像重复，过滤固定为最近邻且不生成 mipmap；
/// 这里只开放平铺次数和偏移。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureConfig {
    /// UV 平铺次数
    #[serde(default = "default_texture_repeat")]
    pub repeat: [f32; 2],

    /// UV 偏移
    #[serde(default = "default_texture_offset")]
    pub offset: [f32; 2],
}

/// 灯光配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightingConfig {
    /// 环境光强度
    #[serde(default = "default_ambient_intensity")]
    pub ambient_intensity: f32,

    /// 平行光强度
    #[serde(default = "default_directional_intensity")]
    pub directional_intensity: f32,

    /// 平行光位置
    #[serde(default = "default_directional_position")]
    pub directional_position: [f32; 3],

    /// 阴影贴图边长（像素）
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: u32,

    /// 阴影相机远裁剪面
    #[serde(default = "default_shadow_far")]
    pub shadow_far: f32,

    /// 阴影相机正交半宽
    #[serde(default = "default_shadow_extent")]
    pub shadow_extent: f32,
}

/// 渲染器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// 清屏颜色（0xRRGGBB）
    #[serde(default = "default_clear_color")]
    pub clear_color: u32,

    /// 是否开启抗锯齿
    #[serde(default = "default_antialias")]
    pub antialias: bool,

    /// 启动时像素比上限
    #[serde(default = "default_initial_pixel_ratio")]
    pub initial_max_pixel_ratio: f32,

    /// 窗口缩放后像素比上限
    #[serde(default = "default_resize_pixel_ratio")]
    pub resize_max_pixel_ratio: f32,
}

// 默认值函数
fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_fragments_model() -> String {
    "models/stone.gltf".to_string()
}

fn default_companion_model() -> String {
    "models/cube-logo-top.gltf".to_string()
}

fn default_texture_path() -> String {
    "stone-texture.jpg".to_string()
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_strength() -> f32 {
    shatter_core::DEFAULT_STRENGTH
}

fn default_transition_duration() -> f32 {
    shatter_core::DEFAULT_TRANSITION_DURATION
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    100.0
}

fn default_camera_elevation() -> f32 {
    shatter_core::camera::DEFAULT_ELEVATION
}

fn default_camera_distance() -> f32 {
    shatter_core::camera::DEFAULT_DISTANCE
}

fn default_texture_repeat() -> [f32; 2] {
    [2.0, 4.0]
}

fn default_texture_offset() -> [f32; 2] {
    [1.0, 1.0]
}

fn default_ambient_intensity() -> f32 {
    0.8
}

fn default_directional_intensity() -> f32 {
    0.6
}

fn default_directional_position() -> [f32; 3] {
    [8.0, 5.0, 5.0]
}

fn default_shadow_map_size() -> u32 {
    1024
}

fn default_shadow_far() -> f32 {
    15.0
}

fn default_shadow_extent() -> f32 {
    7.0
}

fn default_clear_color() -> u32 {
    0xffffff
}

fn default_antialias() -> bool {
    true
}

fn default_initial_pixel_ratio() -> f32 {
    1.5
}

fn default_resize_pixel_ratio() -> f32 {
    2.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_root: default_assets_root(),
            fragments_model: default_fragments_model(),
            companion_model: default_companion_model(),
            texture: default_texture_path(),
            window: WindowConfig::default(),
            animation: AnimationConfig::default(),
            camera: CameraConfig::default(),
            texture_sampling: TextureConfig::default(),
            lighting: LightingConfig::default(),
            renderer: RendererConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial_progress: 0.0,
            strength: default_strength(),
            transition_duration: default_transition_duration(),
            easing: EasingFunction::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            elevation: default_camera_elevation(),
            distance: default_camera_distance(),
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            repeat: default_texture_repeat(),
            offset: default_texture_offset(),
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: default_ambient_intensity(),
            directional_intensity: default_directional_intensity(),
            directional_position: default_directional_position(),
            shadow_map_size: default_shadow_map_size(),
            shadow_far: default_shadow_far(),
            shadow_extent: default_shadow_extent(),
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: default_clear_color(),
            antialias: default_antialias(),
            initial_max_pixel_ratio: default_initial_pixel_ratio(),
            resize_max_pixel_ratio: default_resize_pixel_ratio(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = ?path, "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = ?path, error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let animation = &self.animation;
        if !PROGRESS_RANGE.contains(&animation.initial_progress) {
            return Err(ConfigError::ValidationFailed(
                "初始进度必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if !STRENGTH_RANGE.contains(&animation.strength) {
            return Err(ConfigError::ValidationFailed(
                "强度必须在 0.0 - 30.0 之间".to_string(),
            ));
        }

        if !(animation.transition_duration > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "过渡时长必须大于 0".to_string(),
            ));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::ValidationFailed(
                "相机视角必须在 0 - 180 度之间".to_string(),
            ));
        }

        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::ValidationFailed(format!(
                "裁剪面无效: near = {}, far = {}",
                camera.near, camera.far
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ValidationFailed(
                "窗口尺寸必须大于 0".to_string(),
            ));
        }

        if self.lighting.shadow_map_size == 0 {
            return Err(ConfigError::ValidationFailed(
                "阴影贴图尺寸必须大于 0".to_string(),
            ));
        }

        if !(self.renderer.initial_max_pixel_ratio > 0.0
            && self.renderer.resize_max_pixel_ratio > 0.0)
        {
            return Err(ConfigError::ValidationFailed(
                "像素比上限必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 驱动器设置
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            transition_duration: self.animation.transition_duration,
            easing: self.animation.easing,
            camera: CameraRig::new(self.camera.elevation, self.camera.distance),
        }
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),
    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.animation.strength, 15.0);
        assert_eq!(config.animation.transition_duration, 6.0);
        assert_eq!(config.animation.easing, EasingFunction::EaseOutExpo);
        assert_eq!(config.camera.fov_degrees, 75.0);
        assert_eq!(config.texture_sampling.repeat, [2.0, 4.0]);
        assert_eq!(config.lighting.shadow_map_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let loaded: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.window.width, config.window.width);
        assert_eq!(loaded.fragments_model, config.fragments_model);
        assert_eq!(loaded.animation.easing, config.animation.easing);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{ "animation": { "strength": 20.0, "easing": "linear" } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.animation.strength, 20.0);
        assert_eq!(config.animation.easing, EasingFunction::Linear);
        assert_eq!(config.animation.transition_duration, 6.0);
        assert_eq!(config.texture, "stone-texture.jpg");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.animation.strength = 31.0;
        assert!(config.validate().is_err());
        config.animation.strength = 30.0;
        assert!(config.validate().is_ok());

        config.animation.initial_progress = -0.1;
        assert!(config.validate().is_err());
        config.animation.initial_progress = 0.0;

        config.animation.transition_duration = 0.0;
        assert!(config.validate().is_err());
        config.animation.transition_duration = 6.0;

        config.camera.near = 200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_driver_settings() {
        let mut config = AppConfig::default();
        config.camera.elevation = 12.0;
        let settings = config.driver_settings();
        assert_eq!(settings.camera.elevation, 12.0);
        assert_eq!(settings.camera.distance, 8.0);
        assert_eq!(settings.transition_duration, 6.0);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();

        let missing = AppConfig::load(dir.path().join("missing.json"));
        assert_eq!(missing.animation.strength, 15.0);

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        let fallback = AppConfig::load(&broken);
        assert_eq!(fallback.window.width, 1280);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.animation.strength = 22.5;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path);
        assert_eq!(loaded.animation.strength, 22.5);
    }
}
