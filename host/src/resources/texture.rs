//! # Texture 模块
//!
//! 纹理解码：用 `image` 解码为 RGBA8，并附带采样描述。
//! 同一张纹理贴在所有碎片和伴随模型上。

use tracing::debug;

use super::ResourceError;
use super::source::ResourceSource;
use crate::config::TextureConfig;

/// 纹理环绕方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// 纹理过滤方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// 采样描述
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub generate_mipmaps: bool,
    /// UV 平铺次数
    pub repeat: [f32; 2],
    /// UV 偏移
    pub offset: [f32; 2],
}

impl SamplerDesc {
    /// 碎片材质使用的采样方式：镜像重复、最近邻、无 mipmap
    pub fn stone(config: &TextureConfig) -> Self {
        Self {
            wrap_s: WrapMode::MirroredRepeat,
            wrap_t: WrapMode::MirroredRepeat,
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            generate_mipmaps: false,
            repeat: config.repeat,
            offset: config.offset,
        }
    }
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self::stone(&TextureConfig::default())
    }
}

/// 解码后的纹理
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// RGBA8 像素，行优先
    pub pixels: Vec<u8>,
    pub sampler: SamplerDesc,
}

impl TextureData {
    /// 读取单个像素
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let p = self.pixels.get(offset..offset + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// 从资源来源加载纹理
pub fn load_texture(
    source: &dyn ResourceSource,
    path: &str,
    sampler: SamplerDesc,
) -> Result<TextureData, ResourceError> {
    let bytes = source.read(path)?;
    decode_texture(&bytes, path, sampler)
}

/// 解码纹理字节（JPEG / PNG）
pub fn decode_texture(
    bytes: &[u8],
    path: &str,
    sampler: SamplerDesc,
) -> Result<TextureData, ResourceError> {
    let image = image::load_from_memory(bytes).map_err(|e| ResourceError::LoadFailed {
        path: path.to_string(),
        kind: "texture".to_string(),
        message: format!("无法解码图片: {}", e),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(path = %path, width, height, "纹理解码完成");

    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
        sampler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::demo::checker_png;
    use crate::resources::source::MemorySource;

    #[test]
    fn test_stone_sampler() {
        let sampler = SamplerDesc::default();
        assert_eq!(sampler.wrap_s, WrapMode::MirroredRepeat);
        assert_eq!(sampler.wrap_t, WrapMode::MirroredRepeat);
        assert_eq!(sampler.min_filter, FilterMode::Nearest);
        assert_eq!(sampler.mag_filter, FilterMode::Nearest);
        assert!(!sampler.generate_mipmaps);
        assert_eq!(sampler.repeat, [2.0, 4.0]);
        assert_eq!(sampler.offset, [1.0, 1.0]);
    }

    #[test]
    fn test_decode_png() {
        let source = MemorySource::new().with_file("stone-texture.png", checker_png(8).unwrap());
        let texture =
            load_texture(&source, "stone-texture.png", SamplerDesc::default()).unwrap();
        assert_eq!(texture.width, 8);
        assert_eq!(texture.height, 8);
        assert_eq!(texture.pixels.len(), 8 * 8 * 4);
        assert_eq!(texture.pixel(0, 0).map(|p| p[3]), Some(255));
        assert_eq!(texture.pixel(8, 0), None);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_texture(b"not an image", "bad.jpg", SamplerDesc::default());
        assert!(matches!(result, Err(ResourceError::LoadFailed { .. })));
    }
}
