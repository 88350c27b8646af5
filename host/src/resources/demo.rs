//! # Demo 资源模块
//!
//! 在内存中生成演示用的模型和纹理，不依赖磁盘上的资源文件。
//!
//! - 碎片模型：分层排列的方块环，外加一块位于中轴上的核心
//! - 伴随模型：单个方块，位于碎片堆上方
//! - 纹理：棋盘格 PNG
//!
//! 生成的 glTF 把所有 buffer 以 data URI 内嵌，可以直接交给 `parse_model`。

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use super::ResourceError;
use super::source::MemorySource;
use crate::config::AppConfig;

/// 棋盘格纹理在错误信息中的名字
const CHECKER_PATH: &str = "memory://checker.png";

/// 方块边长的一半
const HALF_EXTENT: f32 = 0.2;

/// 演示模型中的一个部件
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPart {
    pub name: String,
    pub translation: [f32; 3],
}

impl DemoPart {
    pub fn new(name: impl Into<String>, translation: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            translation,
        }
    }
}

/// 生成 glTF：一个名为 `root_name` 的分组节点，每个部件是它下面的一个方块网格节点
pub fn box_model(root_name: &str, parts: &[DemoPart]) -> Vec<u8> {
    let (bytes, vertex_count, index_count) = box_buffer();
    let positions_len = vertex_count * 12;
    let normals_len = vertex_count * 12;
    let uvs_len = vertex_count * 8;
    let indices_len = index_count * 2;

    let mut root = json!({ "name": root_name });
    if !parts.is_empty() {
        root["children"] = json!((1..=parts.len()).collect::<Vec<_>>());
    }

    let mut nodes = vec![root];
    nodes.extend(parts.iter().map(|part| {
        json!({
            "name": part.name,
            "mesh": 0,
            "translation": part.translation,
        })
    }));

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": nodes,
        "meshes": [{
            "name": "Box",
            "primitives": [{
                "attributes": { "POSITION": 0, "NORMAL": 1, "TEXCOORD_0": 2 },
                "indices": 3
            }]
        }],
        "buffers": [{
            "byteLength": bytes.len(),
            "uri": format!("data:application/octet-stream;base64,{}", BASE64.encode(&bytes)),
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_len },
            { "buffer": 0, "byteOffset": positions_len, "byteLength": normals_len },
            { "buffer": 0, "byteOffset": positions_len + normals_len, "byteLength": uvs_len },
            { "buffer": 0, "byteOffset": positions_len + normals_len + uvs_len, "byteLength": indices_len },
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": vertex_count, "type": "VEC3",
                "min": [-HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT],
                "max": [HALF_EXTENT, HALF_EXTENT, HALF_EXTENT],
            },
            { "bufferView": 1, "componentType": 5126, "count": vertex_count, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": vertex_count, "type": "VEC2" },
            { "bufferView": 3, "componentType": 5123, "count": index_count, "type": "SCALAR" },
        ],
    });

    document.to_string().into_bytes()
}

/// 方块的顶点/索引数据：24 个顶点（每面独立法线），36 个 u16 索引
fn box_buffer() -> (Vec<u8>, usize, usize) {
    // (法线, u 轴, v 轴)
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices: Vec<u16> = Vec::new();

    for (face, (normal, u, v)) in FACES.iter().enumerate() {
        for (cu, cv) in CORNERS {
            let position: [f32; 3] =
                std::array::from_fn(|i| (normal[i] + u[i] * cu + v[i] * cv) * HALF_EXTENT);
            positions.push(position);
            normals.push(*normal);
            uvs.push([(cu + 1.0) / 2.0, (1.0 - cv) / 2.0]);
        }
        let base = (face * 4) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut bytes = Vec::new();
    for p in &positions {
        p.iter().for_each(|c| bytes.extend_from_slice(&c.to_le_bytes()));
    }
    for n in &normals {
        n.iter().for_each(|c| bytes.extend_from_slice(&c.to_le_bytes()));
    }
    for uv in &uvs {
        uv.iter().for_each(|c| bytes.extend_from_slice(&c.to_le_bytes()));
    }
    for i in &indices {
        bytes.extend_from_slice(&i.to_le_bytes());
    }

    (bytes, positions.len(), indices.len())
}

/// 演示用碎片排布：4 层，每层 6 块环绕，外加中轴上的核心
pub fn stone_parts() -> Vec<DemoPart> {
    const LAYERS: usize = 4;
    const PER_LAYER: usize = 6;
    const RADIUS: f32 = 0.6;

    let mut parts = Vec::with_capacity(LAYERS * PER_LAYER + 1);
    for layer in 0..LAYERS {
        let y = -0.75 + 0.5 * layer as f32;
        // 相邻层错开半格
        let phase = if layer % 2 == 0 { 0.0 } else { 0.5 };
        for slot in 0..PER_LAYER {
            let angle = (slot as f32 + phase) / PER_LAYER as f32 * std::f32::consts::TAU;
            parts.push(DemoPart::new(
                format!("shard_{}_{}", layer, slot),
                [RADIUS * angle.cos(), y, RADIUS * angle.sin()],
            ));
        }
    }
    parts.push(DemoPart::new("core", [0.0, 0.0, 0.0]));
    parts
}

/// 生成棋盘格 PNG
///
/// 尺寸为 0 或编码失败时返回 `LoadFailed`。
pub fn checker_png(size: u32) -> Result<Vec<u8>, ResourceError> {
    let failed = |message: String| ResourceError::LoadFailed {
        path: CHECKER_PATH.to_string(),
        kind: "texture".to_string(),
        message,
    };
    if size == 0 {
        return Err(failed("棋盘格尺寸必须大于 0".to_string()));
    }

    let image = image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            image::Rgba([180, 176, 168, 255])
        } else {
            image::Rgba([96, 92, 88, 255])
        }
    });

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .map_err(|e| failed(e.to_string()))?;
    Ok(bytes)
}

/// 按配置中的路径生成完整的演示资源
pub fn demo_source(config: &AppConfig) -> Result<MemorySource, ResourceError> {
    let source = MemorySource::new()
        .with_file(&config.fragments_model, box_model("Stone", &stone_parts()))
        .with_file(
            &config.companion_model,
            box_model("Logo", &[DemoPart::new("logo", [0.0, 1.6, 0.0])]),
        )
        .with_file(&config.texture, checker_png(32)?);
    Ok(source)
}
