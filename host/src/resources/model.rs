//! # Model 模块
//!
//! glTF 模型解码：遍历默认场景，收集每个网格节点的局部位移、名称和几何数据。
//!
//! buffer 来源支持三种：GLB 二进制块、data URI（base64）、
//! 以及通过 `ResourceSource` 读取的同目录外部文件。
//! 校验失败的文档视为无效格式；要求 Draco 扩展的文档跳过校验，
//! 压缩的 primitive 交给 `draco` 模块解码。

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use glam::Vec3;
use tracing::debug;

use super::ResourceError;
use super::draco::{self, DracoLayout};
use super::path::{extract_base_dir, resolve_relative_path};
use super::source::ResourceSource;

/// CPU 侧网格几何
///
/// 多个 primitive 会合并为一个网格，索引按顶点偏移重定位。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 追加一个 primitive，索引按已有顶点数偏移
    fn append(&mut self, part: MeshGeometry, path: &str) -> Result<(), ResourceError> {
        let count = part.positions.len();
        if part.normals.len() != count || part.uvs.len() != count {
            return Err(ResourceError::invalid_format(path, "顶点属性数量不一致"));
        }
        if let Some(bad) = part.indices.iter().find(|&&i| i as usize >= count) {
            return Err(ResourceError::invalid_format(
                path,
                format!("索引 {} 超出顶点数量 {}", bad, count),
            ));
        }

        let start = self.positions.len() as u32;
        self.positions.extend(part.positions);
        self.normals.extend(part.normals);
        self.uvs.extend(part.uvs);
        self.indices.extend(part.indices.into_iter().map(|i| start + i));
        Ok(())
    }
}

/// 模型中的一个网格节点
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    /// 节点名称（没有时退回网格名称）
    pub name: Option<String>,
    /// 局部位移
    pub translation: Vec3,
    /// 几何数据
    pub geometry: MeshGeometry,
}

/// 解码后的网格层级（按深度优先先序排列）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelHierarchy {
    pub meshes: Vec<ModelMesh>,
}

impl ModelHierarchy {
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

/// 从资源来源加载模型
pub fn load_model(source: &dyn ResourceSource, path: &str) -> Result<ModelHierarchy, ResourceError> {
    let bytes = source.read(path)?;
    parse_model(&bytes, path, source)
}

/// 解析模型字节
///
/// `path` 用于解析外部 buffer 的相对路径以及错误信息。
pub fn parse_model(
    bytes: &[u8],
    path: &str,
    source: &dyn ResourceSource,
) -> Result<ModelHierarchy, ResourceError> {
    let gltf = parse_document(bytes, path)?;
    let buffers = load_buffers(&gltf, path, source)?;

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| ResourceError::invalid_format(path, "模型中没有场景"))?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_meshes(&node, &gltf.document, &buffers, path, &mut meshes)?;
    }

    debug!(path = %path, meshes = meshes.len(), "模型解码完成");
    Ok(ModelHierarchy { meshes })
}

/// 解析 glTF 文档
///
/// 校验不通过时，若文档要求 Draco 扩展，则改用未校验的文档。
fn parse_document(bytes: &[u8], path: &str) -> Result<gltf::Gltf, ResourceError> {
    let error = match gltf::Gltf::from_slice(bytes) {
        Ok(gltf) => return Ok(gltf),
        Err(error) => error,
    };

    match gltf::Gltf::from_slice_without_validation(bytes) {
        Ok(gltf) if gltf.extensions_required().any(|name| name == draco::EXTENSION) => {
            debug!(path = %path, "文档要求 Draco 扩展，跳过校验");
            Ok(gltf)
        }
        _ => Err(ResourceError::invalid_format(path, error)),
    }
}

/// 深度优先收集网格节点
fn collect_meshes(
    node: &gltf::Node<'_>,
    document: &gltf::Document,
    buffers: &[Vec<u8>],
    path: &str,
    out: &mut Vec<ModelMesh>,
) -> Result<(), ResourceError> {
    if let Some(mesh) = node.mesh() {
        let (translation, _rotation, _scale) = node.transform().decomposed();
        let name = node
            .name()
            .or_else(|| mesh.name())
            .map(|name| name.to_string());
        out.push(ModelMesh {
            name,
            translation: Vec3::from_array(translation),
            geometry: read_geometry(&mesh, document, buffers, path)?,
        });
    }

    for child in node.children() {
        collect_meshes(&child, document, buffers, path, out)?;
    }
    Ok(())
}

fn read_geometry(
    mesh: &gltf::Mesh<'_>,
    document: &gltf::Document,
    buffers: &[Vec<u8>],
    path: &str,
) -> Result<MeshGeometry, ResourceError> {
    let mut geometry = MeshGeometry::default();

    for primitive in mesh.primitives() {
        let part = match DracoLayout::from_primitive(&primitive, path)? {
            Some(layout) => {
                let compressed = layout.compressed(document, buffers, path)?;
                layout.unpack(&layout.decode(compressed, path)?, path)?
            }
            None => match read_primitive(&primitive, buffers) {
                Some(part) => part,
                None => continue,
            },
        };
        geometry.append(part, path)?;
    }

    Ok(geometry)
}

/// 读取未压缩的 primitive；没有 POSITION 时返回 `None`
fn read_primitive(primitive: &gltf::Primitive<'_>, buffers: &[Vec<u8>]) -> Option<MeshGeometry> {
    let reader = primitive.reader(|b| buffers.get(b.index()).map(|data| data.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let count = positions.len();

    let normals = match reader.read_normals() {
        Some(it) => it.collect(),
        None => vec![[0.0, 1.0, 0.0]; count],
    };
    let uvs = match reader.read_tex_coords(0) {
        Some(it) => it.into_f32().collect(),
        None => vec![[0.0, 0.0]; count],
    };
    let indices = match reader.read_indices() {
        Some(it) => it.into_u32().collect(),
        None => (0..count as u32).collect(),
    };

    Some(MeshGeometry {
        positions,
        normals,
        uvs,
        indices,
    })
}

/// 解析所有 buffer
fn load_buffers(
    gltf: &gltf::Gltf,
    path: &str,
    source: &dyn ResourceSource,
) -> Result<Vec<Vec<u8>>, ResourceError> {
    let base_dir = extract_base_dir(path);
    let mut buffers = Vec::new();

    for buffer in gltf.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| ResourceError::invalid_format(path, "GLB 缺少二进制块"))?,
            gltf::buffer::Source::Uri(uri) => match uri.strip_prefix("data:") {
                Some(data_uri) => decode_data_uri(data_uri)
                    .ok_or_else(|| ResourceError::invalid_format(path, "无法解码 data URI"))?,
                None => source.read(&resolve_relative_path(&base_dir, uri))?,
            },
        };

        if data.len() < buffer.length() {
            return Err(ResourceError::invalid_format(
                path,
                format!(
                    "buffer {} 长度不足: 期望 {}，实际 {}",
                    buffer.index(),
                    buffer.length(),
                    data.len()
                ),
            ));
        }

        // glTF 要求 buffer 按 4 字节对齐
        while data.len() % 4 != 0 {
            data.push(0);
        }
        buffers.push(data);
    }

    Ok(buffers)
}

/// 解码 `data:` 之后的部分，只支持 base64
fn decode_data_uri(data_uri: &str) -> Option<Vec<u8>> {
    let (header, payload) = data_uri.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    BASE64.decode(payload.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::demo::{DemoPart, box_model};
    use crate::resources::source::MemorySource;

    #[test]
    fn test_parse_hierarchy() {
        let bytes = box_model(
            "Stone",
            &[
                DemoPart::new("bottom", [1.0, -1.0, 0.0]),
                DemoPart::new("middle", [0.0, 0.0, 1.0]),
                DemoPart::new("top", [-1.0, 1.0, 0.0]),
            ],
        );
        let model = parse_model(&bytes, "models/stone.gltf", &MemorySource::new()).unwrap();

        assert_eq!(model.len(), 3);
        let names: Vec<Option<&str>> = model.meshes.iter().map(|m| m.name.as_deref()).collect();
        assert_eq!(names, vec![Some("bottom"), Some("middle"), Some("top")]);
        assert_eq!(model.meshes[0].translation, Vec3::new(1.0, -1.0, 0.0));
        assert_eq!(model.meshes[2].translation, Vec3::new(-1.0, 1.0, 0.0));

        let geometry = &model.meshes[0].geometry;
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.triangle_count(), 12);
        assert_eq!(geometry.normals.len(), 24);
        assert_eq!(geometry.uvs.len(), 24);
    }

    #[test]
    fn test_load_through_source() {
        let source = MemorySource::new().with_file(
            "models/logo.gltf",
            box_model("Logo", &[DemoPart::new("logo", [0.0, 2.0, 0.0])]),
        );
        let model = load_model(&source, "models/logo.gltf").unwrap();
        assert_eq!(model.meshes[0].translation, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_missing_file() {
        let result = load_model(&MemorySource::new(), "models/none.gltf");
        assert!(matches!(result, Err(ResourceError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_model() {
        let result = parse_model(b"{ not gltf", "models/bad.gltf", &MemorySource::new());
        assert!(matches!(result, Err(ResourceError::InvalidFormat { .. })));
    }

    #[test]
    fn test_empty_scene() {
        let bytes = box_model("Empty", &[]);
        let model = parse_model(&bytes, "models/empty.gltf", &MemorySource::new()).unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn test_draco_document_passes_validation_gate() {
        let bytes = crate::resources::draco::tests::draco_triangle();
        assert!(gltf::Gltf::from_slice(&bytes).is_err());

        let gltf = parse_document(&bytes, "models/stone.gltf").unwrap();
        assert_eq!(gltf.meshes().count(), 1);
    }

    #[test]
    fn test_unknown_required_extension_is_rejected() {
        let text = String::from_utf8(box_model("Logo", &[DemoPart::new("logo", [0.0; 3])])).unwrap();
        let bytes = text.replacen('{', r#"{"extensionsRequired":["EXT_unknown"],"#, 1);
        let result = parse_document(bytes.as_bytes(), "models/logo.gltf");
        assert!(matches!(result, Err(ResourceError::InvalidFormat { .. })));
    }

    #[cfg(not(feature = "draco"))]
    #[test]
    fn test_draco_model_needs_feature() {
        let bytes = crate::resources::draco::tests::draco_triangle();
        match parse_model(&bytes, "models/stone.gltf", &MemorySource::new()) {
            Err(ResourceError::InvalidFormat { message, .. }) => assert!(message.contains("draco")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_append_offsets_indices() {
        let triangle = || MeshGeometry {
            positions: vec![[0.0; 3]; 3],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            uvs: vec![[0.0; 2]; 3],
            indices: vec![0, 1, 2],
        };
        let mut geometry = MeshGeometry::default();
        geometry.append(triangle(), "a.gltf").unwrap();
        geometry.append(triangle(), "a.gltf").unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2, 3, 4, 5]);

        let mut broken = triangle();
        broken.indices = vec![0, 1, 3];
        assert!(geometry.append(broken, "a.gltf").is_err());
        assert_eq!(geometry.vertex_count(), 6);
    }

    #[test]
    fn test_decode_data_uri() {
        assert_eq!(
            decode_data_uri("application/octet-stream;base64,AQID"),
            Some(vec![1, 2, 3])
        );
        assert_eq!(decode_data_uri("text/plain,hello"), None);
    }
}
