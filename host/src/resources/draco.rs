//! # Draco 模块
//!
//! `KHR_draco_mesh_compression` 的 primitive 解码。
//!
//! 带扩展的 primitive 把几何压缩在一个 bufferView 里，accessor 只提供数量和类型。
//! 解码分三步：
//!
//! 1. `DracoLayout::from_primitive` 从扩展和 accessor 读出布局
//! 2. `DracoLayout::decode` 调用原生解码器（`draco` 特性）得到连续字节流
//! 3. `DracoLayout::unpack` 按布局切出索引和顶点属性
//!
//! 解码后的字节流先是索引（索引数不超过 u16 上限时为 u16，否则 u32），
//! 然后按属性 id 升序依次排列各属性。

use gltf::Semantic;
use gltf::accessor::DataType;

use super::ResourceError;
use super::model::MeshGeometry;

/// 扩展名
pub const EXTENSION: &str = "KHR_draco_mesh_compression";

/// 压缩流中的一个顶点属性
#[derive(Debug, Clone, PartialEq)]
pub struct DracoAttribute {
    pub semantic: Semantic,
    /// 扩展中记录的属性 id，决定在解码流中的顺序
    pub unique_id: u32,
    /// 每个顶点的分量数
    pub components: usize,
    pub data_type: DataType,
}

impl DracoAttribute {
    fn byte_len(&self, vertex_count: usize) -> usize {
        self.components * vertex_count * self.data_type.size()
    }
}

/// 一个 Draco primitive 的解码布局
#[derive(Debug, Clone, PartialEq)]
pub struct DracoLayout {
    /// 压缩数据所在的 bufferView
    pub buffer_view: usize,
    pub vertex_count: u32,
    pub index_count: u32,
    /// 按 `unique_id` 升序
    pub attributes: Vec<DracoAttribute>,
}

impl DracoLayout {
    /// 读取 primitive 的 Draco 布局；没有扩展时返回 `None`
    pub fn from_primitive(
        primitive: &gltf::Primitive<'_>,
        path: &str,
    ) -> Result<Option<Self>, ResourceError> {
        let Some(extension) = primitive.extension_value(EXTENSION) else {
            return Ok(None);
        };

        let buffer_view = extension
            .get("bufferView")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco 扩展缺少 bufferView"))?
            as usize;
        let ids = extension
            .get("attributes")
            .and_then(|v| v.as_object())
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco 扩展缺少 attributes"))?;

        let vertex_count = primitive
            .get(&Semantic::Positions)
            .map(|accessor| accessor.count())
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco primitive 缺少 POSITION"))?
            as u32;
        let index_count = primitive.indices().map_or(0, |accessor| accessor.count()) as u32;

        let mut attributes = Vec::with_capacity(ids.len());
        for (name, id) in ids {
            let Some(semantic) = parse_semantic(name) else {
                continue;
            };
            let unique_id = id.as_u64().ok_or_else(|| {
                ResourceError::invalid_format(path, format!("Draco 属性 {} 的 id 无效", name))
            })? as u32;
            let accessor = primitive.get(&semantic).ok_or_else(|| {
                ResourceError::invalid_format(path, format!("Draco 属性 {} 没有对应的 accessor", name))
            })?;
            attributes.push(DracoAttribute {
                semantic,
                unique_id,
                components: accessor.dimensions().multiplicity(),
                data_type: accessor.data_type(),
            });
        }
        attributes.sort_by_key(|attribute| attribute.unique_id);

        Ok(Some(Self {
            buffer_view,
            vertex_count,
            index_count,
            attributes,
        }))
    }

    /// 压缩数据在 buffer 中的切片
    pub fn compressed<'a>(
        &self,
        document: &gltf::Document,
        buffers: &'a [Vec<u8>],
        path: &str,
    ) -> Result<&'a [u8], ResourceError> {
        let view = document
            .views()
            .nth(self.buffer_view)
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco bufferView 越界"))?;
        let start = view.offset();
        buffers
            .get(view.buffer().index())
            .and_then(|data| data.get(start..start + view.length()))
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco bufferView 超出 buffer 范围"))
    }

    /// 用原生解码器解压
    #[cfg(feature = "draco")]
    pub fn decode(&self, compressed: &[u8], path: &str) -> Result<Vec<u8>, ResourceError> {
        use anyhow::Context as _;
        use draco_decoder::{AttributeDataType, MeshDecodeConfig, decode_mesh};

        let mut config = MeshDecodeConfig::new(self.vertex_count, self.index_count);
        for attribute in &self.attributes {
            let data_type = match attribute.data_type {
                DataType::I8 => AttributeDataType::Int8,
                DataType::U8 => AttributeDataType::UInt8,
                DataType::I16 => AttributeDataType::Int16,
                DataType::U16 => AttributeDataType::UInt16,
                DataType::U32 => AttributeDataType::UInt32,
                DataType::F32 => AttributeDataType::Float32,
            };
            config.add_attribute(attribute.components as u32, data_type);
        }

        pollster::block_on(decode_mesh(compressed, &config))
            .context("Draco 解码失败")
            .map_err(|e| ResourceError::invalid_format(path, e))
    }

    /// 未启用 `draco` 特性时无法解压
    #[cfg(not(feature = "draco"))]
    pub fn decode(&self, _compressed: &[u8], path: &str) -> Result<Vec<u8>, ResourceError> {
        Err(ResourceError::invalid_format(
            path,
            "模型使用 Draco 压缩，需要启用 draco 特性",
        ))
    }

    /// 把解码流切分为网格几何
    ///
    /// 只保留 f32 的 POSITION / NORMAL / TEXCOORD_0，其余属性跳过。
    /// 缺少法线时朝上，缺少 UV 时为 0；没有索引时按顶点顺序生成。
    pub fn unpack(&self, decoded: &[u8], path: &str) -> Result<MeshGeometry, ResourceError> {
        let count = self.vertex_count as usize;
        let mut stream = DecodedStream {
            bytes: decoded,
            offset: 0,
            path,
        };

        let indices: Vec<u32> = if self.index_count == 0 {
            (0..self.vertex_count).collect()
        } else if self.index_count <= u16::MAX as u32 {
            stream
                .take(self.index_count as usize * 2)?
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect()
        } else {
            stream
                .take(self.index_count as usize * 4)?
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect()
        };

        let mut positions = None;
        let mut normals = None;
        let mut uvs = None;
        for attribute in &self.attributes {
            let bytes = stream.take(attribute.byte_len(count))?;
            if attribute.data_type != DataType::F32 {
                continue;
            }
            match (&attribute.semantic, attribute.components) {
                (Semantic::Positions, 3) => positions = Some(read_floats::<3>(bytes)),
                (Semantic::Normals, 3) => normals = Some(read_floats::<3>(bytes)),
                (Semantic::TexCoords(0), 2) => uvs = Some(read_floats::<2>(bytes)),
                _ => {}
            }
        }

        let positions = positions
            .ok_or_else(|| ResourceError::invalid_format(path, "Draco 解码结果缺少 POSITION"))?;
        Ok(MeshGeometry {
            normals: normals.unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; count]),
            uvs: uvs.unwrap_or_else(|| vec![[0.0, 0.0]; count]),
            positions,
            indices,
        })
    }
}

/// 顺序读取解码流
struct DecodedStream<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a str,
}

impl<'a> DecodedStream<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ResourceError> {
        let end = self.offset + len;
        let slice = self.bytes.get(self.offset..end).ok_or_else(|| {
            ResourceError::invalid_format(
                self.path,
                format!("Draco 解码流过短: 需要 {} 字节，实际 {}", end, self.bytes.len()),
            )
        })?;
        self.offset = end;
        Ok(slice)
    }
}

fn read_floats<const N: usize>(bytes: &[u8]) -> Vec<[f32; N]> {
    bytes
        .chunks_exact(4 * N)
        .map(|chunk| {
            std::array::from_fn(|i| {
                let c = &chunk[i * 4..i * 4 + 4];
                f32::from_le_bytes([c[0], c[1], c[2], c[3]])
            })
        })
        .collect()
}

fn parse_semantic(name: &str) -> Option<Semantic> {
    let indexed = |prefix: &str| name.strip_prefix(prefix)?.parse::<u32>().ok();
    match name {
        "POSITION" => Some(Semantic::Positions),
        "NORMAL" => Some(Semantic::Normals),
        "TANGENT" => Some(Semantic::Tangents),
        _ => indexed("TEXCOORD_")
            .map(Semantic::TexCoords)
            .or_else(|| indexed("COLOR_").map(Semantic::Colors))
            .or_else(|| indexed("JOINTS_").map(Semantic::Joints))
            .or_else(|| indexed("WEIGHTS_").map(Semantic::Weights)),
    }
}
