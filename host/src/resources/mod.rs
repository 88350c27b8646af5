//! # Resources 模块
//!
//! 资源加载：模型（glTF）、纹理（JPEG / PNG）以及后台加载任务。
//!
//! ## 组成
//!
//! - `source`：资源来源抽象（文件系统 / 内存）
//! - `path`：逻辑路径规范化
//! - `model`：glTF 网格层级解码
//! - `draco`：Draco 压缩 primitive 的布局与解码
//! - `texture`：纹理解码与采样描述
//! - `loader`：后台线程加载，全部成功或整体失败
//! - `demo`：内存中生成的演示资源

pub mod demo;
mod draco;
mod error;
pub mod loader;
pub mod model;
pub mod path;
pub mod source;
pub mod texture;

pub use error::ResourceError;
pub use loader::{AssetBundle, AssetLoader, AssetRequest, load_assets};
pub use model::{MeshGeometry, ModelHierarchy, ModelMesh, load_model, parse_model};
pub use source::{FsSource, MemorySource, ResourceSource};
pub use texture::{FilterMode, SamplerDesc, TextureData, WrapMode, decode_texture, load_texture};
