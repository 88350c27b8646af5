//! # Scene 模块
//!
//! 场景组装：把加载好的资源整理成渲染树，并在每帧提交求值结果。
//!
//! ## 节点结构
//!
//! ```text
//! root
//! ├── stone (Group)      ← 整体旋转 + 上下浮动
//! │   ├── fragment 0     ← 各自的径向位移
//! │   ├── fragment 1
//! │   └── ...
//! └── companion          ← 与 stone 同步旋转
//! ```
//!
//! 每个碎片节点都持有从源网格克隆出的独立几何，
//! 修改一个碎片的变换不会影响共享网格。

mod lights;

pub use lights::{AmbientLight, DirectionalLight, LightRig, ShadowCamera};

use glam::{Mat4, Quat, Vec3};
use shatter_core::{CameraPose, FrameOutput, MeshHandle, SourceMesh, evaluate_camera};
use tracing::debug;

use crate::resources::{AssetBundle, MeshGeometry, SamplerDesc, TextureData};

/// 节点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Group,
    Fragment,
    Companion,
}

/// 材质：共享纹理 + 采样方式
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub sampler: SamplerDesc,
}

/// 场景节点
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// 局部位置
    pub position: Vec3,
    /// 绕 Y 轴旋转（弧度）
    pub rotation_y: f32,
    pub mesh: Option<MeshHandle>,
    pub material: Option<usize>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl SceneNode {
    fn new(name: impl Into<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            kind,
            parent,
            position: Vec3::ZERO,
            rotation_y: 0.0,
            mesh: None,
            material: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// 局部变换矩阵
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.rotation_y), self.position)
    }
}

/// 渲染树
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    meshes: Vec<MeshGeometry>,
    materials: Vec<Material>,
    texture: TextureData,
    stone: NodeId,
    companion: NodeId,
    fragment_nodes: Vec<NodeId>,
    camera: CameraPose,
    lights: LightRig,
    commits: u64,
}

impl SceneGraph {
    /// 由加载结果组装场景
    ///
    /// 返回场景以及构建碎片集所需的源网格列表（顺序与碎片节点一致）。
    pub fn assemble(bundle: AssetBundle, lights: LightRig) -> (Self, Vec<SourceMesh>) {
        let AssetBundle {
            fragments,
            companion,
            texture,
        } = bundle;

        let materials = vec![Material {
            sampler: texture.sampler,
        }];
        let stone = NodeId(0);
        let mut nodes = vec![SceneNode::new("stone", NodeKind::Group, None)];
        let mut meshes = Vec::with_capacity(fragments.len() + 1);
        let mut fragment_nodes = Vec::with_capacity(fragments.len());
        let mut sources = Vec::with_capacity(fragments.len());

        for (index, mesh) in fragments.meshes.into_iter().enumerate() {
            let handle = MeshHandle(meshes.len() as u32);
            let name = mesh
                .name
                .unwrap_or_else(|| format!("fragment_{}", index));

            let mut node = SceneNode::new(name, NodeKind::Fragment, Some(stone));
            node.position = mesh.translation;
            node.mesh = Some(handle);
            node.material = Some(0);
            node.cast_shadow = true;
            node.receive_shadow = true;

            sources.push(SourceMesh::new(handle, mesh.translation));
            fragment_nodes.push(NodeId(nodes.len()));
            nodes.push(node);
            meshes.push(mesh.geometry);
        }

        let companion_id = NodeId(nodes.len());
        let mut companion_node = SceneNode::new(
            companion.name.unwrap_or_else(|| "companion".to_string()),
            NodeKind::Companion,
            None,
        );
        companion_node.position = companion.translation;
        companion_node.mesh = Some(MeshHandle(meshes.len() as u32));
        companion_node.material = Some(0);
        companion_node.cast_shadow = true;
        nodes.push(companion_node);
        meshes.push(companion.geometry);

        debug!(
            nodes = nodes.len(),
            fragments = fragment_nodes.len(),
            "场景组装完成"
        );

        let graph = Self {
            nodes,
            meshes,
            materials,
            texture,
            stone,
            companion: companion_id,
            fragment_nodes,
            camera: evaluate_camera(0.0),
            lights,
            commits: 0,
        };
        (graph, sources)
    }

    /// 提交一帧求值结果
    ///
    /// 碎片位置按碎片集顺序写入对应节点；空碎片集时只更新整体变换和相机。
    pub fn commit(&mut self, output: &FrameOutput) {
        let explosion = &output.explosion;

        let stone = &mut self.nodes[self.stone.0];
        stone.rotation_y = explosion.rotation;
        stone.position.y = explosion.bob;

        self.nodes[self.companion.0].rotation_y = explosion.rotation;

        for (id, position) in self.fragment_nodes.iter().zip(&explosion.positions) {
            self.nodes[id.0].position = *position;
        }

        self.camera = output.camera;
        self.commits += 1;
    }

    /// 节点的世界变换
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.nodes.get(id.0);
        while let Some(node) = current {
            matrix = node.local_matrix() * matrix;
            current = node.parent.and_then(|parent| self.nodes.get(parent.0));
        }
        matrix
    }

    /// 节点的世界位置
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn stone(&self) -> &SceneNode {
        &self.nodes[self.stone.0]
    }

    pub fn companion(&self) -> &SceneNode {
        &self.nodes[self.companion.0]
    }

    pub fn companion_id(&self) -> NodeId {
        self.companion
    }

    /// 碎片节点（按碎片集顺序）
    pub fn fragment_nodes(&self) -> &[NodeId] {
        &self.fragment_nodes
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshGeometry> {
        self.meshes.get(handle.index())
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material(&self, index: usize) -> Option<&Material> {
        self.materials.get(index)
    }

    pub fn texture(&self) -> &TextureData {
        &self.texture
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// 已提交的帧数
    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::resources::demo::{DemoPart, box_model, demo_source};
    use crate::resources::{AssetRequest, ModelMesh, load_assets, parse_model};
    use crate::resources::{MemorySource, decode_texture};
    use shatter_core::{AnimationDriver, AnimationState, DriverSettings, FragmentSet};

    fn bundle(parts: &[DemoPart]) -> AssetBundle {
        let source = MemorySource::new();
        let fragments = parse_model(&box_model("Stone", parts), "stone.gltf", &source).unwrap();
        let companion: ModelMesh = parse_model(
            &box_model("Logo", &[DemoPart::new("logo", [0.0, 2.0, 0.0])]),
            "logo.gltf",
            &source,
        )
        .unwrap()
        .meshes
        .remove(0);
        let texture = decode_texture(
            &crate::resources::demo::checker_png(4).unwrap(),
            "t.png",
            SamplerDesc::default(),
        )
        .unwrap();
        AssetBundle {
            fragments,
            companion,
            texture,
        }
    }

    fn three_parts() -> Vec<DemoPart> {
        vec![
            DemoPart::new("bottom", [1.0, -1.0, 0.0]),
            DemoPart::new("middle", [0.0, 0.0, 1.0]),
            DemoPart::new("top", [-1.0, 1.0, 0.0]),
        ]
    }

    #[test]
    fn test_assemble_structure() {
        let (graph, sources) = SceneGraph::assemble(bundle(&three_parts()), LightRig::default());

        assert_eq!(sources.len(), 3);
        assert_eq!(graph.fragment_nodes().len(), 3);
        // 3 个碎片 + 1 个伴随模型，各自独立的几何
        assert_eq!(graph.mesh_count(), 4);
        assert_eq!(graph.nodes().len(), 5);

        let first = graph.node(graph.fragment_nodes()[0]).unwrap();
        assert_eq!(first.name, "bottom");
        assert_eq!(first.parent, Some(NodeId(0)));
        assert_eq!(first.position, Vec3::new(1.0, -1.0, 0.0));
        assert_eq!(first.mesh, Some(sources[0].handle));
        assert!(first.cast_shadow && first.receive_shadow);

        assert_eq!(graph.companion().kind, NodeKind::Companion);
        assert_eq!(graph.companion().parent, None);
        assert_eq!(graph.material(0).unwrap().sampler, SamplerDesc::default());
    }

    #[test]
    fn test_commit_frame() {
        let (mut graph, sources) =
            SceneGraph::assemble(bundle(&three_parts()), LightRig::default());
        let fragments = FragmentSet::build(sources).unwrap();
        let mut driver = AnimationDriver::new(
            fragments,
            AnimationState::new(0.5, 15.0),
            DriverSettings::default(),
        );

        let output = driver.tick(1.0);
        graph.commit(&output);

        assert_eq!(graph.stone().rotation_y, output.explosion.rotation);
        assert_eq!(graph.stone().position.y, output.explosion.bob);
        assert_eq!(graph.companion().rotation_y, output.explosion.rotation);
        assert_eq!(*graph.camera(), output.camera);
        assert_eq!(graph.commit_count(), 1);

        for (id, position) in graph.fragment_nodes().iter().zip(&output.explosion.positions) {
            assert_eq!(graph.node(*id).unwrap().position, *position);
        }
        // 底部碎片向外移动了 7.5
        let bottom = graph.node(graph.fragment_nodes()[0]).unwrap();
        assert!((bottom.position.x - 8.5).abs() < 1e-5);
    }

    #[test]
    fn test_world_position_follows_group() {
        let (mut graph, sources) =
            SceneGraph::assemble(bundle(&three_parts()), LightRig::default());
        let fragments = FragmentSet::build(sources).unwrap();
        let driver = AnimationDriver::new(
            fragments,
            AnimationState::new(1.0, 0.0),
            DriverSettings::default(),
        );
        graph.commit(&driver.evaluate());

        // 整体旋转 -π：(1, -1, 0) 绕 Y 转到 (-1, -1, 0)
        let world = graph.world_position(graph.fragment_nodes()[0]);
        assert!((world - Vec3::new(-1.0, -1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_empty_fragment_set() {
        let (mut graph, sources) = SceneGraph::assemble(bundle(&[]), LightRig::default());
        assert!(sources.is_empty());

        let fragments = FragmentSet::build(sources).unwrap_or_else(|_| FragmentSet::empty());
        let mut driver =
            AnimationDriver::new(fragments, AnimationState::default(), DriverSettings::default());
        driver.set_progress(1.0);
        graph.commit(&driver.tick(0.1));

        assert!(graph.fragment_nodes().is_empty());
        assert_eq!(graph.camera().position, Vec3::new(0.0, 8.0, 0.0));
    }

    #[test]
    fn test_assemble_demo_assets() {
        let config = AppConfig::default();
        let bundle = load_assets(&demo_source(&config).unwrap(), &AssetRequest::from_config(&config))
            .unwrap();
        let (graph, sources) = SceneGraph::assemble(bundle, LightRig::default());
        let fragments = FragmentSet::build(sources).unwrap();
        assert_eq!(fragments.len(), graph.fragment_nodes().len());
        assert!(fragments.iter().any(|f| f.is_on_axis()));
        assert_eq!(graph.texture().width, 32);
    }
}
