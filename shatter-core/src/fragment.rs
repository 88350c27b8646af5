//! # Fragment 模块
//!
//! 碎片集构建器：把解码后的网格层级拆成独立可寻址的碎片，
//! 并在加载时一次性计算每个碎片的静态爆炸参数。
//!
//! ## 派生参数
//!
//! - `direction`: 从竖直中轴指向静止位置的水平单位向量（只含 X/Z）
//! - `pct`: 碎片开始移动的进度阈值，越低的碎片越早移动
//!
//! ## 退化几何
//!
//! - 所有碎片同高（`interval == 0`）：所有 `pct` 取 0
//! - 碎片正好位于中轴上（x = 0, z = 0）：`direction` 取零向量

use glam::Vec3;
use tracing::{info, warn};

use crate::error::{FragmentError, FragmentResult};

/// 网格句柄
///
/// 不透明的非拥有引用，指向 Scene Assembly 持有的几何体 + 材质。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    /// 获取内部索引
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MeshHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MeshHandle({})", self.0)
    }
}

/// 源网格
///
/// 网格层级中的一个子网格：句柄 + 局部位置。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMesh {
    /// 克隆后的独立网格句柄
    pub handle: MeshHandle,
    /// 局部位置
    pub position: Vec3,
}

impl SourceMesh {
    pub fn new(handle: MeshHandle, position: Vec3) -> Self {
        Self { handle, position }
    }
}

/// 碎片
///
/// 构建后不可变。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// 网格句柄
    pub mesh_handle: MeshHandle,
    /// 静止位置
    pub rest_position: Vec3,
    /// 水平爆炸方向（单位向量，或退化情况下的零向量）
    pub direction: Vec3,
    /// 进度阈值
    pub pct: f32,
}

impl Fragment {
    /// 是否为中轴上的退化碎片（没有径向位移）
    pub fn is_on_axis(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

/// 碎片集
///
/// 构建一次后在整个进程生命周期内不可变：不会重新破碎，也不会改变碎片数量。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FragmentSet {
    fragments: Vec<Fragment>,
    min_y: f32,
    max_y: f32,
    interval: f32,
}

impl FragmentSet {
    /// 从网格层级构建碎片集
    ///
    /// 碎片顺序与输入顺序一致。层级为空时返回 `FragmentError::EmptyHierarchy`，
    /// 调用方可以改用 [`FragmentSet::empty`] 继续运行。
    pub fn build(meshes: impl IntoIterator<Item = SourceMesh>) -> FragmentResult<Self> {
        let sources: Vec<SourceMesh> = meshes.into_iter().collect();
        if sources.is_empty() {
            return Err(FragmentError::EmptyHierarchy);
        }

        let (min_y, max_y) = sources
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), m| {
                (lo.min(m.position.y), hi.max(m.position.y))
            });
        let interval = max_y - min_y;

        if interval == 0.0 {
            warn!(
                y = min_y,
                count = sources.len(),
                "碎片高度全部相同，进度阈值统一取 0"
            );
        }

        let fragments: Vec<Fragment> = sources
            .iter()
            .map(|source| Fragment {
                mesh_handle: source.handle,
                rest_position: source.position,
                direction: radial_direction(source.position),
                pct: progress_threshold(source.position.y, interval),
            })
            .collect();

        let on_axis = fragments.iter().filter(|f| f.is_on_axis()).count();
        if on_axis > 0 {
            warn!(count = on_axis, "存在位于中轴上的碎片，不做径向位移");
        }

        info!(
            count = fragments.len(),
            min_y,
            max_y,
            interval,
            "碎片集构建完成"
        );

        Ok(Self {
            fragments,
            min_y,
            max_y,
            interval,
        })
    }

    /// 空碎片集
    ///
    /// 求值器对空集照常工作，只是不产生任何位置。
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// 最低碎片的 Y
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// 最高碎片的 Y
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// 竖直跨度 `max_y - min_y`
    pub fn interval(&self) -> f32 {
        self.interval
    }
}

impl<'a> IntoIterator for &'a FragmentSet {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

/// 水平径向方向：`normalize(position - (0, position.y, 0))`
///
/// 位于中轴上时返回零向量而不是 NaN。
pub fn radial_direction(position: Vec3) -> Vec3 {
    Vec3::new(position.x, 0.0, position.z).normalize_or_zero()
}

/// 进度阈值：`(y + interval / 2) / interval`
///
/// `interval == 0` 时退化为 0。
pub fn progress_threshold(y: f32, interval: f32) -> f32 {
    if interval == 0.0 {
        return 0.0;
    }
    (y + interval / 2.0) / interval
}
