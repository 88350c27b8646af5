//! # Loader 模块
//!
//! 后台资源加载。碎片模型、伴随模型和纹理在一个后台线程中依次加载，
//! 结果要么全部成功，要么整体失败；失败不重试。
//!
//! 主循环每帧调用 `poll()` 检查结果，不会阻塞；
//! headless 模式或测试可以直接 `wait()`。

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{error, info};

use super::ResourceError;
use super::model::{ModelHierarchy, ModelMesh, load_model};
use super::source::ResourceSource;
use super::texture::{SamplerDesc, TextureData, load_texture};
use crate::config::AppConfig;

/// 需要加载的资源
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub fragments_model: String,
    pub companion_model: String,
    pub texture: String,
    pub sampler: SamplerDesc,
}

impl AssetRequest {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fragments_model: config.fragments_model.clone(),
            companion_model: config.companion_model.clone(),
            texture: config.texture.clone(),
            sampler: SamplerDesc::stone(&config.texture_sampling),
        }
    }
}

/// 加载完成的资源
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBundle {
    /// 碎片模型的网格层级
    pub fragments: ModelHierarchy,
    /// 伴随模型（取其场景中第一个网格节点）
    pub companion: ModelMesh,
    /// 共享纹理
    pub texture: TextureData,
}

/// 同步加载全部资源
pub fn load_assets(
    source: &dyn ResourceSource,
    request: &AssetRequest,
) -> Result<AssetBundle, ResourceError> {
    let fragments = load_model(source, &request.fragments_model)?;

    let companion = load_model(source, &request.companion_model)?
        .meshes
        .into_iter()
        .next()
        .ok_or_else(|| {
            ResourceError::invalid_format(&request.companion_model, "伴随模型中没有网格")
        })?;

    let texture = load_texture(source, &request.texture, request.sampler)?;

    Ok(AssetBundle {
        fragments,
        companion,
        texture,
    })
}

/// 后台加载任务
#[derive(Debug)]
pub struct AssetLoader {
    receiver: Option<Receiver<Result<AssetBundle, ResourceError>>>,
}

impl AssetLoader {
    /// 启动后台加载
    pub fn spawn(source: Arc<dyn ResourceSource>, request: AssetRequest) -> Self {
        let (sender, receiver) = mpsc::channel();

        info!(
            fragments = %source.full_path(&request.fragments_model),
            companion = %source.full_path(&request.companion_model),
            texture = %source.full_path(&request.texture),
            "开始加载资源"
        );

        thread::spawn(move || {
            let result = load_assets(source.as_ref(), &request);
            match &result {
                Ok(bundle) => info!(
                    meshes = bundle.fragments.len(),
                    texture_width = bundle.texture.width,
                    texture_height = bundle.texture.height,
                    "资源加载完成"
                ),
                Err(e) => error!(error = %e, "资源加载失败"),
            }
            // 接收端已丢弃时结果无人关心
            let _ = sender.send(result);
        });

        Self {
            receiver: Some(receiver),
        }
    }

    /// 非阻塞检查加载结果
    ///
    /// 结果只交付一次；交付之后再调用返回 `None`。
    pub fn poll(&mut self) -> Option<Result<AssetBundle, ResourceError>> {
        let receiver = self.receiver.as_ref()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_gone()),
        };
        self.receiver = None;
        Some(result)
    }

    /// 阻塞等待加载结果
    pub fn wait(&mut self) -> Result<AssetBundle, ResourceError> {
        match self.receiver.take() {
            Some(receiver) => receiver.recv().unwrap_or_else(|_| Err(worker_gone())),
            None => Err(ResourceError::LoadFailed {
                path: String::new(),
                kind: "bundle".to_string(),
                message: "加载结果已经被取走".to_string(),
            }),
        }
    }

    /// 结果是否已经交付
    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }
}

fn worker_gone() -> ResourceError {
    ResourceError::LoadFailed {
        path: String::new(),
        kind: "bundle".to_string(),
        message: "加载线程意外退出".to_string(),
    }
}
