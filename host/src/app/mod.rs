//! # App 模块
//!
//! 应用状态与主循环逻辑。
//!
//! ## 阶段
//!
//! ```text
//! Loading ──加载成功──▶ Running
//!    │
//!    └────加载失败──▶ Failed
//! ```
//!
//! - `Loading`：`tick` 只检查后台加载结果，不推进动画、不绘制
//! - `Running`：每帧推进驱动器，提交场景并绘制
//! - `Failed`：`tick` 返回错误，不再推进

mod init;

use std::sync::Arc;

use shatter_core::{AnimationDriver, AnimationState, FrameOutput};
use thiserror::Error;
use tracing::debug;

use crate::backend::{BackendError, RenderBackend};
use crate::config::AppConfig;
use crate::control::{ControlAction, ControlPanel};
use crate::resources::{AssetLoader, AssetRequest, ResourceError, ResourceSource};
use crate::scene::SceneGraph;
use crate::viewport::ViewportState;

/// 应用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// 资源加载失败
    #[error("资源加载失败: {0}")]
    LoadFailed(#[from] ResourceError),

    /// 渲染后端错误
    #[error("渲染后端错误: {0}")]
    Backend(#[from] BackendError),
}

/// 应用阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    Loading,
    Running,
    Failed,
}

/// 阶段内部数据
enum Stage {
    Loading {
        loader: AssetLoader,
        /// 加载期间收到的滑块值
        pending: AnimationState,
        /// 加载期间收到的最后一个动作
        pending_action: Option<ControlAction>,
    },
    Running {
        driver: AnimationDriver,
        scene: SceneGraph,
    },
    Failed(AppError),
}

/// 应用状态
pub struct App {
    config: AppConfig,
    panel: ControlPanel,
    viewport: ViewportState,
    stage: Stage,
}

impl App {
    /// 创建应用并启动后台加载
    pub fn new(config: AppConfig, source: Arc<dyn ResourceSource>, device_pixel_ratio: f32) -> Self {
        let loader = AssetLoader::spawn(source, AssetRequest::from_config(&config));
        Self::with_loader(config, loader, device_pixel_ratio)
    }

    /// 使用已启动的加载任务创建应用
    pub fn with_loader(config: AppConfig, loader: AssetLoader, device_pixel_ratio: f32) -> Self {
        let pending = AnimationState::new(
            config.animation.initial_progress,
            config.animation.strength,
        );
        Self {
            viewport: ViewportState::from_config(&config, device_pixel_ratio),
            panel: ControlPanel::new(),
            stage: Stage::Loading {
                loader,
                pending,
                pending_action: None,
            },
            config,
        }
    }

    pub fn phase(&self) -> AppPhase {
        match self.stage {
            Stage::Loading { .. } => AppPhase::Loading,
            Stage::Running { .. } => AppPhase::Running,
            Stage::Failed(_) => AppPhase::Failed,
        }
    }

    /// 推进一帧
    ///
    /// 加载中返回 `Ok(None)`；加载完成的那一帧会先完成场景组装再推进。
    pub fn tick(
        &mut self,
        dt: f32,
        backend: &mut dyn RenderBackend,
    ) -> Result<Option<FrameOutput>, AppError> {
        if let Stage::Loading {
            loader,
            pending,
            pending_action,
        } = &mut self.stage
        {
            let Some(result) = loader.poll() else {
                return Ok(None);
            };
            let (pending, pending_action) = (*pending, pending_action.take());
            self.finish_loading(result, pending, pending_action, backend)?;
        }

        match &mut self.stage {
            Stage::Running { driver, scene } => {
                let output = driver.tick(dt);
                scene.commit(&output);
                backend.draw(scene, &self.viewport)?;
                Ok(Some(output))
            }
            Stage::Failed(error) => Err(error.clone()),
            Stage::Loading { .. } => Ok(None),
        }
    }

    /// 阻塞等待加载完成（headless 模式）
    pub fn wait_until_loaded(&mut self, backend: &mut dyn RenderBackend) -> Result<(), AppError> {
        match &mut self.stage {
            Stage::Loading {
                loader,
                pending,
                pending_action,
            } => {
                let result = loader.wait();
                let (pending, pending_action) = (*pending, pending_action.take());
                self.finish_loading(result, pending, pending_action, backend)
            }
            Stage::Running { .. } => Ok(()),
            Stage::Failed(error) => Err(error.clone()),
        }
    }

    /// 处理控制动作
    ///
    /// 加载期间的动作写入待用状态，在进入 Running 时生效。
    pub fn handle(&mut self, action: ControlAction) -> bool {
        match &mut self.stage {
            Stage::Running { driver, .. } => {
                let accepted = self.panel.apply(action, driver);
                if accepted {
                    debug!(action = %action, "控制动作");
                }
                accepted
            }
            Stage::Loading {
                pending,
                pending_action,
                ..
            } => match self.panel.apply_pending(action, pending) {
                Some(action) => {
                    match action {
                        ControlAction::Explode | ControlAction::Collapse => {
                            *pending_action = Some(action)
                        }
                        // 拖动进度滑块覆盖之前暂存的过渡请求
                        ControlAction::SetProgress(_) => *pending_action = None,
                        ControlAction::SetStrength(_) => {}
                    }
                    true
                }
                None => false,
            },
            Stage::Failed(_) => false,
        }
    }

    /// 窗口缩放；不影响动画状态
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        backend: &mut dyn RenderBackend,
    ) {
        if self.viewport.resize(width, height, device_pixel_ratio) {
            backend.resize(&self.viewport);
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// 动画驱动器（仅 Running 阶段）
    pub fn driver(&self) -> Option<&AnimationDriver> {
        match &self.stage {
            Stage::Running { driver, .. } => Some(driver),
            _ => None,
        }
    }

    /// 场景（仅 Running 阶段）
    pub fn scene(&self) -> Option<&SceneGraph> {
        match &self.stage {
            Stage::Running { scene, .. } => Some(scene),
            _ => None,
        }
    }

    /// 失败原因
    pub fn failure(&self) -> Option<&AppError> {
        match &self.stage {
            Stage::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// 待用状态（仅 Loading 阶段）
    pub fn pending_state(&self) -> Option<&AnimationState> {
        match &self.stage {
            Stage::Loading { pending, .. } => Some(pending),
            _ => None,
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("phase", &self.phase())
            .field("viewport", self.viewport.viewport())
            .finish()
    }
}
