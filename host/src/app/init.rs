//! 加载完成后的初始化：组装场景、构建碎片集、创建驱动器、初始化后端。

use shatter_core::{AnimationDriver, AnimationState, FragmentError, FragmentSet};
use tracing::{error, info, warn};

use super::{App, AppError, Stage};
use crate::backend::RenderBackend;
use crate::control::ControlAction;
use crate::resources::{AssetBundle, ResourceError};
use crate::scene::{LightRig, SceneGraph};

impl App {
    /// 处理加载结果，进入 Running 或 Failed
    pub(super) fn finish_loading(
        &mut self,
        result: Result<AssetBundle, ResourceError>,
        pending: AnimationState,
        pending_action: Option<ControlAction>,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), AppError> {
        let bundle = match result {
            Ok(bundle) => bundle,
            Err(e) => {
                error!(error = %e, "资源加载失败，动画不会开始");
                return Err(self.fail(AppError::LoadFailed(e)));
            }
        };

        let lights = LightRig::from_config(&self.config.lighting);
        let (scene, sources) = SceneGraph::assemble(bundle, lights);

        let fragments = match FragmentSet::build(sources) {
            Ok(fragments) => fragments,
            Err(FragmentError::EmptyHierarchy) => {
                warn!("碎片模型中没有网格，使用空碎片集继续");
                FragmentSet::empty()
            }
        };

        if let Err(e) = backend.configure(&self.config.renderer, scene.lights(), &self.viewport) {
            error!(error = %e, "渲染后端初始化失败");
            return Err(self.fail(AppError::Backend(e)));
        }

        let mut driver =
            AnimationDriver::new(fragments, pending, self.config.driver_settings());
        if let Some(action) = pending_action {
            self.panel.apply(action, &mut driver);
        }

        info!(
            fragments = driver.fragments().len(),
            progress = driver.state().progress,
            strength = driver.state().strength,
            transitioning = driver.is_transitioning(),
            "动画开始"
        );

        self.stage = Stage::Running { driver, scene };
        Ok(())
    }

    fn fail(&mut self, error: AppError) -> AppError {
        self.stage = Stage::Failed(error.clone());
        error
    }
}
