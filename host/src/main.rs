//! # Shatter
//!
//! 碎片爆炸动画的命令行入口，以 headless 模式按固定步长运行。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p shatter-host
//! cargo run -p shatter-host -- --config config.json --seconds 12 --fps 30
//! cargo run -p shatter-host -- --explode-at 0 --collapse-at 6
//! cargo run -p shatter-host -- --demo
//! ```
//!
//! 日志级别通过 `RUST_LOG` 控制，默认 `info`。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shatter_host::resources::demo::demo_source;
use shatter_host::{
    App, AppConfig, FsSource, HeadlessBackend, ResourceSource, RunPlan, headless,
};

#[derive(Parser)]
#[command(name = "shatter")]
#[command(about = "碎片爆炸动画 - headless 运行")]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// 运行时长（秒）
    #[arg(short, long, default_value_t = 8.0)]
    seconds: f32,

    /// 帧率
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// 触发爆炸的时间点（秒）
    #[arg(long, default_value_t = 0.0)]
    explode_at: f32,

    /// 触发收拢的时间点（秒）
    #[arg(long)]
    collapse_at: Option<f32>,

    /// 使用内存中生成的演示资源
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config);
    config.validate().context("配置无效")?;

    if cli.fps == 0 {
        bail!("帧率必须大于 0");
    }

    let source: Arc<dyn ResourceSource> = if cli.demo {
        info!("使用演示资源");
        Arc::new(demo_source(&config).context("生成演示资源失败")?)
    } else {
        Arc::new(FsSource::new(&config.assets_root))
    };

    let plan = RunPlan {
        seconds: cli.seconds,
        fps: cli.fps,
        explode_at: Some(cli.explode_at),
        collapse_at: cli.collapse_at,
    };

    let mut app = App::new(config, source, 1.0);
    let mut backend = HeadlessBackend::new();
    let summary = headless::run(&mut app, &mut backend, &plan).context("运行失败")?;

    println!(
        "frames={} progress={:.3} strength={:.1} camera=({:.2}, {:.2}, {:.2})",
        summary.frames,
        summary.progress,
        summary.strength,
        summary.camera_position.x,
        summary.camera_position.y,
        summary.camera_position.z,
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
