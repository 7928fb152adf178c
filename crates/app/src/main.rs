use std::path::PathBuf;
use std::sync::Arc;

use kura_api::server::{self, AppState};
use kura_bridge::lifecycle::Lifecycle;
use kura_core::config::{AppConfig, LogConfig};
use kura_session::{MemSession, ReferenceData};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "config/kura.toml";

/// # Summary
/// 应用启动入口，纯粹的组装层。
///
/// # Logic
/// 1. 加载配置并初始化全局日志。
/// 2. 启动会话工作线程，会话在线程内由工厂函数打开。
/// 3. 把桥接句柄作为 `CommandGateway` 注入 API 状态。
/// 4. 提供 HTTP 服务直到收到 Ctrl-C。
/// 5. 有序关闭会话工作线程后退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置与日志
    let config_path = std::env::var("KURA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config(&config_path)?;
    let _guard = init_logging(&config.log);
    info!(config = %config_path, "Kura gateway starting...");

    // 2. 会话工作线程
    let fixture = config.session.fixture_path.clone();
    let name = config.session.name.clone();
    let lifecycle = Lifecycle::start(&config.session, move || {
        let data = match fixture {
            Some(path) => ReferenceData::from_path(path)?,
            None => ReferenceData::default(),
        };
        MemSession::open(name, data)
    })
    .await?;

    // 3. 注入网关
    let state = AppState::new(Arc::new(lifecycle.bridge()));

    // 4. 提供服务直到退出信号
    let served = server::start_server(state, &config.server.bind_addr(), shutdown_signal()).await;
    if let Err(e) = &served {
        error!("API server failed: {}", e);
    }

    // 5. 有序关闭
    let stats = lifecycle.shutdown().await?;
    info!(
        executed = stats.executed,
        failed = stats.failed,
        polls = stats.polls,
        rejected = stats.rejected,
        "Kura gateway stopped"
    );

    served
}

/// # Summary
/// 分层加载配置：内置默认值、配置文件、环境变量，后者覆盖前者。
///
/// # Arguments
/// * `path` - 配置文件路径，不存在时跳过
///
/// # Returns
/// * `Err(ConfigError)` - 文件格式错误或取值无法反序列化
fn load_config(path: &str) -> Result<AppConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default())?)
        .add_source(config::File::from(PathBuf::from(path)).required(false))
        .add_source(
            config::Environment::with_prefix("KURA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// # Summary
/// 安装全局日志订阅者。
///
/// # Logic
/// 1. `RUST_LOG` 存在时优先，否则使用配置中的级别。
/// 2. 配置了日志目录时额外写入按天滚动的文件。
///
/// # Returns
/// * `Option<WorkerGuard>` - 文件写入线程的守卫，须存活到进程结束
fn init_logging(log: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let (file_layer, guard) = match &log.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "kura.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    info!("Shutdown signal received. Draining...");
}
