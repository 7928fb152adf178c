//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 组装状态后调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use kura_core::bridge::port::CommandGateway;

use crate::routes::{refdata, view};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `gateway` 只是会话工作线程的提交端，处理器无法触达会话本身。
#[derive(Clone)]
pub struct AppState {
    /// 命令网关 (会话桥接句柄)
    pub gateway: Arc<dyn CommandGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn CommandGateway>) -> Self {
        Self { gateway }
    }
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kura 参考数据网关 API",
        version = "0.1.0",
        description = "只读查询交易员、账户、合约与盘口视图。所有请求经由同一个会话工作线程串行执行。",
        license(name = "MIT")
    ),
    tags(
        (name = "参考数据 (RefData)", description = "交易员、账户、合约与盘口视图查询")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树 (含 Swagger UI 与 CORS)。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(refdata::list_traders))
        .routes(routes!(refdata::list_accnts))
        .routes(routes!(refdata::list_contrs))
        .routes(routes!(view::list_views))
        .with_state(state)
        .split_for_parts();

    // 只读接口，允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 在已绑定的监听器上提供服务，直到 `shutdown` 完成后优雅退出。
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

/// 绑定地址并启动 HTTP 监听。
///
/// # Arguments
/// * `state` - 由外部组装的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
/// * `shutdown` - 完成时停止接收新连接并等待在途请求结束
pub async fn start_server<F>(state: AppState, bind_addr: &str, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Kura API Server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    serve(listener, state, shutdown).await?;
    Ok(())
}
