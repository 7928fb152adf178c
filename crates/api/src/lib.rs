//! # `kura-api` - HTTP API 网关
//!
//! 本 crate 是 Kura 参考数据网关的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 把查询参数翻译为 `Command` 并经 `CommandGateway` 提交给会话工作线程
//! - 将 `Reply` 中的领域模型转换为 DTO 返回给调用方
//! - 将桥接错误映射为 HTTP 状态码

pub mod types;
pub mod error;
pub mod routes;
pub mod server;
