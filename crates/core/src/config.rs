use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// # Summary
/// 会话工作线程的运行参数。
///
/// # Invariants
/// - `timeout_ms` 同时约束空闲等待与关闭等待。
/// - `queue_capacity` 为 0 时按 1 处理 (单槽位)。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // 会话名称，用于线程命名与日志
    pub name: String,
    // 空闲轮询与关闭等待的超时 (毫秒)
    pub timeout_ms: u64,
    // 命令交接通道容量
    pub queue_capacity: usize,
    // 回环会话加载的参考数据文件 (JSON)，为空则以空数据集启动
    pub fixture_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // 滚动日志目录，为空则只输出到 stdout
    pub dir: Option<String>,
}

impl ServerConfig {
    /// 监听地址，如 `"0.0.0.0:8080"`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "TEST".to_string(),
            timeout_ms: 2000,
            queue_capacity: 1,
            fixture_path: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
