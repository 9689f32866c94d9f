//! 日志初始化与运行 ID 生成。

use tracing_subscriber::{EnvFilter, fmt};

/// 单次示例运行的追踪标识。
#[derive(Debug, Clone)]
pub struct RunIds {
    pub run_id: String,
}

/// 初始化 tracing；`RUST_LOG` 优先，未设置时使用 `default_directive`。
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// 生成新的 run_id。
pub fn new_run_ids() -> RunIds {
    RunIds {
        run_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 创建贯穿一次运行的 span。
pub fn run_span(ids: &RunIds) -> tracing::Span {
    tracing::info_span!("sample_run", run_id = %ids.run_id)
}
