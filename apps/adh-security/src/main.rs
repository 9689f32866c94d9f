//! 安全管理示例入口：读取配置、获取 token、执行流程并清理。

mod cli;

use adh_auth::ClientCredentials;
use adh_client::HttpHistorianClient;
use adh_config::AppSettings;
use adh_telemetry::{init_tracing, new_run_ids, run_span};
use adh_workflow::{error_chain, execute};
use clap::Parser;
use cli::Cli;
use domain::TenantContext;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），ADH_* 覆盖配置文件与命令行默认值
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let settings = AppSettings::load(&cli.config).inspect_err(|err| {
        error!(
            target: "adh.config",
            path = %cli.config.display(),
            error = %err,
            "cannot load settings"
        );
    })?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;
    let token_source = Arc::new(ClientCredentials::new(
        http.clone(),
        settings.resource.clone(),
        settings.client_id.clone(),
        settings.client_secret.clone(),
    ));
    let api = HttpHistorianClient::new(
        http,
        settings.resource.clone(),
        settings.api_version.clone(),
        token_source,
    );
    let ctx = TenantContext::new(settings.tenant_id.clone(), settings.namespace_id.clone());
    let options = cli.sample_options(&settings);

    let ids = new_run_ids();
    let outcome = execute(&api, &ctx, &options)
        .instrument(run_span(&ids))
        .await;

    for failure in &outcome.cleanup_failures {
        warn!(
            target: "adh.workflow",
            operation = %failure.operation,
            error = %error_chain(&failure.error),
            "cleanup step failed"
        );
    }
    info!(target: "adh.workflow", success = outcome.is_success(), "Complete!");

    match outcome.into_result() {
        Err(err) if cli.strict => Err(err.into()),
        _ => Ok(()),
    }
}
