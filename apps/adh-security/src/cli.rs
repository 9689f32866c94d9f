//! 命令行参数。

use adh_config::{AppSettings, DEFAULT_SETTINGS_PATH};
use adh_workflow::{ContactInfo, SampleOptions};
use clap::Parser;
use std::path::PathBuf;

/// 安全管理示例：角色、用户、ACL 与流所有者。
#[derive(Parser, Debug)]
#[command(name = "adh-security")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径（也可用 ADH_SETTINGS_PATH）
    #[arg(long, env = "ADH_SETTINGS_PATH", default_value = DEFAULT_SETTINGS_PATH)]
    pub config: PathBuf,

    /// 任一步骤失败时以非零状态退出
    #[arg(long)]
    pub strict: bool,

    /// 同时修改流集合默认 ACL（清理时恢复）
    #[arg(long)]
    pub default_acl: bool,

    /// 跳过结束前的回读校验
    #[arg(long)]
    pub no_verify: bool,

    /// 单次 HTTP 请求超时（秒）
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// 未设置 RUST_LOG 时的日志级别
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// 由配置与命令行开关组装流程参数。
    pub fn sample_options(&self, settings: &AppSettings) -> SampleOptions {
        let mut options = SampleOptions::new(settings.custom_role_name.clone());
        options.tenant_member_role_type_id = settings.tenant_member_role_type_id.clone();
        options.identity_provider_id = settings.identity_provider_id.clone();
        options.contact = ContactInfo {
            given_name: settings.contact_given_name.clone(),
            surname: settings.contact_surname.clone(),
            email: settings.contact_email.clone(),
        };
        options.update_default_acl = self.default_acl;
        options.verify = !self.no_verify;
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AppSettings {
        AppSettings::parse(
            r#"{
                "Resource": "https://example.test",
                "ApiVersion": "v1",
                "TenantId": "tenant-1",
                "NamespaceId": "namespace-1",
                "ClientId": "client",
                "ClientSecret": "secret",
                "ContactEmail": "ada@example.com",
                "TenantMemberRoleTypeId": "member-type"
            }"#,
            |_| None,
        )
        .expect("settings")
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["adh-security"]).expect("parse");
        assert!(!cli.strict);
        assert!(!cli.default_acl);
        assert_eq!(cli.timeout_secs, 60);
        let options = cli.sample_options(&settings());
        assert!(options.verify);
        assert!(!options.update_default_acl);
        assert_eq!(options.tenant_member_role_type_id.as_deref(), Some("member-type"));
        assert_eq!(options.contact.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "adh-security",
            "--strict",
            "--default-acl",
            "--no-verify",
            "--timeout-secs",
            "5",
            "--config",
            "other.json",
        ])
        .expect("parse");
        assert!(cli.strict);
        assert_eq!(cli.timeout_secs, 5);
        assert_eq!(cli.config, PathBuf::from("other.json"));
        let options = cli.sample_options(&settings());
        assert!(!options.verify);
        assert!(options.update_default_acl);
    }
}
