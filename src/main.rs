use anyhow::Result;
use tracing::error;

use front_health_check::config::Config;
use front_health_check::outcome::ProbeOutcome;
use front_health_check::{logger, scheduler};

#[tokio::main]
async fn main() {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 执行健康检查，退出码交给外部监控判读
    match run(&config).await {
        Ok(outcome) => std::process::exit(if outcome.success { 0 } else { 1 }),
        Err(e) => {
            error!("Unexpected error: {}", e);
            std::process::exit(1);
        }
    }
}

/// 执行带重试的健康检查并把最终结果输出到 stdout
async fn run(config: &Config) -> Result<ProbeOutcome> {
    let outcome = scheduler::run(config).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(outcome)
}
