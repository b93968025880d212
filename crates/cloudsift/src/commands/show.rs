use crate::utils::LoadedConfig;
use colored::Colorize;

pub fn handle(loaded: &LoadedConfig) -> anyhow::Result<()> {
    match &loaded.path {
        Some(path) => println!("📄 {}", path.display().to_string().cyan()),
        None => println!("📄 {}", "(コマンドライン指定のみ)".dimmed()),
    }

    println!("{}", loaded.config.filter);
    println!(
        "Retry:   {} attempts, {}s interval",
        loaded.config.retry.attempts,
        loaded.config.retry.interval.as_secs_f64()
    );

    Ok(())
}
