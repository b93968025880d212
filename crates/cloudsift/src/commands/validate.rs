use crate::utils::{self, Overrides};
use colored::Colorize;
use std::path::Path;

pub fn handle(file: Option<&Path>, overrides: Overrides) -> anyhow::Result<()> {
    println!("{}", "フィルタを検証中...".blue());

    match utils::load_sift_config(file, overrides) {
        Ok(loaded) => {
            if let Some(path) = &loaded.path {
                println!("フィルタファイル: {}", path.display().to_string().cyan());
            }
            println!("{}", "✓ フィルタは正常です！".green().bold());
            println!();

            let filter = &loaded.config.filter;
            println!("サマリー:");
            println!("  include: {}個", filter.include.len());
            println!("  exclude: {}個", filter.exclude.len());
            println!("  タグ: {}個", filter.tags.len());
            println!("  ターゲット: {}個", filter.targets.len());
            println!(
                "  リトライ: {}回 ({}秒間隔)",
                loaded.config.retry.attempts,
                loaded.config.retry.interval.as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ フィルタエラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
