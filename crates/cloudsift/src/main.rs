mod commands;
mod utils;

use clap::{Parser, Subcommand};
use cloudsift_core::Tag;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "どのクラウドリソースを取り込むか、宣言で決める。", long_about = None)]
struct Cli {
    /// フィルタファイルのパス (省略時は sift.yaml を自動検出)
    #[arg(short, long, global = true, env = "SIFT_FILTER_PATH")]
    file: Option<PathBuf>,

    /// 対象にするリソースタイプ (カンマ区切り可、ファイルの値を上書き)
    #[arg(long, global = true, value_delimiter = ',')]
    include: Vec<String>,

    /// 除外するリソースタイプ (カンマ区切り可、ファイルの値を上書き)
    #[arg(long, global = true, value_delimiter = ',')]
    exclude: Vec<String>,

    /// 個別に指定するリソース (<type>.<id> 形式)
    #[arg(long = "target", global = true)]
    targets: Vec<String>,

    /// タグで絞り込む (NAME:VALUE 形式)
    #[arg(long = "tag", global = true)]
    tags: Vec<Tag>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// フィルタを検証
    Validate,
    /// ターゲットをリソースタイプごとに表示
    Targets,
    /// リソースタイプが処理対象かどうかを判定
    Check {
        /// リソースタイプ (例: aws_instance)
        #[arg(required = true)]
        types: Vec<String>,
    },
    /// 読み込んだフィルタを表示
    Show,
    /// バージョン情報を表示
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 出力はstdout、ログはstderrに分ける
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let overrides = utils::Overrides {
        include: cli.include,
        exclude: cli.exclude,
        targets: cli.targets,
        tags: cli.tags,
    };

    match cli.command {
        Commands::Validate => commands::validate::handle(cli.file.as_deref(), overrides),
        Commands::Targets => {
            let loaded = utils::load_sift_config(cli.file.as_deref(), overrides)?;
            commands::targets::handle(&loaded.config.filter)
        }
        Commands::Check { types } => {
            let loaded = utils::load_sift_config(cli.file.as_deref(), overrides)?;
            commands::check::handle(&loaded.config.filter, &types)
        }
        Commands::Show => {
            let loaded = utils::load_sift_config(cli.file.as_deref(), overrides)?;
            commands::show::handle(&loaded)
        }
        // Versionコマンドはフィルタファイル不要
        Commands::Version => {
            println!("cloudsift {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
