use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "フィルタファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: sift.local.yaml, .sift.local.yaml, sift.yaml, .sift.yaml\n\
        - ./.cloudsift/ ディレクトリ\n\
        - ~/.config/cloudsift/sift.yaml\n\
        または SIFT_FILTER_PATH 環境変数で直接指定できます"
    )]
    FilterFileNotFound,

    #[error("YAMLパースエラー: {path}\n理由: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSONパースエラー: {path}\n理由: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("無効なフィルタ: {path}\n理由: {source}")]
    InvalidFilter {
        path: PathBuf,
        #[source]
        source: cloudsift_core::SiftError,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
