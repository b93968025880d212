pub mod error;

pub use error::*;

use cloudsift_core::{Filter, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// フィルタファイルのパスを直接指定する環境変数
pub const FILTER_PATH_ENV: &str = "SIFT_FILTER_PATH";

const CANDIDATES: [&str; 4] = ["sift.local.yaml", ".sift.local.yaml", "sift.yaml", ".sift.yaml"];

/// フィルタファイルの内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// 処理対象のリソースを絞り込むフィルタ
    pub filter: Filter,

    /// プロバイダAPI呼び出しのリトライ設定
    pub retry: RetryPolicy,
}

/// CloudSiftの設定ディレクトリを取得
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("cloudsift");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// フィルタファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 SIFT_FILTER_PATH (直接パス指定)
/// 2. カレントディレクトリ: sift.local.yaml, .sift.local.yaml, sift.yaml, .sift.yaml
/// 3. ./.cloudsift/ ディレクトリ内: 同様の順序
/// 4. ~/.config/cloudsift/sift.yaml (グローバル設定)
pub fn find_filter_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(filter_path) = std::env::var(FILTER_PATH_ENV) {
        let path = PathBuf::from(filter_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリで検索
    if let Some(path) = find_in(&current_dir) {
        return Ok(path);
    }

    // 3. ./.cloudsift/ ディレクトリで検索
    let sift_dir = current_dir.join(".cloudsift");
    if sift_dir.is_dir() {
        if let Some(path) = find_in(&sift_dir) {
            return Ok(path);
        }
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("cloudsift").join("sift.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::FilterFileNotFound)
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// フィルタファイルを読み込んで検証する
///
/// 拡張子が `.json` ならJSON、それ以外はYAMLとして扱う。
pub fn load_config(path: &Path) -> Result<SiftConfig> {
    tracing::debug!("Loading filter file: {}", path.display());

    let content = std::fs::read_to_string(path)?;

    let config: SiftConfig = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    config
        .filter
        .validate()
        .map_err(|source| ConfigError::InvalidFilter {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(config)
}
