use cloudsift_config::{ConfigError, SiftConfig};
use cloudsift_core::{Filter, Tag};
use std::path::{Path, PathBuf};

/// コマンドラインで指定されたフィルタ (ファイルの値を上書きする)
#[derive(Debug, Default)]
pub struct Overrides {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub targets: Vec<String>,
    pub tags: Vec<Tag>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
            && self.exclude.is_empty()
            && self.targets.is_empty()
            && self.tags.is_empty()
    }

    /// 指定された項目だけを置き換える
    pub fn apply(self, mut filter: Filter) -> Filter {
        if !self.include.is_empty() {
            filter = filter.with_include(self.include);
        }
        if !self.exclude.is_empty() {
            filter = filter.with_exclude(self.exclude);
        }
        if !self.targets.is_empty() {
            filter = filter.with_targets(self.targets);
        }
        if !self.tags.is_empty() {
            filter = filter.with_tags(self.tags);
        }
        filter
    }
}

/// 読み込んだ設定と、その読み込み元
pub struct LoadedConfig {
    pub config: SiftConfig,
    pub path: Option<PathBuf>,
}

/// フィルタファイルを読み込み、コマンドラインの指定を適用する
///
/// `--file` が無く、ファイルも見つからない場合は、コマンドラインの指定が
/// あればそれだけでフィルタを組み立てる。
pub fn load_sift_config(file: Option<&Path>, overrides: Overrides) -> anyhow::Result<LoadedConfig> {
    let path = match file {
        Some(path) => Some(path.to_path_buf()),
        None => match cloudsift_config::find_filter_file() {
            Ok(path) => Some(path),
            Err(ConfigError::FilterFileNotFound) if !overrides.is_empty() => {
                tracing::debug!("No filter file found, using command line filters only");
                None
            }
            Err(e) => return Err(e.into()),
        },
    };

    let mut config = match &path {
        Some(path) => cloudsift_config::load_config(path)?,
        None => SiftConfig::default(),
    };

    config.filter = overrides.apply(config.filter);
    config.filter.validate()?;

    Ok(LoadedConfig { config, path })
}
