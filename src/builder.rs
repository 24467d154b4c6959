//! Builder Module
//!
//! Fluent Builder APIを提供し、`Pipeline`インスタンスを段階的に構築する。

use std::path::PathBuf;

use crate::config::{CatalogConfig, CatalogMode};
use crate::discovery::CsvDiscovery;
use crate::error::CatalogError;
use crate::paths::{PathResolver, PublicationDate};
use crate::pipeline::Pipeline;

/// パイプラインの設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct PipelineSettings {
    /// ファイル名・識別子などの設定
    pub config: CatalogConfig,

    /// カタログ生成モード
    pub mode: CatalogMode,

    /// 作業ディレクトリ
    pub root: PathBuf,

    /// 入力スプレッドシートのパス（Noneの場合は`root/input_file`）
    pub input: Option<PathBuf>,

    /// 処理日（Noneの場合は実行時のローカル日付）
    pub today: Option<PublicationDate>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            config: CatalogConfig::default(),
            mode: CatalogMode::default(),
            root: PathBuf::from("."),
            input: None,
            today: None,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use cenykatalog::{CatalogMode, PipelineBuilder};
///
/// # fn main() -> Result<(), cenykatalog::CatalogError> {
/// let pipeline = PipelineBuilder::new()
///     .with_root("/srv/ceny-mieszkan")
///     .with_mode(CatalogMode::Merge)
///     .build()?;
/// pipeline.run()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    settings: PipelineSettings,
}

impl PipelineBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 設定: [`CatalogConfig::default`]（Kerim向けの値）
    /// - モード: 再構築
    /// - 作業ディレクトリ: カレントディレクトリ
    /// - 処理日: 実行時のローカル日付
    pub fn new() -> Self {
        Self {
            settings: PipelineSettings::default(),
        }
    }

    /// 設定を指定する
    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.settings.config = config;
        self
    }

    /// カタログ生成モードを指定する
    pub fn with_mode(mut self, mode: CatalogMode) -> Self {
        self.settings.mode = mode;
        self
    }

    /// 作業ディレクトリを指定する
    ///
    /// CSV、XML、MD5、履歴ファイルはすべてこのディレクトリからの相対パスに置かれます。
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.settings.root = root.into();
        self
    }

    /// 入力スプレッドシートのパスを指定する
    ///
    /// 指定しない場合は`<root>/<input_file>`を使用します。
    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.settings.input = Some(input.into());
        self
    }

    /// 処理日を固定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use cenykatalog::PipelineBuilder;
    ///
    /// # fn main() -> Result<(), cenykatalog::CatalogError> {
    /// let pipeline = PipelineBuilder::new()
    ///     .with_date("2025-06-01".parse()?)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_date(mut self, date: PublicationDate) -> Self {
        self.settings.today = Some(date);
        self
    }

    /// 設定を検証し、`Pipeline`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Pipeline)` - 設定が有効な場合
    /// * `Err(CatalogError::Config)` - 設定が無効な場合
    ///   * ファイル名テンプレートに`{date}`がない、または複数ある
    ///   * データセット識別子テンプレートに`{year}`がない
    ///   * URLのベースが`/`で終わらない
    /// * `Err(CatalogError::Pattern)` - ファイル名テンプレートから検出パターンを構築できない場合
    pub fn build(self) -> Result<Pipeline, CatalogError> {
        // 1. 設定値の検証
        self.settings.config.validate()?;

        // 2. 作業ディレクトリの検証
        if self.settings.root.as_os_str().is_empty() {
            return Err(CatalogError::Config(
                "Root directory must not be empty".to_string(),
            ));
        }

        // 3. 検出パターンの構築
        let discovery = CsvDiscovery::new(&self.settings.config)?;

        let resolver = PathResolver::new(self.settings.root, self.settings.config);
        Ok(Pipeline::new(
            resolver,
            discovery,
            self.settings.mode,
            self.settings.input,
            self.settings.today,
        ))
    }
}
