//! Catalog Builder Module
//!
//! dane.gov.plハーベスター形式のカタログ文書（要素ツリー）を構築するモジュール。
//!
//! 2つのモードを提供します。
//!
//! - **再構築モード**（[`CatalogBuilder::rebuild`]）: 日付の一覧から文書全体を新規に生成
//! - **マージモード**（[`CatalogBuilder::merge`]）: 既存の文書に未登録の日付のリソースのみを追加
//!
//! 文書の構造:
//!
//! ```text
//! ns2:datasets
//! └── dataset (status="published")
//!     ├── extIdent, title, description, updateFrequency, has*Data ...
//!     ├── categories/category
//!     ├── resources
//!     │   └── resource (status="published") × 公開日の数
//!     └── tags/tag
//! ```

use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::paths::{PathResolver, PublicationDate};
use crate::xml::Element;

/// ルート要素名
pub const ROOT_ELEMENT: &str = "ns2:datasets";

/// ハーベスタースキーマの名前空間
pub const HARVESTER_NAMESPACE: &str = "urn:otwarte-dane:harvester:1.13";

/// XML Schema instanceの名前空間
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// リソース識別子の最大長
pub const MAX_IDENT_LEN: usize = 36;

/// 根拠となる法令（説明文に埋め込まれる）
const STATUTE: &str = "art. 19b. ust. 1 Ustawy z dnia 20 maja 2021 r. o ochronie praw nabywcy \
lokalu mieszkalnego lub domu jednorodzinnego oraz Deweloperskim Funduszu Gwarancyjnym \
(Dz. U. z 2024 r. poz. 695).";

/// マージモードでのリソース追加結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// 新しいリソースを追加した
    Inserted,

    /// 同じ識別子のリソースが既に存在したため追加しなかった
    AlreadyPresent,
}

/// 公開日からリソース識別子を導出する
///
/// `"<prefix>_" + ハイフンを除いた日付`を先頭36文字に切り詰めたものです。
/// ポータル側でリソースを同一視するためのキーなので、この規則は変更できません。
pub fn resource_identifier(prefix: &str, date: &PublicationDate) -> String {
    format!("{}_{}", prefix, date.compact())
        .chars()
        .take(MAX_IDENT_LEN)
        .collect()
}

/// 既存リソースの一覧にリソースを追加した新しい一覧を返す
///
/// 既存の一覧は変更しません。`resource`と同じ`extIdent`を持つリソースが
/// 既にある場合は既存の一覧をそのまま返します。
pub fn insert_resource(existing: &[Element], resource: Element) -> (Vec<Element>, MergeOutcome) {
    let ident = resource.child_text("extIdent");
    let present = existing
        .iter()
        .any(|r| r.name == "resource" && r.child_text("extIdent") == ident);

    let mut updated = existing.to_vec();
    if present {
        (updated, MergeOutcome::AlreadyPresent)
    } else {
        updated.push(resource);
        (updated, MergeOutcome::Inserted)
    }
}

/// カタログビルダー
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    resolver: PathResolver,
}

impl CatalogBuilder {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    fn config(&self) -> &CatalogConfig {
        self.resolver.config()
    }

    /// 設定の接頭辞を使ったリソース識別子
    pub fn resource_ident(&self, date: &PublicationDate) -> String {
        resource_identifier(&self.config().resource_ident_prefix, date)
    }

    /// 名前空間宣言付きの空のルート要素
    pub fn root_element(&self) -> Element {
        Element::new(ROOT_ELEMENT)
            .with_attribute("xmlns:ns2", HARVESTER_NAMESPACE)
            .with_attribute("xmlns:xsi", XSI_NAMESPACE)
    }

    /// 指定年のデータセット要素（リソースは`resources`として渡す）
    pub fn dataset_element(&self, year: i32, resources: Vec<Element>) -> Element {
        let name = &self.config().developer_name;
        let ident = self.config().dataset_ident(year);
        debug!(%ident, "Creating dataset");

        let mut resources_element = Element::new("resources");
        resources_element.children = resources;

        Element::new("dataset")
            .with_attribute("status", "published")
            .with_child(Element::leaf("extIdent", ident))
            .with_child(bilingual(
                "title",
                format!("Ceny ofertowe mieszkań dewelopera {}", name),
                format!("Offer prices of apartments of developer {}", name),
            ))
            .with_child(bilingual(
                "description",
                format!(
                    "Zbiór danych zawiera informacje o cenach ofertowych mieszkań dewelopera {} \
                     udostępniane zgodnie z {}",
                    name, STATUTE
                ),
                format!(
                    "The dataset contains information on offer prices of apartments of the developer {} \
                     made available in accordance with {}",
                    name, STATUTE
                ),
            ))
            .with_child(Element::leaf("updateFrequency", "daily"))
            .with_child(Element::leaf("hasDynamicData", "false"))
            .with_child(Element::leaf("hasHighValueData", "true"))
            .with_child(Element::leaf("hasHighValueDataFromEuropeanCommissionList", "false"))
            .with_child(Element::leaf("hasResearchData", "false"))
            .with_child(Element::new("categories").with_child(Element::leaf("category", "ECON")))
            .with_child(resources_element)
            .with_child(
                Element::new("tags").with_child(
                    Element::leaf("tag", "Deweloper").with_attribute("lang", "pl"),
                ),
            )
    }

    /// 公開日のリソース要素
    pub fn resource_element(&self, date: &PublicationDate) -> Element {
        let name = &self.config().developer_name;
        let ident = self.resource_ident(date);
        debug!(%ident, "Creating resource");

        Element::new("resource")
            .with_attribute("status", "published")
            .with_child(Element::leaf("extIdent", ident))
            .with_child(Element::leaf("url", self.resolver.public_url(date)))
            .with_child(bilingual(
                "title",
                format!("Ceny ofertowe mieszkań dewelopera {} {}", name, date),
                format!("Offer prices for developer's apartments {} {}", name, date),
            ))
            .with_child(bilingual(
                "description",
                format!(
                    "Dane dotyczące cen ofertowych mieszkań dewelopera {} udostępnione {} zgodnie z {}",
                    name, date, STATUTE
                ),
                format!(
                    "Data on offer prices of apartments of the developer {} made available {} \
                     in accordance with {}",
                    name, date, STATUTE
                ),
            ))
            .with_child(Element::leaf("availability", "local"))
            .with_child(Element::leaf("dataDate", date.to_string()))
            .with_child(Element::new("specialSigns").with_child(Element::leaf("specialSign", "X")))
            .with_child(Element::leaf("hasDynamicData", "false"))
            .with_child(Element::leaf("hasHighValueData", "true"))
            .with_child(Element::leaf("hasHighValueDataFromEuropeanCommissionList", "false"))
            .with_child(Element::leaf("hasResearchData", "false"))
            .with_child(Element::leaf("containsProtectedData", "false"))
    }

    /// 再構築モード: 日付の一覧から文書全体を生成する
    ///
    /// リソースは`dates`の順に並びます（検出結果は昇順）。既存の文書は参照しません。
    pub fn rebuild(&self, dates: &[PublicationDate], year: i32) -> Element {
        info!(resources = dates.len(), year, "Building catalog");
        let resources = dates.iter().map(|d| self.resource_element(d)).collect();
        self.root_element()
            .with_child(self.dataset_element(year, resources))
    }

    /// マージモード: 既存の文書に公開日のリソースを追加する
    ///
    /// 1. 文書がなければルートを生成
    /// 2. 指定年の識別子を持つデータセットを検索し、なければリソース0件で追加
    /// 3. リソース識別子で既存リソースを検索し、なければ末尾に追加
    pub fn merge(
        &self,
        existing: Option<Element>,
        date: &PublicationDate,
        year: i32,
    ) -> (Element, MergeOutcome) {
        let mut root = existing.unwrap_or_else(|| self.root_element());
        let dataset_ident = self.config().dataset_ident(year);

        let position = root
            .children
            .iter()
            .position(|c| c.name == "dataset" && c.child_text("extIdent") == Some(dataset_ident.as_str()));
        let position = match position {
            Some(position) => position,
            None => {
                debug!(ident = %dataset_ident, "Dataset not found, creating it");
                root.push(self.dataset_element(year, Vec::new()));
                root.children.len() - 1
            }
        };

        let dataset = &mut root.children[position];
        let resources = resources_of(dataset);
        let snapshot = std::mem::take(&mut resources.children);
        let (updated, outcome) = insert_resource(&snapshot, self.resource_element(date));
        resources.children = updated;

        match outcome {
            MergeOutcome::Inserted => info!(%date, "Resource inserted"),
            MergeOutcome::AlreadyPresent => info!(%date, "Resource already present"),
        }

        (root, outcome)
    }
}

/// データセットの`resources`要素（なければ`tags`の前に作成）
fn resources_of(dataset: &mut Element) -> &mut Element {
    let index = match dataset.children.iter().position(|c| c.name == "resources") {
        Some(index) => index,
        None => {
            let index = dataset
                .children
                .iter()
                .position(|c| c.name == "tags")
                .unwrap_or(dataset.children.len());
            dataset.children.insert(index, Element::new("resources"));
            index
        }
    };
    &mut dataset.children[index]
}

/// `<polish>`と`<english>`を持つ要素
fn bilingual(name: &str, polish: String, english: String) -> Element {
    Element::new(name)
        .with_child(Element::leaf("polish", polish))
        .with_child(Element::leaf("english", english))
}

/// 文書内のリソースの公開日（`dataDate`）を出現順に列挙する
pub fn resource_dates(root: &Element) -> Vec<String> {
    root.children_named("dataset")
        .filter_map(|d| d.child("resources"))
        .flat_map(|r| r.children_named("resource"))
        .filter_map(|r| r.child_text("dataDate").map(str::to_string))
        .collect()
}
