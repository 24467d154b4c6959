//! File Writer Module
//!
//! シリアライズ済みXMLとそのMD5ダイジェストをディスクに書き出すモジュール。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::digest::md5_hex;
use crate::error::CatalogError;

/// 書き出したファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub xml_path: PathBuf,
    pub md5_path: PathBuf,
    /// XMLのMD5ダイジェスト（小文字16進数）
    pub digest: String,
}

/// XMLとMD5を書き出す
///
/// XMLは変換せずにバイト列のまま、MD5はダイジェスト文字列のみ（末尾改行なし）を
/// UTF-8で書き込みます。親ディレクトリ（前年分アーカイブの`history/`など）が
/// 存在しない場合は作成します。
pub fn write_catalog(
    xml: &[u8],
    xml_path: &Path,
    md5_path: &Path,
) -> Result<WrittenFiles, CatalogError> {
    for path in [xml_path, md5_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(xml_path, xml)?;
    info!(path = %xml_path.display(), bytes = xml.len(), "Wrote XML");

    let digest = md5_hex(xml);
    fs::write(md5_path, digest.as_bytes())?;
    info!(path = %md5_path.display(), %digest, "Wrote MD5");

    Ok(WrittenFiles {
        xml_path: xml_path.to_path_buf(),
        md5_path: md5_path.to_path_buf(),
        digest,
    })
}
