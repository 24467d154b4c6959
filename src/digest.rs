//! Digest Module
//!
//! シリアライズ済みXMLのMD5ダイジェストを計算する。

use md5::{Digest, Md5};

/// バイト列のMD5ダイジェスト（小文字16進数、32文字）
pub fn md5_hex(content: &[u8]) -> String {
    format!("{:x}", Md5::digest(content))
}
