//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;

use crate::store::DictionaryStore;
use crate::types::Locale;

/// ワークスペース内にファイルを作成する（親ディレクトリも作成）
///
/// # Returns
/// 作成したファイルの絶対パス
pub(crate) fn write_workspace_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// `<root>/locales/<code>.json` に辞書を書き出す
pub(crate) fn write_dictionary(root: &Path, locale: Locale, document: &Value) -> PathBuf {
    write_workspace_file(root, &format!("locales/{}.json", locale.code()), &document.to_string())
}

/// テスト用の DictionaryStore を作成する
///
/// # Arguments
/// * `documents` - ロケールと辞書 JSON の組。先頭がデフォルトロケール
pub(crate) fn create_store(documents: &[(Locale, Value)]) -> DictionaryStore {
    let default_locale = documents.first().map_or(Locale::default(), |(locale, _)| *locale);
    DictionaryStore::from_documents(default_locale, documents.iter().cloned()).unwrap()
}
