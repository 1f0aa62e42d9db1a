//! 分類結果の型定義
//!
//! CLIとHTTP APIで共有される型:
//! - Category: 分別カテゴリ（閉じた列挙）
//! - ClassifyTextRequest / ClassifyImageRequest: 入力
//! - ClassificationResult: 出力

use serde::{Deserialize, Serialize};
use std::fmt;

/// 分別カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Recyclable,
    Biodegradable,
    Hazardous,
}

impl Category {
    /// 宣言順 = 同点時の優先順位
    pub const ALL: [Category; 3] = [
        Category::Recyclable,
        Category::Biodegradable,
        Category::Hazardous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Recyclable => "recyclable",
            Category::Biodegradable => "biodegradable",
            Category::Hazardous => "hazardous",
        }
    }

    /// 分別方法のヒント
    pub fn tip(&self) -> &'static str {
        crate::tips::tip_for(*self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// テキスト分類の入力
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyTextRequest {
    pub text: String,
}

/// 画像分類の入力（アップロード後のメタデータ）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyImageRequest {
    pub filename: String,
    pub size: u64,
    pub mimetype: String,
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: Category,
    /// 0.0〜1.0（較正された確率ではない）
    pub confidence: f64,
    pub tip: String,
}

impl ClassificationResult {
    pub fn new(label: Category, confidence: f64) -> Self {
        Self {
            label,
            confidence,
            tip: label.tip().to_string(),
        }
    }
}
