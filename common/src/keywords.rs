//! キーワードテーブル
//!
//! カテゴリごとの部分一致キーワード。組み込みテーブルはプロセス全体で
//! 一度だけ初期化され、以後は読み取り専用。JSONファイルで差し替え可能。

use crate::error::{Error, Result};
use crate::types::Category;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

const RECYCLABLE: &[&str] = &[
    "plastic", "bottle", "can", "aluminum", "paper", "cardboard",
    "glass", "newspaper", "magazine", "metal", "tin", "steel",
    "container", "jar", "box", "packaging", "wrapper", "bag",
    "cup", "plate", "tray", "carton", "tube", "foil",
];

const BIODEGRADABLE: &[&str] = &[
    "banana", "apple", "orange", "fruit", "vegetable", "food",
    "organic", "compost", "leaf", "wood", "branch", "plant",
    "peel", "core", "scrap", "leftover", "garden", "yard",
    "flower", "grass", "tree", "seed", "shell", "bone",
];

const HAZARDOUS: &[&str] = &[
    "battery", "electronic", "chemical", "paint", "oil", "toxic",
    "medical", "needle", "syringe", "medicine", "drug", "acid",
    "cleaning", "detergent", "bleach", "pesticide", "solvent",
    "fluorescent", "bulb", "thermometer", "asbestos",
];

lazy_static! {
    static ref DEFAULT_TABLE: KeywordTable = KeywordTable::builtin();
}

/// カテゴリ → キーワード（小文字）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub recyclable: Vec<String>,
    pub biodegradable: Vec<String>,
    pub hazardous: Vec<String>,
}

impl KeywordTable {
    /// 組み込みテーブル
    pub fn builtin() -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            recyclable: owned(RECYCLABLE),
            biodegradable: owned(BIODEGRADABLE),
            hazardous: owned(HAZARDOUS),
        }
    }

    /// 共有インスタンス
    pub fn default_table() -> &'static KeywordTable {
        &DEFAULT_TABLE
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み（正規化と検証つき）
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.normalized().validated()
    }

    pub fn keywords(&self, category: Category) -> &[String] {
        match category {
            Category::Recyclable => &self.recyclable,
            Category::Biodegradable => &self.biodegradable,
            Category::Hazardous => &self.hazardous,
        }
    }

    /// 優先順位順に (カテゴリ, キーワード) を列挙
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        Category::ALL.into_iter().map(move |c| (c, self.keywords(c)))
    }

    /// 最初に部分一致したカテゴリ
    ///
    /// `haystack` は小文字化済みであること。
    pub fn first_match(&self, haystack: &str) -> Option<Category> {
        self.iter()
            .find(|(_, words)| words.iter().any(|w| haystack.contains(w.as_str())))
            .map(|(category, _)| category)
    }

    /// 空白除去・小文字化・空キーワード除外
    fn normalized(self) -> Self {
        let normalize = |words: Vec<String>| -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            recyclable: normalize(self.recyclable),
            biodegradable: normalize(self.biodegradable),
            hazardous: normalize(self.hazardous),
        }
    }

    fn validated(self) -> Result<Self> {
        if let Some((category, _)) = self.iter().find(|(_, words)| words.is_empty()) {
            return Err(Error::Config(format!("{} has no keywords", category)));
        }
        Ok(self)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}
