use crate::error::{EcoSortError, Result};
use ecosort_common::{Classifier, KeywordTable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// 画像判定の乱数シード（未設定なら毎回ランダム）
    pub rng_seed: Option<u64>,
    /// カスタムキーワードテーブル（JSON）
    pub keywords_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            rng_seed: None,
            keywords_path: None,
        }
    }
}

impl Config {
    /// 設定ファイル → 環境変数の順に読み込む
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            debug!(path = %config_path.display(), "設定ファイルを読み込みました");
            config
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EcoSortError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ecosort").join("config.json"))
    }

    /// 環境変数で上書き（ECOSORT_HOST, ECOSORT_PORT/PORT, ECOSORT_SEED）
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ECOSORT_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("ECOSORT_PORT").or_else(|| lookup("PORT")) {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %port, "ポート番号が不正なため無視します"),
            }
        }

        if let Some(seed) = lookup("ECOSORT_SEED") {
            match seed.parse() {
                Ok(seed) => self.rng_seed = Some(seed),
                Err(_) => warn!(value = %seed, "乱数シードが不正なため無視します"),
            }
        }
    }

    pub fn set_port(&mut self, port: u16) -> Result<()> {
        self.port = port;
        self.save()
    }

    pub fn set_host(&mut self, host: String) -> Result<()> {
        self.host = host;
        self.save()
    }

    /// キーワードファイルを検証してから保存
    pub fn set_keywords_path(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(EcoSortError::FileNotFound(path.display().to_string()));
        }
        KeywordTable::from_file(&path)?;
        self.keywords_path = Some(path);
        self.save()
    }

    /// `keywords_path`があればそのテーブル、なければ組み込みテーブル
    pub fn classifier(&self) -> Result<Classifier> {
        match &self.keywords_path {
            Some(path) => {
                if !path.exists() {
                    return Err(EcoSortError::FileNotFound(path.display().to_string()));
                }
                let table = KeywordTable::from_file(path)?;
                Ok(Classifier::new(table))
            }
            None => Ok(Classifier::default()),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
