use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ecosort")]
#[command(about = "キーワード判定によるごみ分別API・CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTP APIサーバーを起動
    Serve {
        /// 待ち受けホスト（設定ファイルより優先）
        #[arg(long)]
        host: Option<String>,

        /// 待ち受けポート
        #[arg(short, long)]
        port: Option<u16>,

        /// 画像判定の乱数シード
        #[arg(long)]
        seed: Option<u64>,

        /// カスタムキーワードJSONファイル
        #[arg(short, long)]
        keywords: Option<PathBuf>,
    },

    /// 説明文から分類
    ClassifyText {
        /// ごみの説明（1〜500文字）
        #[arg(required = true)]
        text: String,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 画像ファイル名から分類（画像の中身は解析しない）
    ClassifyImage {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 乱数シード
        #[arg(long)]
        seed: Option<u64>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// フォルダ内の画像を一括分類してJSONを出力
    Scan {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力JSONファイル（デフォルト: 入力フォルダ/classification.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 乱数シード（指定すると結果が再現可能）
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 設定を表示/編集
    Config {
        /// ポートを設定
        #[arg(long)]
        set_port: Option<u16>,

        /// ホストを設定
        #[arg(long)]
        set_host: Option<String>,

        /// キーワードJSONファイルを設定
        #[arg(long)]
        set_keywords: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
