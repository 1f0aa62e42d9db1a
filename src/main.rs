use anyhow::Context;
use clap::Parser;
use ecosort::{cli, config, error, logging, scanner, server};
use cli::{Cli, Commands};
use config::Config;
use ecosort_common::{
    validate_image, validate_text, ClassificationResult, ClassifyImageRequest, ClassifyTextRequest,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Serve { host, port, seed, keywords } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if seed.is_some() {
                config.rng_seed = seed;
            }
            if keywords.is_some() {
                config.keywords_path = keywords;
            }

            println!("♻️  ecosort - APIサーバー起動: http://{}\n", config.bind_addr());
            server::serve(&config).await.context("サーバーが異常終了しました")?;
        }

        Commands::ClassifyText { text, json } => {
            let request = ClassifyTextRequest { text };
            validate_text(&request)?;

            let classifier = config.classifier()?;
            let result = classifier.classify_text(&request.text);
            print_result(&result, json)?;
        }

        Commands::ClassifyImage { file, seed, json } => {
            let image = scanner::ImageInfo::from_path(&file)?;
            let request = ClassifyImageRequest {
                filename: image.file_name,
                size: image.size,
                mimetype: image.mimetype,
            };
            validate_image(&request)?;

            let classifier = config.classifier()?;
            let result = match seed.or(config.rng_seed) {
                Some(seed) => classifier.classify_image(
                    &request.filename,
                    request.size,
                    &request.mimetype,
                    &mut StdRng::seed_from_u64(seed),
                ),
                None => classifier.classify_image(
                    &request.filename,
                    request.size,
                    &request.mimetype,
                    &mut rand::thread_rng(),
                ),
            };
            print_result(&result, json)?;
        }

        Commands::Scan { folder, output, recursive, seed } => {
            println!("♻️  ecosort - 一括分類\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            println!("✔ {}枚の画像を検出\n", images.len());

            if images.is_empty() {
                return Err(error::EcoSortError::NoImagesFound(folder.display().to_string()).into());
            }

            // 2. 分類
            println!("[2/3] 分類中...");
            let classifier = config.classifier()?;
            let records = scanner::classify_images(&classifier, &images, seed.or(config.rng_seed), true);
            println!("✔ 分類完了\n");

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join("classification.json"));
            let json = serde_json::to_string_pretty(&records)?;
            std::fs::write(&output, json)
                .with_context(|| format!("書き込みに失敗: {}", output.display()))?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Config { set_port, set_host, set_keywords, show } => {
            let mut config = config;

            if let Some(port) = set_port {
                config.set_port(port)?;
                println!("✔ ポートを設定しました: {}", port);
            }

            if let Some(host) = set_host {
                config.set_host(host)?;
                println!("✔ ホストを設定しました: {}", config.host);
            }

            if let Some(path) = set_keywords {
                config.set_keywords_path(path)?;
                println!("✔ キーワードファイルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ホスト: {}", config.host);
                println!("  ポート: {}", config.port);
                println!(
                    "  乱数シード: {}",
                    config.rng_seed.map(|s| s.to_string()).unwrap_or_else(|| "未設定".into())
                );
                println!(
                    "  キーワード: {}",
                    config
                        .keywords_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
            }
        }
    }

    Ok(())
}

fn print_result(result: &ClassificationResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("分類: {}", result.label);
        println!("信頼度: {:.0}%", result.confidence * 100.0);
        println!("ヒント: {}", result.tip);
    }
    Ok(())
}
