//! 一括分類
//!
//! rayonで並列に分類する。シード指定時は画像ごとに`seed + index`で
//! 乱数を初期化するため、スレッドの実行順に関係なく結果が再現する。

use super::ImageInfo;
use ecosort_common::{ClassificationResult, Classifier};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub file_name: String,
    pub path: String,
    #[serde(flatten)]
    pub result: ClassificationResult,
}

pub fn classify_images(
    classifier: &Classifier,
    images: &[ImageInfo],
    seed: Option<u64>,
    show_progress: bool,
) -> Vec<ScanRecord> {
    let progress = if show_progress {
        let bar = ProgressBar::new(images.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("  [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let records: Vec<ScanRecord> = images
        .par_iter()
        .enumerate()
        .map(|(index, image)| {
            let result = match seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                    classifier.classify_image(&image.file_name, image.size, &image.mimetype, &mut rng)
                }
                None => classifier.classify_image(
                    &image.file_name,
                    image.size,
                    &image.mimetype,
                    &mut rand::thread_rng(),
                ),
            };

            tracing::debug!(
                file = %image.file_name,
                label = %result.label,
                confidence = result.confidence,
                "分類"
            );
            progress.inc(1);

            ScanRecord {
                file_name: image.file_name.clone(),
                path: image.path.display().to_string(),
                result,
            }
        })
        .collect();

    progress.finish_and_clear();
    records
}
