//! キーワード分類器
//!
//! - テキスト: カテゴリごとに一致したキーワード数で採点（決定的）
//! - 画像: ファイル名のキーワード一致、なければ重み付き乱択
//!
//! 画像の中身は一切見ない。乱数源は呼び出し側から注入する。

use crate::keywords::KeywordTable;
use crate::types::{Category, ClassificationResult};
use lazy_static::lazy_static;
use rand::Rng;

/// 一致なしのときの信頼度
pub const FALLBACK_CONFIDENCE: f64 = 0.30;
pub const BASE_CONFIDENCE: f64 = 0.60;
pub const CONFIDENCE_PER_MATCH: f64 = 0.10;
pub const MAX_CONFIDENCE: f64 = 0.95;

/// 画像判定の信頼度の範囲
pub const IMAGE_CONFIDENCE_MIN: f64 = 0.70;
pub const IMAGE_CONFIDENCE_MAX: f64 = 0.95;

/// キーワード不一致時の重み（Category::ALL順）
pub const FALLBACK_WEIGHTS: [(Category, f64); 3] = [
    (Category::Recyclable, 0.6),
    (Category::Biodegradable, 0.3),
    (Category::Hazardous, 0.1),
];

lazy_static! {
    static ref DEFAULT_CLASSIFIER: Classifier = Classifier::default();
}

/// 1回の分類で使うカテゴリ別スコア
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub recyclable: u32,
    pub biodegradable: u32,
    pub hazardous: u32,
}

impl Scores {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Recyclable => self.recyclable,
            Category::Biodegradable => self.biodegradable,
            Category::Hazardous => self.hazardous,
        }
    }

    fn increment(&mut self, category: Category) {
        match category {
            Category::Recyclable => self.recyclable += 1,
            Category::Biodegradable => self.biodegradable += 1,
            Category::Hazardous => self.hazardous += 1,
        }
    }

    /// 最高スコアのカテゴリ。同点は優先順位が先の方。全て0ならNone
    pub fn winner(&self) -> Option<(Category, u32)> {
        let mut best: Option<(Category, u32)> = None;
        for category in Category::ALL {
            let score = self.get(category);
            if score == 0 {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((category, score)),
            }
        }
        best
    }
}

/// キーワードテーブルを保持する分類器
#[derive(Debug, Clone)]
pub struct Classifier {
    table: KeywordTable,
}

impl Classifier {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// カテゴリごとの一致キーワード数（同じキーワードの重複は1回）
    pub fn score(&self, text: &str) -> Scores {
        let lower = text.to_lowercase();
        let mut scores = Scores::default();

        for (category, words) in self.table.iter() {
            for word in words {
                if lower.contains(word.as_str()) {
                    scores.increment(category);
                }
            }
        }

        scores
    }

    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        self.classify_text_with_scores(text).1
    }

    /// 分類結果と、その元になったスコア（採点は1回だけ）
    pub fn classify_text_with_scores(&self, text: &str) -> (Scores, ClassificationResult) {
        let scores = self.score(text);
        let result = match scores.winner() {
            Some((category, max_score)) => {
                let confidence =
                    (BASE_CONFIDENCE + CONFIDENCE_PER_MATCH * max_score as f64).min(MAX_CONFIDENCE);
                ClassificationResult::new(category, round2(confidence))
            }
            None => ClassificationResult::new(Category::Recyclable, FALLBACK_CONFIDENCE),
        };
        (scores, result)
    }

    /// ファイル名から判定。`size`と`mimetype`は判定に使わない
    pub fn classify_image<R: Rng>(
        &self,
        filename: &str,
        _size: u64,
        _mimetype: &str,
        rng: &mut R,
    ) -> ClassificationResult {
        let lower = filename.to_lowercase();

        let category = match self.table.first_match(&lower) {
            Some(category) => category,
            None => weighted_pick(rng),
        };

        ClassificationResult::new(category, random_confidence(rng))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(KeywordTable::default_table().clone())
    }
}

/// 組み込みテーブルでテキスト分類
pub fn classify_text(text: &str) -> ClassificationResult {
    default_classifier().classify_text(text)
}

/// 組み込みテーブル + スレッドローカル乱数で画像分類
pub fn classify_image(filename: &str, size: u64, mimetype: &str) -> ClassificationResult {
    default_classifier().classify_image(filename, size, mimetype, &mut rand::thread_rng())
}

fn default_classifier() -> &'static Classifier {
    &DEFAULT_CLASSIFIER
}

fn weighted_pick<R: Rng>(rng: &mut R) -> Category {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;

    for (category, weight) in FALLBACK_WEIGHTS {
        cumulative += weight;
        if roll <= cumulative {
            return category;
        }
    }

    // 浮動小数の誤差で合計が1未満になった場合
    Category::Recyclable
}

fn random_confidence<R: Rng>(rng: &mut R) -> f64 {
    round2(rng.gen_range(IMAGE_CONFIDENCE_MIN..=IMAGE_CONFIDENCE_MAX))
}

/// 小数点以下2桁に丸める
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classifier() -> Classifier {
        Classifier::default()
    }

    #[test]
    fn test_no_match_falls_back() {
        let result = classify_text("xyz qwerty");
        assert_eq!(result.label, Category::Recyclable);
        assert_eq!(result.confidence, 0.30);
        assert_eq!(result.tip, Category::Recyclable.tip());
    }

    #[test]
    fn test_plastic_bottle() {
        let result = classify_text("plastic bottle");
        assert_eq!(result.label, Category::Recyclable);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn test_banana_peel() {
        let result = classify_text("banana peel");
        assert_eq!(result.label, Category::Biodegradable);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn test_old_battery() {
        let result = classify_text("old battery");
        assert_eq!(result.label, Category::Hazardous);
        assert_eq!(result.confidence, 0.70);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_text("OLD BATTERY").label, Category::Hazardous);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let scores = classifier().score("battery battery battery");
        assert_eq!(scores.hazardous, 1);
        assert_eq!(classify_text("battery battery battery").confidence, 0.70);
    }

    #[test]
    fn test_confidence_capped() {
        let text = "plastic bottle paper cardboard glass newspaper magazine metal";
        let result = classify_text(text);
        assert_eq!(result.label, Category::Recyclable);
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_tie_goes_to_declared_order() {
        // recyclable: plastic / hazardous: battery
        let scores = classifier().score("plastic battery");
        assert_eq!(scores.recyclable, 1);
        assert_eq!(scores.hazardous, 1);
        assert_eq!(classify_text("plastic battery").label, Category::Recyclable);

        // biodegradable: banana / hazardous: paint
        assert_eq!(classify_text("banana paint").label, Category::Biodegradable);
    }

    #[test]
    fn test_higher_score_beats_order() {
        // hazardous 2 (battery, acid) > recyclable 1 (plastic)
        let result = classify_text("plastic battery acid");
        assert_eq!(result.label, Category::Hazardous);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn test_classify_text_with_scores() {
        let (scores, result) = classifier().classify_text_with_scores("plastic battery acid");
        assert_eq!(scores, Scores { recyclable: 1, biodegradable: 0, hazardous: 2 });
        assert_eq!(result, classify_text("plastic battery acid"));

        let (scores, result) = classifier().classify_text_with_scores("xyz");
        assert_eq!(scores, Scores::default());
        assert_eq!(result.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_scores_winner() {
        assert_eq!(Scores::default().winner(), None);
        let scores = Scores { recyclable: 1, biodegradable: 3, hazardous: 3 };
        assert_eq!(scores.winner(), Some((Category::Biodegradable, 3)));
    }

    #[test]
    fn test_text_confidence_range() {
        let inputs = ["", "tin", "tin can jar", "food peel core seed shell bone tree", "hello"];
        for input in inputs {
            let c = classify_text(input).confidence;
            assert!((0.30..=0.95).contains(&c), "{} => {}", input, c);
        }
    }

    #[test]
    fn test_text_deterministic() {
        let a = classify_text("glass jar with food scraps");
        let b = classify_text("glass jar with food scraps");
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_keyword_short_circuits() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let result = classifier().classify_image("battery_pack.jpg", 1024, "image/jpeg", &mut rng);
            assert_eq!(result.label, Category::Hazardous);
            assert!((0.70..=0.95).contains(&result.confidence));
        }
    }

    #[test]
    fn test_image_thread_rng() {
        let result = classify_image("battery_pack.jpg", 1024, "image/jpeg");
        assert_eq!(result.label, Category::Hazardous);
        assert!((0.70..=0.95).contains(&result.confidence));
    }

    #[test]
    fn test_image_seeded_reproducible() {
        let c = classifier();
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let a = c.classify_image("IMG_0001.jpg", 2048, "image/jpeg", &mut rng1);
            let b = c.classify_image("IMG_0001.jpg", 2048, "image/jpeg", &mut rng2);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_image_fallback_distribution() {
        let c = classifier();
        let mut rng = StdRng::seed_from_u64(1234);
        let mut counts = [0usize; 3];
        for _ in 0..2000 {
            let result = c.classify_image("IMG_0001.jpg", 2048, "image/jpeg", &mut rng);
            assert!((0.70..=0.95).contains(&result.confidence));
            let idx = Category::ALL.iter().position(|&x| x == result.label).unwrap();
            counts[idx] += 1;
        }
        // 重み 0.6 / 0.3 / 0.1 に概ね従う
        assert!(counts[0] > counts[1]);
        assert!(counts[1] > counts[2]);
        assert!(counts[2] > 0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.6 + 0.1 * 2.0), 0.8);
        assert_eq!(round2(0.734), 0.73);
    }
}
