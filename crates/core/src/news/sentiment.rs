use serde::{Deserialize, Serialize};

/// Score given to text with no keyword matches.
pub const NEUTRAL_SCORE: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// 0 (all negative) to 100 (all positive)
    pub score: f64,
}

/// Keyword lists and label cut-offs for headline scoring.
#[derive(Clone, Debug)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// Scores above this are positive
    pub positive_above: f64,
    /// Scores below this are negative
    pub negative_below: f64,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        let words = |list: &[&str]| -> Vec<String> { list.iter().map(|w| w.to_string()).collect() };
        Self {
            positive: words(&[
                "gain", "rise", "up", "bull", "growth", "profit", "surge", "rally", "boost",
                "strong", "beat", "exceed", "outperform",
            ]),
            negative: words(&[
                "fall", "drop", "down", "bear", "loss", "decline", "crash", "plunge", "weak",
                "miss", "underperform", "concern",
            ]),
            positive_above: 60.0,
            negative_below: 40.0,
        }
    }
}

impl SentimentLexicon {
    /// Score lower-cased whitespace tokens. A token counts once per side when
    /// it contains any keyword of that side, so "upside-down" counts on both.
    pub fn score(&self, text: &str) -> Sentiment {
        let lowered = text.to_lowercase();
        let (mut positive, mut negative) = (0u32, 0u32);
        for token in lowered.split_whitespace() {
            if self.positive.iter().any(|k| token.contains(k.as_str())) {
                positive += 1;
            }
            if self.negative.iter().any(|k| token.contains(k.as_str())) {
                negative += 1;
            }
        }

        let total = positive + negative;
        if total == 0 {
            return Sentiment {
                label: SentimentLabel::Neutral,
                score: NEUTRAL_SCORE,
            };
        }

        let score = f64::from(positive) / f64::from(total) * 100.0;
        Sentiment {
            label: self.label(score),
            score,
        }
    }

    pub fn label(&self, score: f64) -> SentimentLabel {
        if score > self.positive_above {
            SentimentLabel::Positive
        } else if score < self.negative_below {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}
