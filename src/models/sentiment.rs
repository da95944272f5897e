use serde::{Deserialize, Serialize};

/// Headline sentiment from a single news source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewsSentiment {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub headline_count: u32,
    #[serde(default)]
    pub avg_sentiment: f64,
    #[serde(default)]
    pub headlines: Vec<String>,
    #[serde(default)]
    pub source: String,
}

/// Mention sentiment from a social source (StockTwits, Reddit)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SocialSentiment {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub mention_count: u32,
    #[serde(default)]
    pub avg_sentiment: f64,
    pub bullish: Option<u32>,
    pub bearish: Option<u32>,
    #[serde(default)]
    pub top_posts: Vec<String>,
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SentimentDetail {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub news: NewsSentiment,
    pub news_secondary: Option<NewsSentiment>,
    pub social: Option<SocialSentiment>,
}

impl SentimentDetail {
    /// Social block only when it actually carries mentions; the server sends
    /// an empty placeholder when every social source was unavailable.
    pub fn active_social(&self) -> Option<&SocialSentiment> {
        self.social.as_ref().filter(|s| s.mention_count > 0)
    }

    pub fn has_news(&self) -> bool {
        self.news.headline_count > 0
    }
}
