use livetools_market_data::{FeedSource, NewsCategory};

const SOURCES: [(&str, &str, NewsCategory); 25] = [
    ("MarketWatch", "https://www.marketwatch.com/rss/topstories", NewsCategory::Market),
    ("Yahoo Finance", "https://feeds.finance.yahoo.com/rss/2.0/headline", NewsCategory::Market),
    ("Seeking Alpha", "https://seekingalpha.com/market_currents.xml", NewsCategory::Market),
    ("The Motley Fool", "https://www.fool.com/feeds/index.aspx", NewsCategory::Market),
    ("Benzinga", "https://www.benzinga.com/feed", NewsCategory::Market),
    ("CoinDesk", "https://www.coindesk.com/arc/outboundfeeds/rss/", NewsCategory::Crypto),
    ("Cointelegraph", "https://cointelegraph.com/rss", NewsCategory::Crypto),
    ("CryptoSlate", "https://cryptoslate.com/feed/", NewsCategory::Crypto),
    ("Decrypt", "https://decrypt.co/feed", NewsCategory::Crypto),
    ("The Block", "https://www.theblockcrypto.com/rss.xml", NewsCategory::Crypto),
    ("Reuters Business", "https://feeds.reuters.com/reuters/businessNews", NewsCategory::Economy),
    ("Bloomberg Economics", "https://feeds.bloomberg.com/economics/news.rss", NewsCategory::Economy),
    ("Financial Times", "https://www.ft.com/rss/home/us", NewsCategory::Economy),
    ("Wall Street Journal", "https://feeds.a.dj.com/rss/RSSMarketsMain.xml", NewsCategory::Economy),
    ("CNBC Economics", "https://www.cnbc.com/id/20910258/device/rss/rss.html", NewsCategory::Economy),
    ("Earnings Whispers", "https://www.earningswhispers.com/rss/earnings", NewsCategory::Earnings),
    ("Zacks Earnings", "https://www.zacks.com/rss/earnings.xml", NewsCategory::Earnings),
    ("StreetInsider Earnings", "https://www.streetinsider.com/rss_earnings.php", NewsCategory::Earnings),
    ("TheStreet Earnings", "https://www.thestreet.com/rss/earnings", NewsCategory::Earnings),
    ("Investor's Business Daily", "https://www.investors.com/feed/", NewsCategory::Earnings),
    ("Reuters World", "https://feeds.reuters.com/Reuters/worldNews", NewsCategory::Geopolitical),
    ("BBC World", "http://feeds.bbci.co.uk/news/world/rss.xml", NewsCategory::Geopolitical),
    ("Associated Press", "https://feeds.apnews.com/rss/apf-topnews", NewsCategory::Geopolitical),
    ("Foreign Affairs", "https://www.foreignaffairs.com/rss.xml", NewsCategory::Geopolitical),
    ("Politico", "https://www.politico.com/rss/politicopicks.xml", NewsCategory::Geopolitical),
];

/// The RSS sources polled by the news service, five per category.
pub fn default_sources() -> Vec<FeedSource> {
    SOURCES
        .iter()
        .map(|(name, url, category)| FeedSource::new(*name, *url, *category))
        .collect()
}
