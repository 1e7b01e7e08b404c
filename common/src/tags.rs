// Sector Tag Vocabulary
// Fixed tag set shared by markets and congressional disclosures

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Sector / topic tag. Markets and trades are matched by set intersection
/// over this vocabulary, never by free-text overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorTag {
    Technology,
    Finance,
    Defense,
    Healthcare,
    Energy,
    Crypto,
    MonetaryPolicy,
    TradePolicy,
    Legislation,
    Elections,
}

/// Keyword table used by `SectorTag::classify`. Keywords are matched as whole
/// words (or whole word sequences) against normalized text.
const KEYWORDS: &[(SectorTag, &[&str])] = &[
    (
        SectorTag::Technology,
        &[
            "tech", "technology", "apple", "google", "alphabet", "microsoft", "meta", "amazon",
            "nvidia", "antitrust", "privacy", "semiconductor", "semiconductors",
        ],
    ),
    (
        SectorTag::Finance,
        &[
            "bank", "banks", "banking", "jpmorgan", "goldman", "morgan stanley", "wells fargo",
            "securities", "sec", "stock market",
        ],
    ),
    (
        SectorTag::Defense,
        &[
            "defense", "military", "pentagon", "war", "lockheed", "raytheon", "northrop",
            "boeing", "general dynamics", "nato",
        ],
    ),
    (
        SectorTag::Healthcare,
        &[
            "healthcare", "health", "medicare", "medicaid", "drug", "drugs", "pharma", "pfizer",
            "moderna", "merck", "eli lilly", "fda",
        ],
    ),
    (
        SectorTag::Energy,
        &["energy", "oil", "gas", "exxon", "chevron", "conocophillips", "schlumberger", "opec"],
    ),
    (
        SectorTag::Crypto,
        &["crypto", "bitcoin", "btc", "ethereum", "eth", "stablecoin", "coinbase"],
    ),
    (
        SectorTag::MonetaryPolicy,
        &[
            "fed", "federal reserve", "interest", "rate", "rates", "monetary", "inflation",
            "fomc",
        ],
    ),
    (
        SectorTag::TradePolicy,
        &[
            "tariff", "tariffs", "import", "imports", "export", "exports", "trade deal",
            "trade war",
        ],
    ),
    (
        SectorTag::Legislation,
        &["congress", "bill", "legislation", "law", "senate", "house", "act"],
    ),
    (
        SectorTag::Elections,
        &[
            "election", "president", "presidential", "nominee", "primary", "vote", "electoral",
            "governor",
        ],
    ),
];

impl SectorTag {
    pub const ALL: [SectorTag; 10] = [
        SectorTag::Technology,
        SectorTag::Finance,
        SectorTag::Defense,
        SectorTag::Healthcare,
        SectorTag::Energy,
        SectorTag::Crypto,
        SectorTag::MonetaryPolicy,
        SectorTag::TradePolicy,
        SectorTag::Legislation,
        SectorTag::Elections,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectorTag::Technology => "technology",
            SectorTag::Finance => "finance",
            SectorTag::Defense => "defense",
            SectorTag::Healthcare => "healthcare",
            SectorTag::Energy => "energy",
            SectorTag::Crypto => "crypto",
            SectorTag::MonetaryPolicy => "monetary_policy",
            SectorTag::TradePolicy => "trade_policy",
            SectorTag::Legislation => "legislation",
            SectorTag::Elections => "elections",
        }
    }

    /// Derive tags from free text (market question, category, asset description).
    pub fn classify(text: &str) -> BTreeSet<SectorTag> {
        let normalized = normalize(text);
        KEYWORDS
            .iter()
            .filter(|(_, words)| {
                words
                    .iter()
                    .any(|word| normalized.contains(&format!(" {} ", word)))
            })
            .map(|(tag, _)| *tag)
            .collect()
    }
}

/// Lowercase, replace punctuation with spaces, collapse runs, pad both ends.
fn normalize(text: &str) -> String {
    let lowered: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} ", joined)
}

impl fmt::Display for SectorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectorTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SectorTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted)
            .ok_or(ValidationError::UnknownTag(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_question() {
        let tags = SectorTag::classify("Will the Fed cut interest rates in March?");
        assert!(tags.contains(&SectorTag::MonetaryPolicy));
        assert!(!tags.contains(&SectorTag::Defense));
    }

    #[test]
    fn test_classify_matches_whole_words_only() {
        // "metal" must not match "meta", "warrant" must not match "war"
        let tags = SectorTag::classify("Metal warrants outstanding");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_classify_multi_word_keyword() {
        let tags = SectorTag::classify("MORGAN STANLEY (common stock)");
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec![SectorTag::Finance]);
    }

    #[test]
    fn test_from_str_round_trip() {
        for tag in SectorTag::ALL {
            assert_eq!(tag.as_str().parse::<SectorTag>().unwrap(), tag);
        }
        assert!("weather".parse::<SectorTag>().is_err());
    }
}
