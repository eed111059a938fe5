//! TF-IDF text vectorization: lower-cased alphabetic tokens, English stop
//! words removed, unigrams + bigrams, document-frequency filtering, smoothed
//! idf, per-row L2 normalization.

use crate::config::VectorizerConfig;
use ndarray::Array2;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Standard English stop words (analyzer list).
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "cannot", "could", "did",
    "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it",
    "its", "itself", "just", "me", "more", "most", "my", "myself", "no",
    "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "upon", "very", "was",
    "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[a-zA-Z]{2,}").expect("token regex"))
}

/// Lower-cased alphabetic tokens of at least two characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    token_re()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| !stop_words().contains(t.as_str()))
        .collect()
}

/// Unigram and bigram terms of one document. Bigrams join adjacent surviving
/// tokens with a single space.
fn terms_of(text: &str) -> Vec<String> {
    let tokens = tokenize(text);
    let mut terms = Vec::with_capacity(tokens.len().saturating_mul(2));
    for w in tokens.windows(2) {
        terms.push(format!("{} {}", w[0], w[1]));
    }
    terms.extend(tokens);
    terms
}

/// Fitted vocabulary: selected terms (columns, alphabetical) and their
/// smoothed inverse document frequencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVocabulary {
    pub terms: Vec<String>,
    pub idf: Vec<f64>,
}

impl TfidfVocabulary {
    /// Build the vocabulary over a batch of documents. A batch where every
    /// term is filtered out yields an empty vocabulary, not an error.
    pub fn fit(docs: &[&str], config: &VectorizerConfig) -> Self {
        let n_docs = docs.len();
        let mut df: HashMap<String, usize> = HashMap::new();
        let mut corpus_tf: HashMap<String, usize> = HashMap::new();
        for doc in docs {
            let terms = terms_of(doc);
            let mut seen: HashSet<&str> = HashSet::new();
            for t in &terms {
                *corpus_tf.entry(t.clone()).or_insert(0) += 1;
                seen.insert(t.as_str());
            }
            for t in seen {
                *df.entry(t.to_string()).or_insert(0) += 1;
            }
        }

        let max_df_docs = config.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = df
            .into_iter()
            .filter(|(_, d)| *d >= config.min_df && (*d as f64) <= max_df_docs)
            .collect();

        // Rank by corpus-wide term frequency, ties alphabetical, keep the top
        // max_features; columns are then ordered alphabetically.
        kept.sort_by(|a, b| {
            corpus_tf[&b.0]
                .cmp(&corpus_tf[&a.0])
                .then_with(|| a.0.cmp(&b.0))
        });
        kept.truncate(config.max_features);
        kept.sort_by(|a, b| a.0.cmp(&b.0));

        let idf = kept
            .iter()
            .map(|(_, d)| ((1.0 + n_docs as f64) / (1.0 + *d as f64)).ln() + 1.0)
            .collect();
        let terms = kept.into_iter().map(|(t, _)| t).collect();
        Self { terms, idf }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dense `n_docs x K` block; each row with any nonzero entry is
    /// L2-normalized to unit norm. K = 0 yields a zero-width block.
    pub fn transform(&self, docs: &[&str]) -> Array2<f64> {
        let index: HashMap<&str, usize> = self
            .terms
            .iter()
            .enumerate()
            .map(|(j, t)| (t.as_str(), j))
            .collect();
        let mut m = Array2::zeros((docs.len(), self.terms.len()));
        if self.terms.is_empty() {
            return m;
        }
        for (i, doc) in docs.iter().enumerate() {
            for t in terms_of(doc) {
                if let Some(&j) = index.get(t.as_str()) {
                    // tf accumulates one idf weight per occurrence
                    m[[i, j]] += self.idf[j];
                }
            }
            let mut row = m.row_mut(i);
            let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> VectorizerConfig {
        VectorizerConfig {
            max_features: 50,
            min_df: 2,
            max_df: 0.8,
        }
    }

    #[test]
    fn tokenizer_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("User logged in to the system at 10");
        assert_eq!(tokens, vec!["user", "logged", "system"]);
    }

    #[test]
    fn bigrams_join_surviving_tokens() {
        let terms = terms_of("connection refused by host");
        assert!(terms.contains(&"connection refused".to_string()));
        assert!(terms.contains(&"refused host".to_string()));
        assert!(terms.contains(&"host".to_string()));
    }

    #[test]
    fn min_df_and_max_df_filter() {
        let docs = vec![
            "database timeout retry",
            "database timeout retry",
            "database timeout retry",
            "database timeout retry",
            "unique token appears once",
        ];
        let vocab = TfidfVocabulary::fit(&docs, &config());
        // "database" is in 4/5 = 80% of docs: kept (not strictly above max_df)
        assert!(vocab.terms.iter().any(|t| t == "database"));
        // singleton terms fall below min_df
        assert!(!vocab.terms.iter().any(|t| t == "unique"));
    }

    #[test]
    fn rows_have_unit_norm_or_all_zero() {
        let docs = vec![
            "connection refused",
            "connection refused",
            "connection dropped",
            "connection dropped",
            "totally unrelated words",
        ];
        let vocab = TfidfVocabulary::fit(&docs, &config());
        assert!(!vocab.is_empty());
        let m = vocab.transform(&docs);
        for i in 0..4 {
            let norm: f64 = m.row(i).iter().map(|v| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "row {i} norm {norm}");
        }
        // no vocabulary overlap: all-zero row
        let norm_last: f64 = m.row(4).iter().map(|v| v * v).sum();
        assert_eq!(norm_last, 0.0);
    }

    #[test]
    fn degenerate_batch_yields_empty_vocabulary() {
        let docs = vec!["one off", "another pair"];
        let vocab = TfidfVocabulary::fit(&docs, &config());
        assert!(vocab.is_empty());
        let m = vocab.transform(&docs);
        assert_eq!(m.dim(), (2, 0));
    }

    #[test]
    fn max_features_bounds_vocabulary() {
        let docs: Vec<String> = (0..20)
            .map(|i| format!("alpha beta gamma delta epsilon tok{} tok{}", i % 3, i % 5))
            .collect();
        let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
        let cfg = VectorizerConfig {
            max_features: 4,
            min_df: 2,
            max_df: 1.0,
        };
        let vocab = TfidfVocabulary::fit(&refs, &cfg);
        assert_eq!(vocab.len(), 4);
        let sorted = {
            let mut t = vocab.terms.clone();
            t.sort();
            t
        };
        assert_eq!(vocab.terms, sorted);
    }

    #[test]
    fn idf_is_smoothed() {
        // a term present in every document still gets a positive weight
        let docs = vec!["shared shared", "shared"];
        let cfg = VectorizerConfig {
            max_features: 10,
            min_df: 1,
            max_df: 1.0,
        };
        let vocab = TfidfVocabulary::fit(&docs, &cfg);
        let j = vocab.terms.iter().position(|t| t == "shared").unwrap();
        assert!((vocab.idf[j] - 1.0).abs() < 1e-12);
    }
}
