// file: src/index/splitter.rs
// description: sentence-aware text chunking with token overlap
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Sentence terminator followed by whitespace, or a blank line.
    static ref SENTENCE_BOUNDARY: Regex =
        Regex::new(r#"[.!?]+["')\]]*\s+|\n\s*\n"#).expect("valid sentence regex");
}

/// Packs sentences into chunks of at most `chunk_size` whitespace tokens.
/// Consecutive chunks share up to `chunk_overlap` tokens of whole sentences.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

struct Sentence {
    text: String,
    tokens: usize,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let sentences = self.sentences(text);
        let mut chunks = Vec::new();
        let mut current: Vec<&Sentence> = Vec::new();
        let mut current_tokens = 0;

        for sentence in &sentences {
            if current_tokens + sentence.tokens > self.chunk_size && !current.is_empty() {
                chunks.push(Self::join(&current));

                let mut kept_tokens = 0;
                let keep = current
                    .iter()
                    .rev()
                    .take_while(|s| {
                        kept_tokens += s.tokens;
                        kept_tokens <= self.chunk_overlap
                    })
                    .count();
                current.drain(..current.len() - keep);
                current_tokens = current.iter().map(|s| s.tokens).sum();

                while !current.is_empty() && current_tokens + sentence.tokens > self.chunk_size {
                    current_tokens -= current.remove(0).tokens;
                }
            }

            current.push(sentence);
            current_tokens += sentence.tokens;
        }

        if !current.is_empty() {
            chunks.push(Self::join(&current));
        }

        chunks
    }

    fn sentences(&self, text: &str) -> Vec<Sentence> {
        let mut raw = Vec::new();
        let mut last = 0;

        for boundary in SENTENCE_BOUNDARY.find_iter(text) {
            raw.push(&text[last..boundary.end()]);
            last = boundary.end();
        }
        raw.push(&text[last..]);

        raw.into_iter()
            .flat_map(|sentence| self.hard_split(sentence))
            .collect()
    }

    /// Sentences longer than a chunk are cut on token boundaries.
    fn hard_split(&self, sentence: &str) -> Vec<Sentence> {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        words
            .chunks(self.chunk_size)
            .map(|window| Sentence {
                text: window.join(" "),
                tokens: window.len(),
            })
            .collect()
    }

    fn join(sentences: &[&Sentence]) -> String {
        sentences
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
