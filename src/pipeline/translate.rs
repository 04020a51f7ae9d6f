//! Word translation with naive right-to-left reordering.
//!
//! Each detected word is sent to the translation capability on its own: no
//! batching, no deduplication, no cache. The result is reversed character by
//! character so that a left-to-right text renderer paints a right-to-left
//! script in reading order. This reverses Unicode scalar values only; it does
//! not reorder words or apply the bidirectional algorithm.

use crate::error::{PdfTranslateError, ServiceError};
use crate::pipeline::ocr::{BoundingQuad, DetectedWord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The translation capability.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Translate `text` into `target_language` (ISO-639-1 code such as `"he"`).
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError>;
}

/// A translated word, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedWord {
    /// Translation with its characters reversed.
    pub translated_text: String,
    /// Bounding quad of the source word.
    pub source_quad: BoundingQuad,
}

/// Reverse the characters of `text`.
pub fn reverse_for_rtl(text: &str) -> String {
    text.chars().rev().collect()
}

/// Translate every word of a page, one request per word, in input order.
pub async fn translate_words(
    translator: &dyn Translator,
    page_num: usize,
    words: &[DetectedWord],
    target_language: &str,
) -> Result<Vec<TranslatedWord>, PdfTranslateError> {
    let mut translated = Vec::with_capacity(words.len());

    for word in words {
        let raw = translator
            .translate(&word.text, target_language)
            .await
            .map_err(|source| PdfTranslateError::Translation {
                page: page_num,
                word: word.text.clone(),
                source,
            })?;
        debug!("Page {}: '{}' → '{}'", page_num, word.text, raw);

        translated.push(TranslatedWord {
            translated_text: reverse_for_rtl(&raw),
            source_quad: word.bounding_quad,
        });
    }

    Ok(translated)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::ocr::tests::word;
    use std::sync::Mutex;

    /// Answers every request with the same string and logs the requests.
    pub(crate) struct FixedTranslator {
        pub output: String,
        pub requests: Mutex<Vec<(String, String)>>,
    }

    impl FixedTranslator {
        pub(crate) fn new(output: &str) -> Self {
            Self {
                output: output.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Translator for FixedTranslator {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError> {
            self.requests
                .lock()
                .unwrap()
                .push((text.to_string(), target_language.to_string()));
            Ok(self.output.clone())
        }
    }

    /// Uppercases its input, failing on one chosen word.
    struct FailOn(&'static str);

    #[async_trait]
    impl Translator for FailOn {
        fn name(&self) -> &str {
            "fail-on"
        }

        async fn translate(&self, text: &str, _target_language: &str) -> Result<String, ServiceError> {
            if text == self.0 {
                Err(ServiceError::Other(format!("cannot translate {text}")))
            } else {
                Ok(text.to_uppercase())
            }
        }
    }

    #[test]
    fn reverse_is_character_wise() {
        assert_eq!(reverse_for_rtl("abcde"), "edcba");
        assert_eq!(reverse_for_rtl("שלום"), "םולש");
        assert_eq!(reverse_for_rtl(""), "");
    }

    #[test]
    fn reversing_twice_restores_translation() {
        for s in ["שלום עולם", "مرحبا", "mixed 123 טקסט", "a"] {
            assert_eq!(reverse_for_rtl(&reverse_for_rtl(s)), s);
        }
    }

    #[test]
    fn reverse_does_not_reorder_words() {
        // Words are not swapped as units; the whole string is mirrored.
        assert_eq!(reverse_for_rtl("ab cd"), "dc ba");
    }

    #[tokio::test]
    async fn one_request_per_word_including_repeats() {
        let translator = FixedTranslator::new("שלום!");
        let words = vec![
            word("the", [(0, 0), (1, 0), (1, 1), (0, 1)]),
            word("the", [(5, 0), (6, 0), (6, 1), (5, 1)]),
            word("end", [(9, 0), (9, 0), (9, 1), (9, 1)]),
        ];

        let out = translate_words(&translator, 1, &words, "he").await.unwrap();

        assert_eq!(out.len(), 3);
        let requests = translator.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|(_, lang)| lang == "he"));
        assert_eq!(requests[0].0, "the");
        assert_eq!(requests[1].0, "the");
        assert!(out.iter().all(|w| w.translated_text == "!םולש"));
        assert_eq!(out[1].source_quad, words[1].bounding_quad);
    }

    #[tokio::test]
    async fn failure_names_the_word_and_page() {
        let words = vec![
            word("ok", [(0, 0), (1, 0), (1, 1), (0, 1)]),
            word("bad", [(0, 0), (1, 0), (1, 1), (0, 1)]),
        ];
        let err = translate_words(&FailOn("bad"), 2, &words, "he")
            .await
            .unwrap_err();
        match err {
            PdfTranslateError::Translation { page, word, .. } => {
                assert_eq!(page, 2);
                assert_eq!(word, "bad");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_words_means_no_requests() {
        let translator = FixedTranslator::new("x");
        let out = translate_words(&translator, 1, &[], "he").await.unwrap();
        assert!(out.is_empty());
        assert!(translator.requests.lock().unwrap().is_empty());
    }
}
