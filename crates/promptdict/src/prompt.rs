//! Prompt editor text as a list of tokens.
//!
//! The editor holds free text such as `masterpiece, ((blue_sky)), 1girl`. Tokens are
//! separated by ASCII or full-width commas, trimmed, and empty tokens are dropped. The
//! canonical rendering joins tokens with `", "`.
//!
//! All index-based operations are no-ops returning `false` when the index is out of
//! range.

use crate::wrappers::{parse_wrappers, toggle_token_separator, wrap, ParsedToken, WrapperKind};
use std::fmt;

const SEPARATORS: [char; 2] = [',', '，'];

/// Splits editor text into trimmed, non-empty tokens.
pub fn split_tokens(text: &str) -> Vec<String> {
    text.split(SEPARATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Re-renders editor text in canonical `a, b, c` form.
pub fn normalize_prompt(text: &str) -> String {
    split_tokens(text).join(", ")
}

/// Replaces full-width commas with ASCII commas without touching anything else.
pub fn replace_fullwidth_commas(text: &str) -> String {
    text.replace('，', ",")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    tokens: Vec<String>,
}

impl Prompt {
    pub fn parse(text: &str) -> Self {
        Self {
            tokens: split_tokens(text),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Swaps underscores and spaces in every token's core.
    pub fn toggle_underscore_space(&mut self) {
        for token in &mut self.tokens {
            *token = toggle_token_separator(token);
        }
    }

    /// Adds `kind` as the new innermost wrapper of the token at `index`.
    pub fn add_wrapper(&mut self, index: usize, kind: WrapperKind) -> bool {
        let Some(token) = self.tokens.get_mut(index) else {
            return false;
        };
        let mut parsed = parse_wrappers(token);
        parsed.wrappers.push(kind);
        *token = parsed.to_token();
        true
    }

    /// Removes the innermost wrapper of the token at `index`.
    ///
    /// Returns `false` if the index is invalid or the token has no wrapper.
    pub fn remove_wrapper(&mut self, index: usize) -> bool {
        let Some(token) = self.tokens.get_mut(index) else {
            return false;
        };
        let mut parsed = parse_wrappers(token);
        if parsed.wrappers.pop().is_none() {
            return false;
        }
        *token = wrap(&parsed.core, &parsed.wrappers);
        true
    }

    pub fn wrapper_info(&self, index: usize) -> Option<ParsedToken> {
        self.tokens.get(index).map(|t| parse_wrappers(t))
    }

    pub fn update_token(&mut self, index: usize, token: &str) -> bool {
        match self.tokens.get_mut(index) {
            Some(slot) => {
                *slot = token.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.tokens.len() || to >= self.tokens.len() {
            return false;
        }
        let item = self.tokens.remove(from);
        self.tokens.insert(to, item);
        true
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.tokens.len() {
            return false;
        }
        self.tokens.remove(index);
        true
    }

    /// Inserts `token` right after `index`, or at the end when `index` is past it.
    pub fn insert_after(&mut self, index: usize, token: &str) {
        let at = index.saturating_add(1).min(self.tokens.len());
        self.tokens.insert(at, token.trim().to_string());
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(", "))
    }
}
