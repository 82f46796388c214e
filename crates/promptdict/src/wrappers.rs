//! # Bracket Wrappers
//!
//! Prompt tokens are often wrapped in nested bracket pairs for emphasis, e.g.
//! `((sky))` or `{[night]}`. This module splits a token into its core text and the
//! ordered list of wrappers around it, and puts them back together.
//!
//! ```text
//!   "{(blue_sky)}"
//!    │└────────┘│
//!    │  "()"    │     wrappers = ["{}", "()"]   (outermost first)
//!    └──"{}"────┘     core     = "blue_sky"
//! ```
//!
//! ## Round Trip
//!
//! For any trimmed token made of a core and well-nested supported brackets:
//!
//! ```
//! use promptdict::wrappers::{parse_wrappers, wrap};
//!
//! let parsed = parse_wrappers("{(blue_sky)}");
//! assert_eq!(wrap(&parsed.core, &parsed.wrappers), "{(blue_sky)}");
//! ```
//!
//! Only exact pairs strip: `{sky)` stays as it is.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapperKind {
    #[serde(rename = "{}")]
    Brace,
    #[serde(rename = "()")]
    Paren,
    #[serde(rename = "[]")]
    Bracket,
    #[serde(rename = "<>")]
    Angle,
}

impl WrapperKind {
    /// All kinds, in matching priority order.
    pub const ALL: [WrapperKind; 4] = [
        WrapperKind::Brace,
        WrapperKind::Paren,
        WrapperKind::Bracket,
        WrapperKind::Angle,
    ];

    pub fn open(self) -> char {
        match self {
            WrapperKind::Brace => '{',
            WrapperKind::Paren => '(',
            WrapperKind::Bracket => '[',
            WrapperKind::Angle => '<',
        }
    }

    pub fn close(self) -> char {
        match self {
            WrapperKind::Brace => '}',
            WrapperKind::Paren => ')',
            WrapperKind::Bracket => ']',
            WrapperKind::Angle => '>',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WrapperKind::Brace => "{}",
            WrapperKind::Paren => "()",
            WrapperKind::Bracket => "[]",
            WrapperKind::Angle => "<>",
        }
    }
}

impl fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WrapperKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WrapperKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown wrapper: {} (expected one of {{}} () [] <>)", s))
    }
}

/// A token split into its core text and its wrappers, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    pub core: String,
    pub wrappers: Vec<WrapperKind>,
}

impl ParsedToken {
    pub fn depth(&self) -> usize {
        self.wrappers.len()
    }

    pub fn to_token(&self) -> String {
        wrap(&self.core, &self.wrappers)
    }
}

/// Strips matching outer bracket pairs from the trimmed token, outermost first.
pub fn parse_wrappers(token: &str) -> ParsedToken {
    let mut current = token.trim();
    let mut wrappers = Vec::new();

    while current.len() >= 2 {
        let matched = WrapperKind::ALL
            .into_iter()
            .find(|k| current.starts_with(k.open()) && current.ends_with(k.close()));
        match matched {
            Some(kind) => {
                wrappers.push(kind);
                // Both delimiters are single-byte ASCII.
                current = &current[1..current.len() - 1];
            }
            None => break,
        }
    }

    ParsedToken {
        core: current.to_string(),
        wrappers,
    }
}

/// Wraps `core` with `wrappers`, applying the last (innermost) one first.
pub fn wrap(core: &str, wrappers: &[WrapperKind]) -> String {
    let mut result = String::with_capacity(core.len() + wrappers.len() * 2);
    for kind in wrappers {
        result.push(kind.open());
    }
    result.push_str(core);
    for kind in wrappers.iter().rev() {
        result.push(kind.close());
    }
    result
}

/// Swaps underscores and spaces in the core text.
///
/// Underscores win: if the core has any, they all become spaces. Otherwise spaces become
/// underscores. A core with neither is returned unchanged.
pub fn toggle_separator(core: &str) -> String {
    if core.contains('_') {
        core.replace('_', " ")
    } else if core.contains(' ') {
        core.replace(' ', "_")
    } else {
        core.to_string()
    }
}

/// Toggles the separator in a token's core while leaving its wrapper shell untouched.
pub fn toggle_token_separator(token: &str) -> String {
    let parsed = parse_wrappers(token);
    wrap(&toggle_separator(&parsed.core), &parsed.wrappers)
}
