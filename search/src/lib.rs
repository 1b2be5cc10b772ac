//! Exact and fuzzy string matching with path-aware scoring.
//!
//! Three algorithms share one set of scoring rules:
//!
//! - [`Algorithm::ExactNaive`]: contiguous substring, best word boundary.
//! - [`Algorithm::FuzzyV1`]: greedy subsequence, tightest window.
//! - [`Algorithm::FuzzyV2`]: optimal subsequence by dynamic programming.
//!
//! Matched characters earn [`SCORE_MATCH`]; gaps cost [`SCORE_GAP_START`]
//! then [`SCORE_GAP_EXTENSION`]; matches at word starts, after delimiters,
//! on camelCase humps or inside consecutive runs earn bonuses, with the
//! first pattern character's bonus doubled.
//!
//! [`SearchMatch`] prepares user-typed patterns and picks the algorithm: a
//! leading `'` asks for an exact match, everything else is fuzzy.
//!
//! # Example
//!
//! ```
//! use cmdline_search::*;
//!
//! let result = match_pattern(false, false, true, "/man1/zshcompctl.1", "zshc");
//! assert_eq!(result.range(), Some(6..10));
//! assert_eq!(
//!     result.score,
//!     SCORE_MATCH * 4 + BONUS_BOUNDARY_DELIMITER * (BONUS_FIRST_CHAR_MULTIPLIER + 3)
//! );
//! ```

mod exact;
mod fuzzy_v1;
mod fuzzy_v2;
mod matcher;
mod normalize;
mod result;
mod scoring;

pub use fuzzy_v2::MATRIX_BUDGET;
pub use matcher::{RankedMatch, SearchConfig, SearchMatch, match_pattern};
pub use normalize::{normalize_char, normalize_str};
pub use result::{Algorithm, EXACT_MARKER, SearchMatchResult};
pub use scoring::{
    BONUS_BOUNDARY, BONUS_BOUNDARY_DELIMITER, BONUS_BOUNDARY_WHITE, BONUS_CAMEL123,
    BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, BONUS_NON_WORD, SCORE_GAP_EXTENSION,
    SCORE_GAP_START, SCORE_MATCH,
};
