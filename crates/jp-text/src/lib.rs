//! Jp Text - Japanese text layout helpers
//!
//! This crate provides:
//! - Box fitting for full-width Japanese text (truncate with ellipsis)
//! - Greedy line splitting with a two-line cap
//! - ISO date decomposition into year/month/day tokens
//!
//! # Example
//!
//! ```
//! use jp_text::{fit_text, split_lines, DateTokens};
//!
//! // Box fitting
//! let fitted = fit_text("東京都新宿区西新宿一丁目", 40.0, 9.0);
//!
//! // Line wrapping (at most 2 lines)
//! let lines = split_lines("長い住所をここで折り返す", 43.2, 9.0);
//! assert!(lines.len() <= 2);
//!
//! // Date tokens
//! let tokens = DateTokens::parse("2025-04-01").unwrap();
//! assert_eq!(tokens.year, "2025");
//! ```

mod date;
mod layout;

pub use date::DateTokens;
pub use layout::{approx_width, fit_text, split_lines};

use thiserror::Error;

/// Errors that can occur during Japanese text processing
#[derive(Debug, Error)]
pub enum JpTextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for Japanese text operations
pub type Result<T> = std::result::Result<T, JpTextError>;
