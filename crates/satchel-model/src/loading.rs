// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for the 0/1 knapsack domain.
//!
//! The loader turns whitespace-delimited text streams into a validated `Model`.
//! Lines may contain comments introduced by `#`, which are ignored during
//! tokenization. Item data is checked before it reaches the `ModelBuilder`, so
//! malformed instances surface as descriptive errors instead of panics.
//!
//! The parser accepts any `BufRead`, file path, raw reader, or string slice,
//! making it convenient to integrate with benchmarks, tests, and tooling.

use crate::{
    index::ItemIndex,
    model::{Model, ModelBuilder},
};
use satchel_core::num::SolverNumeric;
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended unexpectedly (e.g., missing tokens).
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The item count is not a positive integer or the capacity is negative.
    InvalidDimensions,
    /// An item carries data the model cannot represent.
    InvalidItem(InvalidItemError),
    /// The sum of all values or all weights does not fit into the numeric type.
    TotalsOverflow {
        /// The name of the numeric type (e.g., "i32").
        type_name: &'static str,
    },
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

/// The reason an item was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidItemReason {
    NegativeValue,
    NonPositiveWeight,
    ExceedsCapacity,
}

impl std::fmt::Display for InvalidItemReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeValue => write!(f, "negative value"),
            Self::NonPositiveWeight => write!(f, "non-positive weight"),
            Self::ExceedsCapacity => write!(f, "weight exceeds the capacity"),
        }
    }
}

/// Details about a rejected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidItemError {
    /// The index of the offending item.
    pub item_index: ItemIndex,
    /// Why the item was rejected.
    pub reason: InvalidItemReason,
}

impl std::fmt::Display for InvalidItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item {} has {}", self.item_index.get(), self.reason)
    }
}

impl std::error::Error for InvalidItemError {}

impl Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => write!(
                f,
                "Item count must be a positive integer and capacity must be non-negative"
            ),
            Self::InvalidItem(e) => write!(f, "Invalid item: {}", e),
            Self::TotalsOverflow { type_name } => write!(
                f,
                "Total value or total weight of the items overflows type {}",
                type_name
            ),
        }
    }
}

impl std::error::Error for ProblemLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::InvalidItem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for ProblemLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<InvalidItemError> for ProblemLoaderError {
    fn from(e: InvalidItemError) -> Self {
        Self::InvalidItem(e)
    }
}

/// A configurable loader for knapsack instances.
///
/// The format this parser expects is as follows (whitespace-separated tokens):
///
/// ```raw
/// N C            // number of items, capacity
/// v_1 w_1        // value and weight of item 1
/// ...
/// v_|N| w_|N|    // value and weight of item |N|
/// ```
///
/// # Configuration
/// * `fail_on_oversized_items`: If true, the loader returns an error for any item
///   whose weight alone exceeds the capacity. Such items can never be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader<T> {
    fail_on_oversized_items: bool,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Default for ProblemLoader<T> {
    fn default() -> Self {
        Self {
            fail_on_oversized_items: false,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> ProblemLoader<T>
where
    T: SolverNumeric + FromStr,
{
    /// Creates a new `ProblemLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether to return an error if an item is heavier than the capacity.
    #[inline]
    pub fn fail_on_oversized_items(mut self, yes: bool) -> Self {
        self.fail_on_oversized_items = yes;
        self
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Model<T>, ProblemLoaderError> {
        let mut sc = Scanner::new(rdr);

        let n_val: T = sc.next()?;
        let capacity: T = sc.next()?;

        let n = n_val
            .to_usize()
            .ok_or(ProblemLoaderError::InvalidDimensions)?;
        if n == 0 || capacity < T::zero() {
            return Err(ProblemLoaderError::InvalidDimensions);
        }

        let mut builder = ModelBuilder::new(n, capacity);
        for i in 0..n {
            let item_index = ItemIndex::new(i);
            let value: T = sc.next()?;
            let weight: T = sc.next()?;

            let reason = if value < T::zero() {
                Some(InvalidItemReason::NegativeValue)
            } else if weight <= T::zero() {
                Some(InvalidItemReason::NonPositiveWeight)
            } else if self.fail_on_oversized_items && weight > capacity {
                Some(InvalidItemReason::ExceedsCapacity)
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(InvalidItemError { item_index, reason }.into());
            }

            builder.set_item(item_index, value, weight);
        }

        if builder.checked_totals().is_none() {
            return Err(ProblemLoaderError::TotalsOverflow {
                type_name: std::any::type_name::<T>(),
            });
        }
        Ok(builder.build())
    }

    /// Loads a problem from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Model<T>, ProblemLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Model<T>, ProblemLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a problem from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Model<T>, ProblemLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, ProblemLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    fn next<T>(&mut self) -> Result<T, ProblemLoaderError>
    where
        T: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(ProblemLoaderError::UnexpectedEof);
            }

            let line = &self.buf[self.pos..];
            let content = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };

            let trimmed = content.trim_start();
            if trimmed.is_empty() {
                self.pos = self.buf.len();
                continue;
            }

            let start = self.pos + (content.len() - trimmed.len());
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let end = start + len;
            self.pos = end;

            let token = &self.buf[start..end];
            return token.parse::<T>().map_err(|_| {
                ProblemLoaderError::Parse(ParseTokenError {
                    token: token.to_string(),
                    type_name: std::any::type_name::<T>(),
                })
            });
        }
    }
}
