//! Memoization and error-recovery adapters for plain functions.
//!
//! Any closure or function item taking up to six arguments is a
//! [`Function`] of its argument tuple. On top of that, this crate provides:
//!
//! - [`memoize`] and [`try_memoize`]: compute a function at most once per
//!   distinct argument tuple, even under concurrent access.
//! - [`recover`], [`nest`] and [`nest_with`]: turn errors into a substitute
//!   computation or into different errors.
//! - [`FunctionExt`]: composition and partial application.
//! - [`macro@memoize`]: memoize a free function in place.
//!
//! ```
//! use memofn::{try_memoize, Function, FunctionExt};
//!
//! let parse = |text: String| text.parse::<u64>();
//! let parse = try_memoize(parse.nest());
//! assert_eq!(parse.apply(("12".into(),)).unwrap(), 12);
//! assert!(parse.apply(("twelve".into(),)).is_err());
//! ```
//!
//! Free functions are memoized in place with the attribute:
//!
//! ```
//! use memofn::memoize;
//!
//! #[memoize]
//! fn describe(width: u32, height: u32) -> String {
//!     format!("{width}x{height}")
//! }
//!
//! #[memoize(fallible)]
//! fn parse(text: String) -> Result<u64, std::num::ParseIntError> {
//!     text.parse()
//! }
//!
//! assert_eq!(describe(3, 4), "3x4");
//! assert_eq!(parse("12".into()), Ok(12));
//! assert!(parse("x".into()).is_err());
//! ```
//!
//! # Errors
//! A function fails recoverably by returning `Err`. Panics are fatal: no
//! adapter catches them, and a panicking call leaves nothing in a cache.
//!
//! # Memory
//! Caches are never evicted. A memoized function keeps every result for as
//! long as it lives, which for `#[memoize]` functions is the whole process.

mod cache;
mod combinator;
mod error;
mod fallible;
mod function;
mod memoize;
mod prehashed;
#[cfg(feature = "testing")]
mod testing;

pub use crate::cache::{Cache, Hit};
pub use crate::combinator::{AndThen, Compose, Consume, FunctionExt, Partial};
pub use crate::error::{BoxError, CallbackError};
pub use crate::fallible::{nest, nest_with, recover, Nest, Recover};
pub use crate::function::Function;
pub use crate::memoize::{memoize, try_memoize, Memoize, Memoized, TryMemoize, TryMemoized};
pub use crate::prehashed::Prehashed;

#[cfg(feature = "macros")]
pub use memofn_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal;
