//! Adapters for functions that report failure through `Result`.
//!
//! Failures come in two tiers. A recoverable failure is an `Err` returned by
//! the wrapped function and is what [`recover`] and [`nest`] act on. A fatal
//! failure is a panic: it is never caught here and never reaches a handler or
//! mapper, so it unwinds through every adapter unchanged.

use tracing::debug;

use crate::error::{BoxError, CallbackError};
use crate::function::Function;
use crate::memoize::impl_memoize_wrapper;

/// Recover from errors by delegating the failed call to a substitute.
///
/// On success, the returned function behaves exactly like `func`. When `func`
/// returns `Err(e)`, `handler(e)` is called once to produce a substitute with
/// the same signature, which then receives the original arguments. Whatever
/// the substitute returns, including its own error, is passed through
/// unmodified.
///
/// ```
/// use std::num::ParseIntError;
/// use memofn::{recover, Function};
///
/// let parse = |text: &str| text.parse::<i64>();
/// let lenient = recover(parse, |_: ParseIntError| |text: &str| text.trim().parse::<i64>());
/// assert_eq!(lenient.apply((" 42 ",)), Ok(42));
/// assert!(lenient.apply(("x",)).is_err());
/// ```
pub fn recover<F, H, Args>(func: F, handler: H) -> Recover<F, H>
where
    Recover<F, H>: Function<Args>,
{
    Recover { func, handler }
}

/// Replace errors with a [`CallbackError`] wrapping them.
///
/// ```
/// use memofn::{nest, Function};
///
/// let parse = nest(|text: &str| text.parse::<u8>());
/// let err = parse.apply(("300",)).unwrap_err();
/// assert_eq!(err.message(), "number too large to fit in target type");
/// ```
pub fn nest<F, Args, T, E>(func: F) -> Nest<F, fn(E) -> CallbackError>
where
    F: Function<Args, Output = Result<T, E>>,
    E: Into<BoxError>,
{
    Nest { func, mapper: CallbackError::new::<E> }
}

/// Replace errors with the result of `mapper`.
///
/// This is [`recover`] with a substitute that unconditionally fails with the
/// mapped error, minus the requirement to clone the arguments.
pub fn nest_with<F, M, Args>(func: F, mapper: M) -> Nest<F, M>
where
    Nest<F, M>: Function<Args>,
{
    Nest { func, mapper }
}

/// A function whose errors are handed to a recovery handler.
///
/// Created by [`recover`] and [`FunctionExt::recover`](crate::FunctionExt::recover).
#[derive(Clone)]
pub struct Recover<F, H> {
    func: F,
    handler: H,
}

impl<F, H, G, Args, T, E> Function<Args> for Recover<F, H>
where
    F: Function<Args, Output = Result<T, E>>,
    H: Fn(E) -> G,
    G: Function<Args, Output = Result<T, E>>,
    Args: Clone,
{
    type Output = Result<T, E>;

    fn apply(&self, args: Args) -> Result<T, E> {
        match self.func.apply(args.clone()) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("call failed, delegating to substitute");
                (self.handler)(err).apply(args)
            }
        }
    }
}

/// A function whose errors are mapped into other errors.
///
/// Created by [`nest`], [`nest_with`] and their [`FunctionExt`](crate::FunctionExt)
/// counterparts.
#[derive(Clone)]
pub struct Nest<F, M> {
    func: F,
    mapper: M,
}

impl<F, M, Args, T, E, X> Function<Args> for Nest<F, M>
where
    F: Function<Args, Output = Result<T, E>>,
    M: Fn(E) -> X,
{
    type Output = Result<T, X>;

    fn apply(&self, args: Args) -> Result<T, X> {
        self.func.apply(args).map_err(|err| {
            debug!("call failed, nesting error");
            (self.mapper)(err)
        })
    }
}

impl_memoize_wrapper!(Recover<F, H>);
impl_memoize_wrapper!(Nest<F, M>);
