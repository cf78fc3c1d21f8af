//! Generic combinators over [`Function`]s.
//!
//! All combinators are available as methods through [`FunctionExt`], which is
//! implemented for every [`Function`].
//!
//! ```
//! use memofn::{Function, FunctionExt};
//!
//! let add = |a: i32, b: i32| a + b;
//! let describe = add.partial(10).and_then(|sum: i32| format!("sum = {sum}"));
//! assert_eq!(describe.apply((5,)), "sum = 15");
//! ```

use crate::error::{BoxError, CallbackError};
use crate::fallible::{self, Nest, Recover};
use crate::function::Function;
use crate::memoize::impl_memoize_wrapper;

/// Extension methods for all [`Function`]s.
pub trait FunctionExt<Args>: Function<Args> + Sized {
    /// Feed the output into `after`.
    fn and_then<G>(self, after: G) -> AndThen<Self, G>
    where
        G: Function<(Self::Output,)>,
    {
        AndThen { first: self, after }
    }

    /// Compute the arguments with `before`.
    ///
    /// `before` may take any arguments, as long as it produces this function's
    /// argument tuple.
    fn compose<G, Pre>(self, before: G) -> Compose<Self, G>
    where
        G: Function<Pre, Output = Args>,
    {
        Compose { func: self, before }
    }

    /// Fix the first argument.
    ///
    /// Repeated application curries the function one argument at a time.
    fn partial<A>(self, first: A) -> Partial<Self, A>
    where
        A: Clone,
    {
        Partial { func: self, first }
    }

    /// Discard the output.
    fn consume(self) -> Consume<Self> {
        Consume { func: self }
    }

    /// Delegate failed calls to a substitute produced by `handler`.
    ///
    /// See [`recover`](crate::recover).
    fn recover<H>(self, handler: H) -> Recover<Self, H>
    where
        Recover<Self, H>: Function<Args>,
    {
        fallible::recover(self, handler)
    }

    /// Wrap errors into a [`CallbackError`].
    ///
    /// See [`nest`](crate::nest).
    fn nest<T, E>(self) -> Nest<Self, fn(E) -> CallbackError>
    where
        Self: Function<Args, Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        fallible::nest(self)
    }

    /// Map errors with `mapper`.
    ///
    /// See [`nest_with`](crate::nest_with).
    fn nest_with<M>(self, mapper: M) -> Nest<Self, M>
    where
        Nest<Self, M>: Function<Args>,
    {
        fallible::nest_with(self, mapper)
    }
}

impl<F, Args> FunctionExt<Args> for F where F: Function<Args> {}

/// Post-composition, created by [`FunctionExt::and_then`].
#[derive(Debug, Clone)]
pub struct AndThen<F, G> {
    first: F,
    after: G,
}

impl<F, G, Args> Function<Args> for AndThen<F, G>
where
    F: Function<Args>,
    G: Function<(F::Output,)>,
{
    type Output = G::Output;

    fn apply(&self, args: Args) -> G::Output {
        self.after.apply((self.first.apply(args),))
    }
}

/// Pre-composition, created by [`FunctionExt::compose`].
#[derive(Debug, Clone)]
pub struct Compose<F, G> {
    func: F,
    before: G,
}

impl<F, G, Pre, Args> Function<Pre> for Compose<F, G>
where
    G: Function<Pre, Output = Args>,
    F: Function<Args>,
{
    type Output = F::Output;

    fn apply(&self, args: Pre) -> F::Output {
        self.func.apply(self.before.apply(args))
    }
}

/// Partial application, created by [`FunctionExt::partial`].
#[derive(Debug, Clone)]
pub struct Partial<F, A> {
    func: F,
    first: A,
}

macro_rules! impl_partial {
    ($($arg:ident: $ty:ident),*) => {
        impl<F, A, $($ty,)*> Function<($($ty,)*)> for Partial<F, A>
        where
            F: Function<(A, $($ty,)*)>,
            A: Clone,
        {
            type Output = F::Output;

            fn apply(&self, ($($arg,)*): ($($ty,)*)) -> F::Output {
                self.func.apply((self.first.clone(), $($arg,)*))
            }
        }
    };
}

impl_partial!();
impl_partial!(b: B);
impl_partial!(b: B, c: C);
impl_partial!(b: B, c: C, d: D);
impl_partial!(b: B, c: C, d: D, e: E);
impl_partial!(b: B, c: C, d: D, e: E, f: G);

/// A function with its output discarded, created by [`FunctionExt::consume`].
#[derive(Debug, Clone)]
pub struct Consume<F> {
    func: F,
}

impl<F, Args> Function<Args> for Consume<F>
where
    F: Function<Args>,
{
    type Output = ();

    fn apply(&self, args: Args) {
        self.func.apply(args);
    }
}

impl_memoize_wrapper!(AndThen<F, G>);
impl_memoize_wrapper!(Compose<F, G>);
impl_memoize_wrapper!(Partial<F, A>);
