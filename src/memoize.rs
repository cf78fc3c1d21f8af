use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cache::{Cache, Hit};
use crate::function::Function;

/// Memoize a function.
///
/// The returned wrapper computes the function at most once per distinct
/// argument tuple and hands out clones of the stored result afterwards.
/// Memoizing an already memoized function returns it unchanged.
///
/// ```
/// use memofn::{memoize, Function};
///
/// let sum = memoize(|a: u32, b: u32| a + b);
/// assert_eq!(sum.apply((2, 3)), 5);
/// assert_eq!(sum.apply((2, 3)), 5); // From the cache.
/// ```
///
/// Every returned value is memoized, including `None` and `Err(_)`. Use
/// [`try_memoize`] to keep errors out of the cache.
pub fn memoize<F, Args>(func: F) -> F::Memoized
where
    F: Memoize<Args>,
{
    func.memoize()
}

/// Memoize a fallible function, keeping only successful results.
///
/// An `Err` is returned to the caller as-is and the next call with the same
/// arguments runs the function again.
///
/// ```
/// use memofn::{try_memoize, Function};
///
/// let parse = try_memoize(|text: String| text.parse::<u8>());
/// assert_eq!(parse.apply(("7".into(),)), Ok(7));
/// assert!(parse.apply(("x".into(),)).is_err());
/// assert_eq!(parse.len(), 1);
/// ```
pub fn try_memoize<F, Args>(func: F) -> F::Memoized
where
    F: TryMemoize<Args>,
{
    func.try_memoize()
}

/// Conversion into a [`Memoized`] wrapper.
///
/// Implemented for closures and function items with up to six arguments, for
/// the wrappers of this crate and, as the identity, for [`Memoized`] itself.
pub trait Memoize<Args> {
    /// The memoized form of the function.
    type Memoized: Function<Args>;

    /// Wrap the function in a memoizing cache.
    fn memoize(self) -> Self::Memoized;
}

/// Conversion into a [`TryMemoized`] wrapper.
///
/// Implemented like [`Memoize`], with [`TryMemoized`] mapping to itself.
pub trait TryMemoize<Args> {
    /// The memoized form of the function.
    type Memoized: Function<Args>;

    /// Wrap the function in a cache that only keeps successful results.
    fn try_memoize(self) -> Self::Memoized;
}

/// A function whose results are memoized per argument tuple.
///
/// A panic in the wrapped function is not memoized: it unwinds through the
/// caller and the next call with the same arguments tries again. Concurrent
/// callers waiting for the same arguments see the panic as a vacant slot and
/// compute on their own.
///
/// The cache is never evicted. It lives and grows as long as the wrapper.
pub struct Memoized<F, Args, R> {
    func: F,
    cache: Cache<Args, R>,
}

impl<F, Args, R> Memoized<F, Args, R> {
    /// Wrap a function.
    pub fn new(func: F) -> Self {
        Self { func, cache: Cache::new() }
    }

    /// Wrap a function, preallocating room for `capacity` argument tuples.
    pub fn with_capacity(func: F, capacity: usize) -> Self {
        Self { func, cache: Cache::with_capacity(capacity) }
    }

    /// The number of memoized results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop the cache and return the wrapped function.
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<F, Args, R> Function<Args> for Memoized<F, Args, R>
where
    F: Function<Args, Output = R>,
    Args: Eq + Hash + Clone,
    R: Clone,
{
    type Output = R;

    fn apply(&self, args: Args) -> R {
        memoized(&self.cache, args, true, |args| self.func.apply(args))
    }
}

impl<F, Args, R> Memoize<Args> for Memoized<F, Args, R>
where
    Self: Function<Args>,
{
    type Memoized = Self;

    fn memoize(self) -> Self {
        self
    }
}

impl<F, Args, R> Debug for Memoized<F, Args, R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Memoized").field("len", &self.len()).finish_non_exhaustive()
    }
}

/// A fallible function whose successful results are memoized.
///
/// Errors and panics are never memoized.
pub struct TryMemoized<F, Args, T> {
    func: F,
    cache: Cache<Args, T>,
}

impl<F, Args, T> TryMemoized<F, Args, T> {
    /// Wrap a function.
    pub fn new(func: F) -> Self {
        Self { func, cache: Cache::new() }
    }

    /// Wrap a function, preallocating room for `capacity` argument tuples.
    pub fn with_capacity(func: F, capacity: usize) -> Self {
        Self { func, cache: Cache::with_capacity(capacity) }
    }

    /// The number of memoized results.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop the cache and return the wrapped function.
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<F, Args, T, E> Function<Args> for TryMemoized<F, Args, T>
where
    F: Function<Args, Output = Result<T, E>>,
    Args: Eq + Hash + Clone,
    T: Clone,
{
    type Output = Result<T, E>;

    fn apply(&self, args: Args) -> Result<T, E> {
        try_memoized(&self.cache, args, true, |args| self.func.apply(args))
    }
}

impl<F, Args, T> TryMemoize<Args> for TryMemoized<F, Args, T>
where
    Self: Function<Args>,
{
    type Memoized = Self;

    fn try_memoize(self) -> Self {
        self
    }
}

impl<F, Args, T> Debug for TryMemoized<F, Args, T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("TryMemoized").field("len", &self.len()).finish_non_exhaustive()
    }
}

/// Implement `Memoize` and `TryMemoize` for plain closures of one arity.
macro_rules! impl_memoize {
    ($($ty:ident),*) => {
        impl<Func, Ret, $($ty,)*> Memoize<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret,
            ($($ty,)*): Eq + Hash + Clone,
            Ret: Clone,
        {
            type Memoized = Memoized<Func, ($($ty,)*), Ret>;

            fn memoize(self) -> Self::Memoized {
                Memoized::new(self)
            }
        }

        impl<Func, Val, Fail, $($ty,)*> TryMemoize<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Result<Val, Fail>,
            ($($ty,)*): Eq + Hash + Clone,
            Val: Clone,
        {
            type Memoized = TryMemoized<Func, ($($ty,)*), Val>;

            fn try_memoize(self) -> Self::Memoized {
                TryMemoized::new(self)
            }
        }
    };
}

impl_memoize!();
impl_memoize!(A);
impl_memoize!(A, B);
impl_memoize!(A, B, C);
impl_memoize!(A, B, C, D);
impl_memoize!(A, B, C, D, E);
impl_memoize!(A, B, C, D, E, G);

/// Implement `Memoize` and `TryMemoize` for one of this crate's wrappers by
/// wrapping it in a fresh cache.
macro_rules! impl_memoize_wrapper {
    ($name:ident<$($param:ident),*>) => {
        impl<$($param,)* Args> $crate::memoize::Memoize<Args> for $name<$($param),*>
        where
            Self: $crate::function::Function<Args>,
            Args: Eq + ::std::hash::Hash + Clone,
            <Self as $crate::function::Function<Args>>::Output: Clone,
        {
            type Memoized = $crate::memoize::Memoized<
                Self,
                Args,
                <Self as $crate::function::Function<Args>>::Output,
            >;

            fn memoize(self) -> Self::Memoized {
                $crate::memoize::Memoized::new(self)
            }
        }

        impl<$($param,)* Args, Val, Fail> $crate::memoize::TryMemoize<Args> for $name<$($param),*>
        where
            Self: $crate::function::Function<Args, Output = Result<Val, Fail>>,
            Args: Eq + ::std::hash::Hash + Clone,
            Val: Clone,
        {
            type Memoized = $crate::memoize::TryMemoized<Self, Args, Val>;

            fn try_memoize(self) -> Self::Memoized {
                $crate::memoize::TryMemoized::new(self)
            }
        }
    };
}

pub(crate) use impl_memoize_wrapper;

/// Executes a function, trying to use a cached result for it.
///
/// When `enabled` is false, the cache is bypassed entirely.
pub fn memoized<Args, R, F>(cache: &Cache<Args, R>, args: Args, enabled: bool, func: F) -> R
where
    Args: Eq + Hash + Clone,
    R: Clone,
    F: FnOnce(Args) -> R,
{
    if !enabled {
        let output = func(args);

        #[cfg(feature = "testing")]
        crate::testing::register(Hit::No);

        return output;
    }

    let (output, hit) = cache.get_or_insert_with(args, func);
    record(hit);
    output
}

/// Executes a fallible function, trying to use a cached result for it.
///
/// Only `Ok` values are stored. When `enabled` is false, the cache is bypassed
/// entirely.
pub fn try_memoized<Args, T, E, F>(
    cache: &Cache<Args, T>,
    args: Args,
    enabled: bool,
    func: F,
) -> Result<T, E>
where
    Args: Eq + Hash + Clone,
    T: Clone,
    F: FnOnce(Args) -> Result<T, E>,
{
    if !enabled {
        let output = func(args);

        #[cfg(feature = "testing")]
        crate::testing::register(Hit::No);

        return output;
    }

    match cache.get_or_try_insert_with(args, func) {
        Ok((output, hit)) => {
            record(hit);
            Ok(output)
        }
        Err(err) => {
            debug!("memoized call failed, result was not cached");

            #[cfg(feature = "testing")]
            crate::testing::register(Hit::No);

            Err(err)
        }
    }
}

/// Log and, during testing, record the outcome of a lookup.
fn record(hit: Hit) {
    trace!(hit = (hit == Hit::Yes), "memoized call");

    #[cfg(feature = "testing")]
    crate::testing::register(hit);
}
