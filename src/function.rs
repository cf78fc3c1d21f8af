/// A callable that takes its arguments as a tuple.
///
/// This is implemented for all closures and function items with up to six
/// arguments and for every wrapper in this crate, so that wrappers can be
/// stacked on top of each other:
///
/// ```
/// use memofn::Function;
///
/// let sum = |a: u32, b: u32| a + b;
/// assert_eq!(sum.apply((2, 3)), 5);
/// ```
pub trait Function<Args> {
    /// The value produced by a call.
    type Output;

    /// Call the function with a tuple of arguments.
    fn apply(&self, args: Args) -> Self::Output;
}

macro_rules! impl_function {
    ($($arg:ident: $ty:ident),*) => {
        impl<Func, Ret, $($ty,)*> Function<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            fn apply(&self, ($($arg,)*): ($($ty,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_function!();
impl_function!(a: A);
impl_function!(a: A, b: B);
impl_function!(a: A, b: B, c: C);
impl_function!(a: A, b: B, c: C, d: D);
impl_function!(a: A, b: B, c: C, d: D, e: E);
impl_function!(a: A, b: B, c: C, d: D, e: E, f: G);
