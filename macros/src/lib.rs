extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("memofn: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;
mod utils;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_quote, Error, Result};

/// Memoize a free function.
///
/// Each memoized function gets its own cache. A call whose arguments equal
/// those of an earlier successful call returns a clone of the earlier result
/// without running the body again. All argument types must be
/// `Eq + Hash + Clone + Send + Sync + 'static` and the return type must be
/// `Clone + Send + Sync + 'static`.
///
/// The examples below are checked through `memofn`, which re-exports this
/// attribute: see its crate documentation and `tests/tests.rs`.
///
/// ```ignore
/// #[memoize]
/// fn describe(width: u32, height: u32) -> String {
///     format!("The image is {width}x{height} pixels.")
/// }
/// ```
///
/// # Options
/// - `fallible`: The function returns a `Result` and only `Ok` values are
///   memoized. An `Err` is returned as-is and the next call retries.
/// - `enabled = <expr>`: The boolean expression is evaluated on every call.
///   When it is false, the cache is bypassed.
///
/// ```ignore
/// #[memoize(fallible, enabled = !cfg!(test))]
/// fn load(path: PathBuf) -> io::Result<Arc<[u8]>> {
///     std::fs::read(path).map(Into::into)
/// }
/// ```
///
/// The cache is never evicted. Memoized functions must not call themselves
/// with the same arguments, as that call would wait for itself forever.
#[proc_macro_attribute]
pub fn memoize(args: TokenStream, stream: TokenStream) -> TokenStream {
    let meta = syn::parse_macro_input!(args as memoize::Meta);
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(meta, func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
