//! This example memoizes a free function in place and a closure through a
//! wrapper, and recovers from a failing lookup.

use memofn::{memoize, try_memoize, Function, FunctionExt};

fn main() {
    println!("{}", describe(20, 40)); // [Miss] The cache is empty.
    println!("{}", describe(20, 40)); // [Hit] Same size.
    println!("{}", describe(80, 30)); // [Miss] Different size.

    let area = memoize(|width: u32, height: u32| width * height);
    println!("area: {}", area.apply((20, 40))); // [Miss]
    println!("area: {}", area.apply((20, 40))); // [Hit]

    let lookup = try_memoize(
        (|name: &'static str| match name {
            "logo" => Ok(64),
            _ => Err(format!("no image named {name}")),
        })
        .recover(|err: String| {
            eprintln!("{err}, falling back to a placeholder");
            |_: &'static str| Ok(1)
        }),
    );
    println!("logo: {:?}", lookup.apply(("logo",))); // [Miss]
    println!("banner: {:?}", lookup.apply(("banner",))); // [Miss] Recovered.
    println!("banner: {:?}", lookup.apply(("banner",))); // [Hit]
}

/// Describe an image size humanly readable.
#[memoize]
fn describe(width: u32, height: u32) -> &'static str {
    if width > 50 || height > 50 { "The image is big!" } else { "The image is small!" }
}
