//! Run with `cargo test --all-features`.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use memofn::{memoize, Function, FunctionExt, Prehashed};
use serial_test::serial;

macro_rules! test {
    (miss: $call:expr, $result:expr) => {{
        assert_eq!($call, $result);
        assert!(!memofn::internal::last_was_hit());
    }};
    (hit: $call:expr, $result:expr) => {{
        assert_eq!($call, $result);
        assert!(memofn::internal::last_was_hit());
    }};
}

/// Test basic memoization.
#[test]
fn test_basic() {
    #[memoize]
    fn empty() -> String {
        format!("The world is {}", "big")
    }

    #[memoize]
    fn double(x: u32) -> u32 {
        2 * x
    }

    #[memoize]
    fn sum(a: u32, b: u32) -> u32 {
        a + b
    }

    #[memoize]
    fn fib(n: u32) -> u32 {
        if n <= 2 { 1 } else { fib(n - 1) + fib(n - 2) }
    }

    #[memoize]
    fn sum_iter(n: u32) -> u32 {
        (0..n).sum()
    }

    test!(miss: empty(), "The world is big");
    test!(hit: empty(), "The world is big");
    test!(hit: empty(), "The world is big");

    test!(miss: double(2), 4);
    test!(miss: double(4), 8);
    test!(hit: double(2), 4);

    test!(miss: sum(2, 4), 6);
    test!(miss: sum(2, 3), 5);
    test!(hit: sum(2, 3), 5);
    test!(miss: sum(4, 2), 6);

    test!(miss: fib(5), 5);
    test!(hit: fib(3), 2);
    test!(miss: fib(8), 21);
    test!(hit: fib(7), 13);

    test!(miss: sum_iter(1000), 499500);
    test!(hit: sum_iter(1000), 499500);
}

/// Test that `None` is memoized like any other value.
#[test]
fn test_none_is_memoized() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[memoize]
    fn lookup(key: &'static str) -> Option<u32> {
        CALLS.fetch_add(1, Ordering::SeqCst);
        match key {
            "one" => Some(1),
            _ => None,
        }
    }

    test!(miss: lookup("two"), None);
    test!(hit: lookup("two"), None);
    test!(miss: lookup("one"), Some(1));
    assert_eq!(CALLS.load(Ordering::SeqCst), 2);
}

/// Test that failures of fallible functions are not memoized.
#[test]
#[serial]
fn test_fallible() {
    static FLAKY: AtomicBool = AtomicBool::new(true);

    #[memoize(fallible)]
    fn fetch(id: u32) -> Result<String, String> {
        if FLAKY.swap(false, Ordering::SeqCst) {
            return Err(format!("connection reset while fetching {id}"));
        }
        Ok(format!("item {id}"))
    }

    test!(miss: fetch(7), Err("connection reset while fetching 7".to_string()));
    test!(miss: fetch(7), Ok("item 7".to_string()));
    test!(hit: fetch(7), Ok("item 7".to_string()));
}

/// Test that `?` works inside fallible memoized functions.
#[test]
fn test_fallible_question_mark() {
    #[memoize(fallible)]
    fn parse_sum(a: String, b: String) -> Result<i64, std::num::ParseIntError> {
        Ok(a.parse::<i64>()? + b.parse::<i64>()?)
    }

    test!(miss: parse_sum("1".into(), "2".into()), Ok(3));
    test!(hit: parse_sum("1".into(), "2".into()), Ok(3));
    assert!(parse_sum("1".into(), "x".into()).is_err());
    assert!(!memofn::internal::last_was_hit());
}

/// Test the `enabled` switch.
#[test]
#[serial]
fn test_enabled() {
    static ENABLED: AtomicBool = AtomicBool::new(false);

    #[memoize(enabled = ENABLED.load(Ordering::SeqCst))]
    fn triple(x: u8) -> u8 {
        3 * x
    }

    test!(miss: triple(3), 9);
    test!(miss: triple(3), 9);
    ENABLED.store(true, Ordering::SeqCst);
    test!(miss: triple(3), 9);
    test!(hit: triple(3), 9);
    ENABLED.store(false, Ordering::SeqCst);
    test!(miss: triple(3), 9);
}

/// Test that a function that is memoized in place shares its cache across
/// threads.
#[test]
#[serial]
fn test_shared_across_threads() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[memoize]
    fn slow_square(x: u64) -> u64 {
        CALLS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(std::time::Duration::from_millis(20));
        x * x
    }

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                slow_square(12)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 144);
    }

    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    test!(hit: slow_square(12), 144);
}

/// Test hit tracking of wrapped closures.
#[test]
fn test_wrappers() {
    let shout = memoize((|text: Prehashed<String>| text.to_uppercase()).and_then(|s: String| s + "!"));
    let hello = Prehashed::new("hello".to_string());
    test!(miss: shout.apply((hello.clone(),)), "HELLO!");
    test!(hit: shout.apply((hello,)), "HELLO!");
    test!(miss: shout.apply((Prehashed::new("bye".to_string()),)), "BYE!");
}
