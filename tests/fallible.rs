use std::error::Error;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

use memofn::{nest, nest_with, recover, try_memoize, CallbackError, Function, FunctionExt};

#[derive(Debug, Clone, PartialEq)]
enum FetchError {
    NotFound(u32),
    Offline,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record {id} not found"),
            Self::Offline => f.write_str("backend is offline"),
        }
    }
}

impl Error for FetchError {}

fn fetch(id: u32) -> Result<String, FetchError> {
    match id {
        0 => Err(FetchError::Offline),
        1..=9 => Ok(format!("record {id}")),
        _ => Err(FetchError::NotFound(id)),
    }
}

fn from_backup(id: u32) -> Result<String, FetchError> {
    if id == 0 { Err(FetchError::NotFound(0)) } else { Ok(format!("backup {id}")) }
}

#[test]
fn test_recover_delegates_to_substitute() {
    let handled = AtomicUsize::new(0);
    let resilient = recover(fetch, |err: FetchError| {
        handled.fetch_add(1, Ordering::SeqCst);
        assert_eq!(err, FetchError::NotFound(42));
        from_backup
    });

    assert_eq!(resilient.apply((3,)), Ok("record 3".to_string()));
    assert_eq!(handled.load(Ordering::SeqCst), 0);

    assert_eq!(resilient.apply((42,)), from_backup(42));
    assert_eq!(handled.load(Ordering::SeqCst), 1);
}

#[test]
fn test_recover_propagates_substitute_failure() {
    let resilient = recover(fetch, |_: FetchError| from_backup);
    assert_eq!(resilient.apply((0,)), Err(FetchError::NotFound(0)));
}

#[test]
fn test_recover_chooses_substitute_by_error() {
    let resilient = fetch.recover(|err: FetchError| {
        move |id: u32| match &err {
            FetchError::Offline => Ok("cached copy".to_string()),
            FetchError::NotFound(_) => Ok(format!("placeholder for {id}")),
        }
    });

    assert_eq!(resilient.apply((0,)), Ok("cached copy".to_string()));
    assert_eq!(resilient.apply((77,)), Ok("placeholder for 77".to_string()));
}

#[test]
fn test_panic_bypasses_handler() {
    let handled = AtomicUsize::new(0);
    let explosive = |id: u32| -> Result<u32, FetchError> {
        assert!(id < 100, "id {id} out of range");
        Ok(id)
    };
    let guarded = recover(explosive, |_: FetchError| {
        handled.fetch_add(1, Ordering::SeqCst);
        |_: u32| Ok(0)
    });

    let payload = catch_unwind(AssertUnwindSafe(|| guarded.apply((500,)))).unwrap_err();
    assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("id 500 out of range"));
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[test]
fn test_nest_wraps_message_and_source() {
    let strict = nest(fetch);
    let err: CallbackError = strict.apply((42,)).unwrap_err();
    assert_eq!(err.message(), "record 42 not found");
    assert_eq!(err.to_string(), "callback failed: record 42 not found");
    assert_eq!(err.downcast_ref::<FetchError>(), Some(&FetchError::NotFound(42)));
    assert!(err.source().is_some());
    assert_eq!(strict.apply((5,)).unwrap(), "record 5");
}

#[test]
fn test_nest_with_custom_mapper() {
    #[derive(Debug, PartialEq)]
    struct Status(u16);

    let http = nest_with(fetch, |err: FetchError| match err {
        FetchError::NotFound(_) => Status(404),
        FetchError::Offline => Status(503),
    });

    assert_eq!(http.apply((0,)), Err(Status(503)));
    assert_eq!(http.apply((10,)), Err(Status(404)));
    assert_eq!(http.apply((1,)), Ok("record 1".to_string()));
}

#[test]
fn test_panic_bypasses_mapper() {
    let mapped = AtomicUsize::new(0);
    let strict = nest_with(
        |_: ()| -> Result<(), FetchError> { panic!("invariant violated") },
        |err: FetchError| {
            mapped.fetch_add(1, Ordering::SeqCst);
            err
        },
    );

    assert!(catch_unwind(AssertUnwindSafe(|| strict.apply(((),)))).is_err());
    assert_eq!(mapped.load(Ordering::SeqCst), 0);
}

#[test]
fn test_memoized_recovery_caches_substitute_results() {
    let primary = AtomicUsize::new(0);
    let backup = AtomicUsize::new(0);
    let lookup = try_memoize(
        (|id: u32| {
            primary.fetch_add(1, Ordering::SeqCst);
            fetch(id)
        })
        .recover(|_: FetchError| {
            |id: u32| {
                backup.fetch_add(1, Ordering::SeqCst);
                from_backup(id)
            }
        }),
    );

    assert_eq!(lookup.apply((50,)), Ok("backup 50".to_string()));
    assert_eq!(lookup.apply((50,)), Ok("backup 50".to_string()));
    assert_eq!(primary.load(Ordering::SeqCst), 1);
    assert_eq!(backup.load(Ordering::SeqCst), 1);

    // A failure that even the substitute cannot fix is not cached.
    assert!(lookup.apply((0,)).is_err());
    assert!(lookup.apply((0,)).is_err());
    assert_eq!(primary.load(Ordering::SeqCst), 3);
}
