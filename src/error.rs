use std::error::Error;

use thiserror::Error;

/// A boxed error that can cross threads.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// The failure of a wrapped callback, produced by [`nest`](crate::nest).
///
/// Carries the original error's message and keeps the original error as its
/// [`source`](Error::source).
///
/// ```
/// use std::error::Error;
/// use memofn::CallbackError;
///
/// let err = CallbackError::new("disk on fire".to_string());
/// assert_eq!(err.message(), "disk on fire");
/// assert_eq!(err.to_string(), "callback failed: disk on fire");
/// assert!(err.source().is_some());
/// ```
#[derive(Debug, Error)]
#[error("callback failed: {message}")]
pub struct CallbackError {
    message: String,
    source: BoxError,
}

impl CallbackError {
    /// Wrap an error.
    pub fn new<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self { message: source.to_string(), source }
    }

    /// The message of the wrapped error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Try to get the wrapped error back as its concrete type.
    pub fn downcast<E>(self) -> Result<E, Self>
    where
        E: Error + 'static,
    {
        match self.source.downcast::<E>() {
            Ok(source) => Ok(*source),
            Err(source) => Err(Self { message: self.message, source }),
        }
    }

    /// Try to get a reference to the wrapped error as its concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.source.downcast_ref::<E>()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Timeout(u32);

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "timed out after {}ms", self.0)
        }
    }

    impl Error for Timeout {}

    #[test]
    fn test_wraps_message_and_source() {
        let err = CallbackError::new(Timeout(50));
        assert_eq!(err.message(), "timed out after 50ms");
        assert_eq!(err.to_string(), "callback failed: timed out after 50ms");
        assert_eq!(err.source().map(ToString::to_string), Some(err.message().to_string()));
        assert_eq!(err.downcast_ref::<Timeout>(), Some(&Timeout(50)));
    }

    #[test]
    fn test_downcast() {
        let err = CallbackError::new(Timeout(5));
        let err = err.downcast::<std::io::Error>().unwrap_err();
        assert_eq!(err.downcast::<Timeout>().unwrap(), Timeout(5));
    }
}
