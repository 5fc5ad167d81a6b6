use thiserror::Error;
use tracing::warn;

/// Errors raised at the public boundary of [`crate::ConciseSet`].
///
/// The codec and append engine never return this type: they enforce their
/// preconditions by construction, so any failure surfaces here instead, at
/// the point a caller actually crosses into invalid territory.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConciseError {
    #[error("element {value} is out of range (must be in [0, {max}])")]
    OutOfRange { value: i64, max: i32 },

    #[error("index {index} is out of range for a set of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("no such element")]
    NoSuchElement,

    #[error("iterator used after its set was structurally modified")]
    ConcurrentModification,

    #[error("operation not supported")]
    Unsupported,

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },
}

pub type Result<T> = std::result::Result<T, ConciseError>;

impl ConciseError {
    pub(crate) fn out_of_range(value: i64, max: i32) -> Self {
        let err = ConciseError::OutOfRange { value, max };
        warn!(target: "concise", %err, "element out of range");
        err
    }

    pub(crate) fn index_out_of_range(index: usize, size: usize) -> Self {
        let err = ConciseError::IndexOutOfRange { index, size };
        warn!(target: "concise", %err, "positional index out of range");
        err
    }

    pub(crate) fn no_such_element() -> Self {
        let err = ConciseError::NoSuchElement;
        warn!(target: "concise", %err, "no such element");
        err
    }

    pub(crate) fn concurrent_modification() -> Self {
        let err = ConciseError::ConcurrentModification;
        warn!(target: "concise", %err, "concurrent modification detected");
        err
    }

    pub(crate) fn invalid_argument(reason: &'static str) -> Self {
        let err = ConciseError::InvalidArgument { reason };
        warn!(target: "concise", %err, "invalid argument");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;
        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn out_of_range_logs_a_warning_once() {
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_max_level(tracing::Level::WARN)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = ConciseError::out_of_range(-1, 100);
        });
        let logged = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("element out of range"));
    }
}
