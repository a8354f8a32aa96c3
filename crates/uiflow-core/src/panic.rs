use std::any::Any;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::error::{Error, Result};

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}

/// Runs `f`, turning a panic into [`Error::Panicked`].
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Error::Panicked {
        message: panic_message(&*payload),
    })
}

/// Future adapter that turns a panic during `poll` into [`Error::Panicked`].
pub struct CatchUnwind<F: Future> {
    inner: Option<Pin<Box<F>>>,
}

pub fn catch_future<F: Future>(future: F) -> CatchUnwind<F> {
    CatchUnwind {
        inner: Some(Box::pin(future)),
    }
}

impl<F: Future> Future for CatchUnwind<F> {
    type Output = Result<F::Output>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(inner) = self.inner.as_mut() else {
            panic!("CatchUnwind polled after completion");
        };
        let polled = catch_unwind(AssertUnwindSafe(|| inner.as_mut().poll(cx)));
        let out = match polled {
            Ok(Poll::Pending) => return Poll::Pending,
            Ok(Poll::Ready(v)) => Ok(v),
            Err(payload) => Err(Error::Panicked {
                message: panic_message(&*payload),
            }),
        };
        self.inner = None;
        Poll::Ready(out)
    }
}
