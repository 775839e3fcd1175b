//! Scoped logging contexts
//!
//! A [`LoggingContext`] injects attributes into every record logged on the
//! current thread while it is open. Contexts nest: an inner context may
//! shadow a key of an outer one, and closing the inner context restores the
//! outer value.
//!
//! Release is conditional. Dropping (or calling [`LoggingContext::dispose`])
//! tears the context down only when it was [completed](LoggingContext::complete)
//! or opened with `auto_complete`; otherwise its attributes stay live on the
//! thread until an outer context closes.
//!
//! # Example
//!
//! ```
//! use rust_context_logger::core::LoggingContext;
//!
//! {
//!     let _request = LoggingContext::open_kv("request_id", "R1", true);
//!     assert_eq!(LoggingContext::thread_attributes().len(), 1);
//! }
//! assert!(LoggingContext::thread_attributes().is_empty());
//! ```

use super::attributes::{AttributeMap, FieldValue};
use super::context_stack::{ContextId, ContextStack};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

thread_local! {
    static THREAD_STACK: RefCell<ContextStack> = RefCell::new(ContextStack::new());
}

#[cfg(feature = "task-local")]
tokio::task_local! {
    static TASK_STACK: RefCell<ContextStack>;
}

/// Which stack a context was opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackKind {
    Thread,
    #[cfg(feature = "task-local")]
    Task,
}

impl StackKind {
    /// Inside `with_task_context` the task's own stack; otherwise the
    /// thread-local one
    fn current() -> Self {
        #[cfg(feature = "task-local")]
        if TASK_STACK.try_with(|_| ()).is_ok() {
            return StackKind::Task;
        }
        StackKind::Thread
    }
}

/// Run `f` against the stack of the given kind.
///
/// Returns `None` when that stack is unavailable: thread teardown, a task
/// stack whose scope has ended, or re-entry from within `f`.
fn with_stack<R>(kind: StackKind, f: impl FnOnce(&mut ContextStack) -> R) -> Option<R> {
    match kind {
        StackKind::Thread => THREAD_STACK
            .try_with(|cell| cell.try_borrow_mut().ok().map(|mut stack| f(&mut stack)))
            .ok()
            .flatten(),
        #[cfg(feature = "task-local")]
        StackKind::Task => TASK_STACK
            .try_with(|cell| cell.try_borrow_mut().ok().map(|mut stack| f(&mut stack)))
            .ok()
            .flatten(),
    }
}

/// Run `f` against the stack of the current execution unit
pub(crate) fn with_current_stack<R>(f: impl FnOnce(&mut ContextStack) -> R) -> Option<R> {
    with_stack(StackKind::current(), f)
}

/// Run a future with its own context stack.
///
/// Contexts opened inside `future` live on a task-local stack that follows
/// the task across worker threads. Guards are `!Send`, so open and release
/// them between await points.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use rust_context_logger::core::{with_task_context, LoggingContext};
///
/// with_task_context(async {
///     let ctx = LoggingContext::open_kv("job", "import", true);
///     assert_eq!(LoggingContext::open_count(), 1);
///     drop(ctx);
///     tokio::task::yield_now().await;
/// })
/// .await;
/// # }
/// ```
#[cfg(feature = "task-local")]
pub async fn with_task_context<F: std::future::Future>(future: F) -> F::Output {
    TASK_STACK.scope(RefCell::new(ContextStack::new()), future).await
}

/// Guard for one open logging context
///
/// Owned by the thread that opened it; the guard is neither `Send` nor
/// `Sync`. Every later operation goes to the stack the context was opened
/// on, even when called from inside a different `with_task_context` scope.
#[derive(Debug)]
#[must_use = "dropping the context immediately ends its scope"]
pub struct LoggingContext {
    id: ContextId,
    stack: StackKind,
    completed: bool,
    auto_complete: bool,
    disposed: bool,
    _not_send: PhantomData<Rc<()>>,
}

impl LoggingContext {
    /// Open a context and push it onto the current thread's stack.
    ///
    /// Attributes are merged with [`add`](Self::add) one by one, so a key
    /// repeated in `attributes` keeps its first value.
    pub fn open<I, K, V>(attributes: I, auto_complete: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let id = ContextId::next();
        let stack = StackKind::current();
        with_stack(stack, |frames| frames.push(id));

        let mut context = Self {
            id,
            stack,
            completed: false,
            auto_complete,
            disposed: false,
            _not_send: PhantomData,
        };
        context.add_all(attributes);
        context
    }

    /// Open a context with a single attribute
    pub fn open_kv<K, V>(key: K, value: V, auto_complete: bool) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::open([(key, value)], auto_complete)
    }

    /// Open an empty context
    pub fn open_empty(auto_complete: bool) -> Self {
        Self::open(std::iter::empty::<(String, FieldValue)>(), auto_complete)
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Add an attribute to this context.
    ///
    /// No-op if this context already owns `key`, or if it has been closed.
    pub fn add<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let id = self.id;
        let (key, value) = (key.into(), value.into());
        with_stack(self.stack, |stack| stack.add(id, key, value));
        self
    }

    pub fn add_all<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        for (key, value) in attributes {
            self.add(key, value);
        }
        self
    }

    /// Authorize teardown on release
    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_auto_complete(&self) -> bool {
        self.auto_complete
    }

    /// Whether this context is still on the stack it was opened on
    pub fn is_open(&self) -> bool {
        let id = self.id;
        with_stack(self.stack, |stack| stack.is_open(id)).unwrap_or(false)
    }

    /// Release the context.
    ///
    /// Tears down only if completed or auto-completing: contexts opened after
    /// this one are force-closed, then this context's attributes are removed
    /// and the values it shadowed are restored. Teardown runs at most once; a
    /// release skipped for lack of completion can be retried after
    /// [`complete`](Self::complete). Unlike a dispose-once guard, a skipped
    /// release does not mark the context disposed.
    pub fn dispose(&mut self) {
        if self.disposed || !(self.completed || self.auto_complete) {
            return;
        }

        let id = self.id;
        if with_stack(self.stack, |stack| stack.close(id)).is_some() {
            self.disposed = true;
        }
    }

    /// Complete and release in one step
    pub fn finish(mut self) {
        self.complete();
        self.dispose();
    }

    /// Snapshot of the attributes currently effective on this thread
    pub fn thread_attributes() -> AttributeMap {
        with_current_stack(|stack| stack.attributes().clone()).unwrap_or_default()
    }

    /// Number of contexts open on this thread
    pub fn open_count() -> usize {
        with_current_stack(|stack| stack.depth()).unwrap_or(0)
    }

    /// Drop every open context and attribute on this thread
    pub fn reset_current() {
        with_current_stack(ContextStack::clear);
    }
}

impl Drop for LoggingContext {
    fn drop(&mut self) {
        self.dispose();
    }
}
