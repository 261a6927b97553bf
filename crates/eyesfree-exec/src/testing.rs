//! Test doubles for [`CommandRunner`].

use std::cell::RefCell;

use crate::error::ExecResult;
use crate::runner::{CommandRunner, Invocation, Outcome};

type Handler = Box<dyn Fn(&Invocation) -> Outcome>;

/// Records every invocation instead of spawning it.
///
/// By default every invocation succeeds. A handler can fake the tool's side
/// effects (writing its output file) and choose the exit code.
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    handler: Handler,
}

impl RecordingRunner {
    /// A runner where every invocation succeeds and does nothing.
    pub fn new() -> Self {
        Self::with_handler(|_| Outcome::success())
    }

    /// A runner that delegates each invocation to `handler`.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&Invocation) -> Outcome + 'static,
    {
        Self {
            calls: RefCell::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// A runner whose `n`th invocation (zero-based) exits with `code`.
    pub fn failing_at(n: usize, code: i32) -> Self {
        let counter = std::cell::Cell::new(0usize);
        Self::with_handler(move |_| {
            let index = counter.get();
            counter.set(index + 1);
            if index == n {
                Outcome::from_code(code)
            } else {
                Outcome::success()
            }
        })
    }

    /// Returns the recorded invocations in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Returns the program names of recorded invocations, e.g. `["say", "sox"]`.
    pub fn program_names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program_name()).collect()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> ExecResult<Outcome> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok((self.handler)(invocation))
    }
}
