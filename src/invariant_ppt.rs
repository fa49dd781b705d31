//! Runtime invariant checking with contract-test support.
//!
//! [`assert_invariant!`] guards conditions that must hold by construction,
//! like a frame buffer matching its dimensions or the tracker's score and
//! frame changing together. Every check is also recorded in a per-thread
//! log, so a test can run an operation and then use [`contract_test`] to
//! prove the guards actually executed on that path.
//!
//! ```rust,ignore
//! assert_invariant!(
//!     frame.width > 0 && frame.height > 0,
//!     "Sharpness input must have non-zero dimensions",
//!     "sharpness_score"
//! );
//!
//! #[test]
//! fn contract_sharpness_guards_run() {
//!     let _ = sharpness_score(&some_frame());
//!     contract_test("sharpness scoring", &[
//!         "Sharpness input must have non-zero dimensions",
//!     ]);
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::thread_local;

thread_local! {
    static CHECKED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Assert an invariant, recording that it was checked.
///
/// Takes the condition, the invariant message, and optionally a context
/// tag naming the checking function. Panics when the condition is false;
/// an invariant violation is a logic error, never a recoverable state.
#[macro_export]
macro_rules! assert_invariant {
    ($condition:expr, $message:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, None)
    };
    ($condition:expr, $message:expr, $context:expr) => {
        $crate::invariant_ppt::__check_invariant($condition, $message, Some($context))
    };
}

/// Macro plumbing, not part of the public surface.
#[doc(hidden)]
pub fn __check_invariant(condition: bool, message: &str, context: Option<&str>) {
    CHECKED.with(|log| {
        log.borrow_mut().insert(message.to_string());
    });

    if !condition {
        panic!(
            "INVARIANT VIOLATION [{}]: {}",
            context.unwrap_or("unknown"),
            message
        );
    }
}

/// Fail unless every listed invariant was checked on this thread.
///
/// Run the operation under test first; the log only knows about checks
/// that already executed.
pub fn contract_test(test_name: &str, required_invariants: &[&str]) {
    let missing: Vec<&str> = CHECKED.with(|log| {
        let log = log.borrow();
        required_invariants
            .iter()
            .filter(|invariant| !log.contains(**invariant))
            .copied()
            .collect()
    });

    if !missing.is_empty() {
        panic!(
            "CONTRACT FAILURE [{}]: The following invariants were not checked:\n  - {}",
            test_name,
            missing.join("\n  - ")
        );
    }
}

/// Forget everything checked so far on this thread.
pub fn clear_invariant_log() {
    CHECKED.with(|log| {
        log.borrow_mut().clear();
    });
}
