//! Retry controller.
//!
//! Each step gets up to `retries + 1` attempts. The step's `delay` is slept
//! before every attempt; its `interval` only between a failed attempt and the
//! next one. Only execution failures are retried.

use crate::error::{Result, SherylError};
use crate::shell::CancelToken;
use crate::steps::{AttemptRunner, Step, StepRegistry};
use std::thread;
use std::time::{Duration, Instant};

/// Waits between attempts.
pub trait Sleeper {
    /// Sleep for `duration`.
    ///
    /// Returns `false` if `cancel` fired before or during the sleep.
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool;
}

/// Sleeps on the current thread, waking regularly to check for cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

const SLEEP_SLICE: Duration = Duration::from_millis(25);

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            thread::sleep(SLEEP_SLICE.min(deadline - now));
        }
    }
}

/// A failed attempt, reported before the next one is scheduled.
#[derive(Debug)]
pub struct AttemptFailure<'a> {
    /// The step, as left by the failed attempt.
    pub step: &'a Step,

    /// 1-based attempt number.
    pub attempt: u32,

    /// Upper bound on attempts for this step.
    pub max_attempts: u32,

    /// Why the attempt failed.
    pub error: &'a SherylError,

    /// Whether another attempt follows.
    pub will_retry: bool,
}

/// Run `step` until it succeeds or its attempts are used up.
///
/// `on_failure` is called once for every failed attempt, including the last.
///
/// # Errors
///
/// Returns the error of the final attempt, or `Cancelled` if the run was
/// interrupted during a sleep.
pub fn execute_with_retry(
    step: &mut Step,
    registry: &StepRegistry,
    runner: &mut dyn AttemptRunner,
    sleeper: &dyn Sleeper,
    cancel: &CancelToken,
    mut on_failure: impl FnMut(AttemptFailure<'_>),
) -> Result<Vec<u8>> {
    let max_attempts = step.max_attempts();
    let cancelled = |step: &Step| SherylError::Cancelled {
        step: step.name.clone(),
    };

    for attempt in 1..=max_attempts {
        if !sleeper.sleep(step.delay, cancel) {
            return Err(cancelled(&*step));
        }

        step.attempts = attempt;
        let error = match runner.run_attempt(step, registry) {
            Ok(output) => return Ok(output),
            Err(e) => e,
        };

        let will_retry = error.is_retryable() && attempt < max_attempts;
        on_failure(AttemptFailure {
            step: &*step,
            attempt,
            max_attempts,
            error: &error,
            will_retry,
        });
        if !will_retry {
            return Err(error);
        }

        tracing::debug!(
            "[{}] retrying in {:?} ({}/{})",
            step.name,
            step.interval,
            attempt + 1,
            max_attempts
        );
        if !sleeper.sleep(step.interval, cancel) {
            return Err(cancelled(&*step));
        }
    }

    // The loop returns on its last iteration; reaching here means no attempt ran.
    Err(cancelled(&*step))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records requested sleeps without sleeping.
    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
            self.sleeps.borrow_mut().push(duration);
            !cancel.is_cancelled()
        }
    }

    /// Plays back a fixed sequence of outcomes.
    struct ScriptedRunner {
        outcomes: VecDeque<Result<Vec<u8>>>,
        calls: u32,
    }

    impl ScriptedRunner {
        fn new(outcomes: Vec<Result<Vec<u8>>>) -> Self {
            Self {
                outcomes: outcomes.into(),
                calls: 0,
            }
        }

        fn failing() -> Result<Vec<u8>> {
            Err(SherylError::CommandFailed {
                command: "false".to_string(),
                code: Some(1),
            })
        }
    }

    impl AttemptRunner for ScriptedRunner {
        fn run_attempt(&mut self, _step: &mut Step, _registry: &StepRegistry) -> Result<Vec<u8>> {
            self.calls += 1;
            self.outcomes.pop_front().unwrap_or_else(Self::failing)
        }
    }

    fn step(retries: u32) -> Step {
        Step::new("s", "cmd")
            .with_retries(retries)
            .with_delay(Duration::from_millis(1))
            .with_interval(Duration::from_millis(7))
    }

    #[test]
    fn success_on_first_attempt() {
        let mut s = step(3);
        let mut runner = ScriptedRunner::new(vec![Ok(b"ok".to_vec())]);
        let sleeper = RecordingSleeper::default();
        let mut failures = 0;

        let out = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &CancelToken::new(),
            |_| failures += 1,
        )
        .unwrap();

        assert_eq!(out, b"ok");
        assert_eq!(runner.calls, 1);
        assert_eq!(failures, 0);
        assert_eq!(s.attempts, 1);
        assert_eq!(*sleeper.sleeps.borrow(), vec![Duration::from_millis(1)]);
    }

    #[test]
    fn succeeds_after_k_failures() {
        let mut s = step(3);
        let mut runner = ScriptedRunner::new(vec![
            ScriptedRunner::failing(),
            ScriptedRunner::failing(),
            Ok(b"third".to_vec()),
        ]);
        let sleeper = RecordingSleeper::default();

        let out = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &CancelToken::new(),
            |_| {},
        )
        .unwrap();

        assert_eq!(out, b"third");
        assert_eq!(runner.calls, 3);
        let delay = Duration::from_millis(1);
        let interval = Duration::from_millis(7);
        assert_eq!(
            *sleeper.sleeps.borrow(),
            vec![delay, interval, delay, interval, delay]
        );
    }

    #[test]
    fn always_failing_uses_every_attempt() {
        let mut s = step(2);
        let mut runner = ScriptedRunner::new(vec![]);
        let sleeper = RecordingSleeper::default();
        let mut reported = Vec::new();

        let err = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &CancelToken::new(),
            |f| reported.push((f.attempt, f.max_attempts, f.will_retry)),
        )
        .unwrap_err();

        assert!(matches!(err, SherylError::CommandFailed { .. }));
        assert_eq!(runner.calls, 3);
        assert_eq!(reported, vec![(1, 3, true), (2, 3, true), (3, 3, false)]);

        let sleeps = sleeper.sleeps.borrow();
        let intervals = sleeps.iter().filter(|d| **d == Duration::from_millis(7)).count();
        let delays = sleeps.iter().filter(|d| **d == Duration::from_millis(1)).count();
        assert_eq!(intervals, 2);
        assert_eq!(delays, 3);
    }

    #[test]
    fn zero_retries_means_one_attempt() {
        let mut s = step(0);
        let mut runner = ScriptedRunner::new(vec![]);
        let sleeper = RecordingSleeper::default();

        let result = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &CancelToken::new(),
            |_| {},
        );

        assert!(result.is_err());
        assert_eq!(runner.calls, 1);
        assert_eq!(sleeper.sleeps.borrow().len(), 1);
    }

    #[test]
    fn template_errors_are_not_retried() {
        let mut s = step(5);
        let mut runner = ScriptedRunner::new(vec![Err(SherylError::Template {
            step: "s".to_string(),
            message: "no step".to_string(),
        })]);
        let sleeper = RecordingSleeper::default();

        let err = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &CancelToken::new(),
            |f| assert!(!f.will_retry),
        )
        .unwrap_err();

        assert!(matches!(err, SherylError::Template { .. }));
        assert_eq!(runner.calls, 1);
    }

    #[test]
    fn cancellation_stops_before_next_attempt() {
        let mut s = step(5);
        let mut runner = ScriptedRunner::new(vec![]);
        let sleeper = RecordingSleeper::default();
        let cancel = CancelToken::new();
        let trigger = cancel.clone();

        let err = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &sleeper,
            &cancel,
            |_| trigger.cancel(),
        )
        .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(runner.calls, 1);
    }

    #[test]
    fn thread_sleeper_waits_at_least_duration() {
        let start = Instant::now();
        assert!(ThreadSleeper.sleep(Duration::from_millis(30), &CancelToken::new()));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn thread_sleeper_wakes_on_cancel() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let start = Instant::now();
        assert!(!ThreadSleeper.sleep(Duration::from_secs(10), &cancel));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn real_interval_separates_attempts() {
        let mut s = Step::new("fail", "exit 1")
            .with_retries(2)
            .with_interval(Duration::from_millis(10));
        let mut runner = crate::steps::ShellRunner::default();
        let mut ends = Vec::new();

        let result = execute_with_retry(
            &mut s,
            &StepRegistry::new(),
            &mut runner,
            &ThreadSleeper,
            &CancelToken::new(),
            |f| ends.push((f.step.start_at.unwrap(), f.step.end_at.unwrap())),
        );

        assert!(result.is_err());
        assert_eq!(ends.len(), 3);
        for pair in ends.windows(2) {
            let gap = pair[1].0 - pair[0].1;
            assert!(gap >= chrono::Duration::milliseconds(10), "gap was {:?}", gap);
        }
    }
}
