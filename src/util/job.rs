// SPDX-License-Identifier: GPL-3.0-or-later

/// Handle on a fire-and-forget background computation yielding a bool.
///
/// The checklist uses one of these for the periodic "is the file still
/// valid" re-check: it never blocks on the job, it only issues a new run
/// when `is_active()` says the previous one finished, and it consumes the
/// outcome on a later poll. At-most-one-in-flight is the caller's contract,
/// enforced through `is_active()`.
pub trait BackgroundJob {
    /// Kick off one run. Must not be called while `is_active()`.
    fn issue(&mut self);

    fn is_active(&self) -> bool;

    /// Takes the result of the last finished run, if any.
    fn take_result(&mut self) -> Option<bool>;
}
