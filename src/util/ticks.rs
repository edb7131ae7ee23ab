// SPDX-License-Identifier: GPL-3.0-or-later

/// Source of a free-running millisecond counter. The counter is allowed to
/// wrap; consumers must compare instants with [`ticks_diff`].
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed between `then` and `now`, correct across counter
/// wraparound as long as the real elapsed time fits in a u32.
pub fn ticks_diff(now: u32, then: u32) -> u32 {
    now.wrapping_sub(then)
}
