// SPDX-License-Identifier: GPL-3.0-or-later

mod ticks;
pub use ticks::*;

mod job;
pub use job::*;
