// SPDX-License-Identifier: GPL-3.0-or-later

//! Pre-print checklist and print-control glue for an FDM printer mainboard.
//!
//! The heart of this crate is [`PrintPreview`]: a cooperative state machine
//! that runs every check standing between "the user tapped a file" and "the
//! print is allowed to start". It talks to the rest of the firmware through
//! the collaborator traits bundled in [`Printer`], which makes the whole
//! checklist runnable on a host machine against mocks.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

pub mod consts;
pub mod util;

pub mod capabilities;
pub mod enclosure;
pub mod filament;
pub mod fsm;
pub mod gcode;
pub mod machine;
pub mod preview;
pub mod tools;

pub use capabilities::{Capabilities, ToolsMappingSkip};
pub use machine::Printer;
pub use preview::{LoopResult, PrintPreview, State};
