// SPDX-License-Identifier: GPL-3.0-or-later

mod first_layer;
pub use first_layer::*;

use core::fmt::Write;

use bitflags::bitflags;

use crate::consts::gcode::MAX_COMMAND_LEN;
use crate::filament::FilamentName;

pub type GcodeCommand = heapless::String<MAX_COMMAND_LEN>;

bitflags! {
    /// Ways the G-code file can disagree with the machine it is about to
    /// run on.
    pub struct CompatMismatch: u8 {
        const PRINTER_MODEL    = 1 << 0;
        const FIRMWARE_VERSION = 1 << 1;
        const GCODE_LEVEL      = 1 << 2;
        const NOZZLE_DIAMETER  = 1 << 3;
    }
}

/// Compatibility verdict extracted from the file's metadata.
///
/// `fatal` marks the subset of mismatches the user may not override. The
/// nozzle-diameter mismatch can be excluded from both queries: when the
/// tools-mapping screen will run, diameters are reconciled there instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterCompat {
    pub mismatches: CompatMismatch,
    pub fatal: CompatMismatch,
}

impl PrinterCompat {
    pub fn compatible() -> Self {
        Self {
            mismatches: CompatMismatch::empty(),
            fatal: CompatMismatch::empty(),
        }
    }

    pub fn is_valid(&self, ignore_nozzle: bool) -> bool {
        Self::relevant(self.mismatches, ignore_nozzle).is_empty()
    }

    pub fn is_fatal(&self, ignore_nozzle: bool) -> bool {
        !Self::relevant(self.mismatches & self.fatal, ignore_nozzle).is_empty()
    }

    fn relevant(flags: CompatMismatch, ignore_nozzle: bool) -> CompatMismatch {
        if ignore_nozzle {
            flags - CompatMismatch::NOZZLE_DIAMETER
        } else {
            flags
        }
    }
}

/// Area of the bed a job is going to use, for targeted bed preheating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedArea {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

/// What the metadata scanner knows about one logical G-code tool.
#[derive(Debug, Clone, Default)]
pub struct ExtruderInfo {
    pub used: bool,
    pub filament_name: Option<FilamentName>,
    pub nozzle_diameter: Option<f32>,
}

/// The queued file's metadata scanner.
///
/// `start_load()` kicks off an asynchronous scan; the other accessors
/// reflect whatever the scan has produced so far and are cheap to poll.
/// `check_still_valid()` is the expensive one and is only ever run from a
/// background job.
pub trait GcodeInfo {
    fn start_load(&mut self);
    fn is_loaded(&self) -> bool;
    fn has_error(&self) -> bool;

    /// Enough of the file is present to begin printing. False while a
    /// streamed transfer is still catching up.
    fn can_be_printed(&self) -> bool;

    /// Re-validates the file on media. Slow.
    fn check_still_valid(&self) -> bool;

    fn extruder_info(&self, gcode_tool: u8) -> ExtruderInfo;
    fn used_extruders_count(&self) -> u8;
    fn printer_compat(&self) -> PrinterCompat;

    fn bed_preheat_temp(&self) -> Option<u16>;
    fn bed_preheat_area(&self) -> Option<BedArea>;
}

/// Print-data prefetch buffer in front of the media.
pub trait MediaPrefetch {
    fn check_ready_to_start_print(&mut self) -> bool;
    fn issue_fetch(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

/// The machine's G-code execution queue.
pub trait GcodeQueue {
    fn enqueue(&mut self, command: &str) -> Result<(), QueueFull>;
}

/// `M701`: load `filament` into tool `physical`. An empty name makes the
/// firmware ask the user which filament is being loaded. W2 returns the UI
/// to the status screen afterwards.
pub fn filament_load_gcode(physical: u8, filament: &str) -> GcodeCommand {
    let mut cmd = GcodeCommand::new();
    let _ = write!(cmd, "M701 S\"{}\" T{} W2", filament, physical);
    cmd
}

/// `M1600`: change the filament in tool `physical` to `filament`. R asks
/// the user to confirm the color once the new filament extrudes.
pub fn filament_change_gcode(physical: u8, filament: &str) -> GcodeCommand {
    let mut cmd = GcodeCommand::new();
    let _ = write!(cmd, "M1600 S\"{}\" T{} R", filament, physical);
    cmd
}

/// `M702`: unload whatever the MMU is holding in the nozzle.
pub fn mmu_unload_gcode() -> GcodeCommand {
    let mut cmd = GcodeCommand::new();
    let _ = write!(cmd, "M702 W2");
    cmd
}
