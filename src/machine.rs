// SPDX-License-Identifier: GPL-3.0-or-later

use crate::filament::{FilamentSensors, PreheatStatus};
use crate::fsm::FsmBridge;
use crate::gcode::{BedArea, GcodeInfo, GcodeQueue, MediaPrefetch};
use crate::tools::{SpoolJoin, ToolMapper};
use crate::util::{BackgroundJob, Clock};

/// Thermal manager knobs the checklist touches.
pub trait Thermal {
    fn set_hotend_target(&mut self, physical: u8, celsius: u16);
    /// The temperature shown on screen for the tool, which may lead the
    /// actual target during a preheat.
    fn set_hotend_display(&mut self, physical: u8, celsius: u16);
    fn preheat_bed(&mut self, celsius: u16, area: Option<BedArea>);
    /// iX machines only: restore the full usable bed rect.
    fn reset_bed_bounding_rect(&mut self);
}

/// Machine-wide status bits gating the early checklist questions.
pub trait SystemHealth {
    fn selftest_passed(&self) -> bool;
    fn new_firmware_available(&self) -> bool;
}

/// Everything the checklist talks to, bundled so a single handle travels
/// through the state handlers. Borrowed per call; the checklist owns none
/// of it.
pub struct Printer<'a> {
    pub gcode: &'a mut dyn GcodeInfo,
    pub media: &'a mut dyn MediaPrefetch,
    pub queue: &'a mut dyn GcodeQueue,
    pub mapper: &'a mut dyn ToolMapper,
    pub spool_join: &'a mut dyn SpoolJoin,
    pub sensors: &'a mut dyn FilamentSensors,
    pub thermal: &'a mut dyn Thermal,
    pub preheat: &'a mut dyn PreheatStatus,
    pub health: &'a dyn SystemHealth,
    pub fsm: &'a mut dyn FsmBridge,
    pub validity_job: &'a mut dyn BackgroundJob,
    pub clock: &'a dyn Clock,
}
