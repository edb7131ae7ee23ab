// SPDX-License-Identifier: GPL-3.0-or-later

//! Mock collaborators for driving the checklist on the host.

// Each test binary compiles its own copy and uses a different subset.
#![allow(dead_code)]

use std::cell::Cell;

use preflight::capabilities::Capabilities;
use preflight::filament::{
    FilamentName, FilamentSensors, MmuFilamentLocation, PreheatResult, PreheatStatus,
};
use preflight::fsm::{FsmBridge, Phase, Response};
use preflight::gcode::{
    BedArea, ExtruderInfo, GcodeInfo, GcodeQueue, MediaPrefetch, PrinterCompat, QueueFull,
};
use preflight::machine::{Printer, SystemHealth, Thermal};
use preflight::preview::LoopResult;
use preflight::tools::{SpoolJoin, ToolMapper};
use preflight::util::{BackgroundJob, Clock};
use preflight::PrintPreview;

pub struct MockGcode {
    pub loaded: bool,
    pub error: bool,
    pub printable: bool,
    pub still_valid: bool,
    pub extruders: Vec<ExtruderInfo>,
    pub compat: PrinterCompat,
    pub bed_preheat_temp: Option<u16>,
    pub load_requests: u32,
}

impl GcodeInfo for MockGcode {
    fn start_load(&mut self) {
        self.load_requests += 1;
    }
    fn is_loaded(&self) -> bool {
        self.loaded
    }
    fn has_error(&self) -> bool {
        self.error
    }
    fn can_be_printed(&self) -> bool {
        self.printable
    }
    fn check_still_valid(&self) -> bool {
        self.still_valid
    }
    fn extruder_info(&self, gcode_tool: u8) -> ExtruderInfo {
        self.extruders
            .get(gcode_tool as usize)
            .cloned()
            .unwrap_or_default()
    }
    fn used_extruders_count(&self) -> u8 {
        self.extruders.iter().filter(|e| e.used).count() as u8
    }
    fn printer_compat(&self) -> PrinterCompat {
        self.compat
    }
    fn bed_preheat_temp(&self) -> Option<u16> {
        self.bed_preheat_temp
    }
    fn bed_preheat_area(&self) -> Option<BedArea> {
        None
    }
}

#[derive(Default)]
pub struct MockMedia {
    pub not_ready: bool,
    pub fetches: u32,
}

impl MediaPrefetch for MockMedia {
    fn check_ready_to_start_print(&mut self) -> bool {
        !self.not_ready
    }
    fn issue_fetch(&mut self) {
        self.fetches += 1;
    }
}

#[derive(Default)]
pub struct MockQueue {
    pub cmds: Vec<String>,
    pub full: bool,
}

impl GcodeQueue for MockQueue {
    fn enqueue(&mut self, command: &str) -> Result<(), QueueFull> {
        if self.full {
            return Err(QueueFull);
        }
        self.cmds.push(command.into());
        Ok(())
    }
}

/// Identity mapping over the first `n` tools unless edited by the test.
pub struct MockMapper {
    pub to_gcode: Vec<Option<u8>>,
    pub resets: u32,
}

impl MockMapper {
    pub fn identity(n: u8) -> Self {
        Self {
            to_gcode: (0..n).map(Some).collect(),
            resets: 0,
        }
    }
}

impl ToolMapper for MockMapper {
    fn to_physical(&self, gcode_tool: u8) -> Option<u8> {
        self.to_gcode
            .iter()
            .position(|&m| m == Some(gcode_tool))
            .map(|i| i as u8)
    }
    fn to_gcode(&self, physical: u8) -> Option<u8> {
        self.to_gcode.get(physical as usize).copied().flatten()
    }
    fn reset(&mut self) {
        self.resets += 1;
    }
}

#[derive(Default)]
pub struct MockJoin {
    /// physical -> chain head; identity when absent.
    pub heads: Vec<u8>,
    pub resets: u32,
}

impl SpoolJoin for MockJoin {
    fn first_spool_of_chain(&self, physical: u8) -> u8 {
        self.heads.get(physical as usize).copied().unwrap_or(physical)
    }
    fn next_spool(&self, _physical: u8) -> Option<u8> {
        None
    }
    fn reset(&mut self) {
        self.resets += 1;
    }
}

pub struct MockSensors {
    pub enabled: bool,
    pub present: Vec<bool>,
    pub loaded: Vec<FilamentName>,
    pub mmu_ready: bool,
    pub filament_location: MmuFilamentLocation,
}

impl FilamentSensors for MockSensors {
    fn tool_has_filament(&self, physical: u8) -> bool {
        self.present.get(physical as usize).copied().unwrap_or(false)
    }
    fn is_enabled(&self) -> bool {
        self.enabled
    }
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    fn mmu_ready_to_print(&self) -> bool {
        self.mmu_ready
    }
    fn where_is_filament(&self) -> MmuFilamentLocation {
        self.filament_location
    }
    fn loaded_filament(&self, physical: u8) -> FilamentName {
        self.loaded.get(physical as usize).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MockThermal {
    pub hotend_targets: Vec<(u8, u16)>,
    pub hotend_displays: Vec<(u8, u16)>,
    pub bed_preheats: Vec<u16>,
    pub bed_rect_resets: u32,
}

impl Thermal for MockThermal {
    fn set_hotend_target(&mut self, physical: u8, celsius: u16) {
        self.hotend_targets.push((physical, celsius));
    }
    fn set_hotend_display(&mut self, physical: u8, celsius: u16) {
        self.hotend_displays.push((physical, celsius));
    }
    fn preheat_bed(&mut self, celsius: u16, _area: Option<BedArea>) {
        self.bed_preheats.push(celsius);
    }
    fn reset_bed_bounding_rect(&mut self) {
        self.bed_rect_resets += 1;
    }
}

#[derive(Default)]
pub struct MockPreheat {
    pub result: Option<PreheatResult>,
}

impl PreheatStatus for MockPreheat {
    fn consume_result(&mut self) -> Option<PreheatResult> {
        self.result.take()
    }
}

pub struct MockHealth {
    pub selftest_passed: bool,
    pub new_firmware: bool,
}

impl SystemHealth for MockHealth {
    fn selftest_passed(&self) -> bool {
        self.selftest_passed
    }
    fn new_firmware_available(&self) -> bool {
        self.new_firmware
    }
}

/// Records dialog lifecycle calls; responses are one-shot per press.
#[derive(Default)]
pub struct MockFsm {
    pub created: Vec<Phase>,
    pub changed: Vec<Phase>,
    pub pending: Vec<(Phase, Response)>,
    pub progress_resets: u32,
}

impl FsmBridge for MockFsm {
    fn create(&mut self, phase: Phase) {
        self.created.push(phase);
    }
    fn change(&mut self, phase: Phase) {
        self.changed.push(phase);
    }
    fn response(&mut self, phase: Phase) -> Response {
        match self.pending.iter().position(|(p, _)| *p == phase) {
            Some(i) => self.pending.remove(i).1,
            None => Response::None,
        }
    }
    fn reset_print_progress(&mut self) {
        self.progress_resets += 1;
    }
}

#[derive(Default)]
pub struct MockJob {
    pub active: bool,
    pub result: Option<bool>,
    pub issued: u32,
}

impl BackgroundJob for MockJob {
    fn issue(&mut self) {
        assert!(!self.active, "issued while a job was in flight");
        self.issued += 1;
    }
    fn is_active(&self) -> bool {
        self.active
    }
    fn take_result(&mut self) -> Option<bool> {
        self.result.take()
    }
}

pub struct MockClock(pub Cell<u32>);

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

fn used_extruder(name: &str, nozzle: f32) -> ExtruderInfo {
    ExtruderInfo {
        used: true,
        filament_name: Some(FilamentName::from(name)),
        nozzle_diameter: Some(nozzle),
    }
}

/// Checklist plus a full set of mocks, pre-configured for a clean
/// all-checks-pass run.
pub struct Rig {
    pub pp: PrintPreview,
    pub gcode: MockGcode,
    pub media: MockMedia,
    pub queue: MockQueue,
    pub mapper: MockMapper,
    pub join: MockJoin,
    pub sensors: MockSensors,
    pub thermal: MockThermal,
    pub preheat: MockPreheat,
    pub health: MockHealth,
    pub fsm: MockFsm,
    pub job: MockJob,
    pub clock: MockClock,
}

macro_rules! printer {
    ($rig:expr) => {
        Printer {
            gcode: &mut $rig.gcode,
            media: &mut $rig.media,
            queue: &mut $rig.queue,
            mapper: &mut $rig.mapper,
            spool_join: &mut $rig.join,
            sensors: &mut $rig.sensors,
            thermal: &mut $rig.thermal,
            preheat: &mut $rig.preheat,
            health: &$rig.health,
            fsm: &mut $rig.fsm,
            validity_job: &mut $rig.job,
            clock: &$rig.clock,
        }
    };
}

impl Rig {
    pub fn new(caps: Capabilities) -> Self {
        let n = caps.tool_count;
        Self {
            pp: PrintPreview::new(caps),
            gcode: MockGcode {
                loaded: true,
                error: false,
                printable: true,
                still_valid: true,
                extruders: (0..n).map(|_| used_extruder("PLA", 0.4)).collect(),
                compat: PrinterCompat::compatible(),
                bed_preheat_temp: None,
                load_requests: 0,
            },
            media: MockMedia::default(),
            queue: MockQueue::default(),
            mapper: MockMapper::identity(n),
            join: MockJoin::default(),
            sensors: MockSensors {
                enabled: true,
                present: vec![true; n as usize],
                loaded: vec![FilamentName::from("PLA"); n as usize],
                mmu_ready: true,
                filament_location: MmuFilamentLocation::NotLoaded,
            },
            thermal: MockThermal::default(),
            preheat: MockPreheat::default(),
            health: MockHealth {
                selftest_passed: true,
                new_firmware: false,
            },
            fsm: MockFsm::default(),
            job: MockJob::default(),
            clock: MockClock(Cell::new(0)),
        }
    }

    pub fn single_tool() -> Self {
        Self::new(Capabilities::single_tool(0.4))
    }

    pub fn toolchanger(tool_count: u8) -> Self {
        let mut caps = Capabilities::single_tool(0.4);
        caps.tool_count = tool_count;
        caps.has_toolchanger = true;
        caps.multi_hotend = true;
        Self::new(caps)
    }

    pub fn mmu() -> Self {
        let mut caps = Capabilities::single_tool(0.4);
        caps.has_mmu = true;
        Self::new(caps)
    }

    /// One unthrottled step: advances the mock clock past the run period
    /// first.
    pub fn step(&mut self) -> LoopResult {
        self.tick(60);
        self.pp.loop_step(&mut printer!(self))
    }

    /// A step without advancing the clock, for throttle tests.
    pub fn step_same_tick(&mut self) -> LoopResult {
        self.pp.loop_step(&mut printer!(self))
    }

    pub fn tick(&mut self, ms: u32) {
        self.clock.0.set(self.clock.0.get().wrapping_add(ms));
    }

    pub fn press(&mut self, phase: Phase, response: Response) {
        self.fsm.pending.push((phase, response));
    }

    pub fn response(&mut self) -> Response {
        self.pp.response(&mut printer!(self))
    }

    /// init + run until the preview image dialog is up.
    pub fn run_to_preview(&mut self) {
        self.pp.init(false);
        assert_eq!(self.step(), LoopResult::Wait); // init -> loading
        assert_eq!(self.step(), LoopResult::Image); // loading -> preview
    }

    /// Accept the preview; the next step runs the whole check chain.
    pub fn accept_preview(&mut self) -> LoopResult {
        self.press(Phase::Preview, Response::Print);
        self.step()
    }
}
