// SPDX-License-Identifier: GPL-3.0-or-later

mod state;
pub use state::*;

mod validity;
pub use validity::*;

mod queue;
use queue::*;

use crate::capabilities::{Capabilities, ToolsMappingSkip};
use crate::consts::preview::*;
use crate::filament::{MmuFilamentLocation, PreheatResult};
use crate::fsm::{FsmAction, Phase, Response};
use crate::gcode::mmu_unload_gcode;
use crate::machine::Printer;
use crate::tools::to_gcode_tool_custom;
use crate::util::ticks_diff;

/// The pre-print checklist orchestrator.
///
/// Owns nothing but its own [`State`]; everything else is borrowed per
/// call through [`Printer`]. Drive it with repeated `loop_step` calls from
/// the print-start code path until it returns something other than
/// `Wait`/`Image`/`Questions`/`ToolsMapping`/`MarkStarted`.
///
/// Non-blocking throughout: every wait is "stay in the same state and
/// report a non-terminal result".
pub struct PrintPreview {
    caps: Capabilities,
    state: State,
    phase: Option<Phase>,
    skip_preview: bool,
    /// Millisecond clock sampled at the top of the current unthrottled
    /// call; what every timeout below compares against.
    now: u32,
    last_run: Option<u32>,
    last_still_valid_check_ms: u32,
    /// A result sitting in the background job only counts once this
    /// attempt issued a re-check; anything older is about a previous
    /// attempt's file.
    still_valid_job_issued: bool,
    new_firmware_open_ms: u32,
}

impl PrintPreview {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            state: State::Inactive,
            phase: None,
            skip_preview: false,
            now: 0,
            last_run: None,
            last_still_valid_check_ms: 0,
            still_valid_job_issued: false,
            new_firmware_open_ms: 0,
        }
    }

    /// Arms the checklist for a new print attempt. Call exactly once
    /// before the first `loop_step`.
    ///
    /// With `skip_preview` the caller wants the print marked as started
    /// right away and no preview image dialog; all checks still run and
    /// can still abort.
    pub fn init(&mut self, skip_preview: bool) {
        debug!("print preview: init, skip_preview={}", skip_preview);
        self.state = State::Init;
        self.phase = None;
        self.skip_preview = skip_preview;
        self.last_run = None;
        self.last_still_valid_check_ms = 0;
        self.still_valid_job_issued = false;
        self.new_firmware_open_ms = 0;
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Last button pressed on the dialog currently shown, `Response::None`
    /// when no dialog is up.
    pub fn response(&self, printer: &mut Printer) -> Response {
        match self.phase {
            Some(phase) => printer.fsm.response(phase),
            None => Response::None,
        }
    }

    /// Advances the checklist by at most one step.
    ///
    /// Self-throttled: at most one substantive evaluation per
    /// `MAX_RUN_PERIOD_MS`; calls inside the window return the memoized
    /// result of the current state without consulting any collaborator.
    pub fn loop_step(&mut self, printer: &mut Printer) -> LoopResult {
        let now = printer.clock.now_ms();
        if let Some(last_run) = self.last_run {
            if ticks_diff(now, last_run) < MAX_RUN_PERIOD_MS {
                return self.result();
            }
        }
        self.last_run = Some(now);
        self.now = now;

        match self.state {
            State::Inactive => self.result(),

            State::Init => {
                printer.gcode.start_load();
                printer.fsm.reset_print_progress();
                self.change_state(printer, State::Loading);
                self.result()
            }

            State::Loading => {
                if printer.gcode.has_error() {
                    self.change_state(printer, State::FileErrorWaitUser);
                } else if !printer.gcode.can_be_printed() {
                    // The file is still being streamed onto the media.
                    self.change_state(printer, State::DownloadWait);
                } else if !printer.gcode.is_loaded() {
                    // Metadata scan still running.
                } else if !printer.media.check_ready_to_start_print() {
                    printer.media.issue_fetch();
                } else {
                    let next = if self.skip_preview {
                        self.state_from_selftest_check(printer)
                    } else {
                        State::PreviewWaitUser
                    };
                    self.change_state(printer, next);
                }
                self.result()
            }

            State::DownloadWait => {
                if printer.gcode.has_error() {
                    self.change_state(printer, State::FileErrorWaitUser);
                    return self.result();
                }
                if printer.fsm.response(Phase::DownloadWait) == Response::Quit {
                    return self.abort(printer);
                }
                if printer.gcode.can_be_printed() {
                    self.change_state(printer, State::Loading);
                } else {
                    printer.media.issue_fetch();
                }
                self.result()
            }

            State::PreviewWaitUser => {
                if self.file_went_invalid(printer) {
                    self.change_state(printer, State::FileErrorWaitUser);
                    return self.result();
                }
                match printer.fsm.response(Phase::Preview) {
                    Response::Print | Response::Continue => {
                        let next = self.state_from_selftest_check(printer);
                        self.change_state(printer, next);
                    }
                    Response::Back => return self.abort(printer),
                    _ => {}
                }
                self.result()
            }

            State::UnfinishedSelftestWaitUser => {
                match printer.fsm.response(Phase::UnfinishedSelftest) {
                    Response::Continue => {
                        let next = self.state_from_update_check(printer);
                        self.change_state(printer, next);
                    }
                    Response::Abort => return self.abort(printer),
                    _ => {}
                }
                self.result()
            }

            State::NewFirmwareAvailableWaitUser => {
                let timed_out = ticks_diff(self.now, self.new_firmware_open_ms)
                    >= NEW_FIRMWARE_TIMEOUT_MS;
                match printer.fsm.response(Phase::NewFirmwareAvailable) {
                    Response::Continue => {
                        let next = self.state_from_printer_check(printer);
                        self.change_state(printer, next);
                    }
                    Response::Abort => return self.abort(printer),
                    _ if timed_out => {
                        // The notice is informational; not answering it
                        // should not hold the print hostage.
                        debug!("new firmware notice timed out, continuing");
                        let next = self.state_from_printer_check(printer);
                        self.change_state(printer, next);
                    }
                    _ => {}
                }
                self.result()
            }

            State::WrongPrinterWaitUser => {
                match printer.fsm.response(Phase::WrongPrinter) {
                    Response::Ok => {
                        let next = self.state_from_filament_presence(printer);
                        self.change_state(printer, next);
                    }
                    Response::Abort => return self.abort(printer),
                    _ => {}
                }
                self.result()
            }

            State::WrongPrinterWaitUserAbort => {
                // Fatal mismatch: no way forward.
                if printer.fsm.response(Phase::WrongPrinterAbort) == Response::Abort {
                    return self.abort(printer);
                }
                self.result()
            }

            State::FilamentNotInsertedWaitUser => {
                match printer.fsm.response(Phase::FilamentNotInserted) {
                    Response::Yes => {
                        queue_filament_load_gcodes(&self.caps, printer);
                        self.change_state(printer, State::FilamentNotInsertedLoad);
                    }
                    Response::No => return self.abort(printer),
                    Response::FilamentSensorsOff => {
                        printer.sensors.set_enabled(false);
                        let next = self.state_from_filament_type(printer);
                        self.change_state(printer, next);
                    }
                    _ => {}
                }
                self.result()
            }

            State::FilamentNotInsertedLoad => {
                match printer.preheat.consume_result() {
                    Some(PreheatResult::Done) => {
                        let next = self.state_from_filament_type(printer);
                        self.change_state(printer, next);
                    }
                    Some(result) => {
                        debug!("filament load ended with {:?}, asking again", result);
                        self.change_state(printer, State::FilamentNotInsertedWaitUser);
                    }
                    None => {}
                }
                self.result()
            }

            State::MmuFilamentInsertedWaitUser => {
                match printer.fsm.response(Phase::MmuFilamentInserted) {
                    Response::Unload => {
                        if printer.queue.enqueue(&mmu_unload_gcode()).is_ok() {
                            self.change_state(printer, State::MmuFilamentInsertedUnload);
                        } else {
                            warn!("gcode queue full, mmu unload not queued");
                        }
                    }
                    Response::Abort => return self.abort(printer),
                    _ => {}
                }
                self.result()
            }

            State::MmuFilamentInsertedUnload => {
                match printer.preheat.consume_result() {
                    Some(PreheatResult::Done) => {
                        self.change_state(printer, State::ChecksDone);
                    }
                    Some(result) => {
                        debug!("mmu unload ended with {:?}, asking again", result);
                        self.change_state(printer, State::MmuFilamentInsertedWaitUser);
                    }
                    None => {}
                }
                self.result()
            }

            State::WrongFilamentWaitUser => {
                match printer.fsm.response(Phase::WrongFilament) {
                    Response::Change => {
                        queue_filament_change_gcodes(&self.caps, printer);
                        self.change_state(printer, State::WrongFilamentChange);
                    }
                    Response::Ok => self.change_state(printer, State::ChecksDone),
                    Response::Abort => return self.abort(printer),
                    _ => {}
                }
                self.result()
            }

            State::WrongFilamentChange => {
                match printer.preheat.consume_result() {
                    Some(PreheatResult::Done) => {
                        self.change_state(printer, State::ChecksDone);
                    }
                    Some(result) => {
                        debug!("filament change ended with {:?}, asking again", result);
                        self.change_state(printer, State::WrongFilamentWaitUser);
                    }
                    None => {}
                }
                self.result()
            }

            State::FileErrorWaitUser => {
                // The file is gone or corrupt; there is nothing to retry.
                if printer.fsm.response(Phase::FileError) == Response::Abort {
                    return self.abort(printer);
                }
                self.result()
            }

            State::ToolsMappingWaitUser => {
                match printer.fsm.response(Phase::ToolsMapping) {
                    Response::Back => {
                        printer.mapper.reset();
                        printer.spool_join.reset();
                        return self.abort(printer);
                    }
                    Response::Print => self.change_state(printer, State::Done),
                    _ => {}
                }
                self.result()
            }

            State::ChecksDone => {
                if self.caps.ix_bed_rect {
                    printer.thermal.reset_bed_bounding_rect();
                }
                if self.caps.tools_mapping_possible() {
                    let skip_dialog = match self.caps.tools_mapping_skip {
                        ToolsMappingSkip::Never => false,
                        ToolsMappingSkip::WhenValid => {
                            check_tools_mapping_validity(&self.caps, printer).all_ok()
                        }
                        ToolsMappingSkip::Always => true,
                    };
                    if skip_dialog {
                        self.change_state(printer, State::Done);
                    } else {
                        // Warm the bed while the user sorts the mapping out.
                        if let Some(temp) = printer.gcode.bed_preheat_temp() {
                            let area = printer.gcode.bed_preheat_area();
                            printer.thermal.preheat_bed(temp, area);
                        }
                        self.change_state(printer, State::ToolsMappingWaitUser);
                    }
                } else {
                    self.change_state(printer, State::Done);
                }
                // Print is reported by the Done step itself, never early.
                result_of(State::ChecksDone, self.skip_preview)
            }

            State::Done => {
                info!("print preview: all checks passed");
                self.change_state(printer, State::Inactive);
                LoopResult::Print
            }
        }
    }

    fn result(&self) -> LoopResult {
        result_of(self.state, self.skip_preview)
    }

    fn abort(&mut self, printer: &mut Printer) -> LoopResult {
        info!("print preview: aborted in {:?}", self.state);
        self.change_state(printer, State::Inactive);
        LoopResult::Abort
    }

    /// The only legal way to mutate `state`. Projects the new state onto
    /// its phase and applies the dialog action, except for the transient
    /// bookkeeping states which leave the current dialog untouched.
    fn change_state(&mut self, printer: &mut Printer, new: State) {
        let old = self.state;
        self.state = new;
        if new == State::NewFirmwareAvailableWaitUser {
            self.new_firmware_open_ms = self.now;
        }
        if matches!(new, State::Init | State::ChecksDone) {
            debug!("print preview: {:?} -> {:?}", old, new);
            return;
        }
        let new_phase = phase_of(new);
        let action = match (self.phase, new_phase) {
            (old_phase, new_phase) if old_phase == new_phase => FsmAction::NoAction,
            (None, Some(phase)) => {
                printer.fsm.create(phase);
                FsmAction::Create
            }
            (Some(_), Some(phase)) => {
                printer.fsm.change(phase);
                FsmAction::Change
            }
            // The caller tears the dialog down, atomic with the loop
            // result that caused it.
            (Some(_), None) => FsmAction::Destroy,
            (None, None) => FsmAction::NoAction,
        };
        self.phase = new_phase;
        debug!("print preview: {:?} -> {:?} ({:?})", old, new, action);
    }

    /// Direct error check plus the periodic background re-validation.
    /// At most one job in flight; a fresh one is issued once a second.
    fn file_went_invalid(&mut self, printer: &mut Printer) -> bool {
        if printer.gcode.has_error() {
            return true;
        }
        // A re-check from a previous attempt may land after that attempt
        // aborted; drain it, but only trust verdicts on our own file.
        if printer.validity_job.take_result() == Some(false) && self.still_valid_job_issued {
            return true;
        }
        if ticks_diff(self.now, self.last_still_valid_check_ms) >= STILL_VALID_CHECK_PERIOD_MS
            && !printer.validity_job.is_active()
        {
            self.last_still_valid_check_ms = self.now;
            self.still_valid_job_issued = true;
            printer.validity_job.issue();
        }
        false
    }

    fn state_from_selftest_check(&self, printer: &Printer) -> State {
        if self.caps.run_selftest_check && !printer.health.selftest_passed() {
            State::UnfinishedSelftestWaitUser
        } else {
            self.state_from_update_check(printer)
        }
    }

    fn state_from_update_check(&self, printer: &Printer) -> State {
        if self.caps.run_update_check && printer.health.new_firmware_available() {
            State::NewFirmwareAvailableWaitUser
        } else {
            self.state_from_printer_check(printer)
        }
    }

    fn state_from_printer_check(&self, printer: &Printer) -> State {
        let compat = printer.gcode.printer_compat();
        // When the tools mapping screen will run, nozzle diameters are
        // reconciled there instead.
        let ignore_nozzle = self.caps.tools_mapping_possible();
        if compat.is_valid(ignore_nozzle) {
            self.state_from_filament_presence(printer)
        } else if compat.is_fatal(ignore_nozzle) {
            State::WrongPrinterWaitUserAbort
        } else {
            State::WrongPrinterWaitUser
        }
    }

    fn state_from_filament_presence(&self, printer: &Printer) -> State {
        if self.caps.has_mmu {
            // One extruder fed by the MMU: all that can be checked here is
            // that the MMU can start. A single-material job whose filament
            // already sits in the nozzle is fine as well.
            let single_material_loaded = printer.gcode.used_extruders_count() <= 1
                && printer.sensors.where_is_filament() == MmuFilamentLocation::InNozzle;
            if printer.sensors.mmu_ready_to_print() || single_material_loaded {
                State::ChecksDone
            } else {
                State::MmuFilamentInsertedWaitUser
            }
        } else {
            if printer.sensors.is_enabled() {
                for physical in 0..self.caps.physical_tools() {
                    let gcode_tool = match to_gcode_tool_custom(
                        &*printer.mapper,
                        &*printer.spool_join,
                        physical,
                    ) {
                        Some(t) => t,
                        None => continue,
                    };
                    if !printer.gcode.extruder_info(gcode_tool).used {
                        continue;
                    }
                    if !printer.sensors.tool_has_filament(physical) {
                        return State::FilamentNotInsertedWaitUser;
                    }
                }
            }
            self.state_from_filament_type(printer)
        }
    }

    fn state_from_filament_type(&self, printer: &Printer) -> State {
        // Never reached on MMU machines.
        for physical in 0..self.caps.physical_tools() {
            if !check_correct_filament_type(printer, physical) {
                return State::WrongFilamentWaitUser;
            }
        }
        State::ChecksDone
    }
}
