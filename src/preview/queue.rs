// SPDX-License-Identifier: GPL-3.0-or-later

use crate::capabilities::Capabilities;
use crate::filament::nozzle_preheat_temp;
use crate::gcode::{filament_change_gcode, filament_load_gcode};
use crate::machine::Printer;
use crate::tools::to_gcode_tool_custom;

/// Is the filament loaded in `physical` the type its G-code tool asks for?
/// Vacuously true for tools the job does not use, for unknown requested
/// types, and for an unknown loaded type.
pub(crate) fn check_correct_filament_type(printer: &Printer, physical: u8) -> bool {
    let gcode_tool =
        match to_gcode_tool_custom(&*printer.mapper, &*printer.spool_join, physical) {
            Some(t) => t,
            None => return true,
        };
    let info = printer.gcode.extruder_info(gcode_tool);
    if !info.used {
        return true;
    }
    match &info.filament_name {
        None => true,
        Some(wanted) => {
            let loaded = printer.sensors.loaded_filament(physical);
            loaded.is_empty() || loaded.as_str() == wanted.as_str()
        }
    }
}

/// Queues one M701 per used physical tool that lacks filament. The
/// filament name comes from the G-code metadata; when unknown, the empty
/// name makes the load dialog ask the user.
pub(crate) fn queue_filament_load_gcodes(caps: &Capabilities, printer: &mut Printer) {
    for physical in 0..caps.physical_tools() {
        let gcode_tool =
            match to_gcode_tool_custom(&*printer.mapper, &*printer.spool_join, physical) {
                Some(t) => t,
                None => continue,
            };
        let info = printer.gcode.extruder_info(gcode_tool);
        if !info.used || printer.sensors.tool_has_filament(physical) {
            continue;
        }
        let name = info.filament_name.as_deref().unwrap_or("");
        preheat_for_filament_op(caps, printer, physical, name);
        if printer.queue.enqueue(&filament_load_gcode(physical, name)).is_err() {
            // Keep going with the remaining tools; the user ends up back on
            // the dialog for whatever is still missing.
            warn!("gcode queue full, load for tool {} dropped", physical);
        }
    }
}

/// Queues one M1600 per used physical tool whose loaded filament type does
/// not match what the G-code asks for.
pub(crate) fn queue_filament_change_gcodes(caps: &Capabilities, printer: &mut Printer) {
    for physical in 0..caps.physical_tools() {
        if check_correct_filament_type(printer, physical) {
            continue;
        }
        let gcode_tool =
            match to_gcode_tool_custom(&*printer.mapper, &*printer.spool_join, physical) {
                Some(t) => t,
                None => continue,
            };
        let info = printer.gcode.extruder_info(gcode_tool);
        let name = info.filament_name.as_deref().unwrap_or("");
        preheat_for_filament_op(caps, printer, physical, name);
        if printer.queue.enqueue(&filament_change_gcode(physical, name)).is_err() {
            warn!("gcode queue full, change for tool {} dropped", physical);
        }
    }
}

// On multi-hotend machines the target is set right away so the nozzle
// warms while the command waits in the queue.
fn preheat_for_filament_op(caps: &Capabilities, printer: &mut Printer, physical: u8, name: &str) {
    if !caps.multi_hotend {
        return;
    }
    if let Some(temp) = nozzle_preheat_temp(name) {
        printer.thermal.set_hotend_target(physical, temp);
        printer.thermal.set_hotend_display(physical, temp);
    }
}
