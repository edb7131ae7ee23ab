// SPDX-License-Identifier: GPL-3.0-or-later

use num::traits::float::FloatCore;

use crate::capabilities::Capabilities;
use crate::consts::tools::{MAX_PHYSICAL_TOOLS, NOZZLE_DIAMETER_TOLERANCE_MM};
use crate::machine::Printer;
use crate::tools::{to_gcode_tool_custom, ToolMask};

/// Snapshot of everything that could be wrong with the current tool
/// mapping. Computed fresh on demand, never persisted.
///
/// On MMU hardware the filament-type comparison is structurally impossible
/// (the MMU feeds whatever slot the mapping says), so `mismatched_filaments`
/// never counts against `all_ok()` there.
#[derive(Debug, Clone, Copy)]
pub struct ToolsMappingValidity {
    /// Logical G-code tools that are used but print nowhere.
    pub unassigned_gcodes: ToolMask,
    pub mismatched_filaments: ToolMask,
    pub mismatched_nozzles: ToolMask,
    /// Physical tools that need to print but hold no filament.
    pub unloaded_tools: ToolMask,
    mmu_exempt: bool,
}

impl ToolsMappingValidity {
    pub fn all_ok(&self) -> bool {
        self.unassigned_gcodes.is_empty()
            && self.mismatched_nozzles.is_empty()
            && self.unloaded_tools.is_empty()
            && (self.mmu_exempt || self.mismatched_filaments.is_empty())
    }
}

/// Evaluates the four independent per-tool checks. Tools the G-code does
/// not use pass vacuously. Iteration is in ascending physical index order
/// and every G-code-side lookup goes through the active mapper/spool-join
/// configuration.
pub fn check_tools_mapping_validity(
    caps: &Capabilities,
    printer: &Printer,
) -> ToolsMappingValidity {
    let mut validity = ToolsMappingValidity {
        unassigned_gcodes: ToolMask::EMPTY,
        mismatched_filaments: ToolMask::EMPTY,
        mismatched_nozzles: ToolMask::EMPTY,
        unloaded_tools: ToolMask::EMPTY,
        mmu_exempt: caps.has_mmu,
    };

    for gcode_tool in 0..MAX_PHYSICAL_TOOLS as u8 {
        if printer.gcode.extruder_info(gcode_tool).used
            && printer.mapper.to_physical(gcode_tool).is_none()
        {
            validity.unassigned_gcodes.set(gcode_tool);
        }
    }

    for physical in 0..caps.physical_tools() {
        let gcode_tool =
            match to_gcode_tool_custom(&*printer.mapper, &*printer.spool_join, physical) {
                Some(t) => t,
                None => continue,
            };
        let info = printer.gcode.extruder_info(gcode_tool);
        if !info.used {
            continue;
        }

        if let Some(wanted) = info.nozzle_diameter {
            let configured = caps.nozzle_diameter[physical as usize];
            if (wanted - configured).abs() > NOZZLE_DIAMETER_TOLERANCE_MM {
                validity.mismatched_nozzles.set(physical);
            }
        }

        if !caps.has_mmu {
            if let Some(wanted) = &info.filament_name {
                let loaded = printer.sensors.loaded_filament(physical);
                // An unknown loaded type is not held against the user.
                if !loaded.is_empty() && loaded.as_str() != wanted.as_str() {
                    validity.mismatched_filaments.set(physical);
                }
            }
        }

        if printer.sensors.is_enabled() && !printer.sensors.tool_has_filament(physical) {
            validity.unloaded_tools.set(physical);
        }
    }

    validity
}
