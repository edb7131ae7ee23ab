// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::gcode::MAX_FILAMENT_NAME_LEN;

/// Filament type as named in G-code metadata ("PLA", "PETG", ...). Empty
/// means unknown.
pub type FilamentName = heapless::String<MAX_FILAMENT_NAME_LEN>;

/// Nozzle preheat temperature for a known filament type. Used to pre-set
/// hotend targets while an auto-load command waits in the queue, so the
/// user is not staring at a cold nozzle warming up from scratch.
pub fn nozzle_preheat_temp(name: &str) -> Option<u16> {
    Some(match name {
        "PLA" => 215,
        "PETG" => 230,
        "ASA" => 260,
        "ABS" => 255,
        "PC" => 275,
        "FLEX" => 240,
        "HIPS" => 220,
        "PP" => 240,
        "PVB" => 215,
        "PA" => 285,
        _ => return None,
    })
}

/// Materials whose fumes warrant running the enclosure filtration after
/// the print finishes.
pub fn needs_filtration(name: &str) -> bool {
    matches!(name, "ASA" | "ABS" | "PC")
}

/// Where the MMU currently holds its filament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmuFilamentLocation {
    NotLoaded,
    /// Grabbed by the selector but not fed all the way.
    InMmu,
    InNozzle,
}

/// Per-physical-extruder filament presence, plus the MMU-specific bits.
pub trait FilamentSensors {
    fn tool_has_filament(&self, physical: u8) -> bool;

    /// Global filament sensor switch. When off, presence is never checked.
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    /// MMU is idle and able to start feeding, nozzle empty.
    fn mmu_ready_to_print(&self) -> bool;
    fn where_is_filament(&self) -> MmuFilamentLocation;

    /// Filament type recorded as loaded in `physical`. Empty when unknown.
    fn loaded_filament(&self, physical: u8) -> FilamentName;
}

/// Outcome of a queued filament load/change/unload operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreheatResult {
    Done,
    Aborted,
    DidNotFinish,
    Error,
}

/// Lets the checklist observe the filament operation it queued. The result
/// is consumed on read so a retry starts from a clean slate.
pub trait PreheatStatus {
    fn consume_result(&mut self) -> Option<PreheatResult>;
}
