// SPDX-License-Identifier: GPL-3.0-or-later

pub mod preview {
    /// The checklist re-evaluates its current state at most this often.
    /// Calls inside the window return the memoized result. This keeps slow
    /// collaborators (G-code metadata validity) from being hammered on
    /// every UI tick.
    pub const MAX_RUN_PERIOD_MS: u32 = 50;

    /// While a dialog waits for the user, the file is re-validated in the
    /// background at this period.
    pub const STILL_VALID_CHECK_PERIOD_MS: u32 = 1000;

    /// The "new firmware available" notice dismisses itself after this long
    /// and the checklist proceeds as if the user had tapped Continue.
    pub const NEW_FIRMWARE_TIMEOUT_MS: u32 = 30_000;
}

pub mod tools {
    /// Upper bound on physical extruders and on logical G-code tools.
    pub const MAX_PHYSICAL_TOOLS: usize = 8;

    /// Nozzle diameters closer than this are considered equal.
    pub const NOZZLE_DIAMETER_TOLERANCE_MM: f32 = 0.001;
}

pub mod gcode {
    /// Longest command we ever synthesize (M701/M1600 with a quoted
    /// filament name).
    pub const MAX_COMMAND_LEN: usize = 64;

    /// Longest filament name found in G-code metadata.
    pub const MAX_FILAMENT_NAME_LEN: usize = 8;
}

pub mod first_layer {
    pub const FILAMENT_DIAMETER_MM: f32 = 1.75;

    /// Extruded line width relative to the nozzle diameter.
    pub const LINE_WIDTH_FACTOR: f32 = 1.2;
    /// First layer height relative to the nozzle diameter.
    pub const LAYER_HEIGHT_FACTOR: f32 = 0.5;

    /// The calibration square is drawn centered on this origin.
    pub const SQUARE_ORIGIN_X_MM: f32 = 60.0;
    pub const SQUARE_ORIGIN_Y_MM: f32 = 40.0;
    pub const SQUARE_SIZE_MM: f32 = 60.0;

    pub const PURGE_LINE_START_X_MM: f32 = 10.0;
    pub const PURGE_LINE_LENGTH_MM: f32 = 100.0;
    pub const PURGE_LINE_Y_MM: f32 = 10.0;

    pub const TRAVEL_FEEDRATE_MM_MIN: u32 = 4000;
    pub const PRINT_FEEDRATE_MM_MIN: u32 = 1200;
    pub const RETRACT_MM: f32 = 1.0;
    pub const RETRACT_FEEDRATE_MM_MIN: u32 = 2100;
}

pub mod enclosure {
    /// Fan duty while a print is running.
    pub const PRINT_DUTY_PCT: u8 = 40;
    /// Fan duty during the post-print filtration period.
    pub const POST_PRINT_DUTY_PCT: u8 = 70;
    /// Fan duty when the chamber runs hotter than the limit.
    pub const OVERHEAT_DUTY_PCT: u8 = 100;

    /// How long the enclosure keeps filtering after a print that used a
    /// fume-heavy material (ASA/ABS/PC).
    pub const POST_PRINT_FILTRATION_MS: u32 = 600_000;

    pub const CHAMBER_TEMP_LIMIT_C: i16 = 55;
}
