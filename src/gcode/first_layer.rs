// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::Write;

use crate::consts::first_layer::*;
use crate::gcode::{GcodeCommand, GcodeQueue, QueueFull};

/// Generator for the first-layer calibration sheet: heat up, home, purge a
/// line along the front edge, then fill a square with a serpentine so the
/// user can judge (and live-adjust) the first layer squish.
///
/// Output is deterministic for a given parameter set. Coordinates are
/// absolute, extrusion is relative.
#[derive(Debug, Clone, Copy)]
pub struct FirstLayerCalibration {
    pub nozzle_diameter: f32,
    pub nozzle_temp: u16,
    pub bed_temp: u16,
}

impl FirstLayerCalibration {
    pub fn line_width(&self) -> f32 {
        self.nozzle_diameter * LINE_WIDTH_FACTOR
    }

    pub fn layer_height(&self) -> f32 {
        self.nozzle_diameter * LAYER_HEIGHT_FACTOR
    }

    /// Extruded E length per mm of XY travel.
    fn e_per_mm(&self) -> f32 {
        let filament_area =
            core::f32::consts::FRAC_PI_4 * FILAMENT_DIAMETER_MM * FILAMENT_DIAMETER_MM;
        self.line_width() * self.layer_height() / filament_area
    }

    pub fn emit(&self, queue: &mut dyn GcodeQueue) -> Result<(), QueueFull> {
        // A zero or NaN diameter would turn the fill loop into an endless
        // stream of moves.
        if !(self.nozzle_diameter > 0.0) {
            warn!(
                "first layer calibration with nozzle diameter {}, not emitting",
                self.nozzle_diameter
            );
            return Ok(());
        }

        macro_rules! g {
            ($($arg:tt)*) => {{
                let mut cmd = GcodeCommand::new();
                let _ = write!(cmd, $($arg)*);
                queue.enqueue(&cmd)?;
            }};
        }

        let e_per_mm = self.e_per_mm();
        let z = self.layer_height();

        // Start both heaters before homing so the waits below are short.
        g!("M104 S{}", self.nozzle_temp);
        g!("M140 S{}", self.bed_temp);
        g!("G90");
        g!("M83");
        g!("G28");
        g!("M109 S{}", self.nozzle_temp);
        g!("M190 S{}", self.bed_temp);

        // Purge line along the front edge.
        g!(
            "G1 X{:.3} Y{:.3} Z{:.3} F{}",
            PURGE_LINE_START_X_MM, PURGE_LINE_Y_MM, z, TRAVEL_FEEDRATE_MM_MIN
        );
        g!(
            "G1 X{:.3} E{:.4} F{}",
            PURGE_LINE_START_X_MM + PURGE_LINE_LENGTH_MM,
            PURGE_LINE_LENGTH_MM * e_per_mm,
            PRINT_FEEDRATE_MM_MIN
        );

        // Serpentine fill of the calibration square.
        g!(
            "G1 X{:.3} Y{:.3} F{}",
            SQUARE_ORIGIN_X_MM, SQUARE_ORIGIN_Y_MM, TRAVEL_FEEDRATE_MM_MIN
        );
        let passes = (SQUARE_SIZE_MM / self.line_width()) as u32;
        for pass in 0..passes {
            let target_x = if pass % 2 == 0 {
                SQUARE_ORIGIN_X_MM + SQUARE_SIZE_MM
            } else {
                SQUARE_ORIGIN_X_MM
            };
            g!(
                "G1 X{:.3} E{:.4} F{}",
                target_x,
                SQUARE_SIZE_MM * e_per_mm,
                PRINT_FEEDRATE_MM_MIN
            );
            if pass + 1 < passes {
                g!(
                    "G1 Y{:.3} E{:.4} F{}",
                    SQUARE_ORIGIN_Y_MM + (pass + 1) as f32 * self.line_width(),
                    self.line_width() * e_per_mm,
                    PRINT_FEEDRATE_MM_MIN
                );
            }
        }

        g!("G1 E-{:.3} F{}", RETRACT_MM, RETRACT_FEEDRATE_MM_MIN);
        g!("G1 Z{:.3} F720", z + 10.0);
        g!("M104 S0");
        g!("M140 S0");
        g!("M84");
        Ok(())
    }
}
