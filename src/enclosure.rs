// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::enclosure::*;
use crate::util::ticks_diff;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FanState {
    Off,
    Printing,
    /// Filtering fumes out after a print; entered only when the job used a
    /// fume-heavy material.
    PostPrint { since_ms: u32 },
}

/// Readings the fan control samples each step.
#[derive(Debug, Clone, Copy)]
pub struct EnclosureInput {
    pub printing: bool,
    /// The running job extrudes a material that needs filtration.
    pub filtration_filament: bool,
    pub chamber_temp_c: Option<i16>,
}

/// Enclosure fan control, stepped cooperatively from the main loop.
///
/// Duty is a percentage; the caller maps it onto PWM.
pub struct EnclosureFan {
    state: FanState,
    /// Latched over the whole print so a material seen at any point keeps
    /// its post-print filtration.
    filtration_latched: bool,
}

impl EnclosureFan {
    pub fn new() -> Self {
        Self { state: FanState::Off, filtration_latched: false }
    }

    pub fn step(&mut self, now_ms: u32, input: EnclosureInput) -> u8 {
        self.state = match self.state {
            _ if input.printing => {
                if input.filtration_filament {
                    self.filtration_latched = true;
                }
                FanState::Printing
            }
            FanState::Printing => {
                // Print just ended.
                if self.filtration_latched {
                    debug!("enclosure: post-print filtration started");
                    FanState::PostPrint { since_ms: now_ms }
                } else {
                    FanState::Off
                }
            }
            FanState::PostPrint { since_ms }
                if ticks_diff(now_ms, since_ms) >= POST_PRINT_FILTRATION_MS =>
            {
                self.filtration_latched = false;
                FanState::Off
            }
            other => other,
        };

        match self.state {
            FanState::Off => 0,
            FanState::Printing => {
                let overheated = input
                    .chamber_temp_c
                    .map_or(false, |t| t > CHAMBER_TEMP_LIMIT_C);
                if overheated {
                    OVERHEAT_DUTY_PCT
                } else {
                    PRINT_DUTY_PCT
                }
            }
            FanState::PostPrint { .. } => POST_PRINT_DUTY_PCT,
        }
    }
}

impl Default for EnclosureFan {
    fn default() -> Self {
        Self::new()
    }
}
