// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::tools::MAX_PHYSICAL_TOOLS;

/// Whether the tools-mapping dialog may be skipped when nothing needs the
/// user's attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsMappingSkip {
    /// Always show the dialog before a multi-tool print.
    Never,
    /// Skip it when the computed mapping validity is all-ok.
    WhenValid,
    /// Skip it unconditionally; the user takes the mapping as-is.
    Always,
}

/// Everything hardware- or configuration-dependent the checklist branches
/// on. One value per machine, fixed at construction; there is no
/// conditional compilation of checklist states.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Number of physical extruders, at most [`MAX_PHYSICAL_TOOLS`].
    pub tool_count: u8,
    pub has_mmu: bool,
    pub has_toolchanger: bool,
    /// Each physical extruder has its own heater, so auto-load can pre-heat
    /// the one it is about to feed.
    pub multi_hotend: bool,
    /// iX-style machines shrink the usable bed rect per job; it has to be
    /// reset before each print.
    pub ix_bed_rect: bool,
    /// Configured nozzle diameter per physical extruder.
    pub nozzle_diameter: [f32; MAX_PHYSICAL_TOOLS],
    pub tools_mapping_skip: ToolsMappingSkip,
    pub run_selftest_check: bool,
    pub run_update_check: bool,
}

impl Capabilities {
    /// A plain single-tool machine, convenient as a test/default baseline.
    pub fn single_tool(nozzle_diameter: f32) -> Self {
        Self {
            tool_count: 1,
            has_mmu: false,
            has_toolchanger: false,
            multi_hotend: false,
            ix_bed_rect: false,
            nozzle_diameter: [nozzle_diameter; MAX_PHYSICAL_TOOLS],
            tools_mapping_skip: ToolsMappingSkip::WhenValid,
            run_selftest_check: true,
            run_update_check: true,
        }
    }

    /// Bound for per-tool iteration. A misconfigured `tool_count` must not
    /// walk past what the nozzle table and tool masks can address.
    pub fn physical_tools(&self) -> u8 {
        self.tool_count.min(MAX_PHYSICAL_TOOLS as u8)
    }

    /// The tools-mapping dialog only exists where a logical-to-physical
    /// assignment exists: toolchangers, MMUs, and anything multi-tool.
    pub fn tools_mapping_possible(&self) -> bool {
        self.has_toolchanger || self.has_mmu || self.tool_count > 1
    }
}
