// SPDX-License-Identifier: GPL-3.0-or-later

/// User- or auto-configured assignment of logical G-code tool indices to
/// physical extruders. An unmapped tool is `None`.
pub trait ToolMapper {
    fn to_physical(&self, gcode_tool: u8) -> Option<u8>;
    fn to_gcode(&self, physical: u8) -> Option<u8>;
    fn reset(&mut self);
}

/// Spool-join chains: when the head spool of a chain runs out, the next
/// physical tool in the chain continues the same logical tool.
pub trait SpoolJoin {
    /// Head of the chain `physical` belongs to; `physical` itself when it
    /// is not a continuation spool.
    fn first_spool_of_chain(&self, physical: u8) -> u8;
    fn next_spool(&self, physical: u8) -> Option<u8>;
    fn reset(&mut self);
}

/// Single source of truth for "which G-code tool does this physical
/// extruder print". Continuation spools inherit the mapping of their chain
/// head.
pub fn to_gcode_tool_custom(
    mapper: &dyn ToolMapper,
    spool_join: &dyn SpoolJoin,
    physical: u8,
) -> Option<u8> {
    if let Some(gcode_tool) = mapper.to_gcode(physical) {
        return Some(gcode_tool);
    }
    let head = spool_join.first_spool_of_chain(physical);
    if head != physical {
        mapper.to_gcode(head)
    } else {
        None
    }
}

/// One bit per tool index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolMask(u16);

impl ToolMask {
    pub const EMPTY: ToolMask = ToolMask(0);

    pub fn set(&mut self, tool: u8) {
        self.0 |= 1 << tool;
    }

    pub fn contains(&self, tool: u8) -> bool {
        self.0 & (1 << tool) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_mask() {
        let mut m = ToolMask::EMPTY;
        assert!(m.is_empty());
        m.set(2);
        m.set(5);
        assert!(!m.is_empty());
        assert!(m.contains(2));
        assert!(m.contains(5));
        assert!(!m.contains(0));
    }

    struct Mapper;
    impl ToolMapper for Mapper {
        fn to_physical(&self, gcode_tool: u8) -> Option<u8> {
            (gcode_tool == 0).then(|| 0)
        }
        fn to_gcode(&self, physical: u8) -> Option<u8> {
            (physical == 0).then(|| 0)
        }
        fn reset(&mut self) {}
    }

    // Physical 1 and 2 continue physical 0's spool.
    struct Join;
    impl SpoolJoin for Join {
        fn first_spool_of_chain(&self, physical: u8) -> u8 {
            if physical <= 2 { 0 } else { physical }
        }
        fn next_spool(&self, physical: u8) -> Option<u8> {
            (physical < 2).then(|| physical + 1)
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn continuation_spools_inherit_the_chain_head_mapping() {
        assert_eq!(to_gcode_tool_custom(&Mapper, &Join, 0), Some(0));
        assert_eq!(to_gcode_tool_custom(&Mapper, &Join, 1), Some(0));
        assert_eq!(to_gcode_tool_custom(&Mapper, &Join, 2), Some(0));
        assert_eq!(to_gcode_tool_custom(&Mapper, &Join, 3), None);
    }
}
