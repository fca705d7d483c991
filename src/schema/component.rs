use super::data::{ColorData, Vec2Data};
use crate::serialization::{Fields, Result, Serializer};
use serde::Serialize;

/// Placeholder stored in GUID-valued fields that reference nothing.
pub const NO_OBJECT: &str = "[None]";

/// Fields shared by every component record. Walked inline, so it adds no
/// version of its own to the stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHeader {
    pub enabled: bool,
    /// Position of the component in its entity's component list.
    pub index: i32,
}

impl Default for ComponentHeader {
    fn default() -> Self {
        Self { enabled: true, index: 0 }
    }
}

impl ComponentHeader {
    pub fn new(enabled: bool, index: usize) -> Self {
        Self { enabled, index: i32::try_from(index).unwrap_or(i32::MAX) }
    }
}

impl Fields for ComponentHeader {
    fn fields(&mut self, s: &mut Serializer<'_>) -> Result<()> {
        s.data(&mut self.enabled)?;
        s.data(&mut self.index)
    }
}

/// Layout fields shared by canvas widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiElementHeader {
    pub component: ComponentHeader,
    pub anchor: Vec2Data,
    pub color: ColorData,
    pub size: Vec2Data,
    pub horizontal_alignment: i32,
    pub vertical_alignment: i32,
    pub raycast_target: bool,
}

impl Default for UiElementHeader {
    fn default() -> Self {
        Self {
            component: ComponentHeader::default(),
            anchor: Vec2Data::new(0.5, 0.5),
            color: ColorData::default(),
            size: Vec2Data::new(100.0, 100.0),
            horizontal_alignment: 0,
            vertical_alignment: 0,
            raycast_target: true,
        }
    }
}

impl Fields for UiElementHeader {
    fn fields(&mut self, s: &mut Serializer<'_>) -> Result<()> {
        s.inline(&mut self.component)?;
        s.archive(&mut self.anchor)?;
        s.archive(&mut self.color)?;
        s.archive(&mut self.size)?;
        s.data(&mut self.horizontal_alignment)?;
        s.data(&mut self.vertical_alignment)?;
        s.data(&mut self.raycast_target)
    }
}
