//! Host page boundary
//!
//! The overlay never touches the page directly. A host implements
//! [`HostPage`] over its own markup and feeds [`HostEvent`]s in.

use critter_core::player::ElementInfo;
use critter_core::render::{CardView, PanelView, RailButton};
use critter_core::Layer;

use crate::error::HostError;

/// Named regions the overlay expects on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Root,
    CategoryRail,
    Panel,
    PanelTitle,
    PanelGrid,
    Card,
    CardIcon,
    CardName,
    CardSummary,
    CardFact,
    Status,
}

impl Region {
    pub const REQUIRED: [Region; 10] = [
        Region::Root,
        Region::CategoryRail,
        Region::Panel,
        Region::PanelTitle,
        Region::PanelGrid,
        Region::Card,
        Region::CardIcon,
        Region::CardName,
        Region::CardSummary,
        Region::CardFact,
    ];

    /// Element id used by the overlay markup
    pub fn element_id(self) -> &'static str {
        match self {
            Region::Root => "ccRoot",
            Region::CategoryRail => "catRail",
            Region::Panel => "panel",
            Region::PanelTitle => "panelTitle",
            Region::PanelGrid => "critterGrid",
            Region::Card => "card",
            Region::CardIcon => "cIcon",
            Region::CardName => "cName",
            Region::CardSummary => "cSummary",
            Region::CardFact => "cFact",
            Region::Status => "status",
        }
    }

    /// Container region toggled for a layer
    pub fn for_layer(layer: Layer) -> Self {
        match layer {
            Layer::Overlay => Region::Root,
            Layer::Panel => Region::Panel,
            Layer::Card => Region::Card,
        }
    }
}

/// Raw input from the page
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer position in client coordinates
    PointerMoved { x: f64, y: f64 },
    CategoryEntered(String),
    CategoryLeft,
    PanelEntered,
    PanelLeft,
    ItemEntered(String),
    ItemLeft,
    CardEntered,
    CardLeft,
}

pub trait HostPage {
    /// Topmost element at a point plus its ancestors, if any
    fn element_at(&self, x: f64, y: f64) -> Option<ElementInfo>;

    /// Whether the page provides a region. Checked for every
    /// [`Region::REQUIRED`] entry at startup.
    fn has_region(&self, _region: Region) -> bool {
        true
    }

    fn set_visible(&mut self, layer: Layer, visible: bool) -> Result<(), HostError>;

    fn render_rail(&mut self, buttons: &[RailButton]) -> Result<(), HostError>;

    fn render_panel(&mut self, view: &PanelView) -> Result<(), HostError>;

    fn render_card(&mut self, view: &CardView) -> Result<(), HostError>;

    /// Status line is optional; pages without one return `MissingRegion(Status)`
    fn show_status(&mut self, text: &str) -> Result<(), HostError>;
}
