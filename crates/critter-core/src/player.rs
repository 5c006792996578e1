//! Player detection
//!
//! Classifies the element under the pointer as video player, chat, or
//! anything else. Chat markers are checked first: an element nested in
//! both counts as chat.

/// One node of the ancestor chain under the pointer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementNode {
    /// Lowercase tag name
    pub tag: String,
    /// Raw `class` attribute
    pub class_attr: String,
    /// `data-a-target` attribute, if any
    pub data_target: Option<String>,
}

impl ElementNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_class(mut self, class_attr: impl Into<String>) -> Self {
        self.class_attr = class_attr.into();
        self
    }

    pub fn with_target(mut self, data_target: impl Into<String>) -> Self {
        self.data_target = Some(data_target.into());
        self
    }

    fn has_class(&self, token: &str) -> bool {
        self.class_attr.split_whitespace().any(|c| c == token)
    }

    fn target_is(&self, targets: &[&str]) -> bool {
        self.data_target
            .as_deref()
            .is_some_and(|t| targets.contains(&t))
    }

    fn is_chat(&self) -> bool {
        self.target_is(CHAT_TARGETS) || self.class_attr.contains("chat")
    }

    fn is_player(&self) -> bool {
        self.tag.eq_ignore_ascii_case("video")
            || self.target_is(PLAYER_TARGETS)
            || self.has_class("player-video")
            || self.class_attr.contains("video-player")
    }
}

/// The topmost element under a point, followed by its ancestors up to the root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    pub chain: Vec<ElementNode>,
}

impl ElementInfo {
    pub fn new(chain: Vec<ElementNode>) -> Self {
        Self { chain }
    }
}

const CHAT_TARGETS: &[&str] = &["chat-room-component-layout", "right-column-chat-bar"];

const PLAYER_TARGETS: &[&str] = &[
    "player-overlay-click-handler",
    "player-overlay",
    "player-controls",
    "video-player",
];

/// Where the pointer currently is, as far as overlay visibility cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerZone {
    OverPlayer,
    InChat,
    Elsewhere,
}

impl PointerZone {
    pub fn is_over_player(self) -> bool {
        self == PointerZone::OverPlayer
    }
}

pub fn classify(element: Option<&ElementInfo>) -> PointerZone {
    let Some(element) = element else {
        return PointerZone::Elsewhere;
    };

    if element.chain.iter().any(ElementNode::is_chat) {
        PointerZone::InChat
    } else if element.chain.iter().any(ElementNode::is_player) {
        PointerZone::OverPlayer
    } else {
        PointerZone::Elsewhere
    }
}
