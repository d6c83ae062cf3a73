//! Events the core hands to the presentation layer. The controller queues
//! them in order; the host drains the queue once per frame and updates
//! labels, overlays, and the cursor from what it finds.

use serde::Serialize;

use crate::transition::TurnDirection;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GalleryEvent {
    /// Hover focus moved; fires once per edge, never per frame.
    FocusChanged {
        previous: Option<usize>,
        current: Option<usize>,
    },
    TurnStarted {
        direction: TurnDirection,
        next_index: usize,
    },
    /// The rotation committed; labels may update now and not before.
    TurnCompleted { next_index: usize },
    ItemActivated { index: usize },
    CaptureChanged { captured: bool },
    OverlayOpened { index: usize },
    OverlayClosed { recapture: bool },
}
