//! Card type tracking: number input → detected network → card skin marker.

use crate::ids::ElementId;
use crate::surface::{CardEvent, Surface};
use paycard_payment::{detect_network, Network};

/// Present on the card element once a network has been recognized.
pub const IDENTIFIED_MARKER: &str = "jp-card-identified";
/// Network marker for [`Network::Unknown`].
pub const UNKNOWN_MARKER: &str = "jp-card-unknown";

/// Card skin marker for a network (`jp-card-visa`, ..., `jp-card-unknown`).
pub fn network_marker(network: Network) -> String {
    format!("jp-card-{}", network.id())
}

/// Owns the current network. Only [`CardTypeTracker::update`] changes it.
#[derive(Debug, Default)]
pub struct CardTypeTracker {
    network: Network,
}

impl CardTypeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn network(&self) -> Network {
        self.network
    }

    /// Detect the network of `number_text`, announce it, and re-skin the card
    /// when its marker is not already present.
    pub fn update(
        &mut self,
        surface: &mut dyn Surface,
        card: ElementId,
        number_text: &str,
    ) -> Network {
        let detected = detect_network(number_text);
        surface.emit(CardEvent::CardTypeChanged { network: detected });

        let marker = network_marker(detected);
        if surface.has_class(card, &marker) {
            return detected;
        }

        surface.remove_class(card, UNKNOWN_MARKER);
        for known in Network::KNOWN {
            surface.remove_class(card, &network_marker(known));
        }
        surface.add_class(card, &marker);
        if detected.is_known() {
            surface.add_class(card, IDENTIFIED_MARKER);
        } else {
            surface.remove_class(card, IDENTIFIED_MARKER);
        }

        log::debug!("card type {} -> {}", self.network, detected);
        self.network = detected;
        detected
    }
}
