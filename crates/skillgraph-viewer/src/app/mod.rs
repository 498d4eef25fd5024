use crossbeam_channel::{Receiver, Sender};

use crate::graph::interaction::InteractionError;
use crate::graph::GraphState;

pub mod events;

pub use events::{Interaction, Notice, PumpOutcome};

/// Upper bound on events handled per pump, so a flood cannot stall a frame.
const MAX_EVENTS_PER_PUMP: usize = 100_000;

/// Queue of pending interactions. Hosts may post from any thread; the state
/// is only touched inside [`EventQueue::pump`].
pub struct EventQueue {
    tx: Sender<Interaction>,
    rx: Receiver<Interaction>,
}

impl Default for EventQueue {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl EventQueue {
    pub fn sender(&self) -> Sender<Interaction> {
        self.tx.clone()
    }

    pub fn post(&self, event: Interaction) {
        // rx lives as long as self, so the channel cannot be disconnected
        let _ = self.tx.send(event);
    }

    /// Applies everything queued, then runs at most one layout pass.
    pub fn pump(&self, st: &mut GraphState) -> PumpOutcome {
        let mut out = PumpOutcome::default();
        for event in self.rx.try_iter().take(MAX_EVENTS_PER_PUMP) {
            out.applied += 1;
            if let Err(e) = apply(st, event) {
                tracing::warn!(error = %e, "interaction rejected");
                out.notices.push(Notice::from(e));
            }
        }
        out.recomputed = st.recompute_if_dirty();
        out
    }
}

fn apply(st: &mut GraphState, event: Interaction) -> Result<(), InteractionError> {
    match event {
        Interaction::Toggle(id) => st.toggle_expand(&id).map(|_| ()),
        Interaction::SetExpanded(id, expanded) => st.set_expanded(&id, expanded),
        Interaction::Drag { id, position } => st.drag(&id, position),
        Interaction::Search(query) => {
            st.recompute_search_hits(&query);
            Ok(())
        }
        Interaction::Select(id) => st.select(&id),
        Interaction::ClearSelection => {
            st.clear_selection();
            Ok(())
        }
        Interaction::ResetDrag => {
            st.reset_drag();
            Ok(())
        }
        Interaction::Reload(data) => {
            st.load(*data);
            Ok(())
        }
    }
}
