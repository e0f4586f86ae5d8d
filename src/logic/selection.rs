use tokio::sync::mpsc;

use crate::state::SelectableAppModel;

/// Where a selection session currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting toggle events.
    Browsing,
    /// The user accepted the selection. Terminal.
    Confirmed,
    /// The user left without saving. Terminal.
    Cancelled,
}

impl SessionState {
    /// True for `Confirmed` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Browsing)
    }
}

/// Input to a selection session, independent of any terminal library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Flip `is_selected` on the model at this index.
    Toggle(usize),
    /// Accept the current selection.
    Confirm,
    /// Leave without accepting (escape, close, interrupt).
    Cancel,
}

/// How a session ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Final model list to persist.
    Confirmed(Vec<SelectableAppModel>),
    /// Nothing to persist; a normal, non-error ending.
    Cancelled,
}

/// Interactive selection state machine.
///
/// The session is the only place selection flags change. Rendering layers read
/// [`SelectionSession::models`] and feed [`SelectionEvent`]s back in.
#[derive(Clone, Debug)]
pub struct SelectionSession {
    models: Vec<SelectableAppModel>,
    state: SessionState,
}

impl SelectionSession {
    /// Start a session in `Browsing` over `models`.
    #[must_use]
    pub const fn new(models: Vec<SelectableAppModel>) -> Self {
        Self {
            models,
            state: SessionState::Browsing,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Models with their current flags.
    #[must_use]
    pub fn models(&self) -> &[SelectableAppModel] {
        &self.models
    }

    /// Number of models currently selected.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.models.iter().filter(|m| m.is_selected).count()
    }

    /// What: Apply one event to the state machine.
    ///
    /// Inputs:
    /// - `event`: Next user input
    ///
    /// Output:
    /// - State after the event.
    ///
    /// Details:
    /// - Events after a terminal state are ignored.
    /// - A toggle on an out-of-range index is ignored and stays `Browsing`.
    pub fn apply(&mut self, event: SelectionEvent) -> SessionState {
        if self.state.is_terminal() {
            tracing::trace!(?event, state = ?self.state, "[Select] Ignoring event after session end");
            return self.state;
        }
        match event {
            SelectionEvent::Toggle(idx) => {
                if let Some(model) = self.models.get_mut(idx) {
                    model.is_selected = !model.is_selected;
                    tracing::trace!(
                        app_id = %model.app_id,
                        selected = model.is_selected,
                        "[Select] Toggled app"
                    );
                }
            }
            SelectionEvent::Confirm => self.state = SessionState::Confirmed,
            SelectionEvent::Cancel => self.state = SessionState::Cancelled,
        }
        self.state
    }

    /// What: Turn a finished session into its outcome.
    ///
    /// Output:
    /// - `Confirmed(models)` only when the state is `Confirmed`; `Cancelled` otherwise.
    #[must_use]
    pub fn finish(self) -> SessionOutcome {
        match self.state {
            SessionState::Confirmed => SessionOutcome::Confirmed(self.models),
            SessionState::Browsing | SessionState::Cancelled => SessionOutcome::Cancelled,
        }
    }

    /// What: Drive the session from an event channel until it ends.
    ///
    /// Inputs:
    /// - `events`: Receiver of user input; the session waits on it without polling
    ///
    /// Output:
    /// - Session outcome.
    ///
    /// Details:
    /// - A closed channel counts as `Cancel`, so dropping the sender cancels the session.
    pub async fn run(mut self, events: &mut mpsc::UnboundedReceiver<SelectionEvent>) -> SessionOutcome {
        while !self.state.is_terminal() {
            match events.recv().await {
                Some(ev) => {
                    self.apply(ev);
                }
                None => {
                    tracing::debug!("[Select] Event stream closed; cancelling session");
                    self.apply(SelectionEvent::Cancel);
                }
            }
        }
        tracing::info!(state = ?self.state, selected = self.selected_count(), "[Select] Session finished");
        self.finish()
    }
}
