//! The add/edit state machine behind the shared marker form.
//!
//! ```text
//!            place_pin                begin_edit
//!   Idle ───────────────▶ Drafting ─────────────▶ Editing(id)
//!    ▲  ◀─────────────────    │                      │
//!    │   submit / cancel /    │ place_pin            │ submit / cancel /
//!    │   dismiss_pin          ▼ (moves the pin)      │ remove(id)
//!    └───────────────────────────────────────────────┘
//! ```
//!
//! A rejected submit leaves the state and the form untouched.

use crate::{error::StoreError, store::MarkerStore};
use aquamap_schemas::{
    draft::MarkerDraft,
    geo::Coordinates,
    marker::{Marker, MarkerId},
    parameter::Parameter,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An uncommitted location chosen on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DraftPin {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Drafting(DraftPin),
    Editing(MarkerId),
}

/// What a submit will do, fully determined by the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// A single point resolved out of the cluster layer, shown in a popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub marker_id: MarkerId,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    state: SessionState,
    form: MarkerDraft,
    selection: Option<Selection>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            form: MarkerDraft::default(),
            selection: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> FormMode {
        match self.state {
            SessionState::Editing(_) => FormMode::Update,
            SessionState::Idle | SessionState::Drafting(_) => FormMode::Create,
        }
    }

    pub fn form(&self) -> &MarkerDraft {
        &self.form
    }

    /// Working copy of the form fields for direct user input.
    pub fn form_mut(&mut self) -> &mut MarkerDraft {
        &mut self.form
    }

    pub fn draft_pin(&self) -> Option<&DraftPin> {
        match &self.state {
            SessionState::Drafting(pin) => Some(pin),
            _ => None,
        }
    }

    pub fn editing_id(&self) -> Option<&MarkerId> {
        match &self.state {
            SessionState::Editing(id) => Some(id),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn toggle_optional(&mut self, parameter: Parameter) -> bool {
        self.form.toggle(parameter)
    }

    /// Places (or moves) the draft pin from a map context click.
    ///
    /// From `Idle` or `Editing` the form is reset to hold only the clicked
    /// coordinates; an edit in progress is abandoned. From `Drafting` only the
    /// coordinates change so values typed so far are kept.
    pub fn place_pin(&mut self, coordinates: Coordinates) -> DraftPin {
        let pin = DraftPin { coordinates };
        match self.state {
            SessionState::Drafting(_) => self.form.set_coordinates(coordinates),
            SessionState::Idle | SessionState::Editing(_) => {
                self.form = MarkerDraft::at(coordinates);
            }
        }
        self.state = SessionState::Drafting(pin);
        self.selection = None;
        debug!(lat = coordinates.latitude, lng = coordinates.longitude, "draft pin placed");
        pin
    }

    /// Closes the draft pin popup. Only meaningful while drafting.
    pub fn dismiss_pin(&mut self) -> bool {
        if self.draft_pin().is_none() {
            return false;
        }
        self.reset_form();
        true
    }

    /// Starts editing `marker`, replacing whatever the form held.
    pub fn begin_edit(&mut self, marker: &Marker) {
        self.form = MarkerDraft::from_marker(marker);
        self.state = SessionState::Editing(marker.id.clone());
        self.selection = None;
        debug!(marker = %marker.id, "editing marker");
    }

    /// Abandons the current draft or edit.
    pub fn cancel(&mut self) {
        self.reset_form();
        self.selection = None;
    }

    /// Commits the form to `store`: a new marker in `Idle`/`Drafting`, an update
    /// in `Editing`. On success the session returns to `Idle` with an empty
    /// form; on failure nothing changes.
    pub fn submit(&mut self, store: &mut MarkerStore) -> Result<Marker, StoreError> {
        let committed = match &self.state {
            SessionState::Editing(id) => store.update(id, &self.form)?,
            SessionState::Idle | SessionState::Drafting(_) => store.add(&self.form)?,
        };
        if self.selection.as_ref().map_or(false, |s| s.marker_id == committed.id) {
            self.selection = None;
        }
        info!(marker = %committed.id, mode = ?self.mode(), "marker committed");
        self.reset_form();
        Ok(committed)
    }

    /// Removes `id` from `store`. Removing the marker being edited also leaves
    /// edit mode. Any selection is cleared.
    pub fn remove(&mut self, store: &mut MarkerStore, id: &MarkerId) -> Option<Marker> {
        let removed = store.remove(id);
        if self.editing_id() == Some(id) {
            self.reset_form();
        }
        self.selection = None;
        removed
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Forgets everything tied to the current store. Used when the host points
    /// the session at another category.
    pub fn reset(&mut self) {
        self.reset_form();
        self.selection = None;
    }

    fn reset_form(&mut self) {
        self.state = SessionState::Idle;
        self.form.clear();
    }
}
