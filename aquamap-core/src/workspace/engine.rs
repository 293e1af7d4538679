use super::state::{ImportReport, WorkspaceEvent};
use crate::{
    aggregation::{ClusterStyle, PointSet},
    catalog::Catalog,
    error::{AquamapError, StoreError},
    interaction::{InteractionOutcome, MapInteraction},
    logger::{self, Mutation, MutationLogger},
    map_port::MapSurface,
    sampling::{self, SampleConfig},
    session::EditSession,
    store::MarkerStore,
};
use aquamap_schemas::{
    category::WaterBody,
    draft::MarkerDraft,
    event::MapEvent,
    marker::{Marker, MarkerId},
    parameter::Parameter,
};
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// The whole editing surface: per-category stores, the shared form and the
/// map wiring. Every operation that changes the active store re-renders the
/// point layer on the given surface.
pub struct Workspace {
    pub(super) catalog: Catalog,
    pub(super) session: EditSession,
    pub(super) interaction: MapInteraction,
    pub(super) style: ClusterStyle,
    pub(super) sampling: SampleConfig,
    pub(super) logger: Option<MutationLogger>,
    pub(super) rng: StdRng,
    pub(super) events: Vec<WorkspaceEvent>,
}

impl Workspace {
    pub fn active_category(&self) -> WaterBody {
        self.catalog.active_category()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &MarkerStore {
        self.catalog.active()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn form_mut(&mut self) -> &mut MarkerDraft {
        self.session.form_mut()
    }

    pub fn toggle_optional(&mut self, parameter: Parameter) -> bool {
        self.session.toggle_optional(parameter)
    }

    pub fn interaction(&self) -> &MapInteraction {
        &self.interaction
    }

    pub fn cluster_style(&self) -> &ClusterStyle {
        &self.style
    }

    pub fn sampling(&self) -> &SampleConfig {
        &self.sampling
    }

    /// Clustering-ready view of the active store.
    pub fn point_set(&self) -> PointSet {
        PointSet::from_store(self.catalog.active())
    }

    pub fn events(&self) -> &[WorkspaceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pushes the current point layer and draft pin to the map.
    pub fn refresh(&self, surface: &mut dyn MapSurface) {
        surface.render_points(&self.point_set(), &self.style);
        surface.show_draft_pin(self.session.draft_pin());
    }

    pub fn handle_event(&mut self, event: &MapEvent, surface: &mut dyn MapSurface) -> InteractionOutcome {
        self.interaction
            .handle(event, &mut self.session, self.catalog.active(), surface)
    }

    /// Commits the form: creates a marker from `Idle`/`Drafting`, updates the
    /// edited one from `Editing`. A rejected submit changes nothing.
    pub fn submit(&mut self, surface: &mut dyn MapSurface) -> Result<Marker, AquamapError> {
        let category = self.catalog.active_category();
        let updating = self.session.editing_id().is_some();
        let marker = self.session.submit(self.catalog.active_mut())?;

        let (mutation, event) = if updating {
            (
                Mutation::Update,
                WorkspaceEvent::MarkerUpdated { category, id: marker.id.clone() },
            )
        } else {
            (
                Mutation::Add,
                WorkspaceEvent::MarkerAdded { category, id: marker.id.clone() },
            )
        };
        self.events.push(event);
        self.log_marker(mutation, category, &marker);

        if self.session.selection().is_none() {
            surface.show_selection(None);
        }
        self.refresh(surface);
        Ok(marker)
    }

    /// Loads `id` into the form for editing.
    pub fn begin_edit(&mut self, id: &MarkerId, surface: &mut dyn MapSurface) -> Result<(), AquamapError> {
        let marker = self
            .catalog
            .active()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.session.begin_edit(marker);
        surface.show_draft_pin(None);
        surface.show_selection(None);
        Ok(())
    }

    pub fn cancel(&mut self, surface: &mut dyn MapSurface) {
        self.session.cancel();
        surface.show_draft_pin(None);
        surface.show_selection(None);
    }

    /// Closes the draft pin popup; returns false when no pin was shown.
    pub fn dismiss_pin(&mut self, surface: &mut dyn MapSurface) -> bool {
        let dismissed = self.session.dismiss_pin();
        if dismissed {
            surface.show_draft_pin(None);
        }
        dismissed
    }

    pub fn close_popup(&mut self, surface: &mut dyn MapSurface) {
        self.session.clear_selection();
        surface.show_selection(None);
    }

    /// Deletes a marker from the active store. Unknown ids are a no-op.
    pub fn remove(&mut self, id: &MarkerId, surface: &mut dyn MapSurface) -> Option<Marker> {
        let category = self.catalog.active_category();
        let removed = self.session.remove(self.catalog.active_mut(), id);
        surface.show_selection(None);
        if let Some(marker) = &removed {
            self.events.push(WorkspaceEvent::MarkerRemoved {
                category,
                id: marker.id.clone(),
            });
            self.log_removal(Mutation::Remove, category, &marker.id);
            self.refresh(surface);
        }
        removed
    }

    /// Makes `category` active. The session is reset so no draft, edit or
    /// selection leaks into the other store.
    pub fn switch_category(&mut self, category: WaterBody, surface: &mut dyn MapSurface) -> bool {
        let from = self.catalog.active_category();
        if !self.catalog.switch(category) {
            return false;
        }
        self.session.reset();
        self.events.push(WorkspaceEvent::CategorySwitched { from, to: category });
        surface.show_selection(None);
        self.refresh(surface);
        true
    }

    /// Adds a batch of random sample markers to the active store. `count`
    /// defaults to the configured batch size.
    pub fn generate_samples(
        &mut self,
        count: Option<usize>,
        surface: &mut dyn MapSurface,
    ) -> Result<Vec<Marker>, AquamapError> {
        let category = self.catalog.active_category();
        let count = count.unwrap_or(self.sampling.count);
        let batch = sampling::generate(&self.sampling, count, &mut self.rng);
        let added = self.catalog.active_mut().bulk_add(batch)?;

        info!(category = %category, count = added.len(), "generated sample markers");
        self.events.push(WorkspaceEvent::SamplesAdded {
            category,
            count: added.len(),
        });
        for marker in &added {
            self.log_marker(Mutation::BulkAdd, category, marker);
        }
        self.refresh(surface);
        Ok(added)
    }

    /// Removes every tracked sample from the active store.
    pub fn delete_samples(&mut self, surface: &mut dyn MapSurface) -> usize {
        let category = self.catalog.active_category();
        let ids: HashSet<MarkerId> = self.catalog.active().sample_ids().clone();
        if ids.is_empty() {
            return 0;
        }
        let editing_sample = self.session.editing_id().map_or(false, |id| ids.contains(id));
        let sample_selected = self
            .session
            .selection()
            .map_or(false, |s| ids.contains(&s.marker_id));
        if editing_sample {
            // Also clears the selection.
            self.session.cancel();
        } else if sample_selected {
            self.session.clear_selection();
        }
        if editing_sample || sample_selected {
            surface.show_selection(None);
        }

        let removed = self.catalog.active_mut().bulk_remove(&ids);
        info!(category = %category, count = removed, "deleted sample markers");
        self.events.push(WorkspaceEvent::SamplesRemoved {
            category,
            count: removed,
        });
        let mut sorted: Vec<&MarkerId> = ids.iter().collect();
        sorted.sort();
        for id in sorted {
            self.log_removal(Mutation::BulkRemove, category, id);
        }
        self.refresh(surface);
        removed
    }

    /// Writes the active store to `path` as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<usize, AquamapError> {
        logger::export_markers(path, self.catalog.active_category(), self.catalog.active().markers())
    }

    /// Reads markers from a CSV export into the active store. Each row goes
    /// through the full rule set against what is already stored and gets a
    /// fresh id; rejected rows are reported, not fatal.
    pub fn import_csv(&mut self, path: &Path, surface: &mut dyn MapSurface) -> Result<ImportReport, AquamapError> {
        let category = self.catalog.active_category();
        let records = logger::read_markers(path)?;
        let mut report = ImportReport::default();

        for record in records {
            if record.category != category {
                warn!(row = %record.id, from = %record.category, to = %category, "importing row into a different category");
            }
            match self.catalog.active_mut().add_fields(record.fields()) {
                Ok(marker) => {
                    self.log_marker(Mutation::Add, category, &marker);
                    report.accepted.push(marker.id);
                }
                Err(err) => {
                    warn!(row = %record.id, error = %err, "rejected imported row");
                    report.rejected.push((record.id, err.to_string()));
                }
            }
        }

        self.events.push(WorkspaceEvent::Imported {
            category,
            accepted: report.accepted.len(),
            rejected: report.rejected.len(),
        });
        self.refresh(surface);
        Ok(report)
    }

    // Store changes are already committed when these run, so a failed log
    // write is only reported.
    fn log_marker(&mut self, mutation: Mutation, category: WaterBody, marker: &Marker) {
        if let Some(logger) = &mut self.logger {
            if let Err(err) = logger.log_marker(mutation, category, marker) {
                warn!(marker = %marker.id, error = %err, "failed to write mutation log");
            }
        }
    }

    fn log_removal(&mut self, mutation: Mutation, category: WaterBody, id: &MarkerId) {
        if let Some(logger) = &mut self.logger {
            if let Err(err) = logger.log_removal(mutation, category, id) {
                warn!(marker = %id, error = %err, "failed to write mutation log");
            }
        }
    }
}
