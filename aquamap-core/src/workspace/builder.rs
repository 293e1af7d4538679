use super::engine::Workspace;
use crate::{
    aggregation::ClusterStyle,
    catalog::Catalog,
    error::AquamapError,
    interaction::{InteractionConfig, MapInteraction},
    logger::MutationLogger,
    sampling::SampleConfig,
    session::EditSession,
};
use aquamap_schemas::category::WaterBody;
use rand::{rngs::StdRng, SeedableRng};

/// A fluent builder for constructing a [`Workspace`].
///
/// Everything has a default, so `WorkspaceBuilder::new().build()` yields an
/// empty workspace on the ponds category with the stock camera and cluster
/// settings.
#[derive(Default)]
pub struct WorkspaceBuilder {
    category: WaterBody,
    interaction: InteractionConfig,
    style: ClusterStyle,
    sampling: SampleConfig,
    log_path: Option<String>,
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category shown first.
    pub fn with_active_category(mut self, category: WaterBody) -> Self {
        self.category = category;
        self
    }

    pub fn with_interaction_config(mut self, config: InteractionConfig) -> Self {
        self.interaction = config;
        self
    }

    pub fn with_cluster_style(mut self, style: ClusterStyle) -> Self {
        self.style = style;
        self
    }

    /// Sample batch settings. A configured seed makes every batch reproducible.
    pub fn with_sampling(mut self, sampling: SampleConfig) -> Self {
        self.sampling = sampling;
        self
    }

    /// Records every committed store mutation as a CSV row in `path`.
    pub fn with_mutation_log(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    /// # Errors
    ///
    /// Returns `AquamapError::InvalidConfig` if the sampling bounds are not
    /// finite, and `AquamapError::FileIO` if the mutation log cannot be created.
    pub fn build(self) -> Result<Workspace, AquamapError> {
        self.sampling.check().map_err(AquamapError::InvalidConfig)?;

        let logger = match self.log_path {
            Some(path) => Some(
                MutationLogger::new(&path).map_err(|e| AquamapError::FileIO(path.clone(), e))?,
            ),
            None => None,
        };

        let rng = match self.sampling.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Workspace {
            catalog: Catalog::new(self.category),
            session: EditSession::new(),
            interaction: MapInteraction::new(self.interaction),
            style: self.style,
            sampling: self.sampling,
            logger,
            rng,
            events: Vec::new(),
        })
    }
}
