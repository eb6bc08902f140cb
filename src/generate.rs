//! Top-level generation: reference data in, composite image out.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::compose::compose;
use crate::foundation::core::Canvas;
use crate::foundation::error::{DeckImageError, DeckImageResult};
use crate::model::deck::DeckBuilder;
use crate::model::fleet::{Deck, Fleet};
use crate::model::master::{MasterData, ReferenceData, ShipStats};
use crate::parse::{parse_deck, required_ship_stats};
use crate::reference::ReferenceSource;
use crate::stats::{FleetStats, fleet_stats, has_five_slot};
use crate::theme::{ParameterPanelInput, PanelRenderer, ThemeRegistry, dispatch_fleet};

/// Generator knobs.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Handed to the reference source before the first fetch.
    pub cache_dir: Option<PathBuf>,
    /// Render fleets and panels concurrently.
    pub parallel: bool,
    /// Worker count for the parallel pool. `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            parallel: true,
            threads: None,
        }
    }
}

/// Owns the reference source, renderer table and worker pool.
pub struct Generator {
    source: Box<dyn ReferenceSource>,
    registry: ThemeRegistry,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("registry", &self.registry)
            .field("parallel", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

fn build_thread_pool(threads: Option<usize>) -> DeckImageResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(DeckImageError::validation(
            "generator 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        DeckImageError::render("setup", format!("failed to build rayon thread pool: {e}"))
    })
}

type PanelImages = (DeckImageResult<Canvas>, Option<DeckImageResult<Canvas>>);

impl Generator {
    pub fn new(
        source: impl ReferenceSource + 'static,
        registry: ThemeRegistry,
        config: GeneratorConfig,
    ) -> DeckImageResult<Self> {
        let mut source: Box<dyn ReferenceSource> = Box::new(source);
        if let Some(dir) = config.cache_dir {
            source.use_cache_dir(dir);
        }
        let pool = if config.parallel {
            Some(build_thread_pool(config.threads)?)
        } else {
            if config.threads.is_some_and(|n| n == 0) {
                return Err(DeckImageError::validation(
                    "generator 'threads' must be >= 1 when set",
                ));
            }
            None
        };
        Ok(Self {
            source,
            registry,
            pool,
        })
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Render `raw` into one composite image, fetching master data from the source.
    #[tracing::instrument(skip_all, fields(theme = %raw.theme_tag()))]
    pub fn generate(&self, raw: &DeckBuilder) -> DeckImageResult<Canvas> {
        let master = self.source.master_data()?;
        self.generate_with_master(raw, master)
    }

    /// Like [`Generator::generate`] with caller-supplied master data. Ship details still come
    /// from the source.
    pub fn generate_with_master(
        &self,
        raw: &DeckBuilder,
        master: MasterData,
    ) -> DeckImageResult<Canvas> {
        let deck = self.parse(raw, master)?;
        self.render(&deck)
    }

    /// Parse and compute statistics without rendering, one entry per fleet in order.
    pub fn fleet_stats(&self, raw: &DeckBuilder) -> DeckImageResult<Vec<FleetStats>> {
        let deck = self.parse(raw, self.source.master_data()?)?;
        Ok(deck
            .fleets
            .iter()
            .map(|f| fleet_stats(&f.ships, deck.hqlv))
            .collect())
    }

    /// Validate `raw` against `master` plus whatever ship details it needs.
    pub fn parse(&self, raw: &DeckBuilder, master: MasterData) -> DeckImageResult<Deck> {
        let ids: Vec<u32> = required_ship_stats(raw).into_iter().collect();
        let ship_stats = self.load_ship_stats(&ids)?;
        parse_deck(raw, &ReferenceData { master, ship_stats })
    }

    fn load_ship_stats(&self, ids: &[u32]) -> DeckImageResult<BTreeMap<u32, ShipStats>> {
        let fetch = |&id: &u32| self.source.ship_stats(id).map(|s| (id, s));
        match &self.pool {
            Some(pool) => pool.install(|| ids.par_iter().map(fetch).collect()),
            None => ids.iter().map(fetch).collect(),
        }
    }

    /// Render an already-parsed deck.
    pub fn render(&self, deck: &Deck) -> DeckImageResult<Canvas> {
        let (theme, renderer) = self.registry.resolve(&deck.theme)?;
        let panels = if theme.has_panels() {
            Some(self.registry.panels()?)
        } else {
            None
        };
        let five_slot = has_five_slot(&deck.fleets);

        let render_fleet = |(index, fleet): (usize, &Fleet)| {
            let stats = fleet_stats(&fleet.ships, deck.hqlv);
            tracing::debug!(
                fleet = index + 1,
                air_power = ?stats.air_power,
                speed = stats.speed.0,
                los = ?stats.los,
                "fleet statistics"
            );
            dispatch_fleet(
                renderer.as_ref(),
                theme,
                index,
                fleet,
                &stats,
                deck.lang,
                five_slot,
            )
        };
        let render_panels = |p: &Arc<dyn PanelRenderer>| -> PanelImages {
            let params = || render_parameter_panel(p.as_ref(), deck);
            let airbase = || {
                deck.uses_airbase().then(|| {
                    p.render_airbases(&deck.airbases, deck.lang)
                        .map_err(|e| e.in_stage("airbase panel"))
                })
            };
            match &self.pool {
                Some(_) => rayon::join(params, airbase),
                None => (params(), airbase()),
            }
        };

        let (fleet_images, panel_images): (DeckImageResult<Vec<Canvas>>, Option<PanelImages>) =
            match &self.pool {
                Some(pool) => pool.install(|| {
                    rayon::join(
                        || deck.fleets.par_iter().enumerate().map(render_fleet).collect(),
                        || panels.as_ref().map(render_panels),
                    )
                }),
                None => (
                    deck.fleets.iter().enumerate().map(render_fleet).collect(),
                    panels.as_ref().map(render_panels),
                ),
            };

        let fleet_images = fleet_images?;
        let panel_images = match panel_images {
            Some((params, airbase)) => Some((params?, airbase.transpose()?)),
            None => None,
        };

        Ok(compose(
            theme,
            &deck.fleets,
            &fleet_images,
            panel_images
                .as_ref()
                .map(|(params, airbase)| (params, airbase.as_ref())),
        ))
    }
}

fn render_parameter_panel(panels: &dyn PanelRenderer, deck: &Deck) -> DeckImageResult<Canvas> {
    let ships = deck.leading_ships();
    let input = ParameterPanelInput {
        ships: &ships,
        air_state: deck.air_state,
        comment: &deck.comment,
        lang: deck.lang,
    };
    panels
        .render_parameters(&input)
        .map_err(|e| e.in_stage("parameter panel"))
}

/// One-shot generation with the built-in renderers and default configuration.
pub fn generate(
    raw: &DeckBuilder,
    source: impl ReferenceSource + 'static,
) -> DeckImageResult<Canvas> {
    Generator::new(source, ThemeRegistry::builtin(), GeneratorConfig::default())?.generate(raw)
}
