#![forbid(unsafe_code)]

//! `deckimage` turns a deck-builder fleet record into one composite summary image.
//!
//! The pipeline is:
//! 1. [`parse_deck`] validates the raw [`DeckBuilder`] against [`MasterData`] and per-ship details
//!    from a [`ReferenceSource`],
//! 2. [`fleet_stats`] computes line-of-sight, air power and speed for each fleet,
//! 3. the [`ThemeRegistry`] routes each fleet to the renderer for the deck's [`Theme`],
//! 4. [`compose`] stacks the fleet images and, for the dark theme, places the parameter and
//!    airbase panels.
//!
//! [`Generator`] runs all of it, rendering fleets concurrently on a rayon pool.
//!
//! ```no_run
//! use deckimage::{DeckBuilder, DirSource};
//!
//! let deck = DeckBuilder::from_path("deck.json")?;
//! let source = DirSource::new("START2.json").with_ship_dir("ship");
//! deckimage::generate(&deck, source)?.save_png("deck.png")?;
//! # Ok::<(), deckimage::DeckImageError>(())
//! ```

pub mod compose;
pub mod foundation;
pub mod generate;
pub mod model;
pub mod parse;
pub mod reference;
pub mod stats;
pub mod theme;

pub use compose::{
    DarkLayout, PANEL_GUTTER, background_for, column_count, compose, compose_dark, stick,
};
pub use foundation::core::{Canvas, DARK_BACKGROUND, LIGHT_BACKGROUND, Rgba8};
pub use foundation::error::{DeckImageError, DeckImageResult};
pub use generate::{Generator, GeneratorConfig, generate};
pub use model::deck::{AirState, DeckBuilder, Lang};
pub use model::fleet::{Airbase, Deck, Fleet, Item, Ship};
pub use model::master::{MasterData, ReferenceData, ShipStats};
pub use parse::parse_deck;
#[cfg(feature = "fetch")]
pub use reference::{HttpSource, ReferenceLocation};
pub use reference::{DirSource, ReferenceSource, StaticSource};
pub use stats::{
    AirPower, FleetStats, LoS, Speed, compute_air_power, compute_los, compute_speed, fleet_stats,
};
pub use theme::{
    FleetRenderInput, FleetRenderer, PanelRenderer, ParameterPanelInput, Theme, ThemeRegistry,
};
