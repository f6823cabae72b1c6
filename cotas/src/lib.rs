//! # Cotas
//!
//! Terrain elevation routines for earthworks design:
//!
//! - sampling a raster DTM at pixel centers ([extract]),
//! - interpolating design elevations along a line of stakes ([estaca]),
//! - densifying a stake line into a terrain profile ([support], [profile]),
//! - finding where cut and fill faces meet the terrain ([talude]),
//! - measuring cut and fill areas between two profiles ([hatch], [section]).
//!
//! Everything operates on plain coordinate collections. Elevations are
//! read through the [ElevationSource] trait, implemented for
//! [dem::Raster] and [TileSet].

mod error;
pub mod estaca;
pub mod extract;
pub mod hatch;
pub mod math;
pub mod output;
pub mod profile;
pub mod section;
mod source;
pub mod support;
pub mod talude;
mod tiles;

pub use crate::{
    error::CotasError,
    estaca::Estaca,
    hatch::{HatchAreas, HatchKind},
    math::Point3,
    profile::{Profile, ProfileTask},
    section::CrossSection,
    source::ElevationSource,
    support::{Stake, SupportPoint},
    talude::{Side, TaludeHit},
    tiles::{TileMode, TileSet},
};
pub use dem::{self, ElevationRange, C};
pub use geo;
