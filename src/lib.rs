//! Clips vector geometry into the per-tile pieces a map-tile pyramid is built from.
//!
//! A [`TiledGeometry`] is constructed for one fixed zoom, fed one or more geometries through
//! [`TiledGeometry::slice_points`] (points) or [`TiledGeometry::slice_shapes`] (polylines and
//! polygons, including antimeridian-crossing ones), and read back via
//! [`TiledGeometry::tile_data`] and [`TiledGeometry::filled_tiles`].
//!
//! The clip itself runs in two passes — [`stripe`] cuts on the X axis, [`cell`] cuts the
//! resulting stripes on the Y axis — orchestrated per ring group by [`driver`], which also
//! handles the antimeridian by re-running a group at a shifted world copy when it overflows
//! past either edge. [`points`] is a separate, cheaper fast path for point geometries that
//! never needs stripe/cell clipping at all.

pub mod cell;
pub mod driver;
pub mod extent;
pub mod geometry;
pub mod params;
pub mod points;
pub mod primitives;
pub mod ranges;
pub mod sequence;
pub mod store;
pub mod stripe;
pub mod tile_id;

pub use driver::{GroupInput, RingInput};
pub use extent::{TileExtents, WorldExtents};
pub use geometry::{SliceConfig, SliceError, TiledGeometry, MAX_ZOOM};
pub use store::RingGroup;
pub use tile_id::TileId;
