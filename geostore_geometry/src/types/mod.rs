// Building blocks of the `Geometry` value type: `Coordinates`, `RingGeometry`,
// `PolygonGeometry` and `MultiPolygonGeometry`. They share `GeometryTrait`
// (validation, area, bounds, point containment, GeoJSON coordinates) and
// `CompositeGeometryTrait` (read access to the inner elements).

mod coordinates;
mod macros;
mod multi_polygon;
mod polygon;
mod ring;
mod traits;

pub use coordinates::*;
pub use multi_polygon::*;
pub use polygon::*;
pub use ring::*;
pub use traits::*;
