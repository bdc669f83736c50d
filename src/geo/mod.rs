pub mod distance;
pub mod location;

pub use distance::{format_distance, haversine_km, Coordinates, EARTH_RADIUS_KM};
pub use location::{resolve_origin, Geolocator};
