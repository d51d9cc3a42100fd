//! Satellite tile addressing for the farm location.
//!
//! Rendering the map is left to whatever consumes the URL; this module only
//! resolves which Web-Mercator tile covers the site and fills in the template.

use serde::Serialize;

use crate::domain::Location;
use crate::error::AppError;

/// Google hybrid satellite tiles.
pub const SATELLITE_TILE_TEMPLATE: &str = "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}&key={key}";
pub const DEFAULT_ZOOM: u8 = 16;
pub const MAX_ZOOM: u8 = 22;

/// Web-Mercator cannot represent the poles.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// The slippy-map tile containing `location` at `zoom`.
pub fn tile_for(location: Location, zoom: u8) -> Result<Tile, AppError> {
    if zoom > MAX_ZOOM {
        return Err(AppError::input(format!("Zoom must be at most {MAX_ZOOM} (got {zoom}).")));
    }
    if !(location.lat.is_finite() && location.lon.is_finite()) {
        return Err(AppError::input("Location must be finite."));
    }

    let n = f64::from(1u32 << zoom);
    let lat = location.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let lon = location.lon.clamp(-180.0, 180.0);

    let x = ((lon + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n).floor();

    let max = n - 1.0;
    Ok(Tile {
        x: x.clamp(0.0, max) as u32,
        y: y.clamp(0.0, max) as u32,
        z: zoom,
    })
}

/// Fill `template` for `tile`. `{key}` is replaced with `key`.
pub fn tile_url(template: &str, tile: Tile, key: &str) -> String {
    template
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{z}", &tile.z.to_string())
        .replace("{key}", key)
}

/// Show only the last four characters of a key.
pub fn mask_key(key: &str) -> String {
    let n = key.chars().count();
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = key.chars().skip(n - 4).collect();
    format!("{}{tail}", "*".repeat(n - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(lat: f64, lon: f64) -> Location {
        Location { lat, lon }
    }

    #[test]
    fn known_tiles() {
        assert_eq!(tile_for(Location::default(), 16).unwrap(), Tile { x: 47380, y: 30365, z: 16 });
        assert_eq!(tile_for(loc(0.0, 0.0), 1).unwrap(), Tile { x: 1, y: 1, z: 1 });
        assert_eq!(tile_for(loc(51.5074, -0.1278), 10).unwrap(), Tile { x: 511, y: 340, z: 10 });
        assert_eq!(tile_for(loc(-33.8688, 151.2093), 12).unwrap(), Tile { x: 3768, y: 2457, z: 12 });
    }

    #[test]
    fn edges_stay_inside_the_grid() {
        let t = tile_for(loc(90.0, 180.0), 3).unwrap();
        assert_eq!((t.x, t.y), (7, 0));
        let t = tile_for(loc(-90.0, -180.0), 3).unwrap();
        assert_eq!((t.x, t.y), (0, 7));
        assert!(tile_for(loc(0.0, 0.0), 23).is_err());
    }

    #[test]
    fn url_and_masking() {
        let tile = Tile { x: 1, y: 2, z: 3 };
        assert_eq!(
            tile_url(SATELLITE_TILE_TEMPLATE, tile, "KEY"),
            "https://mt1.google.com/vt/lyrs=y&x=1&y=2&z=3&key=KEY"
        );
        assert_eq!(mask_key("abcdefgh"), "****efgh");
        assert_eq!(mask_key("abc"), "***");
    }
}
