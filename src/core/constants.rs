//! Core constants derived from Leaflet defaults and the chart extension's defaults.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Name the coordinate system is registered under; series opt in with
/// `coordinateSystem: "leaflet"`.
pub const COORDINATE_SYSTEM_NAME: &str = "leaflet";

/// Component type owning the map widget.
pub const COMPONENT_TYPE: &str = "leaflet";

/// Action dispatched after the user roamed the map.
pub const ROAM_ACTION_TYPE: &str = "leafletRoam";

/// Event emitted by the engine once the roam action ran.
pub const ROAM_EVENT_TYPE: &str = "leafletRoam";

/// CSS class of the map container inserted under the chart root.
pub const MAP_CONTAINER_CLASS: &str = "ec-extension-leaflet";

/// Pane the chart surface is mounted into, above the tile pane.
pub const OVERLAY_PANE: &str = "overlayPane";

/// Pane holding tile layers.
pub const TILE_PANE: &str = "tilePane";

/// Pane the map translates while panning; parent of every other pane.
pub const MAP_PANE: &str = "mapPane";

/// Default square tile size in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Sphere radius of the spherical Mercator projection (EPSG:3857), in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude beyond which spherical Mercator is clamped.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Default map center, `[lng, lat]`.
pub const DEFAULT_CENTER: [f64; 2] = [104.114_129, 37.550_339];

/// Default zoom level.
pub const DEFAULT_ZOOM: f64 = 2.0;

/// Default tile URL template (OpenStreetMap).
pub const DEFAULT_TILE_URL: &str = "http://{s}.tile.osm.org/{z}/{x}/{y}.png";

/// Attribution shown with the default tile source.
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a> contributors";

/// Subdomains substituted for `{s}` in tile templates.
pub const DEFAULT_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];
