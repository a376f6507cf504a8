use crate::core::config::TileSourceOption;
use crate::core::constants::DEFAULT_SUBDOMAINS;
use crate::core::geo::TileCoord;
use serde_json::Value;

/// Anything that can produce tile URLs for a given coordinate.
pub trait TileSource {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// A `{s}/{z}/{x}/{y}` URL template as configured on the map component.
#[derive(Debug, Clone, PartialEq)]
pub struct TileTemplate {
    template: String,
    subdomains: Vec<String>,
    retina: bool,
}

impl TileTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            retina: false,
        }
    }

    /// Reads `subdomains` (string or array) and `detectRetina` from the
    /// tile source's pass-through options
    pub fn from_option(tile: &TileSourceOption) -> Self {
        let mut template = Self::new(tile.url_template.clone());
        match tile.options.get("subdomains") {
            Some(Value::String(s)) => template.subdomains = s.chars().map(String::from).collect(),
            Some(Value::Array(items)) => {
                template.subdomains = items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            }
            _ => {}
        }
        template.retina = tile
            .options
            .get("detectRetina")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        template
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for TileTemplate {
    fn url(&self, coord: TileCoord) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let idx = ((coord.x as usize) + (coord.y as usize)) % self.subdomains.len();
            self.subdomains[idx].as_str()
        };

        self.template
            .replace("{s}", subdomain)
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{r}", if self.retina { "@2x" } else { "" })
    }
}
