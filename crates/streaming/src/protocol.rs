//! Wire format of the city tile endpoint.
//!
//! `GET /geo/{level}/{x}/{y}.json` answers with a [`FeatureCollection`]:
//!
//! ```json
//! { "features": [ { "id": 2950159, "name": "Berlin", "population": 3426354,
//!                   "elevation": 74, "position": [13.41053, 52.52437] } ] }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// One point of interest as served by the tile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Accepts a JSON string or integer.
    #[serde(deserialize_with = "deserialize_feature_id")]
    pub id: String,
    pub name: String,
    pub population: f64,
    pub elevation: f64,
    /// `[lon, lat]` in degrees.
    pub position: [f64; 2],
}

impl FeatureRecord {
    pub fn lon(&self) -> f64 {
        self.position[0]
    }

    pub fn lat(&self) -> f64 {
        self.position[1]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<FeatureRecord>,
}

/// Path of a tile on the endpoint, relative to its base url.
pub fn tile_path(x: u32, y: u32, level: u32) -> String {
    format!("/geo/{level}/{x}/{y}.json")
}

fn deserialize_feature_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}
