use std::collections::BTreeSet;

use crate::{
    filter::{FilterChain, FilterInstance, parse_filter},
    foundation::{
        core::CropRect,
        error::{ViewfinderError, ViewfinderResult},
    },
};

/// One logical screen region: an input crop rectangle plus the filters to
/// apply to whatever is shown there.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScreenRegion {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterInstance>,
}

impl ScreenRegion {
    /// Build this region's filter chain: crop first, then filters in order.
    pub fn chain(&self) -> ViewfinderResult<FilterChain> {
        FilterChain::from_instances(self.crop, &self.filters)
    }
}

/// Display description: the set of logical screen regions a host splits its
/// output into.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct DisplayLayout {
    pub regions: Vec<ScreenRegion>,
}

impl DisplayLayout {
    /// Parse a layout from JSON text and validate it.
    pub fn from_json(s: &str) -> ViewfinderResult<Self> {
        let layout: Self = serde_json::from_str(s)
            .map_err(|e| ViewfinderError::serde(format!("parse display layout: {e}")))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> ViewfinderResult<()> {
        let mut seen = BTreeSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(ViewfinderError::validation("region name must be non-empty"));
            }
            if !seen.insert(region.name.as_str()) {
                return Err(ViewfinderError::validation(format!(
                    "duplicate region name '{}'",
                    region.name
                )));
            }
            if let Some(crop) = region.crop {
                if crop.width == 0 || crop.height == 0 {
                    return Err(ViewfinderError::validation(format!(
                        "region '{}' has a degenerate crop",
                        region.name
                    )));
                }
            }
            for inst in &region.filters {
                parse_filter(inst).map_err(|e| {
                    ViewfinderError::validation(format!("region '{}': {e}", region.name))
                })?;
            }
        }
        Ok(())
    }

    pub fn region(&self, name: &str) -> Option<&ScreenRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// The crop-then-filters chain for a named region.
    pub fn chain_for(&self, name: &str) -> ViewfinderResult<FilterChain> {
        let region = self.region(name).ok_or_else(|| {
            ViewfinderError::validation(format!("unknown region '{name}'"))
        })?;
        region.chain()
    }
}
