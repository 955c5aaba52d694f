use crate::foundation::{
    core::CropRect,
    error::{ViewfinderError, ViewfinderResult},
};

/// One step of a filter chain, fully validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterStep {
    Brightness { value: f32 },
    Contrast { value: f32 },
    Saturation { value: f32 },
    Grayscale,
    Invert,
    Blur { radius_px: u32, sigma: f32 },
}

/// The untyped serde boundary form of a filter step: a kind string plus a
/// free-form params object, parsed into [`FilterStep`] by [`parse_filter`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FilterInstance {
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

/// An ordered filter chain: an optional crop applied first, then steps in
/// sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    pub crop: Option<CropRect>,
    pub steps: Vec<FilterStep>,
}

impl FilterChain {
    pub fn new(crop: Option<CropRect>, steps: Vec<FilterStep>) -> Self {
        Self { crop, steps }
    }

    /// Build a chain from boundary-form instances, validating each one.
    pub fn from_instances(
        crop: Option<CropRect>,
        instances: &[FilterInstance],
    ) -> ViewfinderResult<Self> {
        let steps = instances
            .iter()
            .map(parse_filter)
            .collect::<ViewfinderResult<Vec<_>>>()?;
        Ok(Self { crop, steps })
    }

    /// True when applying this chain changes nothing.
    pub fn is_identity(&self) -> bool {
        self.crop.is_none() && self.steps.is_empty()
    }
}

/// A normalized, executable form of a chain.
///
/// Consecutive point operations are grouped so an engine can apply them in a
/// single pass over the pixels; blur stays a separate separable pass. Grouping
/// preserves step order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterPlan {
    pub crop: Option<CropRect>,
    pub ops: Vec<PlanOp>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlanOp {
    /// A run of per-pixel color operations, applied in order.
    Point(Vec<PointOp>),
    /// A separable gaussian blur pass.
    Blur { radius_px: u32, sigma: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointOp {
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
    Grayscale,
    Invert,
}

/// Parse and validate one boundary-form filter instance.
pub fn parse_filter(inst: &FilterInstance) -> ViewfinderResult<FilterStep> {
    let kind = inst.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(ViewfinderError::validation("filter kind must be non-empty"));
    }

    match kind.as_str() {
        "brightness" => {
            let value = get_f32(&inst.params, "value")?;
            if value < 0.0 {
                return Err(ViewfinderError::validation(
                    "Brightness.value must be >= 0",
                ));
            }
            Ok(FilterStep::Brightness { value })
        }
        "contrast" => {
            let value = get_f32(&inst.params, "value")?;
            if value < 0.0 {
                return Err(ViewfinderError::validation("Contrast.value must be >= 0"));
            }
            Ok(FilterStep::Contrast { value })
        }
        "saturation" => {
            let value = get_f32(&inst.params, "value")?;
            if value < 0.0 {
                return Err(ViewfinderError::validation("Saturation.value must be >= 0"));
            }
            Ok(FilterStep::Saturation { value })
        }
        "grayscale" | "greyscale" => Ok(FilterStep::Grayscale),
        "invert" => Ok(FilterStep::Invert),
        "blur" => {
            let radius_px = get_u32(&inst.params, "radius_px")?;
            if radius_px > 256 {
                return Err(ViewfinderError::validation("Blur.radius_px must be <= 256"));
            }
            let sigma = match inst.params.get("sigma") {
                Some(v) => {
                    let s = v
                        .as_f64()
                        .ok_or_else(|| ViewfinderError::validation("Blur.sigma must be a number"))?
                        as f32;
                    if !s.is_finite() || s <= 0.0 {
                        return Err(ViewfinderError::validation(
                            "Blur.sigma must be finite and > 0",
                        ));
                    }
                    s
                }
                None => (radius_px as f32) / 2.0,
            };
            Ok(FilterStep::Blur { radius_px, sigma })
        }
        _ => Err(ViewfinderError::validation(format!(
            "unknown filter kind '{kind}'"
        ))),
    }
}

/// Normalize a chain into an executable plan.
///
/// Identity steps are dropped (brightness/contrast/saturation at 1.0, blur
/// with radius 0, paired inverts), consecutive brightness steps fold into one
/// multiplier, and runs of point ops group into a single pass.
pub fn normalize_chain(chain: &FilterChain) -> FilterPlan {
    fn push_point(run: &mut Vec<PointOp>, op: PointOp) {
        match (run.last().copied(), op) {
            (Some(PointOp::Brightness(prev)), PointOp::Brightness(v)) => {
                run.pop();
                run.push(PointOp::Brightness(prev * v));
            }
            (Some(PointOp::Invert), PointOp::Invert) => {
                run.pop();
            }
            _ => run.push(op),
        }
    }

    let mut ops = Vec::<PlanOp>::new();
    let mut run = Vec::<PointOp>::new();

    for step in &chain.steps {
        match *step {
            FilterStep::Brightness { value } => {
                if value != 1.0 {
                    push_point(&mut run, PointOp::Brightness(value));
                }
            }
            FilterStep::Contrast { value } => {
                if value != 1.0 {
                    push_point(&mut run, PointOp::Contrast(value));
                }
            }
            FilterStep::Saturation { value } => {
                if value != 1.0 {
                    push_point(&mut run, PointOp::Saturation(value));
                }
            }
            FilterStep::Grayscale => push_point(&mut run, PointOp::Grayscale),
            FilterStep::Invert => push_point(&mut run, PointOp::Invert),
            FilterStep::Blur { radius_px, sigma } => {
                if radius_px == 0 {
                    continue;
                }
                if !run.is_empty() {
                    ops.push(PlanOp::Point(std::mem::take(&mut run)));
                }
                ops.push(PlanOp::Blur { radius_px, sigma });
            }
        }
    }
    if !run.is_empty() {
        ops.push(PlanOp::Point(run));
    }

    FilterPlan {
        crop: chain.crop,
        ops,
    }
}

fn get_u32(obj: &serde_json::Value, key: &str) -> ViewfinderResult<u32> {
    let Some(v) = obj.get(key) else {
        return Err(ViewfinderError::validation(format!(
            "missing filter param '{key}'"
        )));
    };
    let Some(n) = v.as_u64() else {
        return Err(ViewfinderError::validation(format!(
            "filter param '{key}' must be an integer"
        )));
    };
    u32::try_from(n)
        .map_err(|_| ViewfinderError::validation(format!("filter param '{key}' is out of range")))
}

fn get_f32(obj: &serde_json::Value, key: &str) -> ViewfinderResult<f32> {
    let Some(v) = obj.get(key) else {
        return Err(ViewfinderError::validation(format!(
            "missing filter param '{key}'"
        )));
    };
    let Some(n) = v.as_f64() else {
        return Err(ViewfinderError::validation(format!(
            "filter param '{key}' must be a number"
        )));
    };
    let n = n as f32;
    if !n.is_finite() {
        return Err(ViewfinderError::validation(format!(
            "filter param '{key}' must be finite"
        )));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(kind: &str, params: serde_json::Value) -> FilterInstance {
        FilterInstance {
            kind: kind.to_string(),
            params,
        }
    }

    #[test]
    fn parse_brightness() {
        let f = parse_filter(&inst("brightness", serde_json::json!({ "value": 0.5 }))).unwrap();
        assert_eq!(f, FilterStep::Brightness { value: 0.5 });
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        assert!(parse_filter(&inst("vortex", serde_json::Value::Null)).is_err());
    }

    #[test]
    fn parse_rejects_missing_param() {
        assert!(parse_filter(&inst("contrast", serde_json::json!({}))).is_err());
    }

    #[test]
    fn parse_rejects_negative_value() {
        assert!(parse_filter(&inst("saturation", serde_json::json!({ "value": -1.0 }))).is_err());
    }

    #[test]
    fn parse_blur_defaults_sigma() {
        let f = parse_filter(&inst("blur", serde_json::json!({ "radius_px": 4 }))).unwrap();
        assert_eq!(
            f,
            FilterStep::Blur {
                radius_px: 4,
                sigma: 2.0
            }
        );
    }

    #[test]
    fn parse_blur_rejects_oversized_radius() {
        assert!(parse_filter(&inst("blur", serde_json::json!({ "radius_px": 300 }))).is_err());
    }

    #[test]
    fn normalize_folds_brightness_and_drops_noop_blur() {
        let chain = FilterChain::new(
            None,
            vec![
                FilterStep::Brightness { value: 0.5 },
                FilterStep::Brightness { value: 0.25 },
                FilterStep::Blur {
                    radius_px: 0,
                    sigma: 1.0,
                },
            ],
        );
        let plan = normalize_chain(&chain);
        assert_eq!(plan.ops, vec![PlanOp::Point(vec![PointOp::Brightness(0.125)])]);
    }

    #[test]
    fn normalize_cancels_paired_inverts() {
        let chain = FilterChain::new(None, vec![FilterStep::Invert, FilterStep::Invert]);
        let plan = normalize_chain(&chain);
        assert!(plan.ops.is_empty());
    }

    #[test]
    fn normalize_keeps_order_across_blur() {
        let chain = FilterChain::new(
            None,
            vec![
                FilterStep::Grayscale,
                FilterStep::Blur {
                    radius_px: 2,
                    sigma: 1.0,
                },
                FilterStep::Invert,
            ],
        );
        let plan = normalize_chain(&chain);
        assert_eq!(
            plan.ops,
            vec![
                PlanOp::Point(vec![PointOp::Grayscale]),
                PlanOp::Blur {
                    radius_px: 2,
                    sigma: 1.0
                },
                PlanOp::Point(vec![PointOp::Invert]),
            ]
        );
    }

    #[test]
    fn identity_chain_has_empty_plan() {
        let chain = FilterChain::default();
        assert!(chain.is_identity());
        let plan = normalize_chain(&chain);
        assert!(plan.crop.is_none());
        assert!(plan.ops.is_empty());
    }
}
