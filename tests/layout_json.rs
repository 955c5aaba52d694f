use viewfinder::{DisplayLayout, FilterStep};

#[test]
fn json_fixture_validates() {
    let s = include_str!("data/dual_region.json");
    DisplayLayout::from_json(s).unwrap();
}

#[test]
fn json_fixture_chains_resolve() {
    let s = include_str!("data/dual_region.json");
    let layout = DisplayLayout::from_json(s).unwrap();

    let primary = layout.chain_for("primary").unwrap();
    let crop = primary.crop.unwrap();
    assert_eq!((crop.width, crop.height), (1280, 720));
    assert_eq!(primary.steps.len(), 2);
    assert_eq!(
        primary.steps[1],
        FilterStep::Blur {
            radius_px: 2,
            sigma: 1.0
        }
    );

    let secondary = layout.chain_for("secondary").unwrap();
    assert!(secondary.crop.is_none());
    assert_eq!(secondary.steps, vec![FilterStep::Grayscale]);
}
