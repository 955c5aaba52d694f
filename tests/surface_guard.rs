use std::sync::Arc;
use std::thread;

use viewfinder::{DrawOutcome, RenderSurface};

#[test]
fn draw_requests_before_first_layout_never_dispatch() {
    let surface = RenderSurface::with_context(Vec::<u32>::new());

    for _ in 0..16 {
        let outcome = surface
            .draw_with(|_| panic!("dispatch before layout"))
            .unwrap();
        assert_eq!(outcome, DrawOutcome::SkippedNotReady);
    }

    surface.complete_layout();
    let outcome = surface
        .draw_with(|calls| {
            calls.push(1);
            Ok(())
        })
        .unwrap();
    assert_eq!(outcome, DrawOutcome::Presented);
    assert_eq!(surface.clear_context().unwrap(), vec![1]);
}

#[test]
fn every_context_swap_requires_a_fresh_layout_pass() {
    let surface = RenderSurface::new();

    for generation in 0..4u32 {
        surface.set_context(generation);
        assert_eq!(
            surface.draw_with(|_| Ok(())).unwrap(),
            DrawOutcome::SkippedNotReady
        );
        surface.complete_layout();
        let mut seen = None;
        assert_eq!(
            surface
                .draw_with(|ctx| {
                    seen = Some(*ctx);
                    Ok(())
                })
                .unwrap(),
            DrawOutcome::Presented
        );
        assert_eq!(seen, Some(generation));
    }
}

#[test]
fn concurrent_swaps_and_draws_stay_consistent() {
    // One writer swapping contexts, one reader drawing every "frame". The
    // draw closure observes a context that can never be mid-swap; every
    // request resolves to presented or skipped, nothing else.
    let surface = Arc::new(RenderSurface::new());

    let writer = {
        let surface = surface.clone();
        thread::spawn(move || {
            for generation in 0..200u32 {
                surface.set_context(generation);
                surface.complete_layout();
            }
        })
    };

    let reader = {
        let surface = surface.clone();
        thread::spawn(move || {
            let mut presented = 0u32;
            let mut skipped = 0u32;
            for _ in 0..200 {
                match surface.draw_with(|_| Ok(())).unwrap() {
                    DrawOutcome::Presented => presented += 1,
                    DrawOutcome::SkippedNotReady => skipped += 1,
                    DrawOutcome::SkippedNoFrame => unreachable!(),
                }
            }
            (presented, skipped)
        })
    };

    writer.join().unwrap();
    let (presented, skipped) = reader.join().unwrap();
    assert_eq!(presented + skipped, 200);

    // Writer is done and its last action armed the surface.
    assert!(surface.is_ready());
    assert_eq!(
        surface.draw_with(|_| Ok(())).unwrap(),
        DrawOutcome::Presented
    );
}
