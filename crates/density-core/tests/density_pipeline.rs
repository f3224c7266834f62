use std::time::{Duration, Instant};

use firingmap_density_core::{
    DensityFrame, DensityGridBuilder, DensityView, DomainExtent, HeatRamp,
    SeparableGaussianSmoother, ViewConfig,
};
use firingmap_event_model::EventSet;

fn build(events: &EventSet, extent: DomainExtent, w: usize, h: usize) -> DensityFrame {
    DensityFrame::build(
        events,
        extent,
        &DensityGridBuilder::new(w, h).unwrap(),
        &SeparableGaussianSmoother::new(4.0).unwrap(),
        &HeatRamp,
    )
}

#[test]
fn events_on_the_far_edges_are_excluded() {
    let events = EventSet::new(vec![0.0, 10.0], vec![1, 1], vec![0.0, 1.0]).unwrap();
    let extent = DomainExtent::from_events(&events);
    assert_eq!(extent, DomainExtent::new(10.0, 0.0, 1.0));

    let frame = build(&events, extent, 10, 10);

    assert_eq!(frame.density.total(), 0);
    assert_eq!(frame.owners.occupied(), 0);
    assert_eq!(frame.nearest_event(5, 5), None);
    assert!(frame.image.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn single_event_is_found_from_anywhere() {
    let events = EventSet::new(vec![5.0], vec![3], vec![0.5]).unwrap();
    let frame = build(&events, DomainExtent::new(10.0, 0.0, 1.0), 10, 10);

    assert_eq!(frame.density.count(5, 5), Some(1));
    assert_eq!(frame.owners.owner(5, 5), Some(0));
    assert_eq!(frame.nearest_event(5, 5), Some(0));
    assert_eq!(frame.nearest_event(0, 0), Some(0));
    assert_eq!(frame.image.get_pixel(5, 5).0[3], 255);
    assert_eq!(frame.image.get_pixel(4, 5).0[3], 0);
}

#[test]
fn burst_of_updates_produces_one_rebuild() {
    let t0 = Instant::now();
    let config = ViewConfig {
        grid_width: 50,
        ..ViewConfig::default()
    };
    let mut view = DensityView::new(config, 600.0, 300.0);

    for i in 0..5u64 {
        let n = 10 + i as usize;
        let times = (0..n).map(|k| k as f64 * 100.0).collect();
        let amps = (0..n).map(|k| (k % 7) as f64).collect();
        view.set_events(
            EventSet::new(times, vec![1; n], amps).unwrap(),
            t0 + Duration::from_millis(i * 50),
        );
    }

    let mut rebuilds = 0;
    for ms in (0..2000).step_by(25) {
        if view.poll(t0 + Duration::from_millis(ms)).unwrap() {
            rebuilds += 1;
        }
    }

    assert_eq!(rebuilds, 1);
    let frame = view.frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (50, 25));
    // The rebuild saw the last event set, not the first.
    assert_eq!(view.events().len(), 14);
    assert_eq!(frame.extent, view.extent());
}

#[test]
fn export_render_is_independent_of_window_grid() {
    let t0 = Instant::now();
    let events = EventSet::new(
        vec![100.0, 200.0, 300.0, 400.0],
        vec![1, 1, 2, 2],
        vec![-5.0, 0.0, 5.0, 2.5],
    )
    .unwrap();
    let mut view = DensityView::new(ViewConfig::default(), 800.0, 600.0);
    view.set_events(events, t0);
    let frame = view.rebuild().unwrap();

    let export = view.render_image(1800, 900).unwrap();
    assert_eq!(export.dimensions(), (1800, 900));
    assert_eq!((frame.width(), frame.height()), (500, 375));

    let occupied = export.pixels().filter(|p| p.0[3] > 0).count();
    // The min-amplitude and max-time events sit on excluded edges.
    assert_eq!(occupied, 2);
}
