use ecg_chart_wasm::domain::drawing::object::UNPINNED_BEAT_TOP;
use ecg_chart_wasm::domain::drawing::{
    ClientId, ClientKind, ClientStyle, DrawingClient, DrawingObjectType, DrawingPayload, DrawingProxy, ProxyMode,
};
use ecg_chart_wasm::domain::ecg::{EcgLeadCode, EcgRecord, EcgSignal};
use ecg_chart_wasm::domain::events::DrawingChangeSender;
use ecg_chart_wasm::domain::geometry::{Point, Rectangle};
use quickcheck_macros::quickcheck;
use std::cell::RefCell;
use std::rc::Rc;

fn proxy(width: f64, height: f64) -> DrawingProxy {
    let mut proxy = DrawingProxy::new();
    let rect = Rectangle::new(0.0, 0.0, width, height);
    proxy.state.set_container(rect, rect);
    proxy.state.prepare_grid_cells(&[EcgLeadCode::I, EcgLeadCode::II], &[]);
    proxy
}

/// Two leads; lead 0 ramps by 10 µV per sample, lead 1 is flat.
fn record(samples: usize) -> EcgRecord {
    EcgRecord::new(
        vec![EcgLeadCode::I, EcgLeadCode::II],
        EcgSignal::new(250.0, vec![(0..samples).map(|i| i as f32 * 10.0).collect(), vec![0.0; samples]]),
    )
}

/// Records every emitted change as (sender, per-client object counts).
fn recorder(proxy: &mut DrawingProxy) -> Rc<RefCell<Vec<(DrawingChangeSender, Vec<usize>)>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    proxy.subscribe(move |change| {
        sink.borrow_mut().push((change.sender, change.groups.iter().map(Vec::len).collect()));
    });
    seen
}

#[quickcheck]
fn records_chain_left_to_right(lengths: Vec<u8>) -> bool {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("#008662", 1.0)]);
    let records: Vec<EcgRecord> = lengths.iter().map(|&n| record(n as usize)).collect();
    proxy.build_signal(&records, Some(ids[0]));

    let objects = proxy.drawing_objects();
    objects.len() == records.len()
        && objects.first().map_or(true, |o| o.container.min_ox() == 0.0)
        && objects.windows(2).all(|w| w[1].container.min_ox() == w[0].container.max_ox())
}

#[test]
fn limit_grows_to_content_width() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("#008662", 1.0)]);
    proxy.build_signal(&[record(150), record(100)], Some(ids[0]));
    assert_eq!(proxy.state.limit_px, 250.0);

    proxy.reset();
    assert_eq!(proxy.state.limit_px, 100.0);
    assert_eq!(proxy.mode(), ProxyMode::Empty);
}

#[test]
fn scroll_does_not_emit() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("#008662", 1.0)]);
    proxy.build_signal(&[record(300)], Some(ids[0]));
    let seen = recorder(&mut proxy);

    proxy.scroll(-40.0);
    assert!(seen.borrow().is_empty());
    assert_eq!(proxy.state.min_px, 40.0);
    assert_eq!(proxy.state.max_px, 140.0);

    proxy.refresh_drawings();
    assert_eq!(seen.borrow().len(), 1);
}

#[quickcheck]
fn scroll_stays_inside_content(deltas: Vec<i16>) -> bool {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("#008662", 1.0)]);
    proxy.build_signal(&[record(300)], Some(ids[0]));
    deltas.iter().all(|&d| {
        proxy.scroll(d as f64);
        let s = &proxy.state;
        s.min_px >= 0.0 && s.max_px <= s.limit_px && s.max_px - s.min_px == 100.0
    })
}

#[test]
fn empty_rebuild_emits_empty_group_per_client() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([
        DrawingClient::signal("#008662", 1.0),
        DrawingClient::beats("orange", 1.0, 2.0),
        DrawingClient::new(ClientKind::Annotation, ClientStyle::default()),
    ]);
    proxy.build_signal(&[record(50)], Some(ids[0]));
    let seen = recorder(&mut proxy);

    proxy.reset();
    proxy.build_signal(&[], Some(ids[0]));
    proxy.refresh_drawings();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], (DrawingChangeSender::UpdateDrawings, vec![0, 0, 0]));
}

#[test]
fn groups_follow_client_registry_order() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("red", 1.0), DrawingClient::signal("blue", 1.0)]);
    // build the second client's objects first
    proxy.build_signal(&[record(10)], Some(ids[1]));
    proxy.build_signal(&[record(10), record(10)], Some(ids[0]));

    let owners = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&owners);
    proxy.subscribe(move |change| {
        let groups: Vec<Vec<ClientId>> =
            change.groups.iter().map(|g| g.iter().map(|o| o.owner).collect()).collect();
        let build_order: Vec<ClientId> = change.objects.iter().map(|o| o.owner).collect();
        sink.borrow_mut().push((groups, build_order));
    });
    proxy.refresh_drawings();

    let owners = owners.borrow();
    let (groups, build_order) = &owners[0];
    assert_eq!(groups, &vec![vec![ids[0], ids[0]], vec![ids[1]]]);
    assert_eq!(build_order, &vec![ids[1], ids[0], ids[0]]);
}

#[test]
fn missing_or_unknown_client_builds_nothing() {
    let mut proxy = proxy(100.0, 200.0);
    proxy.push_clients([DrawingClient::signal("red", 1.0)]);
    proxy.build_signal(&[record(10)], None);
    proxy.build_signal(&[record(10)], Some(ClientId(7)));
    proxy.build_beats(&[record(10).with_beats(vec![1])], Some(ClientId(7)), true);
    assert!(proxy.drawing_objects().is_empty());
}

#[test]
fn culled_objects_are_left_out_of_changes() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("red", 1.0)]);
    proxy.build_signal(&[record(80), record(80), record(80)], Some(ids[0]));
    let seen = recorder(&mut proxy);

    proxy.refresh_drawings();
    // [0, 100] touches records 0 and 1 only
    assert_eq!(seen.borrow()[0].1, vec![2]);

    proxy.scroll(-140.0);
    proxy.refresh_drawings();
    // [140, 240] overlaps records 1 and 2
    assert_eq!(seen.borrow()[1].1, vec![2]);
}

#[test]
fn pinned_beats_take_signal_amplitude() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("red", 1.0), DrawingClient::beats("orange", 1.0, 2.0)]);
    let records = [record(50).with_beats(vec![5, 20])];
    proxy.build_signal(&records, Some(ids[0]));
    proxy.build_beats(&records, Some(ids[1]), true);

    let beats = proxy
        .drawing_objects()
        .iter()
        .find(|o| o.kind() == DrawingObjectType::Beats)
        .expect("beats object");
    let DrawingPayload::Beats { lanes, pinned } = &beats.payload else { panic!("not beats") };
    assert!(*pinned);
    assert_eq!(lanes.len(), 2);
    let lead0: Vec<(f64, f64)> = lanes[0].points.iter().map(|p| (p.left, p.top)).collect();
    assert_eq!(lead0, vec![(5.0, 50.0), (20.0, 200.0)]);
    assert!(lanes[1].points.iter().all(|p| p.top == 0.0));
}

#[test]
fn beat_on_record_edge_pins_to_its_own_record() {
    let level = |microvolts: f32| {
        EcgRecord::new(
            vec![EcgLeadCode::I, EcgLeadCode::II],
            EcgSignal::new(250.0, vec![vec![microvolts; 50], vec![microvolts; 50]]),
        )
    };
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::signal("red", 1.0), DrawingClient::beats("orange", 1.0, 2.0)]);
    let records = [level(-500.0), level(900.0).with_beats(vec![0])];
    proxy.build_signal(&records, Some(ids[0]));
    proxy.build_beats(&records, Some(ids[1]), true);

    let beats = proxy
        .drawing_objects()
        .iter()
        .find(|o| o.kind() == DrawingObjectType::Beats)
        .expect("beats object");
    let DrawingPayload::Beats { lanes, .. } = &beats.payload else { panic!("not beats") };
    for lane in lanes {
        let points: Vec<(f64, f64)> = lane.points.iter().map(|p| (p.left, p.top)).collect();
        assert_eq!(points, vec![(50.0, 900.0)]);
    }
}

#[test]
fn unpinned_beats_sit_at_fixed_offset() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::beats("orange", 1.0, 2.0)]);
    let records = [record(50).with_beats(vec![5]), record(50), record(50).with_beats(vec![0])];
    proxy.build_beats(&records, Some(ids[0]), false);

    let lefts: Vec<f64> = proxy.drawing_objects().iter().map(|o| o.container.left).collect();
    // the record without beats yields no object but still advances the offset
    assert_eq!(lefts, vec![0.0, 100.0]);
    for object in proxy.drawing_objects() {
        assert!(object.polylines().iter().flat_map(|l| &l.points).all(|p| p.top == UNPINNED_BEAT_TOP));
    }
}

#[test]
fn wave_points_and_annotations_follow_record_offsets() {
    use ecg_chart_wasm::domain::ecg::{EcgAnnotation, EcgAnnotationCode, EcgWavePoint, EcgWavePointType};

    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([
        DrawingClient::new(ClientKind::Pqrst, ClientStyle::default()),
        DrawingClient::new(ClientKind::Annotation, ClientStyle::default()),
    ]);
    let wave = |kind, index| EcgWavePoint { kind, index };
    let records = [
        record(40),
        record(40)
            .with_wave_points(vec![
                wave(EcgWavePointType::PStart, 2),
                wave(EcgWavePointType::PEnd, 6),
                wave(EcgWavePointType::QrsStart, 10),
            ])
            .with_annotations(vec![EcgAnnotation {
                code: EcgAnnotationCode::Ventricular,
                start: 10,
                end: 30,
                label: None,
            }]),
    ];
    proxy.build_wavepoints(&records, Some(ids[0]));
    proxy.build_annotations(&records, Some(ids[1]));

    let objects = proxy.drawing_objects();
    assert_eq!(objects.len(), 3);
    let DrawingPayload::Pqrst { points, range, .. } = &objects[1].payload else { panic!("not pqrst") };
    assert_eq!((points[0].left, points[1].left), (46.0, 50.0));
    assert_eq!(*range, (1, 2));
    assert_eq!(objects[2].container.left, 50.0);
    assert_eq!(objects[2].container.width, 20.0);
}

#[test]
fn floating_point_tracks_pointer() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([
        DrawingClient::signal("red", 1.0),
        DrawingClient::floating_point("gray", "red", 1.0, 3.0),
    ]);
    proxy.build_signal(&[record(50)], Some(ids[0]));
    proxy.build_floating_point(Some(ids[1]));
    assert_eq!(proxy.drawing_objects().len(), 1, "no pointer yet");

    let seen = recorder(&mut proxy);
    proxy.perform_mouse_move(Point::new(20.0, 50.0));
    assert_eq!(proxy.pointer(), Some(Point::new(20.0, 50.0)));

    let floating = proxy
        .drawing_objects()
        .iter()
        .find(|o| o.kind() == DrawingObjectType::FloatingPoint)
        .expect("floating object");
    let DrawingPayload::FloatingPoint { line, points } = &floating.payload else { panic!("not floating") };
    assert_eq!(line.ax, 20.0);
    assert_eq!((line.ay, line.by), (0.0, 200.0));
    assert_eq!(points.iter().map(|p| p.top).collect::<Vec<_>>(), vec![200.0, 0.0]);
    assert_eq!(seen.borrow()[0], (DrawingChangeSender::MouseMove, vec![1, 1]));

    proxy.perform_mouse_move(Point::new(500.0, 50.0));
    assert_eq!(proxy.pointer(), None);
    assert_eq!(proxy.drawing_objects().len(), 1);
}

#[test]
fn floating_peak_finds_largest_amplitude_nearby() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([
        DrawingClient::signal("red", 1.0),
        DrawingClient::new(ClientKind::FloatingPeak, ClientStyle::crosshair("gray", "blue", 1.0, 3.0)),
    ]);
    proxy.build_signal(&[record(50)], Some(ids[0]));
    proxy.build_floating_peak(Some(ids[1]), 5.0);
    proxy.perform_click(Point::new(20.0, 10.0));

    let peak = proxy
        .drawing_objects()
        .iter()
        .find(|o| o.kind() == DrawingObjectType::FloatingPeak)
        .expect("peak object");
    let DrawingPayload::FloatingPeak { points, .. } = &peak.payload else { panic!("not a peak") };
    // ramp: the right edge of the window holds the largest value
    assert_eq!((points[0].left, points[0].top), (25.0, 250.0));
}

#[test]
fn floating_needs_signals() {
    let mut proxy = proxy(100.0, 200.0);
    let ids = proxy.push_clients([DrawingClient::floating_point("gray", "red", 1.0, 3.0)]);
    proxy.build_floating_point(Some(ids[0]));
    proxy.perform_mouse_move(Point::new(20.0, 50.0));
    assert!(proxy.drawing_objects().is_empty());
}
