//! Tests for the Pipeline module

use super::*;
use crate::domain::report::ObjectResult;
use crate::domain::types::{Detection, Point, TrackId, ZoneId};

fn create_test_pipeline(zones: ZoneRegistry) -> Pipeline {
    create_test_pipeline_with_config(Config::default(), zones)
}

fn create_test_pipeline_with_config(config: Config, zones: ZoneRegistry) -> Pipeline {
    Pipeline::new(config, zones, Arc::new(Metrics::new()))
}

fn square_zone(id: &str, min: f64, max: f64) -> (ZoneId, Vec<Point>) {
    let ring =
        vec![Point::new(min, min), Point::new(max, min), Point::new(max, max), Point::new(min, max)];
    (ZoneId::new(id), ring)
}

fn zones(list: Vec<(ZoneId, Vec<Point>)>) -> ZoneRegistry {
    ZoneRegistry::from_polygons(list).unwrap()
}

/// Builder for creating test Detection instances
struct DetectionBuilder {
    track_id: i64,
    bbox: [f64; 4],
    class_id: Option<u32>,
}

impl DetectionBuilder {
    fn new(track_id: i64) -> Self {
        Self { track_id, bbox: [0.0, 0.0, 1.0, 1.0], class_id: None }
    }

    fn with_box(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.bbox = [x, y, w, h];
        self
    }

    fn with_class(mut self, class_id: u32) -> Self {
        self.class_id = Some(class_id);
        self
    }

    fn build(self) -> Detection {
        let [center_x, center_y, width, height] = self.bbox;
        Detection {
            track_id: TrackId(self.track_id),
            center_x,
            center_y,
            width,
            height,
            class_id: self.class_id,
        }
    }
}

fn frame(detections: Vec<Detection>) -> FrameDetections {
    FrameDetections { frame: None, detections }
}

fn single(track_id: i64, x: f64, y: f64, w: f64, h: f64) -> FrameDetections {
    frame(vec![DetectionBuilder::new(track_id).with_box(x, y, w, h).build()])
}

#[test]
fn test_scenario_single_observation_in_zone() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("A", 0.0, 20.0)]));

    let report = pipeline.run_frames([single(1, 10.0, 10.0, 4.0, 4.0)]);

    let expected =
        ObjectResult { id: TrackId(1), detected_zones: vec![ZoneId::new("A")], is_stationary: true };
    assert_eq!(report.objects, vec![expected]);
    assert_eq!(report.total_stationary, 1);
    assert!(report.has_only_stationary);
    assert!(report.has_detected_in_zones);
}

#[test]
fn test_scenario_moving_outside_zones() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("A", 500.0, 600.0)]));

    let report = pipeline
        .run_frames([single(1, 0.0, 0.0, 2.0, 2.0), single(1, 100.0, 100.0, 2.0, 2.0)]);

    assert_eq!(report.objects.len(), 1);
    assert!(report.objects[0].detected_zones.is_empty());
    assert_eq!(report.total_in_zones, 0);
    assert_eq!(report.total_stationary, 0);
    assert!(report.has_only_stationary);
    assert!(!report.has_detected_in_zones);
}

#[test]
fn test_scenario_parked_in_zone() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("B", 0.0, 20.0)]));

    let report =
        pipeline.run_frames([single(1, 5.0, 5.0, 2.0, 2.0), single(1, 6.0, 5.0, 2.0, 2.0)]);

    assert!(report.objects[0].is_stationary);
    assert_eq!(report.objects[0].detected_zones, vec![ZoneId::new("B")]);
    assert_eq!(report.total_stationary, 1);
    assert_eq!(report.total_in_zones, 1);
    assert!(report.has_only_stationary);
}

#[test]
fn test_scenario_transiting_through_zone() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("C", -10.0, 100.0)]));

    let report =
        pipeline.run_frames([single(1, 0.0, 0.0, 2.0, 2.0), single(1, 50.0, 50.0, 2.0, 2.0)]);

    assert!(!report.objects[0].is_stationary);
    assert_eq!(report.objects[0].detected_zones, vec![ZoneId::new("C")]);
    assert_eq!(report.total_stationary, 0);
    assert_eq!(report.total_in_zones, 1);
    assert!(!report.has_only_stationary);
    assert!(report.has_detected_in_zones);
}

#[test]
fn test_empty_stream() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("A", 0.0, 20.0)]));
    let report = pipeline.run_frames(Vec::new());

    assert!(report.objects.is_empty());
    assert_eq!(report.total_stationary, 0);
    assert!(report.has_only_stationary);
    assert!(!report.has_detected_in_zones);
}

#[test]
fn test_empty_frames_are_no_op_ticks() {
    let mut pipeline = create_test_pipeline(ZoneRegistry::default());
    pipeline.process_frame(&frame(Vec::new()));
    pipeline.process_frame(&single(4, 1.0, 1.0, 1.0, 1.0));
    pipeline.process_frame(&frame(Vec::new()));

    assert_eq!(pipeline.frames_seen(), 3);
    assert_eq!(pipeline.aggregator().track_count(), 1);
    assert_eq!(pipeline.metrics.summary(1).empty_frames_total, 2);
}

#[test]
fn test_objects_in_first_sighting_order() {
    let pipeline = create_test_pipeline(ZoneRegistry::default());
    let report = pipeline.run_frames([
        frame(vec![DetectionBuilder::new(42).build(), DetectionBuilder::new(7).build()]),
        frame(vec![DetectionBuilder::new(3).build(), DetectionBuilder::new(42).build()]),
    ]);

    let ids: Vec<TrackId> = report.objects.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![TrackId(42), TrackId(7), TrackId(3)]);
}

#[test]
fn test_history_lengths_match_observation_counts() {
    let mut pipeline = create_test_pipeline(ZoneRegistry::default());
    for i in 0..40 {
        let mut detections =
            vec![DetectionBuilder::new(1).with_box(i as f64, 0.0, 1.0, 1.0).build()];
        if i % 2 == 0 {
            detections.push(DetectionBuilder::new(2).build());
        }
        pipeline.process_frame(&frame(detections));
    }

    let first = pipeline.aggregator().get(TrackId(1)).unwrap();
    assert_eq!(first.observations(), 40);
    assert_eq!(first.positions().len(), 30);
    assert_eq!(first.positions().back(), Some(&Point::new(39.0, 0.0)));

    let second = pipeline.aggregator().get(TrackId(2)).unwrap();
    assert_eq!(second.observations(), 20);
    assert_eq!(second.positions().len(), 20);
}

#[test]
fn test_zone_membership_kept_after_leaving() {
    let pipeline = create_test_pipeline(zones(vec![
        square_zone("entrance", 0.0, 10.0),
        square_zone("exit", 90.0, 100.0),
    ]));

    let report = pipeline.run_frames([
        single(1, 5.0, 4.0, 2.0, 2.0),
        single(1, 50.0, 50.0, 2.0, 2.0),
        single(1, 95.0, 94.0, 2.0, 2.0),
        single(1, 300.0, 300.0, 2.0, 2.0),
    ]);

    assert_eq!(
        report.objects[0].detected_zones,
        vec![ZoneId::new("entrance"), ZoneId::new("exit")]
    );
    assert!(!report.objects[0].is_stationary);
}

#[test]
fn test_class_filter() {
    let config = Config::default().with_classes(vec![1, 3]);
    let mut pipeline =
        create_test_pipeline_with_config(config, zones(vec![square_zone("A", 0.0, 20.0)]));

    pipeline.process_frame(&frame(vec![
        DetectionBuilder::new(1).with_box(5.0, 5.0, 2.0, 2.0).with_class(1).build(),
        DetectionBuilder::new(2).with_box(5.0, 5.0, 2.0, 2.0).with_class(2).build(),
        DetectionBuilder::new(3).with_box(5.0, 5.0, 2.0, 2.0).build(),
    ]));

    assert_eq!(pipeline.aggregator().track_count(), 1);
    assert_eq!(pipeline.metrics.detections_filtered(), 2);

    let report = pipeline.finalize();
    assert_eq!(report.objects.len(), 1);
    assert_eq!(report.objects[0].id, TrackId(1));
}

#[test]
fn test_custom_trail_length() {
    let config = Config::default().with_trail_length(5);
    let mut pipeline = create_test_pipeline_with_config(config, ZoneRegistry::default());
    for i in 0..8 {
        pipeline.process_frame(&single(1, i as f64, 0.0, 1.0, 1.0));
    }
    let history = pipeline.aggregator().get(TrackId(1)).unwrap();
    assert_eq!(history.positions().len(), 5);
    assert_eq!(history.observations(), 8);
}

#[test]
fn test_count_relations_hold() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("lot", 0.0, 100.0)]));
    let mut frames = Vec::new();
    for t in 0..10 {
        let t = t as f64;
        frames.push(frame(vec![
            DetectionBuilder::new(1).with_box(10.0, 10.0, 4.0, 4.0).build(),
            DetectionBuilder::new(2).with_box(10.0 + 10.0 * t, 50.0, 4.0, 4.0).build(),
            DetectionBuilder::new(3).with_box(500.0 + t, 500.0, 4.0, 4.0).build(),
        ]));
    }

    let report = pipeline.run_frames(frames);
    assert_eq!(report.objects.len(), 3);
    assert_eq!(report.total_in_zones, 2);
    assert_eq!(report.total_stationary, 1);
    assert!(report.total_stationary <= report.total_in_zones);
    assert_eq!(report.has_detected_in_zones, report.total_in_zones > 0);
    assert!(!report.has_only_stationary);
}

#[tokio::test]
async fn test_run_drains_channel_then_finalizes() {
    let pipeline = create_test_pipeline(zones(vec![square_zone("B", 0.0, 20.0)]));
    let (frame_tx, frame_rx) = mpsc::channel(4);

    let producer = tokio::spawn(async move {
        for x in [5.0, 6.0] {
            frame_tx.send(single(9, x, 5.0, 2.0, 2.0)).await.unwrap();
        }
    });

    let report = pipeline.run(frame_rx).await;
    producer.await.unwrap();

    assert_eq!(report.objects.len(), 1);
    assert_eq!(report.objects[0].id, TrackId(9));
    assert!(report.objects[0].is_stationary);
    assert_eq!(report.total_stationary, 1);
}

#[tokio::test]
async fn test_run_with_closed_channel_yields_empty_report() {
    let pipeline = create_test_pipeline(ZoneRegistry::default());
    let (frame_tx, frame_rx) = mpsc::channel::<FrameDetections>(1);
    drop(frame_tx);

    let report = pipeline.run(frame_rx).await;
    assert!(report.objects.is_empty());
    assert!(report.has_only_stationary);
}
