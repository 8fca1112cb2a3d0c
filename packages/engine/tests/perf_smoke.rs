use backdrop_engine::{EnvironmentSnapshot, FieldConfig, FieldCore, Preset, Viewport};

#[test]
fn perf_smoke_step() {
    let env = EnvironmentSnapshot::new(Viewport::new(1920.0, 1080.0, 2.0));
    let mut field = FieldCore::new(Preset::PointCloud.config(), &env).unwrap();
    field.enable_perf_metrics(true);
    for _ in 0..10 {
        field.step(1.0 / 60.0);
        field.extract_scene();
    }
    let stats = field.stats();
    assert!(stats.step_ms() >= 0.0);
    assert!(stats.extract_ms() >= 0.0);
    assert_eq!(stats.particle_count(), 4000);
    assert_eq!(stats.frame(), 10.0);
}

#[test]
fn perf_metrics_off_reports_zero_timings() {
    let env = EnvironmentSnapshot::new(Viewport::new(800.0, 600.0, 1.0));
    let mut field = FieldCore::new(FieldConfig::default(), &env).unwrap();
    field.enable_perf_metrics(false);
    field.step(1.0 / 60.0);
    assert_eq!(field.stats().step_ms(), 0.0);
}
