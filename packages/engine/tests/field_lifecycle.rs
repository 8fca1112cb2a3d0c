use backdrop_engine::domain::PRESET_NAMES;
use backdrop_engine::render::{open_surface, SurfaceProvider};
use backdrop_engine::{
    BackendKind, EngineError, EngineResult, EnvironmentSnapshot, FieldConfig, FieldCore, FrameLoop, LoopState,
    ManualScheduler, Preset, RecordingSurface, Surface, Viewport,
};

/// Page canvas whose WebGL context can't be created
struct NoWebGl;

impl SurfaceProvider for NoWebGl {
    type Output = RecordingSurface;

    fn open(&mut self, kind: BackendKind) -> EngineResult<RecordingSurface> {
        match kind {
            BackendKind::WebGl => Err(EngineError::WebGlUnavailable),
            BackendKind::Canvas2d => Ok(RecordingSurface::new(BackendKind::Canvas2d)),
        }
    }
}

fn desktop() -> EnvironmentSnapshot {
    EnvironmentSnapshot::new(Viewport::new(1440.0, 900.0, 2.0)).with_hardware_concurrency(8)
}

#[test]
fn webgl_failure_falls_back_and_draws() {
    let config = Preset::PointCloud.config();
    assert_eq!(config.backend, BackendKind::WebGl);

    let surface = open_surface(&mut NoWebGl, config.backend).unwrap();
    assert_eq!(surface.kind(), BackendKind::Canvas2d);

    let core = FieldCore::new(config, &desktop()).unwrap();
    let mut frame_loop = FrameLoop::new(core, surface, ManualScheduler::new());
    frame_loop.start(false).unwrap();
    frame_loop.on_frame(0.0);

    let scene = frame_loop.surface().last_scene().unwrap();
    assert!(!scene.is_empty());
    assert_eq!(frame_loop.surface().last_stats().unwrap().sprites, 4000);
}

#[test]
fn every_preset_runs_a_second() {
    for preset in PRESET_NAMES {
        let core = FieldCore::new(FieldConfig::preset(preset).unwrap(), &desktop()).unwrap();
        let mut frame_loop = FrameLoop::new(core, RecordingSurface::counting(BackendKind::Canvas2d), ManualScheduler::new());
        frame_loop.start(false).unwrap();
        for i in 0..60 {
            frame_loop.on_frame(i as f64 * 16.7);
        }
        assert_eq!(frame_loop.surface().presents(), 60, "{preset}");
        assert!(frame_loop.core().particles().iter().all(|p| p.is_finite()), "{preset}");
    }
}

#[test]
fn reduced_motion_page_gets_one_frame() {
    let env = desktop().with_reduced_motion(true);
    let core = FieldCore::new(FieldConfig::default(), &env).unwrap();
    let mut frame_loop = FrameLoop::new(core, RecordingSurface::new(BackendKind::Canvas2d), ManualScheduler::new());
    frame_loop.start(false).unwrap();

    assert_eq!(frame_loop.state(), LoopState::Static);
    assert_eq!(frame_loop.surface().presents(), 1);
    assert_eq!(frame_loop.scheduler().requests, 0);
    // Reduced tier draws fewer particles and no links
    let scene = frame_loop.surface().last_scene().unwrap();
    assert_eq!(scene.sprites.len(), 30);
    assert!(scene.links.is_empty());
}

#[test]
fn page_loaded_in_background_waits() {
    let core = FieldCore::new(FieldConfig::default(), &desktop()).unwrap();
    let mut frame_loop = FrameLoop::new(core, RecordingSurface::new(BackendKind::Canvas2d), ManualScheduler::new());
    frame_loop.start(true).unwrap();
    assert_eq!(frame_loop.state(), LoopState::Paused);
    assert_eq!(frame_loop.scheduler().requests, 0);

    frame_loop.set_hidden(false);
    assert!(frame_loop.is_active());
    assert_eq!(frame_loop.scheduler().requests, 1);
}

#[test]
fn surface_gets_device_pixel_size() {
    let core = FieldCore::new(FieldConfig::default(), &EnvironmentSnapshot::new(Viewport::new(1000.0, 500.0, 3.0))).unwrap();
    let mut frame_loop = FrameLoop::new(core, RecordingSurface::new(BackendKind::Canvas2d), ManualScheduler::new());
    frame_loop.start(false).unwrap();
    let vp = frame_loop.surface().viewport().unwrap();
    // Pixel ratio is capped at maxDevicePixelRatio (2)
    assert_eq!(vp.device_size(), (2000, 1000));
}

#[test]
fn ambient_backdrop_is_drawn_under_the_stars() {
    let core = FieldCore::new(Preset::Ambient.config(), &desktop()).unwrap();
    let mut frame_loop = FrameLoop::new(core, RecordingSurface::new(BackendKind::Canvas2d), ManualScheduler::new());
    frame_loop.start(false).unwrap();
    frame_loop.on_frame(0.0);
    let first = frame_loop.surface().last_scene().unwrap().backdrop.clone().unwrap();
    let stats = frame_loop.surface().last_stats().unwrap();
    assert_eq!(stats.draw_calls, 2 + stats.sprites);

    for i in 1..=60 {
        frame_loop.on_frame(i as f64 * 16.7);
    }
    let later = frame_loop.surface().last_scene().unwrap().backdrop.clone().unwrap();
    assert_eq!(later.spots.len(), 3);
    assert_ne!(first.spots[0].pos, later.spots[0].pos);
}
