#![cfg(target_arch = "wasm32")]

use backdrop_engine::ParticleField;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn overlay_count() -> u32 {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector_all("canvas.particle-field-canvas").ok())
        .map(|list| list.length())
        .unwrap_or(0)
}

#[wasm_bindgen_test]
fn mount_inserts_canvas_and_destroy_removes_it() {
    let field = ParticleField::mount(r#"{ "particleCount": 20 }"#).unwrap();
    assert_eq!(overlay_count(), 1);
    assert!(field.particle_count() > 0);
    assert_eq!(field.backend(), "2d");

    field.pause();
    assert!(!field.is_active());
    field.destroy();
    assert_eq!(overlay_count(), 0);
    assert!(!field.is_active());
}

#[wasm_bindgen_test]
fn invalid_config_throws() {
    assert!(ParticleField::mount(r#"{ "maxSpeed": -1 }"#).is_err());
    assert!(ParticleField::mount_preset("no-such-preset").is_err());
}

#[wasm_bindgen_test]
fn presets_mount() {
    let field = ParticleField::mount_preset("starfield").unwrap();
    assert!(field.particle_count() > 0);
    field.destroy();
}
