//! WebGL1 renderer.
//!
//! The point program draws the trail quad, connection lines and point sprites from
//! interleaved `[x, y, size, r, g, b, a]` vertices in a single dynamic buffer that is
//! re-filled per batch. A second program paints the backdrop as one full-screen
//! triangle, evaluating the spot field per pixel.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL, WebGlShader,
    WebGlUniformLocation,
};

use crate::core::{EngineError, EngineResult, Rgb, Vec2};
use crate::domain::{BackdropStyle, BackendKind, ClearMode, MAX_BACKDROP_SPOTS};
use crate::env::Viewport;

use super::{Backdrop, DrawStats, Scene, Surface};

const FLOATS_PER_VERTEX: usize = 7;
const STRIDE_BYTES: i32 = (FLOATS_PER_VERTEX * 4) as i32;
/// Used when the driver doesn't report `ALIASED_POINT_SIZE_RANGE`
const FALLBACK_MAX_POINT_SIZE: f32 = 64.0;

const VERT_SRC: &str = r#"
attribute vec2 a_position;
attribute float a_size;
attribute vec4 a_color;
uniform vec2 u_resolution;
varying vec4 v_color;

void main() {
    vec2 clip = (a_position / u_resolution) * 2.0 - 1.0;
    gl_Position = vec4(clip.x, -clip.y, 0.0, 1.0);
    gl_PointSize = a_size;
    v_color = a_color;
}
"#;

const FRAG_SRC: &str = r#"
precision mediump float;
uniform float u_points;
varying vec4 v_color;

void main() {
    float alpha = v_color.a;
    if (u_points > 0.5) {
        float d = length(gl_PointCoord - vec2(0.5));
        if (d > 0.5) discard;
        alpha *= 1.0 - smoothstep(0.3, 0.5, d);
    }
    gl_FragColor = vec4(v_color.rgb, alpha);
}
"#;

const BACKDROP_VERT_SRC: &str = r#"
attribute vec2 a_corner;

void main() {
    gl_Position = vec4(a_corner, 0.0, 1.0);
}
"#;

// Spots: soft discs blended over the base gradient.
// Field: summed str / (d^2 + 0.005) with d in viewport heights, banded per spot.
const BACKDROP_FRAG_SRC: &str = r#"
precision mediump float;
#define MAX_SPOTS 4
uniform vec2 u_resolution;
uniform vec2 u_device;
uniform vec3 u_top;
uniform vec3 u_bottom;
uniform vec4 u_spots[MAX_SPOTS];
uniform vec4 u_colors[MAX_SPOTS];
uniform int u_count;
uniform float u_field;
uniform float u_vignette;

void main() {
    vec2 uv = gl_FragCoord.xy / u_device;
    uv.y = 1.0 - uv.y;
    vec2 p = uv * u_resolution;
    vec3 col = mix(u_top, u_bottom, 0.5 * (uv.x + uv.y));

    float f = 0.0;
    for (int i = 0; i < MAX_SPOTS; i++) {
        if (i >= u_count) break;
        vec2 d = (p - u_spots[i].xy) / u_resolution.y;
        f += u_spots[i].w / (dot(d, d) + 0.005);
    }
    for (int i = 0; i < MAX_SPOTS; i++) {
        if (i >= u_count) break;
        float k;
        if (u_field > 0.5) {
            float lo = 0.225 * float(i);
            k = smoothstep(lo, lo + 0.4, f);
        } else {
            k = clamp(1.0 - length(p - u_spots[i].xy) / u_spots[i].z, 0.0, 1.0);
        }
        col = mix(col, u_colors[i].rgb, k * u_colors[i].a);
    }

    float vig = 1.0 - smoothstep(0.25, 0.95, length(uv - 0.5));
    col *= mix(1.0 - u_vignette, 1.0, vig);
    gl_FragColor = vec4(col, 1.0);
}
"#;

/// Clip-space triangle that covers the whole viewport
const FULL_SCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

struct BackdropProgram {
    program: WebGlProgram,
    buffer: WebGlBuffer,
    corner: u32,
    u_resolution: Option<WebGlUniformLocation>,
    u_device: Option<WebGlUniformLocation>,
    u_top: Option<WebGlUniformLocation>,
    u_bottom: Option<WebGlUniformLocation>,
    u_spots: Option<WebGlUniformLocation>,
    u_colors: Option<WebGlUniformLocation>,
    u_count: Option<WebGlUniformLocation>,
    u_field: Option<WebGlUniformLocation>,
    u_vignette: Option<WebGlUniformLocation>,
    spots: [f32; MAX_BACKDROP_SPOTS * 4],
    colors: [f32; MAX_BACKDROP_SPOTS * 4],
}

impl BackdropProgram {
    fn new(gl: &GL) -> EngineResult<Self> {
        let program = link_program(gl, BACKDROP_VERT_SRC, BACKDROP_FRAG_SRC)?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| EngineError::Canvas("could not create backdrop buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        // Static data; nothing allocates while the view is alive
        unsafe {
            let view = js_sys::Float32Array::view(&FULL_SCREEN_TRIANGLE);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::STATIC_DRAW);
        }
        let uniform = |name: &str| gl.get_uniform_location(&program, name);
        Ok(Self {
            corner: attrib_location(gl, &program, "a_corner")?,
            u_resolution: uniform("u_resolution"),
            u_device: uniform("u_device"),
            u_top: uniform("u_top"),
            u_bottom: uniform("u_bottom"),
            u_spots: uniform("u_spots"),
            u_colors: uniform("u_colors"),
            u_count: uniform("u_count"),
            u_field: uniform("u_field"),
            u_vignette: uniform("u_vignette"),
            spots: [0.0; MAX_BACKDROP_SPOTS * 4],
            colors: [0.0; MAX_BACKDROP_SPOTS * 4],
            program,
            buffer,
        })
    }

    fn draw(&mut self, gl: &GL, backdrop: &Backdrop, viewport: &Viewport) {
        let count = backdrop.spots.len().min(MAX_BACKDROP_SPOTS);
        self.spots = [0.0; MAX_BACKDROP_SPOTS * 4];
        self.colors = [0.0; MAX_BACKDROP_SPOTS * 4];
        for (i, spot) in backdrop.spots.iter().take(count).enumerate() {
            let [r, g, b] = spot.color.unit();
            self.spots[i * 4..i * 4 + 4].copy_from_slice(&[spot.pos.x, spot.pos.y, spot.radius, spot.strength]);
            self.colors[i * 4..i * 4 + 4].copy_from_slice(&[r, g, b, spot.alpha]);
        }
        let (dw, dh) = viewport.device_size();
        let [tr, tg, tb] = backdrop.top.unit();
        let [br, bg, bb] = backdrop.bottom.unit();

        gl.disable(GL::BLEND);
        gl.use_program(Some(&self.program));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        gl.enable_vertex_attrib_array(self.corner);
        gl.vertex_attrib_pointer_with_i32(self.corner, 2, GL::FLOAT, false, 0, 0);
        gl.uniform2f(self.u_resolution.as_ref(), viewport.width, viewport.height);
        gl.uniform2f(self.u_device.as_ref(), dw as f32, dh as f32);
        gl.uniform3f(self.u_top.as_ref(), tr, tg, tb);
        gl.uniform3f(self.u_bottom.as_ref(), br, bg, bb);
        gl.uniform4fv_with_f32_array(self.u_spots.as_ref(), &self.spots);
        gl.uniform4fv_with_f32_array(self.u_colors.as_ref(), &self.colors);
        gl.uniform1i(self.u_count.as_ref(), count as i32);
        gl.uniform1f(self.u_field.as_ref(), if backdrop.style == BackdropStyle::Field { 1.0 } else { 0.0 });
        gl.uniform1f(self.u_vignette.as_ref(), backdrop.vignette);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        gl.disable_vertex_attrib_array(self.corner);
    }
}

struct Attributes {
    position: u32,
    size: u32,
    color: u32,
}

pub struct WebGlSurface {
    canvas: HtmlCanvasElement,
    gl: GL,
    program: WebGlProgram,
    buffer: WebGlBuffer,
    attrs: Attributes,
    u_resolution: Option<WebGlUniformLocation>,
    u_points: Option<WebGlUniformLocation>,
    max_point_size: f32,
    dpr: f32,
    vertices: Vec<f32>,
    backdrop: BackdropProgram,
}

impl WebGlSurface {
    /// Create the context and program. `preserve_drawing_buffer` is needed for trail fades.
    pub fn new(canvas: HtmlCanvasElement, preserve_drawing_buffer: bool) -> EngineResult<Self> {
        let gl = create_context(&canvas, preserve_drawing_buffer)?;
        let program = link_program(&gl, VERT_SRC, FRAG_SRC)?;
        let backdrop = BackdropProgram::new(&gl)?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| EngineError::Canvas("could not create vertex buffer".into()))?;

        let attrs = Attributes {
            position: attrib_location(&gl, &program, "a_position")?,
            size: attrib_location(&gl, &program, "a_size")?,
            color: attrib_location(&gl, &program, "a_color")?,
        };
        let u_resolution = gl.get_uniform_location(&program, "u_resolution");
        let u_points = gl.get_uniform_location(&program, "u_points");

        let max_point_size = gl
            .get_parameter(GL::ALIASED_POINT_SIZE_RANGE)
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Float32Array>().ok())
            .map(|range| range.get_index(1))
            .filter(|v| *v >= 1.0)
            .unwrap_or(FALLBACK_MAX_POINT_SIZE);

        Ok(Self {
            canvas,
            gl,
            program,
            buffer,
            attrs,
            u_resolution,
            u_points,
            max_point_size,
            dpr: 1.0,
            vertices: Vec::new(),
            backdrop,
        })
    }

    fn push_vertex(&mut self, pos: Vec2, size: f32, color: Rgb, alpha: f32) {
        let [r, g, b] = color.unit();
        self.vertices.extend_from_slice(&[pos.x, pos.y, size, r, g, b, alpha]);
    }

    /// Upload `self.vertices` and draw them as `mode`
    fn flush(&mut self, mode: u32, points: bool) -> u32 {
        let count = (self.vertices.len() / FLOATS_PER_VERTEX) as i32;
        if count == 0 {
            return 0;
        }
        let gl = &self.gl;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        // The view borrows wasm memory; nothing may allocate until buffer_data returns
        unsafe {
            let view = js_sys::Float32Array::view(&self.vertices);
            gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, GL::DYNAMIC_DRAW);
        }
        gl.vertex_attrib_pointer_with_i32(self.attrs.position, 2, GL::FLOAT, false, STRIDE_BYTES, 0);
        gl.vertex_attrib_pointer_with_i32(self.attrs.size, 1, GL::FLOAT, false, STRIDE_BYTES, 8);
        gl.vertex_attrib_pointer_with_i32(self.attrs.color, 4, GL::FLOAT, false, STRIDE_BYTES, 12);
        gl.uniform1f(self.u_points.as_ref(), if points { 1.0 } else { 0.0 });
        gl.draw_arrays(mode, 0, count);
        self.vertices.clear();
        1
    }

    /// Hard clears; trails fade later, with the point program bound
    fn clear(&mut self, mode: &ClearMode) -> u32 {
        match mode {
            ClearMode::Clear => {
                self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
                self.gl.clear(GL::COLOR_BUFFER_BIT);
                1
            }
            ClearMode::Solid { color } => {
                let [r, g, b] = color.unit();
                self.gl.clear_color(r, g, b, 1.0);
                self.gl.clear(GL::COLOR_BUFFER_BIT);
                1
            }
            ClearMode::Trail { .. } => 0,
        }
    }

    /// Fade the previous frame with a translucent full-screen quad
    fn fade(&mut self, color: Rgb, alpha: f32, viewport: &Viewport) -> u32 {
        let (w, h) = (viewport.width, viewport.height);
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(0.0, h),
            Vec2::new(0.0, h),
            Vec2::new(w, 0.0),
            Vec2::new(w, h),
        ];
        for c in corners {
            self.push_vertex(c, 1.0, color, alpha);
        }
        self.gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        self.flush(GL::TRIANGLES, false)
    }

    fn draw_backdrop(&mut self, backdrop: &Backdrop, viewport: &Viewport) -> u32 {
        // The point program's arrays stay off while the backdrop program draws
        self.gl.disable_vertex_attrib_array(self.attrs.position);
        self.gl.disable_vertex_attrib_array(self.attrs.size);
        self.gl.disable_vertex_attrib_array(self.attrs.color);
        self.backdrop.draw(&self.gl, backdrop, viewport);
        1
    }

    fn point_size(&self, radius: f32) -> f32 {
        (radius * 2.0 * self.dpr).clamp(1.0, self.max_point_size)
    }
}

impl Surface for WebGlSurface {
    fn kind(&self) -> BackendKind {
        BackendKind::WebGl
    }

    fn resize(&mut self, viewport: &Viewport) -> EngineResult<()> {
        let (w, h) = viewport.device_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.gl.viewport(0, 0, w as i32, h as i32);
        self.dpr = viewport.dpr;
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> EngineResult<DrawStats> {
        if self.gl.is_context_lost() {
            return Err(EngineError::Canvas("WebGL context lost".into()));
        }
        let mut stats = DrawStats::default();
        stats.draw_calls += self.clear(&scene.clear);
        if let Some(backdrop) = &scene.backdrop {
            stats.draw_calls += self.draw_backdrop(backdrop, &scene.viewport);
        }

        self.gl.use_program(Some(&self.program));
        self.gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.buffer));
        self.gl.enable_vertex_attrib_array(self.attrs.position);
        self.gl.enable_vertex_attrib_array(self.attrs.size);
        self.gl.enable_vertex_attrib_array(self.attrs.color);
        self.gl.uniform2f(self.u_resolution.as_ref(), scene.viewport.width, scene.viewport.height);
        self.gl.enable(GL::BLEND);

        if let ClearMode::Trail { color, alpha } = scene.clear {
            stats.draw_calls += self.fade(color, alpha, &scene.viewport);
        }

        if !scene.links.is_empty() {
            for link in &scene.links {
                self.push_vertex(link.from, 1.0, scene.link_color, link.alpha);
                self.push_vertex(link.to, 1.0, scene.link_color, link.alpha);
            }
            self.gl.line_width(scene.line_width.max(1.0));
            self.gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
            stats.draw_calls += self.flush(GL::LINES, false);
            stats.links = scene.links.len() as u32;
        }

        // Halos first so cores land on top; additive blending makes overlaps glow
        for sprite in &scene.sprites {
            if let Some(halo) = &sprite.halo {
                let size = self.point_size(halo.radius);
                self.push_vertex(sprite.pos, size, halo.color, halo.alpha);
            }
        }
        for sprite in &scene.sprites {
            let size = self.point_size(sprite.radius);
            self.push_vertex(sprite.pos, size, sprite.color, sprite.alpha);
        }
        self.gl.blend_func(GL::SRC_ALPHA, GL::ONE);
        stats.draw_calls += self.flush(GL::POINTS, true);
        stats.sprites = scene.sprites.len() as u32;

        Ok(stats)
    }
}

fn create_context(canvas: &HtmlCanvasElement, preserve_drawing_buffer: bool) -> EngineResult<GL> {
    let options = js_sys::Object::new();
    let set = |key: &str, value: bool| js_sys::Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_bool(value));
    set("alpha", true)?;
    set("antialias", true)?;
    set("premultipliedAlpha", false)?;
    set("preserveDrawingBuffer", preserve_drawing_buffer)?;

    let context = canvas
        .get_context_with_context_options("webgl", &options)
        .ok()
        .flatten()
        .ok_or(EngineError::WebGlUnavailable)?;
    context.dyn_into::<GL>().map_err(|_| EngineError::WebGlUnavailable)
}

fn attrib_location(gl: &GL, program: &WebGlProgram, name: &str) -> EngineResult<u32> {
    let loc = gl.get_attrib_location(program, name);
    if loc < 0 {
        return Err(EngineError::ProgramLink(format!("attribute {name} not found")));
    }
    Ok(loc as u32)
}

fn compile_shader(gl: &GL, src: &str, shader_type: u32) -> EngineResult<WebGlShader> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| EngineError::ShaderCompile("could not create shader".into()))?;
    gl.shader_source(&shader, src);
    gl.compile_shader(&shader);
    if !gl.get_shader_parameter(&shader, GL::COMPILE_STATUS).as_bool().unwrap_or(false) {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(EngineError::ShaderCompile(info));
    }
    Ok(shader)
}

fn link_program(gl: &GL, vert_src: &str, frag_src: &str) -> EngineResult<WebGlProgram> {
    let vert = compile_shader(gl, vert_src, GL::VERTEX_SHADER)?;
    let frag = compile_shader(gl, frag_src, GL::FRAGMENT_SHADER)?;
    let program = gl
        .create_program()
        .ok_or_else(|| EngineError::ProgramLink("could not create program".into()))?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);
    if !gl.get_program_parameter(&program, GL::LINK_STATUS).as_bool().unwrap_or(false) {
        return Err(EngineError::ProgramLink(gl.get_program_info_log(&program).unwrap_or_default()));
    }
    Ok(program)
}
