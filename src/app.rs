use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{pack_framebuffer, pack_to_buffer};
use crate::pipeline::renderer::{RenderSettings, Renderer};
use crate::scene::camera::CameraInput;
use crate::scene::context::RenderContext;
use crate::scene::loader::init_scene_resources;
use crate::ui::input::{Action, CONTROLS_HELP, InputHandler};
use log::{debug, info, warn};
use minifb::{Key, Window, WindowOptions};
use std::path::Path;
use std::time::Instant;

/// Applies one key command to the scene and the persistent settings.
fn apply_action(action: Action, context: &mut RenderContext, settings: &mut RenderSettings) {
    match action {
        Action::ToggleRotation => context.toggle_rotation(),
        Action::CycleShadingMode => settings.cycle_shading_mode(),
        Action::ToggleNormalMap => settings.toggle_normal_map(),
        Action::ToggleDepthVisualization => settings.toggle_depth_visualization(),
        Action::ToggleBoundingBoxVisualization => settings.toggle_bounding_box_visualization(),
        Action::CycleCullMode => settings.cycle_cull_mode(),
        Action::ToggleUniformClearColor => settings.toggle_uniform_clear_color(),
        // Handled by the loop itself.
        Action::ToggleFpsLogging | Action::ReloadConfig => {}
    }
}

/// Counts presented frames and reports the rate once per second while enabled.
/// Reporting starts enabled.
struct FpsCounter {
    enabled: bool,
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            enabled: true,
            frames: 0,
            window_start: now,
        }
    }

    fn toggle(&mut self) {
        self.enabled = !self.enabled;
        info!("FPS logging {}", if self.enabled { "enabled" } else { "disabled" });
    }

    /// Records one frame; returns the rate when a one-second window closes and
    /// reporting is enabled.
    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start).as_secs_f32();
        if elapsed < 1.0 {
            return None;
        }
        let rate = self.frames as f32 / elapsed;
        self.frames = 0;
        self.window_start = now;
        self.enabled.then_some(rate)
    }
}

/// Runs the application in GUI mode with real-time rendering and interactivity.
pub fn run_gui(config: Config, config_path: Option<&Path>) -> Result<(), String> {
    let width = config.render.width;
    let height = config.render.height;

    info!("Starting GUI mode ({}x{})...", width, height);
    info!("Controls: {}", CONTROLS_HELP);

    let mut window = Window::new(
        "Dual Rasterizer",
        width,
        height,
        WindowOptions {
            resize: false,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| format!("Failed to open window: {}", e))?;
    window.set_target_fps(60);

    let mut context = init_scene_resources(&config);
    let mut renderer = Renderer::new(width, height, config.render.settings()?);
    let mut input = InputHandler::new();
    let mut buffer = vec![0u32; width * height];

    let mut fps = FpsCounter::new(Instant::now());
    let mut last_frame_time = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        // --- Commands ---
        for action in input.actions(&window) {
            match action {
                Action::ToggleFpsLogging => fps.toggle(),
                Action::ReloadConfig => match config_path {
                    Some(path) => reload(path, width, height, &mut context, &mut renderer),
                    None => warn!("No config file to reload"),
                },
                other => apply_action(other, &mut context, &mut renderer.settings),
            }
        }

        // --- Update & Render ---
        let camera_input = input.camera_input(&window);
        context.update(&camera_input, dt);
        renderer.render_frame(&context);

        // --- Display ---
        pack_to_buffer(&renderer.framebuffer, &mut buffer);
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| format!("Failed to present frame: {}", e))?;

        if let Some(rate) = fps.tick(Instant::now()) {
            info!("FPS: {:.1}", rate);
        }
    }

    Ok(())
}

/// Re-reads the config file and rebuilds the scene and settings from it.
///
/// The window size is fixed, so a changed resolution is ignored.
fn reload(
    path: &Path,
    width: usize,
    height: usize,
    context: &mut RenderContext,
    renderer: &mut Renderer,
) {
    info!("Reloading configuration...");
    let loaded = Config::load(path).and_then(|new_config| {
        let settings = new_config.render.settings()?;
        Ok((new_config, settings))
    });

    match loaded {
        Ok((mut new_config, settings)) => {
            if (new_config.render.width, new_config.render.height) != (width, height) {
                warn!("Resolution changes need a restart, keeping {}x{}", width, height);
                new_config.render.width = width;
                new_config.render.height = height;
            }
            *context = init_scene_resources(&new_config);
            renderer.settings = settings;
            info!("Hot reload successful!");
        }
        Err(e) => warn!("Failed to reload config: {}", e),
    }
}

/// Runs the application headless: renders `render.frames` frames with a fixed
/// time step and writes the last one to `render.output`.
pub fn run_cli(config: Config) -> Result<(), String> {
    info!("Starting CLI mode...");
    let mut context = init_scene_resources(&config);
    let mut renderer = Renderer::new(
        config.render.width,
        config.render.height,
        config.render.settings()?,
    );

    let start_time = Instant::now();
    let idle = CameraInput::default();
    let frames = config.render.frames.max(1);

    for frame in 0..frames {
        if frame > 0 {
            context.update(&idle, config.render.frame_time);
        }
        let stats = renderer.render_frame(&context);
        debug!(
            "Frame {}: {} triangles rasterized",
            frame, stats.triangles_rasterized
        );
    }

    info!("Rendered {} frame(s) in {:.2?}", frames, start_time.elapsed());

    let buffer = pack_framebuffer(&renderer.framebuffer);
    save_buffer_to_image(
        &buffer,
        renderer.width(),
        renderer.height(),
        &config.render.output,
    )?;
    info!("Done.");
    Ok(())
}
