//! Interactive Cloth Simulation
//!
//! Mass-spring cloth with Verlet integration and three scenes:
//! - Tear: a hanging sheet drawn as springs; hold the left mouse button to rip it
//! - Collision: the sheet falls onto a cube or sphere
//! - Flag: the sheet is nailed to a pole and flaps in gusting wind
//!
//! Controls:
//! - Left mouse (hold): Tear springs under the cursor (tear mode)
//! - E: Next simulation mode
//! - P: Next pinning mode
//! - C: Switch collision object (cube/sphere)
//! - R: Reset
//! - Space: Toggle camera fly mode (mouse look + WASD)
//! - Scroll: Zoom
//! - F: Toggle fullscreen
//! - Esc: Quit

mod equations_ui;
mod renderer;

use std::collections::HashSet;

use anyhow::Context as _;
use cloth_sim::{ClothConfig, SimMode, Simulation, Viewport};
use common::{CameraMovement, FlyCamera, GraphicsContext};
use equations_ui::{draw_equations_sidebar, draw_status_bar, CLOTH_EQUATIONS, CLOTH_VARIABLES};
use glam::{Vec2, Vec3};
use renderer::Renderer;
use winit::{
    event::{DeviceEvent, ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Fullscreen},
};

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    simulation: Simulation,
    camera: FlyCamera,
    camera_active: bool,
    held_keys: HashSet<KeyCode>,
    fps: f32,
    egui: EguiState,
}

/// Where the camera starts for each scene
fn camera_home(sim: &Simulation, mode: SimMode) -> Option<Vec3> {
    let center = sim.config().cloth_center();
    match mode {
        SimMode::Tear => Some(Vec3::new(center.x, center.y, 10.0)),
        SimMode::Flag => Some(Vec3::new(center.x - 2.5, center.y - 7.0, 25.0)),
        SimMode::Collision => None,
    }
}

impl App {
    fn new(ctx: GraphicsContext, simulation: Simulation) -> Self {
        let renderer = Renderer::new(&ctx, &simulation);
        let home = camera_home(&simulation, simulation.mode()).unwrap_or(Vec3::new(0.0, 0.0, 10.0));
        let camera = FlyCamera::new(home, ctx.aspect_ratio());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            simulation,
            camera,
            camera_active: false,
            held_keys: HashSet::new(),
            fps: 0.0,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if !self.ctx.resize(new_size) {
            return;
        }
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer
            .resize(&self.ctx.device, new_size.width, new_size.height);
    }

    fn update(&mut self, dt: f32) {
        if self.camera_active {
            for (key, movement) in [
                (KeyCode::KeyW, CameraMovement::Forward),
                (KeyCode::KeyS, CameraMovement::Backward),
                (KeyCode::KeyA, CameraMovement::Left),
                (KeyCode::KeyD, CameraMovement::Right),
            ] {
                if self.held_keys.contains(&key) {
                    self.camera.process_keyboard(movement, dt);
                }
            }
        }

        self.simulation.set_view(
            self.camera.view_matrix(),
            self.camera.projection_matrix(),
            Viewport::new(self.ctx.size.width as f32, self.ctx.size.height as f32),
        );
        self.simulation.step(dt);

        if dt > 0.0 {
            self.fps = self.fps * 0.95 + (1.0 / dt) * 0.05;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let draw = self
            .renderer
            .update_simulation(&self.ctx.device, &self.ctx.queue, &self.simulation);

        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_equations_sidebar(ctx, "Mass-Spring Cloth", CLOTH_EQUATIONS, CLOTH_VARIABLES);
            draw_status_bar(ctx, &self.simulation, self.camera_active, self.fps);
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &draw);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn move_camera_home(&mut self) {
        if let Some(home) = camera_home(&self.simulation, self.simulation.mode()) {
            self.camera = FlyCamera::new(home, self.ctx.aspect_ratio());
        }
    }

    fn set_camera_active(&mut self, active: bool) {
        self.camera_active = active;
        let window = &self.ctx.window;
        if active {
            self.simulation.set_pointer_pressed(false);
            if let Err(e) = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            {
                log::warn!("could not grab cursor: {}", e);
            }
        } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("could not release cursor: {}", e);
        }
        window.set_cursor_visible(!active);
    }

    /// Returns false when the app should quit.
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                self.held_keys.insert(key);
            }
            ElementState::Released => {
                self.held_keys.remove(&key);
                return true;
            }
        }

        match key {
            KeyCode::Escape => return false,
            KeyCode::KeyF => {
                let window = &self.ctx.window;
                if window.fullscreen().is_some() {
                    window.set_fullscreen(None);
                } else {
                    window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                }
            }
            KeyCode::KeyR => {
                self.simulation.reset();
                self.move_camera_home();
            }
            KeyCode::KeyE => {
                self.simulation.advance_mode();
                self.move_camera_home();
            }
            KeyCode::KeyP => self.simulation.advance_pinning(),
            KeyCode::KeyC => self.simulation.advance_collision_shape(),
            KeyCode::Space => self.set_camera_active(!self.camera_active),
            _ => {}
        }
        true
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState, captured: bool) {
        if button != MouseButton::Left {
            return;
        }
        let pressed = state == ElementState::Pressed;
        if pressed && self.camera_active {
            return;
        }
        self.simulation.pointer_button(pressed, captured);
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if !self.camera_active {
            self.simulation.set_pointer_position(Vec2::new(x as f32, y as f32));
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        if self.camera_active {
            self.camera.process_mouse_movement(dx as f32, -dy as f32);
        }
    }

    fn handle_scroll(&mut self, delta: f32) {
        self.camera.process_scroll(delta);
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() -> anyhow::Result<()> {
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        "Cloth Simulation - Rust/wgpu",
        1280,
        720,
    ))
    .context("graphics initialisation failed")?;

    let simulation = Simulation::new(ClothConfig::default()).context("invalid cloth configuration")?;

    let mut app = App::new(ctx, simulation);
    let mut last_time = std::time::Instant::now();

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                if let WindowEvent::MouseInput { state, button, .. } = event {
                    app.handle_mouse_button(*button, *state, consumed);
                }

                if !consumed {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(size) => app.resize(*size),
                        WindowEvent::CursorMoved { position, .. } => {
                            app.handle_mouse_move(position.x, position.y);
                        }
                        WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    physical_key: PhysicalKey::Code(key),
                                    state,
                                    repeat: false,
                                    ..
                                },
                            ..
                        } => {
                            if !app.handle_key(*key, *state) {
                                elwt.exit();
                            }
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            let scroll = match delta {
                                MouseScrollDelta::LineDelta(_, y) => *y,
                                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                            };
                            app.handle_scroll(scroll);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - last_time).as_secs_f32();
                            last_time = now;

                            app.update(dt);
                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::error!("render error: {:?}", e),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => app.handle_mouse_motion(delta.0, delta.1),
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
