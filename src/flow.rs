//! Flow control and application event loop.
//!
//! A "flow" is a self-contained part of the application: it builds its GPU
//! resources once, reacts to input, updates every frame and describes what
//! to draw. The event loop owns the [`Context`] and drives every flow.
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. Window and device events are handed to the camera controller and then to
//!    `on_window_events` / `on_device_events` of every flow
//! 2. The camera and projection are updated and the camera uniform is written
//! 3. `on_update` is called with the frame time
//! 4. `on_render` of every flow is collected and drawn batched per pipeline
//! 5. The frame is presented

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window},
};

use crate::{
    config::Config,
    context::{Context, InitContext},
    data_structures::{
        model::{DrawLight, DrawModel},
        texture::Texture,
    },
    render::{Lamps, Lit, Render},
};

/// Output of every lifecycle hook.
///
/// `Out::Configure` changes the [`Context`] at runtime, for instance the
/// projection mode or the clear colour. `Out::Exit` closes the application.
/// `Empty` is the default when nothing needs to happen.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Exit,
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

impl Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configure(_) => f.write_str("Configure(|&mut Context| {...})"),
            Self::Exit => f.write_str("Exit"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// Trait for a renderable part of the application.
///
/// 1. `on_init()` is called once after construction; configure the context here
/// 2. `on_window_events()` and `on_device_events()` are called for each winit event
/// 3. `on_update()` is called every frame
/// 4. `on_render()` is called every frame and describes how to draw `self`
pub trait GraphicsFlow {
    /// The only place besides [`Out::Configure`] to modify the Context, e.g.
    /// to set up the lights.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out;

    fn on_device_events(&mut self, ctx: &Context, event: &DeviceEvent) -> Out;

    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out;

    fn on_render(&self) -> Render<'_>;
}

/// Factory for a flow.
///
/// Takes an [`InitContext`] and asynchronously builds the flow, loading its
/// assets and uploading its meshes on the way.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

/// GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    fn new(ctx: Context) -> Self {
        Self {
            ctx,
            is_surface_configured: false,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn update_camera(&mut self, dt: Duration) {
        let ctx = &mut self.ctx;
        ctx.camera
            .controller
            .update(&mut ctx.camera.camera, &mut ctx.projection, dt);
        ctx.camera
            .uniform
            .update_view_proj(&ctx.camera.camera, &ctx.projection);
        ctx.queue.write_buffer(
            &ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[ctx.camera.uniform]),
        );
    }

    fn render(&mut self, graphics_flows: &[Box<dyn GraphicsFlow>]) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut lits: Vec<Lit> = Vec::new();
            let mut lamps: Vec<Lamps> = Vec::new();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().set_pipelines(&mut lits, &mut lamps));

            render_pass.set_pipeline(&self.ctx.pipelines.phong);
            for lit in lits {
                if lit.amount == 0 || lit.instance.size() == 0 {
                    log::warn!("skipping {}: it has zero instances", lit.mesh.name);
                    continue;
                }
                render_pass.set_vertex_buffer(1, lit.instance.slice(..));
                render_pass.draw_mesh_instanced(
                    lit.mesh,
                    lit.material,
                    0..lit.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.ctx.light.render_pipeline);
            for lamp in lamps {
                // One marker per active light at most.
                let amount = lamp.amount.min(self.ctx.light.uniform.count() as usize);
                if amount == 0 {
                    continue;
                }
                render_pass.set_vertex_buffer(1, lamp.instance.slice(..));
                render_pass.draw_light_mesh_instanced(
                    lamp.mesh,
                    0..amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: Config,
    state: Option<AppState>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow>>,
    // We use Option to `take()` the constructors after use.
    constructors: Option<Vec<FlowConstructor>>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config, constructors: Vec<FlowConstructor>) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn init(
        &mut self,
        event_loop: &ActiveEventLoop,
        constructors: Vec<FlowConstructor>,
    ) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let config = self.config.clone();
        let init_future = async move {
            let ctx = Context::new(window, &config).await?;
            let mut flows = Vec::with_capacity(constructors.len());
            for constructor in constructors {
                // The clone in into() only clones the handles of Device and Queue
                flows.push(constructor((&ctx).into()).await?);
            }
            anyhow::Ok((AppState::new(ctx), flows))
        };
        let (mut app_state, flows) = self.async_runtime.block_on(init_future)?;

        grab_cursor(&app_state.ctx.window);
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);

        self.graphics_flows = flows;
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_init(&mut app_state.ctx);
            handle_flow_output(&mut app_state.ctx, event_loop, out);
        }
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only the first resume builds the window and the flows
        let Some(constructors) = self.constructors.take() else {
            return;
        };
        if let Err(e) = self.init(event_loop, constructors) {
            log::error!("App initialization failed: {e:#}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_device_events(&state.ctx, &event);
            handle_flow_output(&mut state.ctx, event_loop, out);
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_window_events(&state.ctx, &event);
            handle_flow_output(&mut state.ctx, event_loop, out);
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.update_camera(dt);
                self.graphics_flows.iter_mut().for_each(|f| {
                    let out = f.on_update(&state.ctx, dt);
                    handle_flow_output(&mut state.ctx, event_loop, out);
                });

                match state.render(&self.graphics_flows) {
                    Ok(_) => (),
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    match grabbed {
        Ok(()) => window.set_cursor_visible(false),
        Err(e) => log::warn!("Could not grab the cursor, mouse look may leave the window: {e}"),
    }
}

fn handle_flow_output(ctx: &mut Context, event_loop: &ActiveEventLoop, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Exit => {
            log::info!("exit requested");
            event_loop.exit();
        }
        Out::Empty => (),
    }
}

/// Open the window, build every flow and run the event loop until exit.
///
/// Initialization errors (window, surface, adapter, device or a flow
/// constructor) are returned once the loop has shut down.
pub fn run(config: Config, constructors: Vec<FlowConstructor>) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, constructors)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_does_nothing() {
        assert!(matches!(Out::default(), Out::Empty));
        assert_eq!(format!("{:?}", Out::Exit), "Exit");
    }
}
