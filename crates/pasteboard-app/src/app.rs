//! Core application state and lifecycle.

use kurbo::{Point, Size};
use pasteboard_core::Editor;
use pasteboard_core::input::{Key, Modifiers};
use pasteboard_render::{ParleyMeasure, RenderContext, Renderer, RendererError, VelloRenderer};
use peniko::Color;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::file_ops::{self, PendingImport};
use crate::input_map;
use crate::ui::{self, TextField, UiAction, UiState, UiView};

#[cfg(target_arch = "wasm32")]
thread_local! {
    /// Surface created by the async init task, picked up on the next event.
    static PENDING_SURFACE: std::cell::RefCell<Option<(vello::util::RenderContext, RenderSurface<'static>)>> =
        const { std::cell::RefCell::new(None) };
}

/// Place an image on the canvas. Unreadable data is logged and dropped.
fn import_image(editor: &mut Editor, import: PendingImport) {
    let result = match import {
        PendingImport::Bytes(bytes) => editor.add_image_bytes(bytes),
        PendingImport::DataUrl(url) => editor.add_image_data_url(&url),
    };
    if let Err(e) = result {
        log::warn!("Ignoring image: {e}");
    }
}

struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    shape_renderer: VelloRenderer,
    /// Blits the Rgba8Unorm render target onto the surface format.
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    editor: Editor,
    /// Pointer position in logical pixels.
    cursor: Point,
    modifiers: Modifiers,
    /// A button went down on the canvas and has not been released yet.
    canvas_pressed: bool,
    background: Color,
    config: AppConfig,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    #[cfg(target_arch = "wasm32")]
    init_in_progress: bool,
    /// Error that stopped the event loop.
    fatal: Option<AppError>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: false,
            fatal: None,
        }
    }

    /// Run the application until the window closes.
    pub async fn run(config: AppConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let app = App::new(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
            Ok(())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app)?;
            app.fatal.take().map_or(Ok(()), Err)
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{error}");
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Finish initialization after the surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) -> Result<(), AppError> {
        let render_cx = self
            .render_cx
            .as_ref()
            .ok_or_else(|| AppError::Surface("render context missing".into()))?;
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .map_err(|e| RendererError::InitFailed(e.to_string()))?;
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut editor = Editor::new(Box::new(ParleyMeasure::new()));
        let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
        editor.resize(logical.width, logical.height);

        log::info!(
            "Pasteboard initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );
        log::info!("Shortcuts:\n{}", crate::shortcuts::ShortcutRegistry::describe_all());

        #[cfg(target_arch = "wasm32")]
        file_ops::setup_paste_listener();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            shape_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            editor,
            cursor: Point::ZERO,
            modifiers: Modifiers::NONE,
            canvas_pressed: false,
            background: self.config.background(),
            config: self.config.clone(),
        });
        self.pending_window = None;

        window.request_redraw();
        Ok(())
    }

    /// Start async surface creation once, and pick up its result when ready.
    #[cfg(target_arch = "wasm32")]
    fn poll_pending_surface(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.pending_window.clone() else {
            return;
        };

        if let Some((render_cx, surface)) = PENDING_SURFACE.with(|p| p.borrow_mut().take()) {
            self.render_cx = Some(render_cx);
            if let Err(e) = self.finish_init(window, surface) {
                self.fail(event_loop, e);
            }
            return;
        }

        if !self.init_in_progress {
            self.init_in_progress = true;
            let size = window.inner_size();
            let (width, height) = (size.width.max(1), size.height.max(1));
            let window_clone = window.clone();
            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let mut render_cx = vello::util::RenderContext::new();
                match render_cx
                    .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                    .await
                {
                    Ok(surface) => {
                        PENDING_SURFACE.with(|p| *p.borrow_mut() = Some((render_cx, surface)));
                        window_clone.request_redraw();
                    }
                    Err(e) => log::error!("Failed to create surface: {:?}", e),
                }
            });
        }
        window.request_redraw();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Window, AppError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        Ok(event_loop.create_window(attrs)?)
    }

    /// Attach a full-viewport canvas to the page.
    #[cfg(target_arch = "wasm32")]
    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<Window, AppError> {
        use wasm_bindgen::JsCast;
        use winit::platform::web::WindowAttributesExtWebSys;

        let no_dom = || AppError::Surface("no browser document".into());
        let web_window = web_sys::window().ok_or_else(no_dom)?;
        let document = web_window.document().ok_or_else(no_dom)?;

        if let Some(loading) = document.get_element_by_id("loading") {
            loading.remove();
        }

        let canvas = document
            .get_element_by_id("pasteboard-canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .or_else(|| {
                let canvas = document.create_element("canvas").ok()?;
                canvas.set_id("pasteboard-canvas");
                document.body()?.append_child(&canvas).ok()?;
                canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
            })
            .ok_or_else(|| AppError::Surface("failed to create canvas element".into()))?;

        let style = canvas.style();
        for (name, value) in [
            ("width", "100%"),
            ("height", "100%"),
            ("display", "block"),
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
        ] {
            let _ = style.set_property(name, value);
        }

        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_canvas(Some(canvas));
        Ok(event_loop.create_window(attrs)?)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");
        let window = match self.create_window(event_loop) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e),
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };

            let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
            let surface = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => return self.fail(event_loop, AppError::Surface(e.to_string())),
            };
            if let Err(e) = self.finish_init(window, surface) {
                self.fail(event_loop, e);
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
            self.poll_pending_surface(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            self.poll_pending_surface(event_loop);
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let ui_has_pointer =
            state.egui_ctx.is_pointer_over_area() || state.egui_ctx.wants_pointer_input();
        let ui_has_keyboard = state.egui_ctx.wants_keyboard_input();

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                let logical = size.to_logical::<f64>(state.window.scale_factor());
                state.editor.resize(logical.width, logical.height);
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(mods) => {
                state.modifiers = input_map::modifiers(mods.state());
                state.editor.set_modifiers(state.modifiers);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(state.window.scale_factor());
                state.cursor = Point::new(logical.x, logical.y);
                if ui_has_pointer && !state.canvas_pressed {
                    return;
                }
                state.editor.pointer_move(state.cursor);
            }

            WindowEvent::MouseInput { state: button_state, button, .. } => {
                let Some(button) = input_map::mouse_button(button) else {
                    return;
                };
                match button_state {
                    ElementState::Pressed => {
                        if ui_has_pointer {
                            return;
                        }
                        state.canvas_pressed = true;
                        state.editor.pointer_down(state.cursor, button);
                    }
                    ElementState::Released => {
                        if !state.canvas_pressed {
                            return;
                        }
                        state.canvas_pressed = false;
                        state.editor.pointer_up(state.cursor, button);
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if ui_has_pointer {
                    return;
                }
                state.editor.wheel(state.cursor, input_map::wheel_delta(delta));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || ui_has_keyboard {
                    return;
                }
                if input_map::is_paste(&event.logical_key, state.modifiers) {
                    // Browsers deliver pastes through the document listener
                    #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
                    if let Some(import) = file_ops::paste_from_clipboard() {
                        import_image(&mut state.editor, import);
                    }
                } else if let Some(key) = input_map::editor_key(&event.logical_key) {
                    state.editor.key(key, state.modifiers);
                }
            }

            WindowEvent::DroppedFile(path) => match std::fs::read(&path) {
                Ok(bytes) => import_image(&mut state.editor, PendingImport::Bytes(bytes)),
                Err(e) => log::warn!("Failed to read {}: {}", path.display(), e),
            },

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.redraw(render_cx);
            }

            _ => {}
        }
    }
}

impl AppState {
    /// Run the egui pass and return its output with the actions it produced.
    fn run_ui(&mut self) -> (egui::FullOutput, Vec<UiAction>) {
        let egui_input = self.egui_state.take_egui_input(&self.window);

        let camera = &self.editor.canvas().camera;
        let zoom_percent = camera.zoom_percent();
        let can_reset_view = !camera.is_reset();
        let style = self.editor.style_controls();
        let overlay = self.editor.text_overlay();
        let shape_id = self.editor.text_editor().editing_shape();
        let select_all = self.editor.text_editor_mut().take_select_all();

        let ui_state = &mut self.ui_state;
        let text_editor = self.editor.text_editor_mut();
        let mut actions = Vec::new();
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            let text_field = match (shape_id, overlay.clone(), text_editor.buffer_mut()) {
                (Some(shape_id), Some(overlay), Some(buffer)) => Some(TextField {
                    shape_id,
                    overlay,
                    buffer,
                    select_all,
                }),
                _ => None,
            };
            let mut view = UiView {
                zoom_percent,
                can_reset_view,
                style: style.clone(),
                text_field,
            };
            actions = ui::render_ui(ctx, ui_state, &mut view);
        });

        (egui_output, actions)
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Upload => self.upload(),
            UiAction::ResetZoom => self.editor.reset_view(),
            UiAction::SetFontSize(size) => {
                self.editor.set_font_size(f64::from(size));
            }
            UiAction::SetColor(color) => {
                self.editor.set_fill(ui::from_egui_color(color));
            }
            UiAction::CommitText => {
                self.editor.key(Key::Enter, Modifiers::NONE);
            }
            UiAction::CancelText => {
                self.editor.key(Key::Escape, Modifiers::NONE);
            }
        }
    }

    #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
    fn upload(&mut self) {
        for import in file_ops::pick_images() {
            import_image(&mut self.editor, import);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn upload(&mut self) {
        file_ops::trigger_file_input();
    }

    #[cfg(all(not(feature = "native"), not(target_arch = "wasm32")))]
    fn upload(&mut self) {
        log::warn!("Upload needs the native feature");
    }

    fn redraw(&mut self, render_cx: &vello::util::RenderContext) {
        #[cfg(target_arch = "wasm32")]
        for import in file_ops::take_pending_imports() {
            import_image(&mut self.editor, import);
        }

        let (egui_output, actions) = self.run_ui();
        for action in actions {
            self.apply_action(action);
        }
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let canvas = self.editor.canvas();
        self.shape_renderer.prune_cache(&canvas.document);
        let ctx = RenderContext::new(canvas, Size::new(width as f64, height as f64))
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.background)
            .with_selection_color(self.config.selection_color.into())
            .with_selection_rect(self.editor.rubber_band_rect())
            .with_editing_shape(self.editor.text_editor().editing_shape())
            .with_handle_size(self.config.handle_size);
        self.shape_renderer.build_scene(&ctx);
        let scene = self.shape_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color: self.background,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a storage-bindable target, which WebGPU only allows for Rgba8Unorm
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) =
            self.vello_renderer
                .render_to_texture(device, queue, &scene, &render_texture_view, &params)
        {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });
            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
        self.window.request_redraw();
    }
}
