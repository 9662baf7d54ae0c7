//! Main application state and event loop.

use kurbo::Size;
use sigpad_core::config::PadConfig;
use sigpad_core::pad::SignaturePad;
use sigpad_core::stroke::Mode;
use sigpad_render::{PageStyle, RenderContext, Renderer, VelloRenderer};
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::event_handler::{EventHandler, raw_input};
use crate::layout::PageLayout;
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};

#[cfg(feature = "native")]
mod file_ops {
    use sigpad_core::export::{
        BoxFuture, DownloadDirTarget, ExportFile, ExportReport, Exporter, SaveOutcome, SaveTarget,
    };
    use sigpad_core::pad::SignaturePad;

    /// Native save dialog.
    pub struct DialogTarget;

    impl SaveTarget for DialogTarget {
        fn name(&self) -> &'static str {
            "file dialog"
        }

        fn is_supported(&self) -> bool {
            true
        }

        fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome> {
            Box::pin(async move {
                let dialog = rfd::FileDialog::new()
                    .set_title("Save Signature")
                    .set_file_name(&file.name)
                    .add_filter("PNG Image", &["png"]);

                let Some(path) = dialog.save_file() else {
                    return SaveOutcome::Cancelled;
                };
                match std::fs::write(&path, &file.bytes) {
                    Ok(()) => SaveOutcome::Saved(path.display().to_string()),
                    Err(e) => SaveOutcome::Failed(format!("Failed to write PNG: {}", e)),
                }
            })
        }
    }

    /// Export the pad: save dialog first, downloads folder as fallback.
    pub fn export_signature(pad: &SignaturePad) -> Option<ExportReport> {
        let file = match pad.export_file() {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Nothing to export: {}", e);
                return None;
            }
        };
        let exporter = Exporter::new(
            Box::new(DialogTarget),
            Box::new(DownloadDirTarget::default_location()),
        );
        Some(pollster::block_on(exporter.export(&file)))
    }
}

#[cfg(target_arch = "wasm32")]
mod file_ops {
    use crate::web::{AnchorDownloadTarget, FilePickerTarget};
    use sigpad_core::export::{ExportReport, Exporter};
    use sigpad_core::pad::SignaturePad;
    use std::cell::RefCell;

    thread_local! {
        static PENDING_REPORTS: RefCell<Vec<ExportReport>> = const { RefCell::new(Vec::new()) };
    }

    /// Export the pad in the background: save picker first, anchor download
    /// as fallback. The outcome is picked up via `take_pending_reports`.
    pub fn export_signature(pad: &SignaturePad) {
        let file = match pad.export_file() {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Nothing to export: {}", e);
                return;
            }
        };
        wasm_bindgen_futures::spawn_local(async move {
            let exporter = Exporter::new(Box::new(FilePickerTarget), Box::new(AnchorDownloadTarget));
            let report = exporter.export(&file).await;
            PENDING_REPORTS.with(|reports| reports.borrow_mut().push(report));
        });
    }

    /// Reports of exports that finished since the last call.
    pub fn take_pending_reports() -> Vec<ExportReport> {
        PENDING_REPORTS.with(|reports| std::mem::take(&mut *reports.borrow_mut()))
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub style: PageStyle,
    pub pad: PadConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SigPad".to_string(),
            width: 1024,
            height: 720,
            style: PageStyle::default(),
            pad: PadConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with the pad settings from the user's config file.
    pub fn load() -> Self {
        Self {
            pad: PadConfig::load_or_default(),
            ..Default::default()
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    page_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    pad: SignaturePad,
    event_handler: EventHandler,
    config: AppConfig,
}

impl AppState {
    /// Page layout for the current window size, in logical pixels.
    fn layout(&self) -> PageLayout {
        let size = self.window.inner_size();
        let scale = self.window.scale_factor();
        PageLayout::compute(Size::new(
            size.width as f64 / scale,
            size.height as f64 / scale,
        ))
    }

    /// Mount the pad at the displayed surface size, if not mounted yet.
    fn ensure_mounted(&mut self, layout: &PageLayout) {
        if self.pad.is_mounted() {
            return;
        }
        let (width, height) = layout.surface_size();
        self.pad.mount(width, height);
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Clear => self.pad.clear(),
            UiAction::ToggleEraser => {
                self.pad.toggle_mode();
                self.ui_state.eraser_active = self.pad.mode() == Mode::Erase;
            }
            UiAction::Download => {
                #[cfg(feature = "native")]
                if let Some(report) = file_ops::export_signature(&self.pad) {
                    self.ui_state.show_report(&report);
                }
                #[cfg(target_arch = "wasm32")]
                file_ops::export_signature(&self.pad);
            }
        }
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with configuration from the user's config file.
    pub fn new() -> Self {
        Self::with_config(AppConfig::load())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm (for compute shader compatibility)
        // but the surface format on WebGPU is typically Bgra8Unorm
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        // Initialize egui
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

        log::info!("SigPad initialized - {}x{}", surface.config.width, surface.config.height);
        log::info!("Keyboard shortcuts: {}", ShortcutRegistry::summary());

        let mut state = AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            page_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            pad: SignaturePad::new(self.config.pad.clone()),
            event_handler: EventHandler::new(),
            config: self.config.clone(),
        };
        let layout = state.layout();
        state.ensure_mounted(&layout);
        self.state = Some(state);

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);

            // Remove loading indicator
            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            let canvas = document
                .get_element_by_id("sigpad-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let body = document.body()?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("sigpad-canvas");
                    body.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            let dpr = web_window.device_pixel_ratio();
            let physical_width = (viewport_width * dpr) as u32;
            let physical_height = (viewport_height * dpr) as u32;

            canvas.set_width(physical_width);
            canvas.set_height(physical_height);
            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");
            // Pointer input on the page must not scroll or zoom it
            let _ = style.set_property("touch-action", "none");

            log::info!(
                "Canvas created: {}x{} (physical: {}x{}, dpr: {})",
                viewport_width,
                viewport_height,
                physical_width,
                physical_height,
                dpr
            );

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };

        log::info!("Surface size: {}x{}", width, height);

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let render_cx = self
                .render_cx
                .get_or_insert_with(vello::util::RenderContext::new);

            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // Transmute lifetime to 'static - safe because App owns everything
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            let _ = (width, height);
            self.pending_window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // On WASM, handle async initialization
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);

                    let size = window.inner_size();
                    let width = size.width.max(1);
                    let height = size.height.max(1);

                    // Get raw pointer to self for async callback
                    let self_ptr = self as *mut Self;
                    let window_clone = window.clone();

                    wasm_bindgen_futures::spawn_local(async move {
                        log::info!("Creating surface asynchronously...");

                        let mut render_cx = vello::util::RenderContext::new();

                        match render_cx
                            .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                            .await
                        {
                            Ok(surface) => {
                                log::info!("Surface created successfully");

                                let surface: RenderSurface<'static> =
                                    unsafe { std::mem::transmute(surface) };

                                // SAFETY: We're on the same thread (WASM is single-threaded)
                                // and the App is kept alive by the event loop
                                let app = unsafe { &mut *self_ptr };
                                app.render_cx = Some(render_cx);
                                app.finish_init(window_clone, surface);
                            }
                            Err(e) => {
                                log::error!("Failed to create surface: {:?}", e);
                                let app = unsafe { &mut *self_ptr };
                                app.init_in_progress.set(false);
                            }
                        }
                    });
                }

                // Request redraw to keep the event loop running
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);

        // A stroke in progress keeps receiving pointer input even over egui areas
        let egui_wants_pointer = !state.pad.is_drawing()
            && (egui_response.consumed
                || state.egui_ctx.is_pointer_over_area()
                || state.egui_ctx.wants_pointer_input());

        if let Some(raw) = raw_input(&event, state.window.scale_factor()) {
            if egui_wants_pointer {
                return;
            }
            let surface_rect = state.layout().surface_rect;
            let response = state.event_handler.process(raw, surface_rect, &mut state.pad);
            if response.consumed {
                log::trace!("Touch move consumed by the pad");
            }
            state.window.request_redraw();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }

                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }

                // The pad keeps its mount-time buffer; this only mounts a pad
                // that could not be sized yet.
                let layout = state.layout();
                state.ensure_mounted(&layout);

                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let mods = modifiers.state();
                state
                    .event_handler
                    .set_ctrl(mods.control_key() || mods.super_key());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || state.egui_ctx.wants_keyboard_input() {
                    return;
                }

                let key_str = match &event.logical_key {
                    Key::Named(NamedKey::Delete) => "Delete",
                    Key::Named(NamedKey::Backspace) => "Backspace",
                    Key::Character(c) => c.as_str(),
                    _ => return,
                };

                if let Some(action) = ShortcutRegistry::action_for(key_str, state.event_handler.ctrl()) {
                    log::debug!("Shortcut {} -> {:?}", key_str, action);
                    state.apply_action(action);
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                #[cfg(target_arch = "wasm32")]
                for report in file_ops::take_pending_reports() {
                    state.ui_state.show_report(&report);
                }

                let layout = state.layout();
                state.ensure_mounted(&layout);

                // Run egui and get any actions
                let surface_hovered = state.event_handler.pointer_over_surface();
                let egui_input = state.egui_state.take_egui_input(&state.window);
                let mut ui_action: Option<UiAction> = None;
                let egui_output = state.egui_ctx.run(egui_input, |ctx| {
                    ui_action = render_ui(ctx, &mut state.ui_state, &layout, surface_hovered);
                });

                state
                    .egui_state
                    .handle_platform_output(&state.window, egui_output.platform_output);
                let egui_primitives = state
                    .egui_ctx
                    .tessellate(egui_output.shapes, egui_output.pixels_per_point);

                if let Some(action) = ui_action {
                    state.apply_action(action);
                }

                // Build the page scene in physical pixels
                let scale_factor = state.window.scale_factor();
                let physical = layout.to_physical(scale_factor);
                let pointer = surface_hovered.then(|| {
                    let p = state.event_handler.input().pointer_position;
                    kurbo::Point::new(p.x * scale_factor, p.y * scale_factor)
                });
                let base_color = {
                    let render_ctx = RenderContext::new(physical.viewport)
                        .with_scale_factor(scale_factor)
                        .with_style(state.config.style)
                        .with_layout(physical.card_rect, physical.surface_rect)
                        .with_surface(state.pad.surface())
                        .with_mode(
                            state.pad.mode(),
                            state.pad.config().erase_width as f64 * scale_factor,
                        )
                        .with_pointer(pointer);
                    state.page_renderer.build_scene(&render_ctx);
                    state.page_renderer.background_color(&render_ctx)
                };
                let scene = state.page_renderer.take_scene();

                // Render
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };

                let device_handle = &render_cx.devices[state.surface.dev_id];
                let device = &device_handle.device;
                let queue = &device_handle.queue;

                let surface_texture = match state.surface.surface.get_current_texture() {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("Failed to get surface texture: {:?}", e);
                        return;
                    }
                };

                let width = state.surface.config.width;
                let height = state.surface.config.height;

                let params = RenderParams {
                    base_color,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                };

                // Vello's compute shaders need StorageBinding, which WebGPU only
                // supports for Rgba8Unorm; the result is blitted to the surface.
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

                if let Err(e) = state.vello_renderer.render_to_texture(
                    device,
                    queue,
                    &scene,
                    &render_texture_view,
                    &params,
                ) {
                    log::error!("Failed to render: {:?}", e);
                    return;
                }

                let surface_view = surface_texture
                    .texture
                    .create_view(&vello::wgpu::TextureViewDescriptor::default());

                // Blit the RGBA intermediate texture to the surface texture (which may be BGRA)
                {
                    let mut blit_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("blit encoder"),
                        });

                    state.texture_blitter.copy(
                        device,
                        &mut blit_encoder,
                        &render_texture_view,
                        &surface_view,
                    );

                    queue.submit(std::iter::once(blit_encoder.finish()));
                }

                // Update egui textures
                for (id, image_delta) in &egui_output.textures_delta.set {
                    state.egui_renderer.update_texture(device, queue, *id, image_delta);
                }

                // Render egui on top
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: egui_output.pixels_per_point,
                };

                {
                    let mut egui_encoder =
                        device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                            label: Some("egui encoder"),
                        });

                    state.egui_renderer.update_buffers(
                        device,
                        queue,
                        &mut egui_encoder,
                        &egui_primitives,
                        &screen_descriptor,
                    );

                    let render_pass =
                        egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                            label: Some("egui render pass"),
                            color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                                view: &surface_view,
                                resolve_target: None,
                                ops: vello::wgpu::Operations {
                                    load: vello::wgpu::LoadOp::Load, // Keep Vello content
                                    store: vello::wgpu::StoreOp::Store,
                                },
                                depth_slice: None,
                            })],
                            depth_stencil_attachment: None,
                            timestamp_writes: None,
                            occlusion_query_set: None,
                        });

                    // Use forget_lifetime to satisfy egui-wgpu's 'static requirement
                    let mut render_pass = render_pass.forget_lifetime();
                    state
                        .egui_renderer
                        .render(&mut render_pass, &egui_primitives, &screen_descriptor);
                    drop(render_pass);

                    queue.submit(std::iter::once(egui_encoder.finish()));
                }

                // Free egui textures
                for id in &egui_output.textures_delta.free {
                    state.egui_renderer.free_texture(id);
                }
                surface_texture.present();
                state.window.request_redraw();
            }

            _ => {}
        }
    }
}
