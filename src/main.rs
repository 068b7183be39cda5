use std::process::ExitCode;
use std::sync::Arc;

use image_viewer::gpu::GpuFactory;
use image_viewer::report::report;
use image_viewer::{
    route, Cli, ImageSource, PaintOutcome, Viewer, ViewerConfig, ViewerError, Viewport,
    WindowAction,
};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

// === Constants ===

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 800;

// === Application ===

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer<GpuFactory>>,
    exit_code: u8,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            viewer: None,
            exit_code: 0,
        }
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Report, then stop the loop with the error's status
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        report(&err, self.config.dialogs);
        self.exit_code = err.exit_code();
        self.close(event_loop);
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        // GPU resources go before the window they render into.
        self.viewer = None;
        event_loop.exit();
    }

    fn paint(&mut self, event_loop: &ActiveEventLoop) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };
        match viewer.paint() {
            Ok(PaintOutcome::Presented | PaintOutcome::Skipped) => {}
            Ok(PaintOutcome::Retry | PaintOutcome::Rebuild) => self.request_redraw(),
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window_title())
            .with_inner_size(LogicalSize::new(INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let size = window.inner_size();
        let source = ImageSource::new(self.config.path.clone(), self.config.max_dim);
        self.viewer = Some(Viewer::new(
            source,
            GpuFactory::new(window.clone()),
            Viewport::new(size.width, size.height),
        ));
        self.window = Some(window);
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match route(&event) {
            WindowAction::Close => self.close(event_loop),
            WindowAction::Resize(viewport) => {
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.resize(viewport);
                }
                self.request_redraw();
            }
            WindowAction::Paint => self.paint(event_loop),
            WindowAction::Ignore => {}
        }
    }
}

fn run(config: ViewerConfig) -> Result<u8, ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("{}", app.config.window_title());
    event_loop.run_app(&mut app)?;

    Ok(app.exit_code)
}

fn main() -> ExitCode {
    env_logger::init();

    // Honoured even when the rest of the command line is rejected.
    let dialogs = !std::env::args_os().any(|arg| arg == "--no-dialog");

    // Nothing is shown on screen until the arguments check out.
    let result = Cli::try_from_env()
        .and_then(Cli::into_config)
        .and_then(run);
    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            report(&err, dialogs);
            ExitCode::from(err.exit_code())
        }
    }
}
