//! Frame-loop demo application
//!
//! Drives the platform system through a complete lifecycle against the
//! headless backend: startup, window creation, a bounded frame loop with
//! render callbacks and worker-thread context binding, close, shutdown.
//! Runs anywhere; no display required.

use std::sync::Arc;

use vitrail_platform::prelude::*;

/// How many frames the demo runs before closing its window
const FRAME_COUNT: u32 = 60;

const CONFIG_PATH: &str = "frameloop.toml";

fn main() -> Result<(), PlatformError> {
    vitrail_platform::foundation::logging::init();

    let config = match SystemConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::debug!("no usable {CONFIG_PATH} ({error}); using defaults");
            SystemConfig::default()
        }
    };

    if config.backend != "headless" {
        log::warn!(
            "backend '{}' is not available in this demo, falling back to headless",
            config.backend
        );
    }
    let backend = Arc::new(HeadlessBackend::new().with_content_scale(2.0));
    let graphics: Arc<dyn GraphicsDevice> = Arc::new(NullGraphics);

    let mut system = System::new(backend);
    system.startup();
    for monitor in system.monitors() {
        log::info!(
            "monitor '{}' {}x{} @{}Hz (scale {})",
            monitor.name(),
            monitor.size().0,
            monitor.size().1,
            monitor.refresh_rate(),
            monitor.content_scale()
        );
    }

    let window = system.create_window(
        &graphics,
        &config.window.title,
        config.window.width,
        config.window.height,
        config.window.flags(),
    )?;
    if let Some(scale) = window.drawable_scale() {
        log::info!(
            "window drawable {}x{} (scale {}x{})",
            window.drawable_size().0,
            window.drawable_size().1,
            scale.x,
            scale.y
        );
    }
    window.set_on_render(|target| {
        log::trace!("rendering into a {:?}px target", target.pixel_size());
    });
    window.set_on_close(|| log::info!("window closed"));

    // a worker claims an offscreen context while the main thread renders,
    // the way a background resource-upload thread would
    let upload_context = system.create_context()?;
    let affinity = system.affinity();
    let worker = std::thread::spawn(move || -> Result<(), PlatformError> {
        affinity.make_current(Some(&upload_context))?;
        log::info!("upload context bound on worker thread");
        affinity.make_current(None)?;
        Ok(())
    });

    for frame in 0..FRAME_COUNT {
        system.before_update();
        system.update();
        system.render_all();

        if frame == FRAME_COUNT - 1 {
            if let Some(window) = system.windows().first() {
                window.close();
            }
        }
    }
    // one more pass so the backend can confirm the close request
    system.before_update();
    system.update();

    match worker.join() {
        Ok(result) => result?,
        Err(_) => log::error!("upload worker panicked"),
    }

    system.shutdown();
    Ok(())
}
