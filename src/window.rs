use anyhow::{Context, Result};
use flappy_evo::render::Renderer;
use flappy_evo::{Control, RenderHook, SimConfig, World};
use pixels::{Pixels, SurfaceTexture};
use tracing::error;
use winit::dpi::LogicalSize;
use winit::event::VirtualKeyCode;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};
use winit_input_helper::WinitInputHelper;

/// Desktop window that shows each tick and turns Escape or close into a shutdown.
pub struct WindowHook {
    event_loop: EventLoop<()>,
    input: WinitInputHelper,
    // Keep the window alive as long as the surface drawing into it.
    _window: Window,
    pixels: Pixels,
    renderer: Renderer,
}

impl WindowHook {
    pub fn new(config: &SimConfig) -> Result<Self> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title("Flappy Evo")
            .with_inner_size(LogicalSize::new(config.field_width, config.field_height))
            .with_resizable(false)
            .build(&event_loop)
            .context("creating window")?;
        let pixels = {
            let size = window.inner_size();
            let surface = SurfaceTexture::new(size.width, size.height, &window);
            Pixels::new(config.field_width, config.field_height, surface)
                .context("creating pixel surface")?
        };
        Ok(Self {
            event_loop,
            input: WinitInputHelper::new(),
            _window: window,
            pixels,
            renderer: Renderer::new(config),
        })
    }

    /// Drain pending window events; true when the user asked to quit.
    fn pump(&mut self) -> bool {
        let input = &mut self.input;
        let mut quit = false;
        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            if input.update(&event) {
                quit = input.key_pressed(VirtualKeyCode::Escape)
                    || input.close_requested()
                    || input.destroyed();
                *control_flow = ControlFlow::Exit;
            }
        });
        quit
    }
}

impl RenderHook for WindowHook {
    fn begin_episode(&mut self, generation: usize) {
        self.renderer.set_generation(generation);
    }

    fn present(&mut self, world: &World<'_, '_>) -> Control {
        if self.pump() {
            return Control::Shutdown;
        }
        self.renderer.draw(world, self.pixels.frame_mut());
        if let Err(err) = self.pixels.render() {
            error!(error = %err, "render failed");
            return Control::Shutdown;
        }
        Control::Continue
    }
}
