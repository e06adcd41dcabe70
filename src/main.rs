mod constants;
mod frame;
mod input;
mod render;

use anyhow::Context;
use lumina_core::{LayerKind, Scene, SceneConfig};
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use crate::constants::{INITIAL_HEIGHT, INITIAL_WIDTH, WINDOW_TITLE};
use crate::frame::FrameContext;
use crate::render::GpuState;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(PhysicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT))
        .build(&event_loop)
        .context("window")?;

    let gpu = pollster::block_on(GpuState::new(&window))?;
    let config = SceneConfig::default();
    let alpha = config.smoothing_alpha;
    let mut ctx = FrameContext::new(Scene::unseeded(config), gpu, alpha);
    ctx.start_perception();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => ctx.resize(size),
            WindowEvent::CloseRequested => {
                ctx.perception.stop();
                elwt.exit();
            }
            WindowEvent::CursorMoved { position, .. } => ctx.with_pointer(|p| {
                p.x = position.x as f32;
                p.y = position.y as f32;
                p.inside = true;
            }),
            WindowEvent::CursorEntered { .. } => ctx.with_pointer(|p| p.inside = true),
            WindowEvent::CursorLeft { .. } => ctx.with_pointer(|p| {
                p.inside = false;
                p.left_down = false;
                p.right_down = false;
            }),
            WindowEvent::MouseInput { state, button, .. } => {
                let down = state == ElementState::Pressed;
                ctx.with_pointer(|p| match button {
                    MouseButton::Left => p.left_down = down,
                    MouseButton::Right => p.right_down = down,
                    _ => {}
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                // O holds the hand open, like the right button
                if code == KeyCode::KeyO {
                    let down = event.state == ElementState::Pressed;
                    ctx.with_pointer(|p| p.right_down = down);
                    return;
                }
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match code {
                    KeyCode::KeyC => ctx.toggle_perception(),
                    KeyCode::Space => ctx.toggle_pause(),
                    KeyCode::Digit1 => ctx.cycle_color(LayerKind::ALL[0]),
                    KeyCode::Digit2 => ctx.cycle_color(LayerKind::ALL[1]),
                    KeyCode::Digit3 => ctx.cycle_color(LayerKind::ALL[2]),
                    KeyCode::Digit4 => ctx.cycle_color(LayerKind::ALL[3]),
                    KeyCode::Digit5 => ctx.cycle_color(LayerKind::Ribbon),
                    KeyCode::Escape => {
                        ctx.perception.stop();
                        elwt.exit();
                    }
                    _ => {}
                }
            }
            _ => {}
        },
        Event::AboutToWait => match ctx.frame() {
            Ok(_) => ctx.gpu.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => {
                let size = ctx.gpu.window.inner_size();
                ctx.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("[render] {e:?}"),
        },
        _ => {}
    })?;
    Ok(())
}
