use anyhow::Result;
use log::info;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

use kokori_rig::engine::clock::FrameClock;
use kokori_rig::engine::input::{Action, InputManager};
use kokori_rig::game::rig::{Kokori, RigConfig};

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Kokori rig...");

    let clock = FrameClock::new();
    let mut rig = Kokori::new(&RigConfig::default(), clock.clone())?;
    let mut input = InputManager::default();

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Kokori")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 1280))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");
    info!("Left/A: tilt left, Right/D: tilt right, Down/Space: upright, Esc: quit");

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                input.process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                for action in input.drain_actions() {
                    if action == Action::Quit {
                        info!("Quit requested, shutting down...");
                        elwt.exit();
                    } else if rig.handle_action(action) {
                        info!("Pose: {}", rig.head_joint().state().name());
                    }
                }

                clock.begin_frame();

                // Drawing the layers belongs to the renderer; hand it the transforms
                let uniforms = rig.uniforms();
                log::trace!(
                    "Frame {}: {} layers, head {:.2} deg",
                    clock.frame_count(),
                    uniforms.len(),
                    rig.head_joint().angle()
                );

                window.request_redraw();
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
