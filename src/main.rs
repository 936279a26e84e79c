mod config;
mod constants;
mod field;
mod gpu;
mod renderer;
mod simulation;
mod utils;

use crate::config::{Backend, SimConfig};
use crate::constants::{FPS_UPDATE_INTERVAL_SECS, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::field::DisplayField;
use crate::gpu::GpuLife;
use crate::renderer::Renderer;
use crate::simulation::{SimRng, SimulationState};
use rand::SeedableRng;
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn config_from_args() -> SimConfig {
    let mut config = SimConfig::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--flat" => config = SimConfig::flat_board(),
            "--gpu" => config.backend = Backend::Gpu,
            other => log::warn!("ignoring unknown argument: {}", other),
        }
    }
    config
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = config_from_args();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Mobius Life")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), &config));
    let mut rng = SimRng::from_entropy();
    let start_time = Instant::now();
    let mut simulation = SimulationState::new(config.clone(), &mut rng, 0.0)?;

    let mut gpu_life = match config.backend {
        Backend::Gpu => Some(GpuLife::new(
            renderer.device(),
            &config,
            simulation.current(),
            renderer.field_view(),
        )),
        Backend::Cpu => None,
    };

    // CPU path keeps the expanded field on the host and re-uploads it after
    // each completed generation; the seed board is shown before the first
    // step as well.
    let mut display_field = DisplayField::new(
        config.width,
        config.height,
        config.supersample,
        config.grid_lines,
    );
    if gpu_life.is_none() {
        display_field.expand(simulation.current());
        renderer.upload_field(&display_field);
    }

    let mut last_fps_update_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => {
                if gpu_life.is_none() {
                    let now = start_time.elapsed().as_secs_f64();
                    let steps = simulation.advance(now);
                    if steps > 0 {
                        display_field.expand(simulation.current());
                        renderer.upload_field(&display_field);
                    }
                }
                window.request_redraw();
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    renderer.resize(physical_size);
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    renderer.resize(window.inner_size());
                }
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::Space) => simulation.toggle_pause(),
                            PhysicalKey::Code(KeyCode::KeyR) => {
                                let now = start_time.elapsed().as_secs_f64();
                                simulation.restart(&mut rng, now);
                                if let Some(gpu) = &gpu_life {
                                    gpu.reseed(renderer.queue(), simulation.current());
                                } else {
                                    display_field.expand(simulation.current());
                                    renderer.upload_field(&display_field);
                                }
                            }
                            PhysicalKey::Code(KeyCode::Escape) => elwt.exit(),
                            _ => {}
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    frames_since_last_fps_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }

                    let render_result = match &mut gpu_life {
                        Some(gpu) => {
                            let sim_now = start_time.elapsed().as_secs_f64();
                            let steps = simulation.advance_pending(sim_now);
                            renderer.render(Some((gpu, steps)))
                        }
                        None => renderer.render(None),
                    };
                    match render_result {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => renderer.reconfigure(),
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("surface error: {:?}", e),
                    }

                    let paused_text = if simulation.is_paused() {
                        " [PAUSED]"
                    } else {
                        ""
                    };
                    window.set_title(&format!(
                        "Mobius Life - Gen: {} - FPS: {:.1}{}",
                        simulation.generation(),
                        current_fps,
                        paused_text
                    ));
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}
