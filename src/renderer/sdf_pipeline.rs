//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in the fragment shader using signed distance
//! fields: ground disc, arena rim, traps, enemies and the player, viewed
//! top-down onto the ground plane. The camera transform implements both
//! view modes: third-person frames the whole arena, first-person locks to
//! the player pose, rotated heading-up and zoomed in.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::consts::*;
use crate::ground_xz;
use crate::settings::Settings;
use crate::sim::{CameraMode, EnemyKind, GameState};

/// Maximum number of enemies supported
const MAX_ENEMIES: usize = 16;
/// Maximum number of traps supported
const MAX_TRAPS: usize = 256;

/// First-person magnification relative to the overhead view
const FIRST_PERSON_ZOOM: f32 = 8.0;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    time: f32,            // offset 8
    ground_radius: f32,   // offset 12
    enemy_count: u32,     // offset 16
    trap_count: u32,      // offset 20
    camera_mode: u32,     // offset 24 - 0 = third person, 1 = first person
    high_contrast: u32,   // offset 28
    camera_pos: [f32; 2], // offset 32 (8-byte aligned for WGSL vec2)
    camera_zoom: f32,     // offset 40
    camera_rot: f32,      // offset 44
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PlayerData {
    pos: [f32; 2],
    heading: [f32; 2],
    radius: f32,
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct EnemyData {
    pos: [f32; 2],
    heading: [f32; 2],
    kind: u32, // 0 = Wanderer, 1 = Seeker
    _pad: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TrapData {
    pos: [f32; 2],
    radius: f32,
    age: f32, // seconds since placement, staggers the glow pulse
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    // Uniform buffers
    globals_buffer: wgpu::Buffer,
    player_buffer: wgpu::Buffer,
    enemies_buffer: wgpu::Buffer,
    traps_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),

    // Camera state, smoothed toward the active mode's target
    camera_pos: [f32; 2],
    camera_zoom: f32,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Self {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .expect("Failed to create device");

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        // Create buffers
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals {
                resolution: [width as f32, height as f32],
                time: 0.0,
                ground_radius: GROUND_RADIUS,
                enemy_count: 0,
                trap_count: 0,
                camera_mode: 0,
                high_contrast: 0,
                camera_pos: [0.0, 0.0],
                camera_zoom: 1.0,
                camera_rot: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let player_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("player"),
            contents: bytemuck::bytes_of(&PlayerData {
                pos: [0.0, 0.0],
                heading: [0.0, 1.0],
                radius: 1.0,
                _pad: 0.0,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let enemies_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("enemies"),
            size: (std::mem::size_of::<EnemyData>() * MAX_ENEMIES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let traps_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("traps"),
            size: (std::mem::size_of::<TrapData>() * MAX_TRAPS) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Bind group layout
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: player_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: enemies_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: traps_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            player_buffer,
            enemies_buffer,
            traps_buffer,
            bind_group,
            size: (width, height),
            camera_pos: [0.0, 0.0],
            camera_zoom: 1.0,
        }
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Update GPU buffers from game state and render
    pub fn render(
        &mut self,
        state: &GameState,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms since page load from requestAnimationFrame; the shader
        // wants seconds. Reduced motion freezes the trap pulse.
        let elapsed = if settings.reduced_motion {
            0.0
        } else {
            (time / 1000.0) as f32
        };

        let enemy_count = state.enemies.len().min(MAX_ENEMIES) as u32;
        let trap_count = state.traps.len().min(MAX_TRAPS) as u32;

        // Camera targets per view mode
        let (target_pos, target_zoom, camera_rot) = match state.camera_mode {
            CameraMode::ThirdPerson => ([0.0_f32, 0.0_f32], 1.0_f32, 0.0_f32),
            CameraMode::FirstPerson => {
                let h = state.player.heading;
                (
                    ground_xz(state.player.position),
                    FIRST_PERSON_ZOOM,
                    // Rotate so the heading points up the screen
                    (-h.x).atan2(h.z),
                )
            }
        };

        // Smooth zoom and position transitions between modes
        let dt = 1.0 / 60.0;
        let smooth = 4.0;
        self.camera_zoom += (target_zoom - self.camera_zoom) * smooth * dt;
        self.camera_zoom = self.camera_zoom.clamp(1.0, FIRST_PERSON_ZOOM);
        self.camera_pos[0] += (target_pos[0] - self.camera_pos[0]) * smooth * dt;
        self.camera_pos[1] += (target_pos[1] - self.camera_pos[1]) * smooth * dt;

        // Update globals
        let globals = Globals {
            resolution: [self.size.0 as f32, self.size.1 as f32],
            time: elapsed,
            ground_radius: GROUND_RADIUS,
            enemy_count,
            trap_count,
            camera_mode: match state.camera_mode {
                CameraMode::ThirdPerson => 0,
                CameraMode::FirstPerson => 1,
            },
            high_contrast: if settings.high_contrast { 1 } else { 0 },
            camera_pos: self.camera_pos,
            camera_zoom: self.camera_zoom,
            camera_rot,
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // Update player
        let player = PlayerData {
            pos: ground_xz(state.player.position),
            heading: [state.player.heading.x, state.player.heading.z],
            radius: 1.0,
            _pad: 0.0,
        };
        self.queue
            .write_buffer(&self.player_buffer, 0, bytemuck::bytes_of(&player));

        // Update enemies
        let mut enemies_data = vec![
            EnemyData {
                pos: [0.0; 2],
                heading: [0.0, 1.0],
                kind: 0,
                _pad: 0,
            };
            MAX_ENEMIES
        ];
        for (i, enemy) in state.enemies.iter().take(MAX_ENEMIES).enumerate() {
            enemies_data[i] = EnemyData {
                pos: ground_xz(enemy.pose.position),
                heading: [enemy.pose.heading.x, enemy.pose.heading.z],
                kind: match enemy.kind {
                    EnemyKind::Wanderer => 0,
                    EnemyKind::Seeker => 1,
                },
                _pad: 0,
            };
        }
        self.queue
            .write_buffer(&self.enemies_buffer, 0, bytemuck::cast_slice(&enemies_data));

        // Update traps
        let mut traps_data = vec![
            TrapData {
                pos: [0.0; 2],
                radius: 0.0,
                age: 0.0,
            };
            MAX_TRAPS
        ];
        for (i, trap) in state.traps.iter().take(MAX_TRAPS).enumerate() {
            traps_data[i] = TrapData {
                pos: ground_xz(trap.position),
                radius: trap.radius,
                age: state.time_ticks.saturating_sub(trap.placed_tick) as f32 * SIM_DT,
            };
        }
        self.queue
            .write_buffer(&self.traps_buffer, 0, bytemuck::cast_slice(&traps_data));

        // Render
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
