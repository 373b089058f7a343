use wgpu::util::DeviceExt;

use crate::data_structures::{
    instance::InstanceRaw,
    model::{ModelVertex, Vertex},
    texture,
};

/// Number of point lights the shaders reserve room for.
pub const MAX_LIGHTS: usize = 4;

/// Shininess exponent shared by every lit surface.
pub const DEFAULT_SHININESS: f32 = 32.0;

/// An attenuated point light.
///
/// `colour` is the light's ambient contribution and the colour of its lamp
/// marker; `diffuse` and `specular` scale the other two Phong terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: [f32; 3],
    pub colour: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl PointLight {
    /// A light with the attenuation of roughly a 50 unit range.
    pub fn new(position: [f32; 3], colour: [f32; 3], diffuse: f32) -> Self {
        Self {
            position,
            colour,
            diffuse: [diffuse; 3],
            specular: [1.0; 3],
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }

    fn to_raw(&self) -> PointLightRaw {
        PointLightRaw {
            position: self.position,
            constant: self.constant,
            colour: self.colour,
            linear: self.linear,
            diffuse: self.diffuse,
            quadratic: self.quadratic,
            specular: self.specular,
            _padding: 0,
        }
    }
}

// Scalars fill the fourth lane of each vec3 so the 16 byte alignment of the
// uniform layout holds without extra padding fields.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct PointLightRaw {
    position: [f32; 3],
    constant: f32,
    colour: [f32; 3],
    linear: f32,
    diffuse: [f32; 3],
    quadratic: f32,
    specular: [f32; 3],
    _padding: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    lights: [PointLightRaw; MAX_LIGHTS],
    count: u32,
    shininess: f32,
    // Uniform structs are sized to a multiple of 16 bytes
    _padding: [u32; 2],
}

impl LightUniform {
    pub fn new(shininess: f32) -> Self {
        Self {
            lights: [PointLightRaw::default(); MAX_LIGHTS],
            count: 0,
            shininess,
            _padding: [0; 2],
        }
    }

    /// Replace the active lights. Lights beyond [`MAX_LIGHTS`] are dropped.
    pub fn set_lights(&mut self, lights: &[PointLight]) {
        if lights.len() > MAX_LIGHTS {
            log::warn!(
                "{} point lights requested but only {} are supported, ignoring the rest",
                lights.len(),
                MAX_LIGHTS
            );
        }
        self.lights = [PointLightRaw::default(); MAX_LIGHTS];
        for (slot, light) in self.lights.iter_mut().zip(lights) {
            *slot = light.to_raw();
        }
        self.count = lights.len().min(MAX_LIGHTS) as u32;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Point lights, their uniform buffer and the pipeline that draws their markers.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub render_pipeline: wgpu::RenderPipeline,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(
        uniform: LightUniform,
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        let render_pipeline =
            mk_render_pipeline(device, config, camera_bind_group_layout, &bind_group_layout);
        Self {
            uniform,
            buffer,
            render_pipeline,
            bind_group,
            bind_group_layout,
        }
    }

    /// Replace the scene lights and upload them.
    pub fn set_lights(&mut self, queue: &wgpu::Queue, lights: &[PointLight]) {
        self.uniform.set_lights(lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

/// Unlit pipeline for the lamp markers. Bind groups: 0 = camera, 1 = lights.
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Lamp Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, light_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Lamp Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("lamp.wgsl").into()),
    };
    crate::pipelines::basic::mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(texture::Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
