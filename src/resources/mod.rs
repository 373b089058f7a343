//! Loading of external files (textures) and creation of GPU resources.

use std::path::Path;

use anyhow::Context as _;

use crate::data_structures::texture;

pub mod mesh;

/// Colour of the stand-in diffuse map used when an image cannot be loaded.
pub const FALLBACK_DIFFUSE: [u8; 4] = [200, 200, 200, 255];
/// Neutral specular map shared by every material.
pub const DEFAULT_SPECULAR: [u8; 4] = [128, 128, 128, 255];

/// Layout of a material bind group: diffuse map + sampler, specular map + sampler.
pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("material_bind_group_layout"),
    })
}

pub async fn load_binary(assets_dir: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = assets_dir.join(file_name);
    let data = tokio::fs::read(&path)
        .await
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(data)
}

pub async fn load_texture(
    assets_dir: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(assets_dir, file_name).await?;
    let extension = Path::new(file_name).extension().and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, extension)
        .with_context(|| format!("could not decode {file_name}"))
}

/// Load a texture, falling back to a solid grey one when the file is missing
/// or cannot be decoded. The scene keeps rendering either way.
pub async fn load_texture_or_fallback(
    assets_dir: &Path,
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> texture::Texture {
    match load_texture(assets_dir, file_name, device, queue).await {
        Ok(texture) => {
            log::info!("loaded texture {file_name}");
            texture
        }
        Err(e) => {
            log::error!("Texture failed to load at path {file_name}: {e:#}");
            texture::Texture::create_solid(FALLBACK_DIFFUSE, file_name, device, queue)
        }
    }
}
