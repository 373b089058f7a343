use phong_desk::{
    data_structures::texture::{self, Texture},
    pipelines::light::{DEFAULT_SHININESS, LightResources, LightUniform, MAX_LIGHTS, PointLight},
    resources,
};

mod common;

async fn write_image(dir: &std::path::Path, name: &str, width: u32, height: u32) {
    tokio::fs::create_dir_all(dir.join("images")).await.unwrap();
    tokio::fs::write(dir.join("images").join(name), common::png_bytes(width, height))
        .await
        .unwrap();
}

#[tokio::test]
async fn oversized_texture_falls_back_instead_of_panicking() {
    let (device, queue) = common::noop_device().await;
    let limit = device.limits().max_texture_dimension_2d;
    let dir = std::env::temp_dir().join(format!("phong-desk-big-{}", std::process::id()));
    write_image(&dir, "big.png", limit + 1, 1).await;

    let err = resources::load_texture(&dir, "images/big.png", &device, &queue)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("at most"), "unexpected error: {err:#}");

    let fallback = resources::load_texture_or_fallback(&dir, "images/big.png", &device, &queue).await;
    assert_eq!((fallback.texture.width(), fallback.texture.height()), (1, 1));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn loaded_textures_carry_a_full_mip_chain() {
    let (device, queue) = common::noop_device().await;
    let dir = std::env::temp_dir().join(format!("phong-desk-mips-{}", std::process::id()));
    write_image(&dir, "odd.png", 48, 20).await;

    let loaded = resources::load_texture(&dir, "images/odd.png", &device, &queue)
        .await
        .unwrap();
    assert_eq!(loaded.texture.mip_level_count(), texture::mip_level_count(48, 20));
    assert_eq!(loaded.texture.mip_level_count(), 6);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn depth_texture_is_only_an_attachment() {
    let (device, _queue) = common::noop_device().await;
    let depth = Texture::create_depth_texture(&device, [800, 600], "depth_texture");
    assert_eq!(depth.texture.usage(), wgpu::TextureUsages::RENDER_ATTACHMENT);
    assert_eq!(depth.texture.format(), Texture::DEPTH_FORMAT);
    assert!(depth.sampler.is_none());
}

#[tokio::test]
async fn light_resources_upload_at_most_the_supported_lights() {
    let (device, queue) = common::noop_device().await;
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: wgpu::TextureFormat::Bgra8UnormSrgb,
        width: 800,
        height: 600,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("camera_bind_group_layout"),
    });
    let mut light = LightResources::new(
        LightUniform::new(DEFAULT_SHININESS),
        &device,
        &config,
        &camera_layout,
    );

    let lamp = PointLight::new([0.0, 1.0, 0.0], [1.0; 3], 0.5);
    light.set_lights(&queue, &[lamp; MAX_LIGHTS + 1]);
    assert_eq!(light.uniform.count() as usize, MAX_LIGHTS);
    assert_eq!(
        light.buffer.size() as usize,
        std::mem::size_of::<LightUniform>()
    );
}
