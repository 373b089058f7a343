use std::collections::HashSet;

use phong_desk::{
    pipelines::light::MAX_LIGHTS,
    resources,
    scene::{self, Surface},
};

mod common;

#[test]
fn scene_objects_have_unique_names_and_valid_meshes() {
    let layout = scene::layout();
    assert_eq!(layout.len(), 9);

    let names: HashSet<_> = layout.iter().map(|o| o.name).collect();
    assert_eq!(names.len(), layout.len());

    for object in &layout {
        let shape = object.shape.build().unwrap();
        common::assert_well_formed(&shape);
    }
}

#[test]
fn surfaces_use_their_textures() {
    let layout = scene::layout();
    let surface = |name: &str| layout.iter().find(|o| o.name == name).unwrap().surface;
    assert_eq!(surface("desk"), Surface::Paper);
    assert_eq!(surface("ball"), Surface::Red);
    assert_eq!(surface("pin shaft"), Surface::Metal);
    assert!(
        Surface::ALL
            .iter()
            .all(|s| s.file_name().starts_with("images/"))
    );
}

#[test]
fn lights_fit_the_uniform_block() {
    let lights = scene::lights();
    assert!(lights.len() <= MAX_LIGHTS);
    assert_eq!(scene::lamp_instances(&lights).len(), lights.len());
}

#[tokio::test]
async fn missing_asset_reports_its_path() {
    let dir = std::env::temp_dir().join("phong-desk-missing-assets");
    let err = resources::load_binary(&dir, "images/nope.png")
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("nope.png"));
}

#[tokio::test]
async fn assets_are_read_from_the_configured_directory() {
    let dir = std::env::temp_dir().join(format!("phong-desk-assets-{}", std::process::id()));
    tokio::fs::create_dir_all(dir.join("images")).await.unwrap();
    tokio::fs::write(dir.join("images/tiny.bin"), [1u8, 2, 3])
        .await
        .unwrap();

    let bytes = resources::load_binary(&dir, "images/tiny.bin").await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
