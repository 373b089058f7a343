//! The desk scene: a metal block, a sheet of paper, a ball, a battery and a
//! push pin, lit by two coloured point lights.
//!
//! [`layout`] and [`lights`] are plain data so they can be checked without a
//! GPU. [`DeskScene`] turns them into meshes, materials and instance buffers
//! once at startup.

use std::pin::Pin;

use anyhow::Result;
use instant::Duration;
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        model::{Material, Mesh},
        texture::Texture,
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::light::PointLight,
    render::{Lamps, Lit, Render},
    resources::{self, DEFAULT_SPECULAR, mesh},
    shapes::{self, ShapeData},
};

/// Scale of the sphere drawn at every light position.
pub const LAMP_SCALE: f32 = 0.2;

/// Which generator builds an object's mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Plane { dimensions: u32 },
    Sphere { tesselation: u32 },
    Cylinder { radius: f32, height: f32, slices: u32 },
    Box { min: [f32; 3], max: [f32; 3] },
}

impl ShapeKind {
    pub fn build(&self) -> Result<ShapeData> {
        match *self {
            ShapeKind::Plane { dimensions } => shapes::make_plane(dimensions),
            ShapeKind::Sphere { tesselation } => shapes::make_sphere(tesselation),
            ShapeKind::Cylinder {
                radius,
                height,
                slices,
            } => shapes::make_cylinder(radius, height, slices),
            ShapeKind::Box { min, max } => shapes::make_box(min, max),
        }
    }
}

/// Diffuse map of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Metal,
    Paper,
    Red,
}

impl Surface {
    pub const COUNT: usize = 3;
    /// Every surface, in the order of [`Surface::index`].
    pub const ALL: [Surface; Surface::COUNT] = [Surface::Metal, Surface::Paper, Surface::Red];

    /// Slot of this surface's material.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Path of the diffuse map relative to the asset directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Surface::Metal => "images/metal.png",
            Surface::Paper => "images/wrinkle_paper.png",
            Surface::Red => "images/red-stock.png",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: &'static str,
    pub shape: ShapeKind,
    pub surface: Surface,
    pub instance: Instance,
}

/// Every object of the scene with its world transform.
pub fn layout() -> Vec<SceneObject> {
    let battery = Instance::at(4.0, 0.35, 3.0).scaled(0.5);
    let pin_base = Instance::at(1.5, -0.31, 1.0).scaled(0.5);
    let pin_head = Instance::at(1.5, 0.45, 1.0).scaled(0.5);
    let on_top = |parent: &Instance, y: f32| parent * &Instance::at(0.0, y, 0.0).scaled(0.5);

    vec![
        SceneObject {
            name: "block",
            shape: ShapeKind::Box {
                min: [-1.8, 0.0, -0.7],
                max: [1.8, 0.45, 0.7],
            },
            surface: Surface::Metal,
            instance: Instance::at(4.0, -0.43, -2.0),
        },
        SceneObject {
            name: "desk",
            shape: ShapeKind::Plane {
                dimensions: shapes::DEFAULT_PLANE_DIMENSIONS,
            },
            surface: Surface::Paper,
            instance: Instance::at(2.5, -0.22, 0.0),
        },
        SceneObject {
            name: "ball",
            shape: ShapeKind::Sphere {
                tesselation: shapes::DEFAULT_SPHERE_TESSELATION,
            },
            surface: Surface::Red,
            instance: Instance::at(0.0, 0.1, -2.0).scaled(0.5),
        },
        SceneObject {
            name: "battery body",
            shape: ShapeKind::Cylinder {
                radius: 1.0,
                height: 3.0,
                slices: 500,
            },
            surface: Surface::Metal,
            instance: battery.clone(),
        },
        SceneObject {
            name: "battery cap",
            shape: ShapeKind::Cylinder {
                radius: 0.7,
                height: 1.0,
                slices: 500,
            },
            surface: Surface::Metal,
            instance: on_top(&battery, 1.32),
        },
        SceneObject {
            name: "pin base",
            shape: ShapeKind::Cylinder {
                radius: 0.6,
                height: 0.5,
                slices: 200,
            },
            surface: Surface::Red,
            instance: pin_base.clone(),
        },
        SceneObject {
            name: "pin handle",
            shape: ShapeKind::Cylinder {
                radius: 0.6,
                height: 2.25,
                slices: 200,
            },
            surface: Surface::Red,
            instance: on_top(&pin_base, 0.75),
        },
        SceneObject {
            name: "pin head",
            shape: ShapeKind::Cylinder {
                radius: 0.75,
                height: 0.5,
                slices: 200,
            },
            surface: Surface::Red,
            instance: pin_head.clone(),
        },
        SceneObject {
            name: "pin shaft",
            shape: ShapeKind::Cylinder {
                radius: 0.1,
                height: 2.4,
                slices: 200,
            },
            surface: Surface::Metal,
            instance: on_top(&pin_head, 0.85),
        },
    ]
}

/// Warm key light and a dim blue fill light.
pub fn lights() -> Vec<PointLight> {
    vec![
        PointLight::new([0.8, 2.8, -1.2], [1.0, 0.6, 0.0], 0.5),
        PointLight::new([2.5, 1.0, -1.0], [0.0, 0.5, 1.0], 0.1),
    ]
}

pub fn lamp_instances(lights: &[PointLight]) -> Vec<Instance> {
    lights
        .iter()
        .map(|light| {
            let [x, y, z] = light.position;
            Instance::at(x, y, z).scaled(LAMP_SCALE)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Exit,
    ToggleProjection,
}

/// Keys the scene reacts to. Only fresh presses count: releases and OS key
/// repeats are ignored so holding P flips the projection once.
pub fn key_action(key: KeyCode, state: ElementState, repeat: bool) -> Option<KeyAction> {
    if state != ElementState::Pressed || repeat {
        return None;
    }
    match key {
        KeyCode::Escape => Some(KeyAction::Exit),
        KeyCode::KeyP => Some(KeyAction::ToggleProjection),
        _ => None,
    }
}

#[derive(Debug)]
struct DeskObject {
    mesh: Mesh,
    surface: Surface,
    instance_buffer: wgpu::Buffer,
}

#[derive(Debug)]
pub struct DeskScene {
    objects: Vec<DeskObject>,
    materials: [Material; Surface::COUNT],
    lamp_mesh: Mesh,
    lamp_buffer: wgpu::Buffer,
    lights: Vec<PointLight>,
}

impl DeskScene {
    pub async fn new(ctx: InitContext) -> Result<Self> {
        let mut loaded = Vec::with_capacity(Surface::COUNT);
        for surface in Surface::ALL {
            loaded.push(load_material(&ctx, surface).await);
        }
        let materials: [Material; Surface::COUNT] = loaded
            .try_into()
            .map_err(|_| anyhow::anyhow!("expected one material per surface"))?;

        let objects = layout()
            .into_iter()
            .map(|object| -> Result<DeskObject> {
                let shape = object.shape.build()?;
                Ok(DeskObject {
                    mesh: mesh::upload_shape(&ctx.device, &shape, object.name),
                    surface: object.surface,
                    instance_buffer: mesh::mk_instance_buffer(
                        &ctx.device,
                        &[object.instance],
                        object.name,
                    ),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let lights = lights();
        let lamp_shape = shapes::make_sphere(shapes::DEFAULT_SPHERE_TESSELATION)?;
        let lamp_mesh = mesh::upload_shape(&ctx.device, &lamp_shape, "lamp");
        let lamp_buffer = mesh::mk_instance_buffer(&ctx.device, &lamp_instances(&lights), "lamp");

        log::info!(
            "desk scene ready: {} objects, {} lights",
            objects.len(),
            lights.len()
        );

        Ok(Self {
            objects,
            materials,
            lamp_mesh,
            lamp_buffer,
            lights,
        })
    }

    pub fn constructor() -> FlowConstructor {
        Box::new(
            |ctx: InitContext| -> Pin<Box<dyn Future<Output = Result<Box<dyn GraphicsFlow>>>>> {
                Box::pin(async move {
                    let scene = DeskScene::new(ctx).await?;
                    Ok(Box::new(scene) as Box<dyn GraphicsFlow>)
                })
            },
        )
    }
}

async fn load_material(ctx: &InitContext, surface: Surface) -> Material {
    let file_name = surface.file_name();
    let diffuse =
        resources::load_texture_or_fallback(&ctx.assets_dir, file_name, &ctx.device, &ctx.queue)
            .await;
    let specular = Texture::create_solid(DEFAULT_SPECULAR, "specular", &ctx.device, &ctx.queue);
    Material::new(
        &ctx.device,
        file_name,
        diffuse,
        specular,
        &ctx.material_layout,
    )
}

impl GraphicsFlow for DeskScene {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        ctx.light.set_lights(&ctx.queue, &self.lights);
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, _dt: Duration) -> Out {
        Out::Empty
    }

    fn on_device_events(&mut self, _ctx: &Context, _event: &DeviceEvent) -> Out {
        Out::Empty
    }

    fn on_window_events(&mut self, _ctx: &Context, event: &WindowEvent) -> Out {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    repeat,
                    ..
                },
            ..
        } = event
        else {
            return Out::Empty;
        };
        match key_action(*key, *state, *repeat) {
            Some(KeyAction::Exit) => Out::Exit,
            Some(KeyAction::ToggleProjection) => {
                Out::Configure(Box::new(|ctx: &mut Context| ctx.projection.toggle_mode()))
            }
            None => Out::Empty,
        }
    }

    fn on_render(&self) -> Render<'_> {
        let lits = self
            .objects
            .iter()
            .map(|object| Lit {
                mesh: &object.mesh,
                material: &self.materials[object.surface.index()],
                instance: &object.instance_buffer,
                amount: 1,
            })
            .collect();
        Render::Composed(vec![
            Render::Lits(lits),
            Render::Lamps(Lamps {
                mesh: &self.lamp_mesh,
                instance: &self.lamp_buffer,
                amount: self.lights.len(),
            }),
        ])
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    fn object(name: &str) -> SceneObject {
        layout()
            .into_iter()
            .find(|o| o.name == name)
            .expect("object exists")
    }

    #[test]
    fn every_shape_builds() {
        for object in layout() {
            let shape = object.shape.build().expect(object.name);
            assert!(shape.num_indices() > 0, "{} is empty", object.name);
        }
    }

    #[test]
    fn children_sit_on_their_parents() {
        let cap = object("battery cap").instance;
        assert!((cap.position - Vector3::new(4.0, 1.01, 3.0)).magnitude() < 1e-5);
        assert!((cap.scale.x - 0.25).abs() < 1e-6);

        let shaft = object("pin shaft").instance;
        assert!((shaft.position - Vector3::new(1.5, 0.875, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn lamps_follow_lights() {
        let lights = lights();
        let lamps = lamp_instances(&lights);
        assert_eq!(lamps.len(), 2);
        assert_eq!(lamps[0].position, Vector3::new(0.8, 2.8, -1.2));
        assert_eq!(lamps[1].scale, Vector3::new(LAMP_SCALE, LAMP_SCALE, LAMP_SCALE));
    }

    #[test]
    fn every_surface_has_its_own_material_slot() {
        for (slot, surface) in Surface::ALL.into_iter().enumerate() {
            assert_eq!(surface.index(), slot);
        }
        assert!(layout().iter().all(|o| o.surface.index() < Surface::COUNT));
    }

    #[test]
    fn projection_toggles_only_on_fresh_press() {
        assert_eq!(
            key_action(KeyCode::KeyP, ElementState::Pressed, false),
            Some(KeyAction::ToggleProjection)
        );
        assert_eq!(key_action(KeyCode::KeyP, ElementState::Pressed, true), None);
        assert_eq!(key_action(KeyCode::KeyP, ElementState::Released, false), None);
        assert_eq!(
            key_action(KeyCode::Escape, ElementState::Pressed, false),
            Some(KeyAction::Exit)
        );
        assert_eq!(key_action(KeyCode::KeyW, ElementState::Pressed, false), None);
    }
}
