use std::{fs, path::Path};

use anyhow::{Context, Result};
use kcc::{ColliderError, Mat4, MeshInstance, Point, StaticCollider, Vec3};
use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

/// Pose of a shape or of the whole scene: translate, then yaw, then uniform scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseDef {
    pub translation: [f32; 3],
    /// Rotation about +Y (radians).
    pub yaw: f32,
    pub scale: f32,
}

impl Default for PoseDef {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            yaw: 0.0,
            scale: 1.0,
        }
    }
}

impl PoseDef {
    pub fn at(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::new_translation(&Vec3::from(self.translation))
            * UnitQuaternion::from_axis_angle(&Vec3::y_axis(), self.yaw).to_homogeneous()
            * Mat4::new_scaling(self.scale)
    }
}

/// Static geometry the scene file can describe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeDef {
    /// Horizontal rectangle at local `y = 0`, facing up.
    Floor { half_x: f32, half_z: f32 },

    /// Closed axis-aligned box with the given half-extents, centred on the pose.
    Cuboid { half_extents: [f32; 3] },

    /// Slope rising along local +Z from `y = 0` to `y = rise`.
    Ramp { half_width: f32, length: f32, rise: f32 },

    /// Raw triangle soup.
    Mesh { vertices: Vec<[f32; 3]>, indices: Vec<u32> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pose: PoseDef,
    #[serde(flatten)]
    pub shape: ShapeDef,
}

/// A scene as read from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    /// Collider world transform applied on top of every object pose.
    #[serde(default)]
    pub world: PoseDef,
    pub objects: Vec<SceneObject>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scene file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing scene file {}", path.display()))
    }

    /// Ground, a staircase, a ramp, a wall and a pit to fall into.
    pub fn demo() -> Self {
        let mut objects = vec![
            SceneObject {
                name: "ground-west".into(),
                pose: PoseDef::at([-12.0, 0.0, 0.0]),
                shape: ShapeDef::Floor {
                    half_x: 8.0,
                    half_z: 20.0,
                },
            },
            SceneObject {
                name: "ground-east".into(),
                pose: PoseDef::at([12.0, 0.0, 0.0]),
                shape: ShapeDef::Floor {
                    half_x: 8.0,
                    half_z: 20.0,
                },
            },
            // Middle strip with a gap at z in [-8, -4].
            SceneObject {
                name: "ground-middle-north".into(),
                pose: PoseDef::at([0.0, 0.0, -14.0]),
                shape: ShapeDef::Floor {
                    half_x: 4.0,
                    half_z: 6.0,
                },
            },
            SceneObject {
                name: "ground-middle-south".into(),
                pose: PoseDef::at([0.0, 0.0, 8.0]),
                shape: ShapeDef::Floor {
                    half_x: 4.0,
                    half_z: 12.0,
                },
            },
            SceneObject {
                name: "ramp".into(),
                pose: PoseDef {
                    translation: [12.0, 0.0, 2.0],
                    yaw: std::f32::consts::PI,
                    scale: 1.0,
                },
                shape: ShapeDef::Ramp {
                    half_width: 2.0,
                    length: 8.0,
                    rise: 3.0,
                },
            },
            SceneObject {
                name: "wall".into(),
                pose: PoseDef::at([-12.0, 2.0, -10.0]),
                shape: ShapeDef::Cuboid {
                    half_extents: [6.0, 2.0, 0.5],
                },
            },
        ];

        for step in 0..4 {
            let height = 0.25 * (step + 1) as f32;
            objects.push(SceneObject {
                name: format!("step-{step}"),
                pose: PoseDef::at([-12.0, height * 0.5, 4.0 - step as f32]),
                shape: ShapeDef::Cuboid {
                    half_extents: [2.0, height * 0.5, 0.5],
                },
            });
        }

        Self {
            world: PoseDef::default(),
            objects,
        }
    }

    /// Triangulate every object and build the collider.
    pub fn build(&self) -> Result<StaticCollider, ColliderError> {
        let meshes: Vec<MeshInstance> = self.objects.iter().map(mesh_from_object).collect();
        StaticCollider::from_meshes(&meshes, self.world.matrix())
    }
}

/// Build a mesh instance from a `SceneObject`; the pose becomes the instance transform.
pub fn mesh_from_object(object: &SceneObject) -> MeshInstance {
    let (vertices, indices) = match &object.shape {
        ShapeDef::Floor { half_x, half_z } => {
            let (x, z) = (*half_x, *half_z);
            (
                vec![
                    Point::new(-x, 0.0, -z),
                    Point::new(x, 0.0, -z),
                    Point::new(x, 0.0, z),
                    Point::new(-x, 0.0, z),
                ],
                vec![0, 3, 2, 0, 2, 1],
            )
        }
        ShapeDef::Cuboid { half_extents } => cuboid(Vec3::from(*half_extents)),
        ShapeDef::Ramp {
            half_width,
            length,
            rise,
        } => {
            let (w, l, h) = (*half_width, *length, *rise);
            (
                vec![
                    Point::new(-w, 0.0, 0.0),
                    Point::new(w, 0.0, 0.0),
                    Point::new(w, h, l),
                    Point::new(-w, h, l),
                    // Back face down to the ground.
                    Point::new(w, 0.0, l),
                    Point::new(-w, 0.0, l),
                ],
                vec![0, 3, 2, 0, 2, 1, 3, 5, 4, 3, 4, 2],
            )
        }
        ShapeDef::Mesh { vertices, indices } => (
            vertices.iter().copied().map(Point::from).collect(),
            indices.clone(),
        ),
    };

    MeshInstance::new(vertices, indices).with_transform(object.pose.matrix())
}

fn cuboid(half: Vec3) -> (Vec<Point>, Vec<u32>) {
    let corners = (0..8)
        .map(|i| {
            Point::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            )
        })
        .collect();

    // Outward-facing, counter-clockwise.
    let indices = vec![
        0, 2, 3, 0, 3, 1, // -Z
        4, 5, 7, 4, 7, 6, // +Z
        0, 4, 6, 0, 6, 2, // -X
        1, 3, 7, 1, 7, 5, // +X
        0, 1, 5, 0, 5, 4, // -Y
        2, 6, 7, 2, 7, 3, // +Y
    ];
    (corners, indices)
}
