use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use teapot_field::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, ModelNode, SceneNode},
    },
    layout::{self, GLASS_MATERIAL, LayoutResult, MeshKind, Placement},
    populate::{PopulateStats, populate},
    resources::{
        AssetTable, MaterialPalette, TEAPOT_SCALE,
        material::{BASE_MATERIAL, GLASS_MATERIAL_SOURCE},
    },
};

use crate::common::test_utils::{FixedRandom, approx_eq};

mod common;

fn batches(node: &dyn SceneNode) -> Vec<(MeshKind, u32, usize)> {
    node.get_children()
        .iter()
        .filter_map(|child| child.as_model())
        .map(|model| (model.mesh(), model.material(), model.instance_count()))
        .collect()
}

#[test]
fn palette_has_colour_variants_and_glass() {
    let palette = MaterialPalette::default();
    assert_eq!(palette.len(MeshKind::Cube), 11);
    assert_eq!(palette.len(MeshKind::TeaPot), 11);

    let glass = palette.lookup(MeshKind::Cube, GLASS_MATERIAL).unwrap();
    assert_eq!(glass.source, GLASS_MATERIAL_SOURCE);

    let cube = palette.lookup(MeshKind::Cube, 3).unwrap();
    assert_eq!(cube.source, BASE_MATERIAL);
    assert!(approx_eq(cube.u_offset[0], 0.1));
    assert!(approx_eq(cube.u_offset[3], 0.3));
    assert_eq!(cube.v_offset, [0.0, 1.0, 0.0, 0.0]);
    assert!(!cube.cull_none);

    let teapot = palette.lookup(MeshKind::TeaPot, 2).unwrap();
    assert!(approx_eq(teapot.u_offset[3], 0.2));
    assert!(teapot.cull_none);
}

#[test]
fn palette_rejects_missing_slots() {
    let palette = MaterialPalette::default();
    assert!(palette.lookup(MeshKind::Cube, 11).is_err());
    assert!(palette.lookup(MeshKind::TeaPot, 11).is_err());
    // the teapot palette has no glass variant
    let err = palette.lookup(MeshKind::TeaPot, GLASS_MATERIAL).unwrap_err();
    assert!(err.to_string().contains("empty"), "{}", err);
}

#[test]
fn asset_table_maps_meshes_to_models() {
    let assets = AssetTable::default();
    let teapot = assets.mesh(MeshKind::TeaPot).unwrap();
    assert_eq!(teapot.model, "Models/teapot.mdl");
    assert_eq!(teapot.scale, TEAPOT_SCALE);
    assert_eq!(assets.mesh(MeshKind::Cube).unwrap().model, "Models/Box.mdl");

    let cubes_only = AssetTable::new().with_mesh(MeshKind::Cube, "Models/Box.mdl", 1.0);
    assert!(cubes_only.mesh(MeshKind::TeaPot).is_err());
}

#[test]
fn populate_groups_placements_into_batches() {
    let layout = layout::generate(&mut FixedRandom::new(99));
    let mut scene_node = ContainerNode::default();
    let stats = populate(
        &mut scene_node,
        &layout,
        &MaterialPalette::default(),
        &AssetTable::default(),
    )
    .unwrap();

    assert_eq!(
        stats,
        PopulateStats {
            cubes: 1974,
            teapots: 16,
            batches: 7,
        }
    );
    assert_eq!(
        batches(&scene_node),
        vec![
            (MeshKind::TeaPot, 0, 13),
            (MeshKind::TeaPot, 1, 2),
            (MeshKind::TeaPot, 2, 1),
            (MeshKind::Cube, 2, 900),
            (MeshKind::Cube, 1, 876),
            (MeshKind::Cube, 0, 113),
            (MeshKind::Cube, GLASS_MATERIAL, 85),
        ]
    );
}

#[test]
fn populate_places_instances_at_layout_positions() {
    let layout = LayoutResult::from(vec![
        Placement::teapot(2, 10, -3, 1),
        Placement::cube(0, 1, 2, 3),
        Placement::cube(0, -4, 5, -6),
    ]);
    let mut scene_node = ContainerNode::default();
    populate(
        &mut scene_node,
        &layout,
        &MaterialPalette::default(),
        &AssetTable::default(),
    )
    .unwrap();

    let children = scene_node.get_children();
    assert_eq!(children.len(), 2);

    let teapots = children[0].as_model().unwrap();
    assert_eq!(teapots.id(), 0);
    assert_eq!(teapots.model(), "Models/teapot.mdl");
    let teapot = teapots.get_local_transform(0).unwrap();
    assert_eq!(teapot.position, Vector3::new(10.0, -3.0, 1.0));
    assert_eq!(teapot.scale, Vector3::new(TEAPOT_SCALE, TEAPOT_SCALE, TEAPOT_SCALE));

    let cubes = children[1].as_model().unwrap();
    assert_eq!(cubes.id(), 1);
    let positions: Vec<_> = cubes.local_transforms().map(|i| i.position).collect();
    assert_eq!(
        positions,
        vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-4.0, 5.0, -6.0)]
    );
    assert_eq!(cubes.get_local_transform(1).unwrap().scale, Vector3::new(1.0, 1.0, 1.0));
}

#[test]
fn populate_rejects_unknown_materials_without_touching_the_scene() {
    let palette = MaterialPalette::default();
    let assets = AssetTable::default();
    let mut scene_node = ContainerNode::default();

    let layout = LayoutResult::from(vec![Placement::cube(0, 0, 0, 0), Placement::cube(11, 0, 0, 0)]);
    let err = populate(&mut scene_node, &layout, &palette, &assets).unwrap_err();
    assert!(format!("{:#}", err).contains("out of range"), "{:#}", err);
    assert!(scene_node.get_children().is_empty());

    let layout = LayoutResult::from(vec![Placement::teapot(GLASS_MATERIAL, 0, 0, 0)]);
    assert!(populate(&mut scene_node, &layout, &palette, &assets).is_err());
    assert!(scene_node.get_children().is_empty());
}

#[test]
fn populate_needs_a_model_for_every_mesh() {
    let assets = AssetTable::new().with_mesh(MeshKind::Cube, "Models/Box.mdl", 1.0);
    let mut scene_node = ContainerNode::default();
    let result = populate(
        &mut scene_node,
        &layout::teapot_grid(),
        &MaterialPalette::default(),
        &assets,
    );
    assert!(result.is_err());
    assert!(scene_node.get_children().is_empty());
}

#[test]
fn world_transforms_follow_the_parent_rotation() {
    let mut root = ContainerNode::default();
    let mut model = ModelNode::new(0, MeshKind::Cube, 0, "Models/Box.mdl");
    model.add_instance(Instance::from(Vector3::new(1.0, 0.0, 0.0)));
    model.add_instance(Instance::from(Vector3::new(0.0, 2.0, 0.0)));
    root.add_child(Box::new(model));

    root.set_local_transform(
        0,
        Instance {
            rotation: Quaternion::from_angle_y(Deg(90.0)),
            ..Default::default()
        },
    );
    root.update_world_transform_all();

    let worlds = root.get_children()[0].get_world_transforms();
    assert_eq!(worlds.len(), 2);
    assert!(approx_eq(worlds[0].position.x, 0.0));
    assert!(approx_eq(worlds[0].position.z, -1.0));
    assert!(approx_eq(worlds[1].position.y, 2.0));
}

#[test]
fn render_batches_carry_world_matrices() {
    let mut root = ContainerNode::default();
    root.set_local_transform(0, Instance::from(Vector3::new(0.0, 0.0, 5.0)));
    let mut model = ModelNode::new(3, MeshKind::TeaPot, 1, "Models/teapot.mdl");
    model.add_instance(Instance::from(Vector3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0));
    root.add_child(Box::new(model));
    root.update_world_transform_all();

    let render = root.get_render();
    assert_eq!(render.len(), 1);
    assert_eq!(render[0].id, 3);
    assert_eq!(render[0].mesh, MeshKind::TeaPot);
    assert_eq!(render[0].material, 1);
    assert_eq!(render[0].model, "Models/teapot.mdl");

    let raw = render[0].instances[0];
    // translation lives in the last column
    assert_eq!(raw.model[3], [1.0, 2.0, 8.0, 1.0]);
    assert_eq!(raw.model[0][0], 2.0);
    assert_eq!(raw.handedness, 1.0);
    assert_eq!(bytemuck::bytes_of(&raw).len(), (16 + 9 + 1) * 4);
}

#[test]
fn instances_can_be_removed() {
    let mut model = ModelNode::new(0, MeshKind::Cube, 0, "Models/Box.mdl");
    assert_eq!(
        model.add_instances(vec![Instance::default(), Instance::default()]),
        2
    );
    assert!(model.remove_instance(1).is_some());
    assert!(model.remove_instance(1).is_none());
    assert_eq!(model.instance_count(), 1);
}

#[test]
fn scaled_parents_stretch_child_offsets() {
    let parent = Instance {
        position: Vector3::new(0.0, 0.0, 5.0),
        rotation: Quaternion::from_angle_y(Deg(90.0)),
        scale: Vector3::new(2.0, 2.0, 2.0),
    };
    let child = Instance::from(Vector3::new(1.0, 0.0, 0.0)).with_uniform_scale(3.0);

    let world = &parent * &child;
    assert!(approx_eq(world.position.x, 0.0));
    assert!(approx_eq(world.position.z, 3.0));
    assert_eq!(world.scale, Vector3::new(6.0, 6.0, 6.0));
    assert_eq!(world, parent * child);
}
