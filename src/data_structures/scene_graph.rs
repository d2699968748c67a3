//! Scene graph and hierarchical scene organization.
//!
//! The scene is a tree of boxed [`SceneNode`]s. [`ContainerNode`]s only carry
//! transforms (the scene root, the spinning scene node), while [`ModelNode`]s
//! hold one mesh and material together with every instance drawn with them.
//! Grouping instances by mesh and material keeps one node per draw batch
//! rather than one node per cube.

use log::warn;

use crate::{
    data_structures::instance::{Instance, InstanceRaw},
    layout::MeshKind,
};

/// Everything a renderer needs to draw one model node.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<'a> {
    pub id: u32,
    pub mesh: MeshKind,
    pub material: u32,
    pub model: &'a str,
    pub instances: Vec<InstanceRaw>,
}

pub trait SceneNode {
    fn get_world_transforms(&self) -> Vec<Instance>;

    fn get_local_transform(&self, idx: usize) -> Option<Instance>;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn set_local_transform(&mut self, idx: usize, instance: Instance);

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance));

    /**
     * A single parent transform is applied to every instance of `self`. Otherwise the
     * parent transforms are matched index by index and must not outnumber the instances.
     */
    fn update_world_transforms(&mut self, parents_world_transform: &[Instance]);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&[Instance::default()]);
    }

    /// Appends an instance and returns the new instance count.
    fn add_instance(&mut self, instance: Instance) -> usize;

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize;

    fn remove_instance(&mut self, idx: usize) -> Option<(Instance, Instance)>;

    fn instance_count(&self) -> usize;

    /// Model nodes of this subtree, parents before children.
    fn get_render(&self) -> Vec<Batch<'_>>;

    fn as_model(&self) -> Option<&ModelNode> {
        None
    }
}

/// Applies `parents` to `instances` and returns the resulting world transforms.
///
/// Returns `None` (and leaves the world transforms untouched) when the parents
/// can't be matched with the instances.
fn propagate(
    instances: &mut [(Instance, Instance)],
    parents: &[Instance],
) -> Option<Vec<Instance>> {
    match parents {
        [] => None,
        [parent] => Some(
            instances
                .iter_mut()
                .map(|(local, world)| {
                    *world = parent * &*local;
                    world.clone()
                })
                .collect(),
        ),
        _ if parents.len() > instances.len() => {
            warn!(
                "You tried to transform with len {}, but there are only {} instances to transform.",
                parents.len(),
                instances.len()
            );
            None
        }
        _ => Some(
            instances
                .iter_mut()
                .zip(parents.iter())
                .map(|((local, world), parent)| {
                    *world = parent * &*local;
                    world.clone()
                })
                .collect(),
        ),
    }
}

pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    pub instances: Vec<(Instance, Instance)>,
}

impl ContainerNode {
    pub fn new(amount: usize) -> Self {
        let instances = (0..amount)
            .map(|_| (Instance::default(), Instance::default()))
            .collect();
        Self {
            instances,
            children: vec![],
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SceneNode for ContainerNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn set_local_transform(&mut self, idx: usize, instance: Instance) {
        if let Some((local, _)) = self.instances.get_mut(idx) {
            *local = instance;
        }
    }

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        self.instances.iter_mut().for_each(|(local, _)| {
            mutation(local);
        });
    }

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(&mut self, parents_world_transform: &[Instance]) {
        let Some(world_transforms) = propagate(&mut self.instances, parents_world_transform)
        else {
            return;
        };
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world_transforms);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    fn add_instance(&mut self, instance: Instance) -> usize {
        self.instances.push((instance.clone(), instance));
        self.instances.len()
    }

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize {
        self.instances
            .extend(instances.into_iter().map(|instance| (instance.clone(), instance)));
        self.instances.len()
    }

    fn remove_instance(&mut self, idx: usize) -> Option<(Instance, Instance)> {
        (idx < self.instances.len()).then(|| self.instances.remove(idx))
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn get_render(&self) -> Vec<Batch<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

/// A mesh with one material, drawn once per instance.
pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instances: Vec<(Instance, Instance)>,
    mesh: MeshKind,
    material: u32,
    model: String,
    id: u32,
}

impl ModelNode {
    pub fn new(id: u32, mesh: MeshKind, material: u32, model: &str) -> Self {
        Self {
            children: vec![],
            instances: vec![],
            mesh,
            material,
            model: model.to_string(),
            id,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn mesh(&self) -> MeshKind {
        self.mesh
    }

    pub fn material(&self) -> u32 {
        self.material
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Local transforms of every instance, in insertion order.
    pub fn local_transforms(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter().map(|(local, _)| local)
    }
}

impl SceneNode for ModelNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn set_local_transform(&mut self, idx: usize, instance: Instance) {
        if let Some((local, _)) = self.instances.get_mut(idx) {
            *local = instance;
        }
    }

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        self.instances
            .iter_mut()
            .for_each(|(local, _)| mutation(local));
    }

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(&mut self, parents_world_transform: &[Instance]) {
        let Some(world_transforms) = propagate(&mut self.instances, parents_world_transform)
        else {
            return;
        };
        for child in self.children.iter_mut() {
            child.update_world_transforms(&world_transforms);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    fn add_instance(&mut self, instance: Instance) -> usize {
        self.instances.push((instance.clone(), instance));
        self.instances.len()
    }

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize {
        self.instances
            .extend(instances.into_iter().map(|instance| (instance.clone(), instance)));
        self.instances.len()
    }

    fn remove_instance(&mut self, idx: usize) -> Option<(Instance, Instance)> {
        (idx < self.instances.len()).then(|| self.instances.remove(idx))
    }

    fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn get_render(&self) -> Vec<Batch<'_>> {
        if self.instances.is_empty() {
            warn!("model node {} ({}) has zero instances", self.id, self.model);
        }
        [Batch {
            id: self.id,
            mesh: self.mesh,
            material: self.material,
            model: &self.model,
            instances: self
                .instances
                .iter()
                .map(|(_, world)| world.to_raw())
                .collect(),
        }]
        .into_iter()
        .chain(self.children.iter().flat_map(|child| child.get_render()))
        .collect()
    }

    fn as_model(&self) -> Option<&ModelNode> {
        Some(self)
    }
}
