//! Demo lifecycle and the headless frame loop.
//!
//! [`DemoFlow`] owns the scene graph and reacts to the same hooks an engine
//! would drive:
//!
//! 1. `on_init()` generates the layout and populates the scene
//! 2. `on_update()` is called every frame and spins the scene node
//! 3. `on_key()` is called for every pressed key
//!
//! The scene graph looks like this:
//!
//! ```text
//! scene root (ContainerNode)
//! └── scene node (ContainerNode, spins every frame)
//!     ├── batch 0 (ModelNode: teapots, material 0)
//!     ├── batch 1 (ModelNode: teapots, material 2)
//!     └── ...
//! ```

use cgmath::{Deg, Quaternion, Rotation3};
use instant::{Duration, Instant};
use winit::keyboard::KeyCode;

use crate::{
    config::{DemoConfig, SpinRates},
    context::Context,
    data_structures::{
        instance::Instance,
        scene_graph::{Batch, ContainerNode, SceneNode},
    },
    layout::{self, RandomSource},
    populate::{PopulateStats, populate},
    resources::{AssetTable, MaterialPalette},
};

/// Index of the spinning scene node below the scene root.
const SCENE_NODE: usize = 0;

const LIMITED_FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Host reaction to a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Exit,
    ToggleConsole,
    ToggleDebugHud,
}

impl Action {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Escape => Some(Self::Exit),
            KeyCode::F1 => Some(Self::ToggleConsole),
            KeyCode::F3 => Some(Self::ToggleDebugHud),
            _ => None,
        }
    }
}

/// Visibility of the console and the debug HUD.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlays {
    pub console: bool,
    pub debug_hud: bool,
}

/// Euler rotation in degrees, composed as Y * X * Z.
pub fn euler_rotation(x: Deg<f32>, y: Deg<f32>, z: Deg<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_y(y) * Quaternion::from_angle_x(x) * Quaternion::from_angle_z(z)
}

/// Rotation of the scene node after `dt` at the given rates.
pub fn spin_step(spin: &SpinRates, dt: Duration) -> Quaternion<f32> {
    let secs = dt.as_secs_f32();
    euler_rotation(Deg(spin.x * secs), Deg(spin.y * secs), Deg(spin.z * secs))
}

pub struct DemoFlow {
    config: DemoConfig,
    ctx: Context,
    palette: MaterialPalette,
    assets: AssetTable,
    root: ContainerNode,
    overlays: Overlays,
    exit_requested: bool,
}

impl DemoFlow {
    pub fn new(config: DemoConfig) -> Self {
        Self::with_resources(config, MaterialPalette::default(), AssetTable::default())
    }

    pub fn with_resources(
        config: DemoConfig,
        palette: MaterialPalette,
        assets: AssetTable,
    ) -> Self {
        let ctx = Context::new(&config.engine);
        let mut root = ContainerNode::default();
        root.add_child(Box::new(ContainerNode::default()));
        Self {
            config,
            ctx,
            palette,
            assets,
            root,
            overlays: Overlays::default(),
            exit_requested: false,
        }
    }

    /// Generates a fresh layout and replaces whatever the scene node held before.
    pub fn on_init<R: RandomSource + ?Sized>(
        &mut self,
        random: &mut R,
    ) -> anyhow::Result<PopulateStats> {
        let layout = layout::generate(random);
        let scene_node = self
            .root
            .get_children_mut()
            .get_mut(SCENE_NODE)
            .ok_or_else(|| anyhow::anyhow!("scene root has no scene node"))?;
        scene_node.get_children_mut().clear();
        scene_node.set_local_transform(0, Instance::default());
        let stats = populate(&mut **scene_node, &layout, &self.palette, &self.assets)?;
        self.root.update_world_transform_all();
        Ok(stats)
    }

    /// Spins the scene node by `dt` worth of rotation and refreshes world transforms.
    pub fn on_update(&mut self, dt: Duration) {
        let step = spin_step(&self.config.spin, dt);
        match self.root.get_children_mut().get_mut(SCENE_NODE) {
            Some(scene_node) => scene_node.set_local_transform_all(&mut |local: &mut Instance| {
                local.rotation = local.rotation * step;
            }),
            None => {
                log::warn!("scene node is missing, nothing to rotate");
                return;
            }
        }
        self.root.update_world_transform_all();
    }

    pub fn on_key(&mut self, key: KeyCode) -> Option<Action> {
        let action = Action::from_key(key)?;
        match action {
            Action::Exit => self.exit_requested = true,
            Action::ToggleConsole => self.overlays.console = !self.overlays.console,
            Action::ToggleDebugHud => self.overlays.debug_hud = !self.overlays.debug_hud,
        }
        log::debug!("{:?} -> {:?}", key, action);
        Some(action)
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn root(&self) -> &ContainerNode {
        &self.root
    }

    /// Current local rotation of the spinning scene node.
    pub fn rotation(&self) -> Option<Quaternion<f32>> {
        self.root
            .get_children()
            .get(SCENE_NODE)
            .and_then(|node| node.get_local_transform(0))
            .map(|local| local.rotation)
    }

    pub fn on_render(&self) -> Vec<Batch<'_>> {
        self.root.get_render()
    }
}

/// Builds the demo scene and drives `config.frames` updates without a window.
pub fn run(config: DemoConfig) -> anyhow::Result<()> {
    run_with_input(config, |_| None).map(|_| ())
}

/// Like [`run`], but asks `input` for a key press before every frame.
///
/// Returns the number of frames that were updated, which is less than
/// `config.frames` when a key press requested an exit.
pub fn run_with_input<F>(config: DemoConfig, mut input: F) -> anyhow::Result<u32>
where
    F: FnMut(u32) -> Option<KeyCode>,
{
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let mut random = config.random_source();
    let frames = config.frames;
    let frame_limiter = config.engine.frame_limiter;
    log::info!(
        "starting with seed {:?}, {} frames, render path {}",
        config.seed,
        frames,
        config.engine.render_path
    );

    let mut flow = DemoFlow::new(config);
    let stats = flow.on_init(&mut random)?;
    log::info!("{} instances in {} batches", stats.instances(), stats.batches);

    let started = Instant::now();
    let mut last_time = Instant::now();
    let mut updated = 0;
    for frame in 0..frames {
        if let Some(key) = input(frame) {
            flow.on_key(key);
        }
        if flow.exit_requested() {
            log::info!("exit requested at frame {}", frame);
            break;
        }
        let dt = last_time.elapsed();
        last_time = Instant::now();
        flow.on_update(dt);
        updated += 1;

        if frame % 60 == 0 {
            let drawn: usize = flow.on_render().iter().map(|b| b.instances.len()).sum();
            log::debug!("frame {}: {} instances drawn", frame, drawn);
        }
        if frame_limiter {
            let spent = last_time.elapsed();
            if spent < LIMITED_FRAME_TIME {
                std::thread::sleep(LIMITED_FRAME_TIME - spent);
            }
        }
    }
    log::info!(
        "ran {} frames in {:.2}s, final rotation {:?}",
        updated,
        started.elapsed().as_secs_f32(),
        flow.rotation()
    );
    Ok(updated)
}
