use bevy::{prelude::*, window::PrimaryWindow};
use eddy_fluids::{diagnostics, grid::grid_cell, scene::Scene, stable::d2::StableFluid2D};

use crate::{stats::FluidOverlayStats, texture::{density_to_rgba, spawn_density_view, DensityTexture}};

/// Runs a scene interactively. Dragging with the left mouse button stirs the fluid and `C`
/// clears it.
pub struct LivePlugin;

impl Plugin for LivePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Pointer>()
            .init_resource::<Stirring>()
            .add_systems(Startup, setup)
            .add_systems(Update, (stir, clear, upload_density).chain())
            .add_systems(FixedUpdate, step);
    }
}

#[derive(Resource)]
pub struct LiveScene(pub Scene<StableFluid2D>);

/// How pointer drags force the fluid.
#[derive(Resource, Clone, Copy, Debug)]
pub struct Stirring {
    /// Density added to the cell under the pointer per frame while dragging.
    pub density: f32,
    /// Scale from pointer motion, in domain units per frame, to velocity.
    pub force: f32,
}

impl Default for Stirring {
    fn default() -> Self {
        Self {
            density: 10.0,
            force: 50.0,
        }
    }
}

/// Pointer position in the unit square on the previous frame, while dragging.
#[derive(Resource, Default)]
struct Pointer(Option<Vec2>);

fn setup(
    mut commands: Commands,
    scene: Res<LiveScene>,
    mut images: ResMut<Assets<Image>>,
) {
    let n = scene.0.fluid.grid().resolution();
    let texture = spawn_density_view(&mut commands, &mut images, n);

    info!("running a {n}x{n} fluid, drag to stir, C to clear");

    commands.insert_resource(texture);
}

fn stir(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    stirring: Res<Stirring>,
    mut pointer: ResMut<Pointer>,
    mut scene: ResMut<LiveScene>,
) {
    if !mouse.pressed(MouseButton::Left) {
        pointer.0 = None;
        return;
    }

    let (Ok(window), Ok((camera, transform))) = (windows.get_single(), cameras.get_single()) else {
        return;
    };

    let Some(p) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(transform, cursor).ok())
        .map(|world| world + Vec2::splat(0.5))
    else {
        return;
    };

    let delta = pointer.0.map_or(Vec2::ZERO, |last| p - last);
    pointer.0 = Some(p);

    let fluid = &mut scene.0.fluid;
    let c = grid_cell(p, fluid.grid().resolution());
    let (x, y) = (c.x as usize, c.y as usize);

    fluid.add_density(x, y, stirring.density);
    fluid.add_velocity(x, y, stirring.force * delta.x, stirring.force * delta.y);
}

fn clear(
    keys: Res<ButtonInput<KeyCode>>,
    mut scene: ResMut<LiveScene>,
) {
    if keys.just_pressed(KeyCode::KeyC) {
        scene.0.fluid.clear();
        info!("cleared fluid");
    }
}

fn step(mut scene: ResMut<LiveScene>) {
    scene.0.step();
}

fn upload_density(
    scene: Res<LiveScene>,
    texture: Res<DensityTexture>,
    mut images: ResMut<Assets<Image>>,
    mut stats: ResMut<FluidOverlayStats>,
) {
    if !scene.is_changed() {
        return;
    }

    let fluid = &scene.0.fluid;

    if let Some(image) = images.get_mut(&texture.image) {
        density_to_rgba(fluid.density(), texture.resolution, &mut image.data);
    }

    stats.ticks = fluid.ticks();
    stats.total_density = diagnostics::total(fluid.density_field());
}
