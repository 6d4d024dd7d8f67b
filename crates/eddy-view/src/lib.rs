#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

use bevy::prelude::*;
use eddy_fluids::{scene::Scene, stable::d2::StableFluid2D};
use eddy_io::decode::FluidData;
use live::{LivePlugin, LiveScene};
use playback::density::DensityPlaybackPlugin;
use stats::StatsOverlayPlugin;

mod live;
mod playback;
mod stats;
mod texture;

pub use live::Stirring;

fn window_plugin(title: String) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title,
            resolution: (720.0, 720.0).into(),
            ..default()
        }),
        ..default()
    }
}

/// Plays back a recording. Space toggles playback.
pub fn view(data: FluidData) {
    let fps = data.metadata.fps.max(1);

    App::new()
        .add_plugins((
            DefaultPlugins.set(window_plugin("eddy: playback".into())),
            StatsOverlayPlugin,
        ))
        .add_plugins(DensityPlaybackPlugin)
        .insert_resource(Time::<Fixed>::from_hz(fps as f64))
        .insert_resource(playback::FluidData(data))
        .run();
}

/// Runs `scene` interactively, stepping it `fps` times a second.
pub fn live(scene: Scene<StableFluid2D>, fps: u32, stirring: Stirring) {
    App::new()
        .add_plugins((
            DefaultPlugins.set(window_plugin("eddy".into())),
            StatsOverlayPlugin,
        ))
        .add_plugins(LivePlugin)
        .insert_resource(Time::<Fixed>::from_hz(fps.max(1) as f64))
        .insert_resource(stirring)
        .insert_resource(LiveScene(scene))
        .run();
}
