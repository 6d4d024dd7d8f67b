use bevy::prelude::*;

use crate::{stats::FluidOverlayStats, texture::{density_to_rgba, interior_sum, spawn_density_view, DensityTexture}};

use super::{FluidData, FluidDataFrame, PlaybackPlugin, PlaybackState};

/// Plays back a recorded density field, one recorded frame per fixed tick.
pub struct DensityPlaybackPlugin;

impl Plugin for DensityPlaybackPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_plugins(PlaybackPlugin)
            .add_systems(Startup, setup)
            .add_systems(FixedUpdate, progress_playback.run_if(in_state(PlaybackState::Playing)));
    }
}

fn setup(
    mut commands: Commands,
    fluid: Res<FluidData>,
    mut images: ResMut<Assets<Image>>,
    mut stats: ResMut<FluidOverlayStats>,
) {
    let n = fluid.0.metadata.resolution as usize;
    let texture = spawn_density_view(&mut commands, &mut images, n);

    if let Some(density) = fluid.0.frames.first().and_then(|f| f.density()) {
        if let Some(image) = images.get_mut(&texture.image) {
            density_to_rgba(density.as_slice(), n, &mut image.data);
        }
        stats.total_density = interior_sum(density.as_slice(), n);
    }

    info!("loaded {} frames of a {n}x{n} fluid, press space to play", fluid.0.frames.len());

    commands.insert_resource(texture);
}

fn progress_playback(
    fluid: Res<FluidData>,
    texture: Res<DensityTexture>,
    mut images: ResMut<Assets<Image>>,
    mut frame: ResMut<FluidDataFrame>,
    mut stats: ResMut<FluidOverlayStats>,
    mut next_state: ResMut<NextState<PlaybackState>>,
) {
    if frame.0 >= fluid.0.frames.len() {
        next_state.set(PlaybackState::Paused);
        frame.0 = 0;
        return;
    }

    let n = texture.resolution;

    if let Some(density) = fluid.0.frames[frame.0].density() {
        if let Some(image) = images.get_mut(&texture.image) {
            density_to_rgba(density.as_slice(), n, &mut image.data);
        }

        stats.total_density = interior_sum(density.as_slice(), n);
    }

    stats.ticks = frame.0 as u64 + 1;
    frame.0 += 1;
}
