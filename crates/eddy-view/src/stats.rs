use bevy::{diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}, prelude::*};

const STATS_OVERLAY_ZINDEX: i32 = i32::MAX - 32;
const STATS_FONT_SIZE: f32 = 20.0;

/// Shows the frame rate and the [`FluidOverlayStats`] of whatever is on screen.
pub struct StatsOverlayPlugin;

impl Plugin for StatsOverlayPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.init_resource::<FluidOverlayStats>()
            .add_systems(Startup, setup)
            .add_systems(Update, update_text);
    }
}

/// Per-frame figures written by the playback and live systems.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct FluidOverlayStats {
    pub ticks: u64,
    pub total_density: f64,
}

impl FluidOverlayStats {
    /// Text of the tick and density spans.
    fn spans(&self) -> [String; 2] {
        [self.ticks.to_string(), format!("{:.3}", self.total_density)]
    }
}

#[derive(Component)]
struct StatsText;

fn setup(mut commands: Commands) {
    let font = TextFont {
        font_size: STATS_FONT_SIZE,
        ..Default::default()
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                ..Default::default()
            },
            GlobalZIndex(STATS_OVERLAY_ZINDEX),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                font.clone(),
                TextColor(Color::WHITE),
                StatsText,
            ))
            .with_child((TextSpan::default(), font.clone()))
            .with_child((TextSpan::new("\nTicks: "), font.clone()))
            .with_child((TextSpan::default(), font.clone()))
            .with_child((TextSpan::new("\nDensity: "), font.clone()))
            .with_child((TextSpan::default(), font));
        });
}

fn update_text(
    diagnostic: Res<DiagnosticsStore>,
    stats: Res<FluidOverlayStats>,
    query: Query<Entity, With<StatsText>>,
    mut writer: TextUiWriter,
) {
    for entity in &query {
        if let Some(fps) = diagnostic.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                *writer.text(entity, 1) = format!("{value:.2}");
            }
        }

        let [ticks, density] = stats.spans();
        *writer.text(entity, 3) = ticks;
        *writer.text(entity, 5) = density;
    }
}
