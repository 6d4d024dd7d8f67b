use bevy::{
    image::ImageSampler,
    prelude::*,
    render::{camera::ScalingMode, render_asset::RenderAssetUsages, render_resource::{Extent3d, TextureDimension, TextureFormat}},
};

/// The image the density is drawn into.
#[derive(Resource)]
pub struct DensityTexture {
    pub image: Handle<Image>,
    pub resolution: usize,
}

/// Spawns a camera framing the unit square and a sprite covering it, showing an `n`×`n`
/// texture. The sprite is centred on the origin, so world `(-0.5, -0.5)` is the bottom-left
/// corner of the domain.
pub fn spawn_density_view(commands: &mut Commands, images: &mut Assets<Image>, n: usize) -> DensityTexture {
    let size = Extent3d {
        width: n as u32,
        height: n as u32,
        depth_or_array_layers: 1,
    };

    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::nearest();

    let image = images.add(image);

    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin { min_width: 1.0, min_height: 1.0 },
            ..OrthographicProjection::default_2d()
        },
    ));

    commands.spawn(Sprite {
        image: image.clone(),
        custom_size: Some(Vec2::ONE),
        ..default()
    });

    DensityTexture { image, resolution: n }
}

/// Writes the interior of a flat `(n + 2)²` density array into `rgba` as an `n`×`n` grayscale
/// image, clamping densities to `[0, 1]`.
///
/// Texture rows run top to bottom while grid rows run bottom to top, so texel row `r` shows
/// grid row `j = n - r`.
pub fn density_to_rgba(density: &[f32], n: usize, rgba: &mut [u8]) {
    let stride = n + 2;

    for (r, row) in rgba.chunks_exact_mut(4 * n).take(n).enumerate() {
        let j = n - r;

        for (c, texel) in row.chunks_exact_mut(4).enumerate() {
            let d = density[c + 1 + stride * j].clamp(0.0, 1.0);
            let l = (d * 255.0).round() as u8;
            texel.copy_from_slice(&[l, l, l, 255]);
        }
    }
}

/// Sum of the interior cells of a flat `(n + 2)²` array.
pub fn interior_sum(x: &[f32], n: usize) -> f64 {
    let stride = n + 2;
    (1..=n).flat_map(|j| &x[1 + stride * j..=n + stride * j]).map(|&v| v as f64).sum()
}
