use std::{fs, path::PathBuf};

use eddy_fluids::{emitter::jet::Jet, scene::Scene, stable::d2::StableFluid2D};
use eddy_io::{
    decode::{DecodingError, FluidDataDecoder},
    encode::{EncodingError, FluidDataEncoder},
    FieldKind,
};
use glam::Vec2;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("eddy-io-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn record(dir: &PathBuf, frames: u64) -> Vec<StableFluid2D> {
    let mut scene = Scene::new(StableFluid2D::new(6, 0.1, 0.001, 0.0001));
    scene.add_emitter(Jet::new(Vec2::new(0.5, 0.2), 40.0, Vec2::new(0.0, 2.0)));

    let mut encoder = FluidDataEncoder::new(dir.clone(), frames, 24).unwrap();
    encoder.encode_metadata(&scene).unwrap();

    let mut states = Vec::new();
    for _ in 0..frames {
        scene.step();
        encoder.encode_frame(&scene).unwrap();
        states.push(scene.fluid.clone());
    }

    states
}

#[test]
fn test_recording_reads_back_exactly() {
    let dir = scratch_dir("exact");
    let states = record(&dir, 12);

    let data = FluidDataDecoder::new(dir.clone()).decode_all().unwrap();

    assert_eq!(data.metadata.resolution, 6);
    assert_eq!(data.metadata.fps, 24);
    assert_eq!(data.metadata.num_frames, 12);
    assert_eq!(data.metadata.params.dt, 0.1);
    assert_eq!(data.metadata.params.iterations, 20);
    assert_eq!(data.metadata.fields.as_slice(), &[FieldKind::Density, FieldKind::Velocity]);
    assert_eq!(data.frames.len(), 12);

    for (frame, fluid) in data.frames.iter().zip(&states) {
        assert_eq!(frame.density().unwrap().as_slice(), fluid.density());

        let velocity: Vec<[f32; 2]> = frame.velocity().unwrap().iter::<2>().collect();
        assert_eq!(velocity.len(), 64);
        for (k, [u, v]) in velocity.into_iter().enumerate() {
            assert_eq!(u, fluid.u()[k]);
            assert_eq!(v, fluid.v()[k]);
        }
    }

    assert!(fs::read_dir(&dir).unwrap().any(|e| e.unwrap().file_name() == "00.dat"));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_reset_rewinds() {
    let dir = scratch_dir("reset");
    record(&dir, 3);

    let mut decoder = FluidDataDecoder::new(dir.clone());
    decoder.decode_metadata().unwrap();
    let first = decoder.decode_frame().unwrap().unwrap();
    decoder.decode_frame().unwrap();
    decoder.decode_frame().unwrap();
    assert!(decoder.decode_frame().unwrap().is_none());

    decoder.reset();
    assert_eq!(decoder.decode_frame().unwrap().unwrap(), first);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_encoder_refuses_extra_frames() {
    let dir = scratch_dir("overflow");
    let scene = Scene::new(StableFluid2D::new(2, 0.1, 0.0, 0.0));

    let mut encoder = FluidDataEncoder::new(dir.clone(), 1, 30).unwrap();
    encoder.encode_frame(&scene).unwrap();

    assert!(matches!(encoder.encode_frame(&scene), Err(EncodingError::FrameOverflow(1))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_encoder_refuses_existing_directory() {
    let dir = scratch_dir("exists");
    fs::create_dir(&dir).unwrap();

    assert!(matches!(FluidDataEncoder::new(dir.clone(), 1, 30), Err(EncodingError::Io(_))));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_rejects_foreign_metadata() {
    let dir = scratch_dir("magic");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("_meta"), b"RIFF\x01\x00\x00\x00").unwrap();

    let err = FluidDataDecoder::new(dir.clone()).decode_metadata().unwrap_err();
    assert!(matches!(err, DecodingError::BadMagic(m) if &m == b"RIFF"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_rejects_truncated_frame() {
    let dir = scratch_dir("truncated");
    record(&dir, 1);

    let frame = dir.join("0.dat");
    let bytes = fs::read(&frame).unwrap();
    fs::write(&frame, &bytes[..bytes.len() / 2]).unwrap();

    let mut decoder = FluidDataDecoder::new(dir.clone());
    decoder.decode_metadata().unwrap();
    assert!(matches!(decoder.decode_frame(), Err(DecodingError::Io(_))));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_rejects_unknown_field_tag() {
    let dir = scratch_dir("tag");
    record(&dir, 1);

    let meta = dir.join("_meta");
    let mut bytes = fs::read(&meta).unwrap();
    *bytes.last_mut().unwrap() = 9;
    fs::write(&meta, bytes).unwrap();

    let err = FluidDataDecoder::new(dir.clone()).decode_metadata().unwrap_err();
    assert!(matches!(err, DecodingError::UnknownField(9)));

    fs::remove_dir_all(&dir).unwrap();
}

fn write_meta(dir: &PathBuf, resolution: u32, num_frames: u64) {
    let mut meta = b"EDDY".to_vec();
    meta.push(1);
    meta.extend(resolution.to_le_bytes());
    meta.extend(30u32.to_le_bytes());
    meta.extend(num_frames.to_le_bytes());
    for param in [0.1f32, 0.0, 0.0] {
        meta.extend(param.to_le_bytes());
    }
    meta.extend(20u32.to_le_bytes());
    meta.extend([1, FieldKind::Density.tag()]);

    fs::create_dir(dir).unwrap();
    fs::write(dir.join("_meta"), meta).unwrap();
}

#[test]
fn test_huge_frame_count_is_an_error() {
    let dir = scratch_dir("frames");
    write_meta(&dir, 4, u64::MAX);

    let err = FluidDataDecoder::new(dir.clone()).decode_all().unwrap_err();
    assert!(matches!(err, DecodingError::Io(_)));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_oversized_resolution_is_an_error() {
    let dir = scratch_dir("resolution");
    write_meta(&dir, u32::MAX, 1);

    let err = FluidDataDecoder::new(dir.clone()).decode_metadata().unwrap_err();
    assert!(matches!(err, DecodingError::SectionTooLarge(_)));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_short_section_is_an_error() {
    let dir = scratch_dir("short");
    write_meta(&dir, 4, 1);

    let mut frame = 36u64.to_le_bytes().to_vec();
    frame.extend([0; 4 * 10]);
    fs::write(dir.join("0.dat"), frame).unwrap();

    let mut decoder = FluidDataDecoder::new(dir.clone());
    decoder.decode_metadata().unwrap();
    assert!(matches!(decoder.decode_frame(), Err(DecodingError::Io(_))));

    fs::remove_dir_all(&dir).unwrap();
}
