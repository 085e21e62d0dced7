//! End-to-end tests: OBJ file to submitted eye textures on the simulated headset.

use std::path::PathBuf;

use proptest::prelude::*;
use vrtrace::*;
use vrtrace_core::Quat;

const CUBE_OBJ: &str = "\
o cube
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 4 8 7 3
f 1 5 8 4
f 2 3 7 6
";

fn write_obj(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("vrtrace_it_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn small_headset() -> HeadsetConfig {
    HeadsetConfig {
        render_size: UVec2::new(32, 24),
        ..HeadsetConfig::default()
    }
}

fn background() -> Rgba8 {
    Rgba8::from_linear(Vec3::splat(0.05))
}

#[test]
fn stereo_baseline_with_symmetric_frustums() {
    let frustums = [
        EyeFrustum::new(-1.0, 1.0, 1.0, -1.0, Vec3::new(-0.0318, 0.0, 0.0)),
        EyeFrustum::new(-1.0, 1.0, 1.0, -1.0, Vec3::new(0.0318, 0.0, 0.0)),
    ];
    let options = Options {
        vertical_convention: VerticalConvention::Standard,
        ..Options::default()
    };
    let rig = StereoRig::new(&options, &frustums, 1.0, &CameraRegistry::with_builtin()).unwrap();
    let left = rig.eye_basis(Eye::Left, &Pose::IDENTITY).unwrap();
    let right = rig.eye_basis(Eye::Right, &Pose::IDENTITY).unwrap();

    assert!((right.origin - left.origin - Vec3::new(0.0636, 0.0, 0.0)).length() < 1e-6);
    assert_eq!(left.dir00, right.dir00);
    assert_eq!(left.du, right.du);
    assert_eq!(left.dv, right.dv);
    assert!((left.dir00 - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-6);
    assert!((left.du - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    assert!((left.dv - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
}

#[test]
fn orbiting_head_keeps_cube_in_view() {
    let path = write_obj("cube.obj", CUBE_OBJ);
    let mesh = load_mesh(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(mesh.triangle_count(), 12);

    let display = SimulatedHmd::new(HeadsetConfig {
        motion: HeadMotion::Orbit {
            radius: 3.0,
            period_seconds: 0.1,
        },
        quit_after_frames: Some(6),
        ..small_headset()
    })
    .unwrap();
    let mut session = Session::new(&Options::default(), display, &mesh).unwrap();
    let summary = session.run().unwrap();

    assert_eq!(summary.frames, 6);
    assert!(summary.quit_requested);
    assert_eq!(summary.timing.total_frames, 6);

    assert_eq!(session.display().submitted(), 12);
    let submissions: Vec<_> = session.display().submissions().iter().copied().collect();
    assert_eq!(submissions.len(), 12);
    for (i, pair) in submissions.chunks(2).enumerate() {
        assert_eq!(pair[0].eye, Eye::Left);
        assert_eq!(pair[1].eye, Eye::Right);
        assert_eq!(pair[0].pose_index, i as u64 + 1);
        assert_eq!(pair[0].texture_frame, pair[1].texture_frame);
    }

    // The cube sits at the orbit center, straight ahead of each eye.
    let target = session.driver().target();
    let size = target.eye_size();
    for eye in Eye::BOTH {
        let pixels = target.resolve_target(eye).pixels();
        assert_eq!(pixels.size(), size);
        assert_ne!(pixels.get(size.x / 2, size.y / 2), Some(background()));
        assert_eq!(pixels.get(0, 0), Some(background()));
    }
}

#[test]
fn mono_mode_shows_both_eyes_the_same_image() {
    let path = write_obj("mono_cube.obj", CUBE_OBJ);
    let mesh = load_mesh(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let display = SimulatedHmd::new(HeadsetConfig {
        start_position: Vec3::new(0.2, 0.1, 3.0),
        ..small_headset()
    })
    .unwrap();
    let options = Options {
        camera_mode: CameraMode::Mono,
        max_frames: Some(1),
        ..Options::default()
    };
    let mut session = Session::new(&options, display, &mesh).unwrap();
    session.run().unwrap();

    let target = session.driver().target();
    assert_eq!(
        target.resolve_target(Eye::Left).pixels(),
        target.resolve_target(Eye::Right).pixels()
    );
}

#[test]
fn stereo_eyes_see_different_images_of_a_near_object() {
    let path = write_obj("near_cube.obj", CUBE_OBJ);
    let mesh = load_mesh(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let display = SimulatedHmd::new(HeadsetConfig {
        start_position: Vec3::new(0.0, 0.0, 1.2),
        interpupillary_distance: 0.2,
        ..small_headset()
    })
    .unwrap();
    let options = Options {
        max_frames: Some(1),
        ..Options::default()
    };
    let mut session = Session::new(&options, display, &mesh).unwrap();
    session.run().unwrap();

    let target = session.driver().target();
    assert_ne!(
        target.resolve_target(Eye::Left).pixels(),
        target.resolve_target(Eye::Right).pixels()
    );
}

#[test]
fn setup_fails_without_tracking() {
    let mut display = SimulatedHmd::new(small_headset()).unwrap();
    display.set_tracking(false);
    let result = Session::new(&Options::default(), display, &TriangleMesh::default());
    assert!(matches!(result, Err(VrTraceError::Display(_))));
}

#[test]
fn setup_fails_on_bad_options() {
    let display = SimulatedHmd::new(small_headset()).unwrap();
    let options = Options {
        render_scale: 0.0,
        ..Options::default()
    };
    let result = Session::new(&options, display, &TriangleMesh::default());
    assert!(matches!(
        result,
        Err(VrTraceError::InvalidOption {
            name: "render_scale",
            ..
        })
    ));
}

#[test]
fn missing_mesh_is_a_load_error() {
    let err = load_mesh(std::env::temp_dir().join("vrtrace_it_does_not_exist.obj")).unwrap_err();
    assert!(matches!(err, VrTraceError::MeshLoad { .. }));
}

#[test]
fn config_file_drives_the_run() {
    let config_path = write_obj(
        "config.json",
        r#"{
            "options": { "camera_mode": "stereo-fixed", "max_frames": 2 },
            "headset": { "render_size": [16, 16], "motion": { "type": "sway", "amplitude_degrees": 10.0, "period_seconds": 1.0 } }
        }"#,
    );
    let config = Config::load(&config_path).unwrap();
    std::fs::remove_file(&config_path).unwrap();
    config.validate().unwrap();

    let display = SimulatedHmd::new(config.headset.clone()).unwrap();
    let mut session = Session::new(&config.options, display, &TriangleMesh::default()).unwrap();
    assert_eq!(session.driver().rig().mode(), CameraMode::StereoFixed);
    let summary = session.run().unwrap();
    assert_eq!(summary.frames, 2);
    assert!(!summary.quit_requested);
    assert_eq!(session.driver().eye_size(), UVec2::new(11, 11));
}

fn head_pose() -> impl Strategy<Value = Pose> {
    (
        -3.0f32..3.0,
        -1.5f32..1.5,
        (-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0),
    )
        .prop_map(|(yaw, pitch, (x, y, z))| {
            let rotation = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch);
            Pose::from_rotation_translation(rotation, Vec3::new(x, y, z))
        })
}

proptest! {
    #[test]
    fn prop_eye_baseline_follows_head_rotation(head in head_pose()) {
        let display = SimulatedHmd::new(small_headset()).unwrap();
        let sampler = PoseSampler::new(&display).unwrap();
        let rig = StereoRig::new(
            &Options::default(),
            sampler.frustums(),
            1.0,
            &CameraRegistry::with_builtin(),
        )
        .unwrap();
        let left = rig.eye_basis(Eye::Left, &head).unwrap();
        let right = rig.eye_basis(Eye::Right, &head).unwrap();

        let baseline = head.transform_vector(Vec3::new(0.0636, 0.0, 0.0));
        prop_assert!((right.origin - left.origin - baseline).length() < 1e-4);
        // Mirrored optics have equal widths and heights.
        prop_assert!((left.du - right.du).length() < 1e-4);
        prop_assert!((left.dv - right.dv).length() < 1e-4);
    }

    #[test]
    fn prop_centered_eye_looks_along_head_forward(head in head_pose()) {
        let frustums = [EyeFrustum::new(-1.0, 1.0, 1.0, -1.0, Vec3::ZERO); 2];
        let options = Options {
            vertical_convention: VerticalConvention::Standard,
            ..Options::default()
        };
        let rig = StereoRig::new(&options, &frustums, 1.0, &CameraRegistry::with_builtin()).unwrap();
        let basis = rig.eye_basis(Eye::Left, &head).unwrap();
        let center = basis.ray_direction(0.5, 0.5).normalize();
        prop_assert!((center - head.forward()).length() < 1e-4);
        prop_assert!((basis.origin - head.translation).length() < 1e-5);
    }
}
