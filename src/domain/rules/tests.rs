// Unit tests for business rules

use super::*;
use std::path::PathBuf;

fn profile() -> StreamProfile {
    StreamProfile {
        codec_name: "h264".to_string(),
        width: 1920,
        height: 1080,
        frame_rate: FrameRate::new(30, 1),
        audio_codec: Some("aac".to_string()),
        sample_rate: Some(48000),
        channel_layout: Some("stereo".to_string()),
    }
}

fn probe(name: &str, profile: StreamProfile) -> MediaProbe {
    MediaProbe {
        path: PathBuf::from(format!("/clips/{}", name)),
        duration: Some(10.0),
        format_name: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
        profile,
    }
}

#[test]
fn test_identical_profiles_are_compatible() {
    assert!(CompatibilityChecker::are_compatible(&profile(), &profile()));
}

#[test]
fn test_compatibility_is_symmetric() {
    let a = profile();
    let mut b = profile();
    b.width = 1280;
    b.height = 720;

    assert_eq!(
        CompatibilityChecker::are_compatible(&a, &b),
        CompatibilityChecker::are_compatible(&b, &a)
    );
    assert!(!CompatibilityChecker::are_compatible(&a, &b));
}

#[test]
fn test_compatibility_is_transitive() {
    let inputs = vec![
        probe("a.mp4", profile()),
        probe("b.mp4", profile()),
        probe("c.mp4", profile()),
    ];
    assert!(CompatibilityChecker::are_compatible(&inputs[0].profile, &inputs[1].profile));
    assert!(CompatibilityChecker::are_compatible(&inputs[1].profile, &inputs[2].profile));
    assert!(CompatibilityChecker::are_compatible(&inputs[0].profile, &inputs[2].profile));

    let report = CompatibilityChecker::check(&inputs);
    assert_eq!(report.mode, MergeMode::Copy);
    assert!(report.mismatches.is_empty());
}

#[test]
fn test_equivalent_frame_rates_match() {
    let a = profile();
    let mut b = profile();
    b.frame_rate = FrameRate::parse("60/2");
    assert!(CompatibilityChecker::are_compatible(&a, &b));
}

#[test]
fn test_each_field_is_reported() {
    let a = profile();
    let b = StreamProfile {
        codec_name: "hevc".to_string(),
        width: 1280,
        height: 720,
        frame_rate: FrameRate::parse("30000/1001"),
        audio_codec: Some("opus".to_string()),
        sample_rate: Some(44100),
        channel_layout: Some("mono".to_string()),
    };

    let fields: Vec<ProfileField> = CompatibilityChecker::differences(&a, &b)
        .into_iter()
        .map(|(field, _, _)| field)
        .collect();

    assert_eq!(
        fields,
        vec![
            ProfileField::Codec,
            ProfileField::Resolution,
            ProfileField::FrameRate,
            ProfileField::AudioCodec,
            ProfileField::SampleRate,
            ProfileField::ChannelLayout,
        ]
    );
}

#[test]
fn test_check_records_diverging_input() {
    let mut odd = profile();
    odd.sample_rate = Some(44100);
    let inputs = vec![
        probe("clip-0.mp4", profile()),
        probe("clip-1.mp4", profile()),
        probe("clip-2.mp4", odd),
    ];

    let report = CompatibilityChecker::check(&inputs);
    assert_eq!(report.mode, MergeMode::Reencode);
    assert_eq!(report.diverging_fields(), vec![ProfileField::SampleRate]);
    assert_eq!(report.mismatches[0].candidate, PathBuf::from("/clips/clip-2.mp4"));
    assert!(report.describe().contains("48000 vs 44100"));
}

#[test]
fn test_check_is_idempotent() {
    let mut odd = profile();
    odd.codec_name = "vp9".to_string();
    let inputs = vec![probe("a.mkv", profile()), probe("b.mkv", odd)];

    assert_eq!(
        CompatibilityChecker::check(&inputs),
        CompatibilityChecker::check(&inputs)
    );
}

#[test]
fn test_missing_audio_is_a_mismatch() {
    let a = profile();
    let mut b = profile();
    b.audio_codec = None;
    b.sample_rate = None;
    b.channel_layout = None;

    let diffs = CompatibilityChecker::differences(&a, &b);
    assert_eq!(diffs.len(), 3);
    assert_eq!(diffs[0].2, "none");
}

#[test]
fn test_single_input_is_copy() {
    let report = CompatibilityChecker::check(&[probe("only.mp4", profile())]);
    assert_eq!(report.mode, MergeMode::Copy);
}

#[test]
fn test_copy_support() {
    assert!(CopySupport::codec_supports_copy("h264"));
    assert!(!CopySupport::codec_supports_copy("rawvideo"));
    assert!(CopySupport::container_supports_copy("mov,mp4,m4a,3gp,3g2,mj2"));
    assert!(CopySupport::container_supports_copy("matroska,webm"));
    assert!(!CopySupport::container_supports_copy("image2"));

    assert!(CopySupport::allows_copy(&probe("a.mp4", profile())));
}
