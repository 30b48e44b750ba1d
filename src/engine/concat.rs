//! Concatenation commands

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::model::{MergeMode, MergePlan, StreamProfile};
use crate::engine::{EncodeSettings, FfmpegCommand, Invocation};
use crate::error::SplicerResult;
use crate::utils::path::{absolutize, concat_file_directive};

const FALLBACK_FRAME_RATE: &str = "30";
const FALLBACK_SAMPLE_RATE: u32 = 48_000;
const FALLBACK_CHANNEL_LAYOUT: &str = "stereo";

/// Concat demuxer list: one `file '<absolute path>'` line per input
pub fn render_concat_list(inputs: &[PathBuf]) -> SplicerResult<String> {
    let mut list = String::new();
    for input in inputs {
        let line = concat_file_directive(&absolutize(input)?)?;
        list.push_str(&line);
        list.push('\n');
    }
    Ok(list)
}

/// Build the single merge call for `plan`.
///
/// Copy mode writes the list file next to the output; it lives as long as
/// the returned invocation.
pub fn synthesize_merge(plan: &MergePlan, encode: &EncodeSettings) -> SplicerResult<Invocation> {
    let output = absolutize(&plan.output_path)?;
    let inputs: Vec<PathBuf> = plan
        .ordered_inputs
        .iter()
        .map(|input| absolutize(&input.path))
        .collect::<SplicerResult<_>>()?;

    match plan.mode {
        MergeMode::Copy => synthesize_copy(&inputs, output),
        MergeMode::Reencode => {
            let with_audio = plan
                .ordered_inputs
                .iter()
                .all(|input| input.profile.has_audio());
            if !with_audio {
                tracing::warn!("Not every input carries audio; the merged file will be video-only");
            }
            Ok(synthesize_reencode(
                &inputs,
                output,
                plan.reference_profile(),
                with_audio,
                encode,
            ))
        }
    }
}

fn synthesize_copy(inputs: &[PathBuf], output: PathBuf) -> SplicerResult<Invocation> {
    let list_dir = output.parent().unwrap_or_else(|| Path::new("."));
    let mut list_file = tempfile::Builder::new()
        .prefix(".splicer-concat-")
        .suffix(".txt")
        .tempfile_in(list_dir)?;

    list_file.write_all(render_concat_list(inputs)?.as_bytes())?;
    list_file.flush()?;
    let list_path = list_file.into_temp_path();

    tracing::debug!(list = %list_path.display(), inputs = inputs.len(), "Wrote concat list");

    let args = FfmpegCommand::new(&output)
        .input_arg("-f")
        .input_arg("concat")
        .input_arg("-safe")
        .input_arg("0")
        .input(&list_path)
        .output_args(["-c", "copy"])
        .build_args();

    Ok(Invocation {
        args,
        output,
        list_file: Some(list_path),
    })
}

fn synthesize_reencode(
    inputs: &[PathBuf],
    output: PathBuf,
    reference: &StreamProfile,
    with_audio: bool,
    encode: &EncodeSettings,
) -> Invocation {
    let graph = build_concat_filter(inputs.len(), reference, with_audio);

    let mut command = FfmpegCommand::new(&output);
    for input in inputs {
        command = command.input(input);
    }
    command = command.filter_complex(graph).map("[v]");

    command = command.video_codec(encode.video_codec.as_str());
    if EncodeSettings::accepts_quality_options(&encode.video_codec) {
        command = command.crf(encode.crf).preset(encode.preset.as_str());
    }

    if with_audio {
        command = command.map("[a]").audio_codec(encode.audio_codec.as_str());
    }

    if supports_faststart(&output) {
        command = command.output_args(["-movflags", "+faststart"]);
    }

    Invocation {
        args: command.build_args(),
        output,
        list_file: None,
    }
}

/// `+faststart` only applies to the MP4 family of muxers
fn supports_faststart(output: &Path) -> bool {
    output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "mp4" | "mov" | "m4v"))
        .unwrap_or(false)
}

/// Filter graph normalising every input to the reference profile, then concatenating
pub fn build_concat_filter(count: usize, reference: &StreamProfile, with_audio: bool) -> String {
    let (width, height) = (reference.width, reference.height);
    let fps = reference
        .frame_rate
        .map(|rate| rate.to_string())
        .unwrap_or_else(|| FALLBACK_FRAME_RATE.to_string());
    let sample_rate = reference.sample_rate.unwrap_or(FALLBACK_SAMPLE_RATE);
    let layout = reference
        .channel_layout
        .as_deref()
        .unwrap_or(FALLBACK_CHANNEL_LAYOUT);

    let mut chains = Vec::with_capacity(count * 2 + 1);
    let mut pads = String::new();

    for i in 0..count {
        chains.push(format!(
            "[{i}:v:0]scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps},format=yuv420p[v{i}]"
        ));
        pads.push_str(&format!("[v{i}]"));

        if with_audio {
            chains.push(format!(
                "[{i}:a:0]aresample={sample_rate},aformat=sample_fmts=fltp:channel_layouts={layout}[a{i}]"
            ));
            pads.push_str(&format!("[a{i}]"));
        }
    }

    let audio_streams = u8::from(with_audio);
    let outputs = if with_audio { "[v][a]" } else { "[v]" };
    chains.push(format!(
        "{pads}concat=n={count}:v=1:a={audio_streams}{outputs}"
    ));

    chains.join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{FrameRate, MediaProbe};

    fn profile() -> StreamProfile {
        StreamProfile {
            codec_name: "h264".to_string(),
            width: 1280,
            height: 720,
            frame_rate: FrameRate::new(25, 1),
            audio_codec: Some("aac".to_string()),
            sample_rate: Some(44_100),
            channel_layout: Some("stereo".to_string()),
        }
    }

    fn probe(path: &Path) -> MediaProbe {
        MediaProbe {
            path: path.to_path_buf(),
            duration: Some(5.0),
            format_name: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
            profile: profile(),
        }
    }

    #[test]
    fn test_concat_list_lines() {
        let list = render_concat_list(&[
            PathBuf::from("/clips/clip-0.mp4"),
            PathBuf::from("/clips/it's.mp4"),
        ])
        .unwrap();
        assert_eq!(
            list,
            "file '/clips/clip-0.mp4'\nfile '/clips/it'\\''s.mp4'\n"
        );
    }

    #[test]
    fn test_copy_merge_writes_list_next_to_output() {
        let temp = tempfile::TempDir::new().unwrap();
        let a = temp.path().join("clip-0.mp4");
        let b = temp.path().join("clip-1.mp4");
        let plan = MergePlan::new(
            vec![probe(&a), probe(&b)],
            temp.path().join("output.mp4"),
            MergeMode::Copy,
        )
        .unwrap();

        let invocation = synthesize_merge(&plan, &EncodeSettings::default()).unwrap();
        let list_path = invocation.list_file.as_ref().unwrap().to_path_buf();

        assert_eq!(list_path.parent(), Some(temp.path()));
        let content = std::fs::read_to_string(&list_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with(&format!("file '{}'", a.display())));

        assert!(invocation.has_option("-f", "concat"));
        assert!(invocation.has_option("-safe", "0"));
        assert!(invocation.has_option("-c", "copy"));
        assert!(invocation.position_of("-f").unwrap() < invocation.position_of("-i").unwrap());

        drop(invocation);
        assert!(!list_path.exists());
    }

    #[test]
    fn test_reencode_merge_maps_filter_outputs() {
        let plan = MergePlan::new(
            vec![probe(Path::new("/c/a.mp4")), probe(Path::new("/c/b.mp4"))],
            PathBuf::from("/c/output.mp4"),
            MergeMode::Reencode,
        )
        .unwrap();

        let invocation = synthesize_merge(&plan, &EncodeSettings::default()).unwrap();
        assert!(invocation.list_file.is_none());
        assert!(invocation.has_option("-map", "[v]"));
        assert!(invocation.has_option("-map", "[a]"));
        assert!(invocation.has_option("-c:v", "libx264"));
        assert_eq!(
            invocation.args.iter().filter(|arg| *arg == "-i").count(),
            2
        );
    }

    #[test]
    fn test_faststart_only_for_mp4_family() {
        assert!(supports_faststart(Path::new("/c/output.mp4")));
        assert!(supports_faststart(Path::new("/c/output.MOV")));
        assert!(!supports_faststart(Path::new("/c/joined.mkv")));
        assert!(!supports_faststart(Path::new("/c/joined")));
    }

    #[test]
    fn test_filter_graph_with_audio() {
        let graph = build_concat_filter(2, &profile(), true);
        assert!(graph.contains("[0:v:0]scale=1280:720"));
        assert!(graph.contains("fps=25/1"));
        assert!(graph.contains("[1:a:0]aresample=44100"));
        assert!(graph.ends_with("[v0][a0][v1][a1]concat=n=2:v=1:a=1[v][a]"));
    }

    #[test]
    fn test_filter_graph_video_only() {
        let graph = build_concat_filter(3, &profile(), false);
        assert!(!graph.contains("aresample"));
        assert!(graph.ends_with("[v0][v1][v2]concat=n=3:v=1:a=0[v]"));
    }

    #[test]
    fn test_missing_audio_drops_audio_map() {
        let mut silent = probe(Path::new("/c/b.mp4"));
        silent.profile.audio_codec = None;
        let plan = MergePlan::new(
            vec![probe(Path::new("/c/a.mp4")), silent],
            PathBuf::from("/c/output.mp4"),
            MergeMode::Reencode,
        )
        .unwrap();

        let invocation = synthesize_merge(&plan, &EncodeSettings::default()).unwrap();
        assert!(!invocation.has_option("-map", "[a]"));
        assert!(invocation.position_of("-c:a").is_none());
    }
}
