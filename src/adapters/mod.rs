// Adapters - External system implementations

pub mod env_locale;
pub mod exec_ffmpeg;
pub mod probe_ffprobe;
pub mod tool;
pub mod toml_config;

// Re-export adapters
pub use env_locale::Utf8Environment;
pub use exec_ffmpeg::FfmpegAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use toml_config::SplicerConfig;
