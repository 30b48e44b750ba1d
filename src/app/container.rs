use std::sync::Arc;

use crate::adapters::{FfmpegAdapter, FfprobeAdapter, Utf8Environment};
use crate::app::{merge_interactor::MergeInteractor, split_interactor::SplitInteractor};
use crate::config_initialization::Settings;
use crate::ports::{ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn split_interactor(&self) -> Arc<SplitInteractor>;
    fn merge_interactor(&self) -> Arc<MergeInteractor>;
}

pub struct DefaultAppContainer {
    split_interactor: Arc<SplitInteractor>,
    merge_interactor: Arc<MergeInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffmpeg/ffprobe adapters; tools are located on first use
    pub fn new(settings: &Settings, env: Utf8Environment) -> Self {
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FfprobeAdapter::new(settings.ffprobe.clone(), env.clone()));
        let execute_port: Arc<dyn ExecutePort> =
            Arc::new(FfmpegAdapter::new(settings.ffmpeg.clone(), env));

        Self::with_ports(probe_port, execute_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(probe_port: Arc<dyn ProbePort>, execute_port: Arc<dyn ExecutePort>) -> Self {
        let split_interactor = Arc::new(SplitInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
        ));
        let merge_interactor = Arc::new(MergeInteractor::new(probe_port, execute_port));

        Self {
            split_interactor,
            merge_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn split_interactor(&self) -> Arc<SplitInteractor> {
        Arc::clone(&self.split_interactor)
    }

    fn merge_interactor(&self) -> Arc<MergeInteractor> {
        Arc::clone(&self.merge_interactor)
    }
}
