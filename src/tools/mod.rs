mod ffprobe_info;
mod file_attributes;
mod frames_path;
mod path_validator;
mod process_runner;
mod timestamp_selector;

pub use ffprobe_info::{ProbeError, probe_duration};
pub use file_attributes::set_attributes;
pub use frames_path::{FramesDirectory, frames_directory_name};
pub use path_validator::{ensure_directory_exists, is_plain_relative, validate_directory_exists};
pub use process_runner::{ProcessError, run_cancellable};
pub use timestamp_selector::select_timestamps;
