//! Camera stream launcher
//!
//! Starts `mjpg_streamer` with a UVC input and the HTTP output plugin once
//! the mirrors are home. The process is left running when the rig exits.

use std::io;
use std::process::{Command, Stdio};

use serde::Deserialize;

/// `[stream]` section of machine.toml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Launch the stream after homing
    pub enabled: bool,
    /// Streamer executable
    pub command: String,
    /// UVC input plugin
    pub input_plugin: String,
    /// Video device
    pub device: String,
    /// Capture resolution, `WIDTHxHEIGHT`
    pub resolution: String,
    /// Capture frame rate
    pub fps: u32,
    /// HTTP output plugin
    pub output_plugin: String,
    /// Web root served by the output plugin
    pub www_dir: String,
    /// HTTP port served by the output plugin
    pub port: u16,
    /// Host name advertised in the stream URL
    pub host: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "mjpg_streamer".into(),
            input_plugin: "/usr/local/lib/mjpg-streamer/input_uvc.so".into(),
            device: "/dev/video0".into(),
            resolution: "1280x720".into(),
            fps: 60,
            output_plugin: "/usr/local/lib/mjpg-streamer/output_http.so".into(),
            www_dir: "/usr/local/share/mjpg-streamer/www".into(),
            port: 8080,
            host: "miror.local".into(),
        }
    }
}

impl StreamConfig {
    /// Argument passed to `-i`
    pub fn input_arg(&self) -> String {
        format!(
            "{} -d {} -r {} -f {}",
            self.input_plugin, self.device, self.resolution, self.fps
        )
    }

    /// Argument passed to `-o`
    pub fn output_arg(&self) -> String {
        format!("{} -w {} -p {}", self.output_plugin, self.www_dir, self.port)
    }

    /// Build the streamer invocation
    ///
    /// Plugin arguments are passed as single arguments, so no shell is
    /// involved in quoting them.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-i")
            .arg(self.input_arg())
            .arg("-o")
            .arg(self.output_arg())
            .stdin(Stdio::null());
        cmd
    }

    /// URL the stream is served on
    pub fn url(&self) -> String {
        format!("http://{}:{}/?action=stream", self.host, self.port)
    }

    /// Spawn the streamer without waiting for it
    ///
    /// Returns the process id.
    pub fn launch(&self) -> io::Result<u32> {
        let child = self.command().spawn()?;
        Ok(child.id())
    }
}
