//! LaunchAgent descriptor construction and plist rendering.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pixdex_config::ServiceConfig;

use crate::paths::ResolvedPaths;

/// Declarative LaunchAgent definition for the indexer worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub label: String,
    pub program_path: PathBuf,
    pub program_args: Vec<String>,
    /// Ordered so the rendered plist is byte-stable.
    pub environment: BTreeMap<String, String>,
    pub run_at_load: bool,
    pub keep_alive: bool,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub process_type: String,
    pub throttle_interval: u32,
}

/// Build the descriptor for the resolved bundle paths.
pub fn build(paths: &ResolvedPaths, config: &ServiceConfig) -> ServiceDescriptor {
    let mut environment = BTreeMap::new();
    environment.insert(
        config.bin_dir_env.clone(),
        paths.bin_dir.to_string_lossy().into_owned(),
    );

    ServiceDescriptor {
        label: config.label.clone(),
        program_path: paths.executable.clone(),
        program_args: vec![paths.worker_entry.to_string_lossy().into_owned()],
        environment,
        run_at_load: true,
        keep_alive: true,
        stdout_path: paths.stdout_log.clone(),
        stderr_path: paths.stderr_log.clone(),
        process_type: config.process_type.clone(),
        throttle_interval: config.throttle_interval,
    }
}

impl ServiceDescriptor {
    /// Render the plist XML content.
    pub fn to_plist(&self) -> String {
        let program = escape_xml(&self.program_path.to_string_lossy());

        let mut plist = String::new();
        plist.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        plist.push_str("<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n");
        plist.push_str("<plist version=\"1.0\">\n");
        plist.push_str("<dict>\n");

        plist.push_str("    <key>Label</key>\n");
        plist.push_str(&format!("    <string>{}</string>\n", escape_xml(&self.label)));

        plist.push_str("    <key>Program</key>\n");
        plist.push_str(&format!("    <string>{}</string>\n", program));

        // argv[0] is the program itself.
        plist.push_str("    <key>ProgramArguments</key>\n");
        plist.push_str("    <array>\n");
        plist.push_str(&format!("        <string>{}</string>\n", program));
        for arg in &self.program_args {
            plist.push_str(&format!("        <string>{}</string>\n", escape_xml(arg)));
        }
        plist.push_str("    </array>\n");

        if !self.environment.is_empty() {
            plist.push_str("    <key>EnvironmentVariables</key>\n");
            plist.push_str("    <dict>\n");
            for (key, value) in &self.environment {
                plist.push_str(&format!("        <key>{}</key>\n", escape_xml(key)));
                plist.push_str(&format!("        <string>{}</string>\n", escape_xml(value)));
            }
            plist.push_str("    </dict>\n");
        }

        plist.push_str("    <key>RunAtLoad</key>\n");
        plist.push_str(&format!("    <{}/>\n", self.run_at_load));

        plist.push_str("    <key>KeepAlive</key>\n");
        plist.push_str(&format!("    <{}/>\n", self.keep_alive));

        plist.push_str("    <key>StandardOutPath</key>\n");
        plist.push_str(&format!(
            "    <string>{}</string>\n",
            escape_xml(&self.stdout_path.to_string_lossy())
        ));

        plist.push_str("    <key>StandardErrorPath</key>\n");
        plist.push_str(&format!(
            "    <string>{}</string>\n",
            escape_xml(&self.stderr_path.to_string_lossy())
        ));

        plist.push_str("    <key>ThrottleInterval</key>\n");
        plist.push_str(&format!("    <integer>{}</integer>\n", self.throttle_interval));

        plist.push_str("    <key>ProcessType</key>\n");
        plist.push_str(&format!("    <string>{}</string>\n", escape_xml(&self.process_type)));

        plist.push_str("</dict>\n");
        plist.push_str("</plist>\n");

        plist
    }
}

/// Escape special characters for XML.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
