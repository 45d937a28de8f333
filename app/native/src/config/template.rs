//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// This creates a JSONC file documenting every available option together
/// with its default value.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Frostpane Configuration File
// ============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // Global animation-speed factor applied to every effect duration.
  // 1.0 is normal speed, 0.5 is twice as fast, 0 disables transitions.
  // "animationSpeed": 1.0,

  // ============================================================================
  // Frozen App Effect
  // ============================================================================
  // Desaturates and brightens windows that stop responding to input.
  // "frozenApp": {
  //   // Enable or disable the effect
  //   "enabled": true,
  //
  //   // Time to fade into the frozen look, in milliseconds
  //   "fadeInMs": 1500,
  //
  //   // Time to fade back to normal, in milliseconds
  //   "fadeOutMs": 250,
  //
  //   // Saturation of a frozen window (0.0 = grayscale, 1.0 = unchanged)
  //   "saturation": 0.1,
  //
  //   // Brightness multiplier of a frozen window (1.0 = unchanged)
  //   "brightness": 1.5
  // }
}
"#
    .to_string()
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrostpaneConfig, parse_config};

    #[test]
    fn test_generate_config_template_is_valid_jsonc() {
        let template = generate_config_template();
        assert!(template.contains('{'));
        assert!(template.contains('}'));
        assert!(template.contains("//"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config = parse_config(&generate_config_template()).unwrap();
        assert_eq!(config, FrostpaneConfig::default());
    }

    #[test]
    fn test_template_documents_all_options() {
        let template = generate_config_template();
        for key in ["animationSpeed", "frozenApp", "fadeInMs", "fadeOutMs", "saturation", "brightness"]
        {
            assert!(template.contains(key), "template is missing '{key}'");
        }
    }

    #[test]
    fn test_create_config_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.jsonc");

        create_config_file(&path).unwrap();

        assert!(path.exists());
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_config_template());
    }
}
