pub mod completions;
pub mod config;
pub mod discover;
pub mod man_pages;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_ENTRY_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn yaml(value: &impl serde::Serialize) -> Result<String, String> {
    serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
}

pub fn status_ok(msg: &str) -> String {
    use console::Style;
    format!("{} {msg}", Style::new().green().apply_to("✓"))
}

pub fn status_fail(msg: &str) -> String {
    use console::Style;
    format!("{} {msg}", Style::new().red().bold().apply_to("✗"))
}
