const ATTENTION_MARKER: &str = "✨";

pub fn manifest_preview(manifest: &str) -> String {
    format!("{ATTENTION_MARKER} Attempting to apply the following manifest: {manifest}")
}

pub fn print_manifest_preview(manifest: &str) {
    println!("{}", manifest_preview(manifest));
}
