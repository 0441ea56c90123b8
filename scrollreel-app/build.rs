// Embed the Windows executable icon when building on Windows.
// Place icon.ico next to this crate's Cargo.toml; without it the build skips
// the resource step.

fn main() {
    println!("cargo:rerun-if-changed=icon.ico");
    #[cfg(target_os = "windows")]
    {
        let icon_path = std::path::Path::new("icon.ico");
        if let Some(icon) = icon_path.to_str().filter(|_| icon_path.exists()) {
            let mut res = winres::WindowsResource::new();
            res.set_icon(icon);
            res.set("ProductName", "ScrollReel");
            if let Err(e) = res.compile() {
                panic!("Failed to embed icon from icon.ico: {e}. A resource compiler (rc.exe) must be on PATH.");
            }
        }
    }
}
