#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    // Assicurati che res/rworklog.ico esista
    let mut res = WindowsResource::new();
    res.set_icon("res/rworklog.ico")
        .set("FileDescription", "rWorklog CLI")
        .set("ProductName", "rWorklog")
        .set("OriginalFilename", "rworklog.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"))
        .compile()
        .expect("Failed to embed icon resource");
}

#[cfg(not(target_os = "windows"))]
fn main() {}
