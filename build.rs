// Build script to set stack size on Windows
// Tree building recurses once per directory level; 1 MB is tight on deep trees

fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = std::env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();

    if target_os != "windows" {
        return;
    }

    // 8 MB for the binary and the test harnesses
    let arg = match target_env.as_str() {
        "msvc" => "/STACK:8388608",
        "gnu" => "-Wl,--stack,8388608",
        _ => return,
    };
    println!("cargo:rustc-link-arg-bins={}", arg);
    println!("cargo:rustc-link-arg-tests={}", arg);
}
