#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    if let Err(err) = pspace_ui::run() {
        eprintln!("Parallel Spaces failed: {err}");
        std::process::exit(1);
    }
}
