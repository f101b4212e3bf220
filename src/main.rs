//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves the demo page from `static/`.
//!
//! `PORT` selects the port (default 8000), `RUST_LOG` the log filter.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::process::{Command, Stdio};
    use std::{env, thread, time::Duration};

    let mut logger = env_logger::Builder::new();
    match env::var("RUST_LOG") {
        Ok(filter) => logger.parse_filters(&filter),
        Err(_) => logger.filter_level(log::LevelFilter::Info),
    };
    logger.init();

    log::info!("building WASM package …");
    match Command::new("wasm-pack")
        .args([
            "build",
            "--release",
            "--target",
            "web",
            "--out-dir",
            "static/pkg",
        ])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            log::error!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH. Skipping wasm build; the page may load a stale package.");
        }
    }

    let port = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    log::info!("serving static/ at http://127.0.0.1:{}/", port);
    let server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(err) => {
            log::error!("failed to start http server: {}", err);
            std::process::exit(1);
        }
    };

    loop {
        match server.try_wait() {
            Ok(Some(status)) => {
                log::warn!("http server exited with {}", status);
                return;
            }
            Ok(None) => thread::sleep(Duration::from_secs(1)),
            Err(err) => {
                log::error!("lost track of http server: {}", err);
                return;
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
