// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use docpack::{app, config, utils};

fn main() -> eframe::Result<()> {
    if let Err(err) = utils::logging::init_logging() {
        utils::logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {err:#}");
    }

    let config = config::load_or_init().unwrap_or_else(|err| {
        tracing::error!("{err:#}; falling back to default configuration");
        config::DocPackConfig::default()
    });

    app::run(config)
}
