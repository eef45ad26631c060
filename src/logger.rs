use std::io::Write;

use chrono::Local;
use log::Level;

pub fn configure_logger(base_level: Level) -> () {
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(buf,
                "{} {} [{}] {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.target(),
                record.level(),
                record.args(),
            )
        })
        .filter_level(base_level.to_level_filter())
        .filter_module("actix_server", log::LevelFilter::Warn)
        .filter_module("tokio_postgres", log::LevelFilter::Info)
        .init();
}
