use crate::config::Setting;
use std::io::Write;

pub fn init(setting: &Setting) {
    let mut level = log::LevelFilter::Info;

    if setting.verbose {
        level = log::LevelFilter::Debug;
    }

    let result = env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "[{:<5}] {}", record.level(), record.args()))
        .filter_module("hostrules", level)
        .try_init();

    // an earlier logger stays in charge
    if let Err(e) = result {
        log::warn!("logger already initialized: {}", e);
    }
}
