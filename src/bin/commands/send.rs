use ampir::{
    config::Config,
    dispatch::{dispatch, Action},
    encode::Timing,
    line::{Constant, Recorder},
    remote::Remote,
    volume::{FileStore, ReadOnly, Volume},
};
use log::{debug, info};

pub fn send(app: &crate::App, config: &Config) -> Result<(), String> {
    let (Some(name), Some(value)) = (&app.command, app.value) else {
        return Err("command and value required".into());
    };

    let timing = config.timing.timing()?;

    let Some(action) = Action::parse(name, value, config.max_volume) else {
        debug!("unknown command ‘{name}’, nothing to do");
        return Ok(());
    };

    if app.dry_run {
        dry_run(config, timing, action)
    } else {
        transmit(config, timing, action)
    }
}

/// Pretend the device is on and record what would be sent
fn dry_run(config: &Config, timing: Timing, action: Action) -> Result<(), String> {
    let mut remote = Remote::new(Recorder::new(), Constant(1), timing, config.address);
    let store = FileStore::new(&config.volume_file);

    debug!(
        "address {}, volume from {}",
        remote.address(),
        store.path().display()
    );

    let mut volume = Volume::new(ReadOnly(store), config.max_volume, config.default_volume);

    dispatch(&mut remote, &mut volume, action).map_err(|e| e.to_string())?;

    let message = remote.line().message();

    if !message.phases.is_empty() {
        info!(
            "duration: {}",
            humantime::format_duration(message.duration())
        );
        info!("rawir: {}", message.print_rawir());
    }

    Ok(())
}

#[cfg(target_os = "linux")]
fn transmit(config: &Config, timing: Timing, action: Action) -> Result<(), String> {
    use ampir::sched;

    if let Err(e) = sched::become_root() {
        debug!("cannot become root: {e}");
    }

    if config.realtime_priority > 0 {
        sched::set_realtime(config.realtime_priority)
            .map_err(|e| format!("realtime scheduling failed: {e}"))?;
    }

    let mut gpio = super::open_chip(config)?;

    let ir = gpio
        .output(config.ir_line)
        .map_err(|e| format!("request ir line failed: {e}"))?;

    let power_state = gpio
        .input(config.power_state_line)
        .map_err(|e| format!("request power state line failed: {e}"))?;

    let mut remote = Remote::new(ir, power_state, timing, config.address);
    let mut volume = Volume::new(
        FileStore::new(&config.volume_file),
        config.max_volume,
        config.default_volume,
    );

    dispatch(&mut remote, &mut volume, action).map_err(|e| format!("{gpio}: {e}"))?;

    // stop driving the ir line
    remote
        .into_line()
        .park()
        .map_err(|e| format!("request ir line as input failed: {e}"))
}

#[cfg(not(target_os = "linux"))]
fn transmit(_config: &Config, _timing: Timing, _action: Action) -> Result<(), String> {
    Err("gpio is only supported on linux, use --dry-run".into())
}
