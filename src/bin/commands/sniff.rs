use ampir::config::Config;

#[cfg(target_os = "linux")]
pub fn sniff(config: &Config) -> Result<(), String> {
    use ampir::sniff::format_samples;
    use log::info;

    let mut gpio = super::open_chip(config)?;

    let ir = gpio
        .input(config.ir_line)
        .map_err(|e| format!("request ir line failed: {e}"))?;

    info!("{gpio}: waiting for activity on line {}", config.ir_line);

    let samples =
        ampir::sniff::sniff(&ir, config.sniff_samples).map_err(|e| format!("{gpio}: {e}"))?;

    print!("{}", format_samples(&samples));

    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn sniff(_config: &Config) -> Result<(), String> {
    Err("gpio is only supported on linux".into())
}
