//! perceptd - scene-perception relay daemon
//!
//! This daemon:
//! 1. Captures frames from the configured source
//! 2. Runs object inference (local model, or the remote service while the
//!    connectivity poller reports a usable network path)
//! 3. Stabilizes object and OCR text readings
//! 4. Publishes change-only updates on the objects/text channels
//! 5. Publishes battery telemetry on its own interval

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;

use percept_relay::{
    spawn_poller, BatteryMonitor, ChangeGate, ConnectivityFlag, LocalBackend, LogSink, MqttConfig,
    MqttSink, NoopCorrector, NotifySink, PerceptConfig, Pipeline, PipelineConfig, RemoteBackend,
    RemoteConfig, SpellCorrector, StubBatteryProbe, StubClassifier, SyntheticConfig,
    SyntheticSource, TcpProbe, BATTERY_CHANNEL,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Debounced scene-perception relay daemon")]
struct Args {
    /// Log published updates instead of sending them to the MQTT broker.
    #[arg(long, env = "PERCEPT_LOG_SINK")]
    log_sink: bool,

    /// Disable the battery telemetry thread.
    #[arg(long)]
    no_battery: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = PerceptConfig::load()?;
    log::info!(
        "perceptd starting: source={} process_every={} ocr_every={}",
        cfg.source.url,
        cfg.detect.process_every,
        cfg.text.ocr_every
    );

    let sink: Arc<dyn NotifySink> = if args.log_sink {
        Arc::new(LogSink)
    } else {
        let mqtt = MqttSink::connect(MqttConfig {
            broker_addr: cfg.mqtt.broker_addr.clone(),
            topic_prefix: cfg.mqtt.topic_prefix.clone(),
            client_id: cfg.mqtt.client_id.clone(),
        })?;
        log::info!("publishing to mqtt broker {}", cfg.mqtt.broker_addr);
        Arc::new(mqtt)
    };

    // Connectivity poller: single writer of the shared flag.
    let flag = ConnectivityFlag::new();
    let probe_addr = cfg
        .connectivity
        .probe_addr
        .parse()
        .map_err(|_| anyhow!("invalid connectivity probe address {}", cfg.connectivity.probe_addr))?;
    let probe = TcpProbe::new(probe_addr, Duration::from_secs(3));
    spawn_poller(Box::new(probe), flag.clone(), cfg.connectivity.interval);

    if !args.no_battery {
        spawn_battery_monitor(&cfg, Arc::clone(&sink));
    }

    let source = build_source(&cfg)?;
    let local = LocalBackend::new(Box::new(StubClassifier::new()), cfg.detect.min_confidence);
    let remote = RemoteBackend::new(RemoteConfig {
        url: cfg.detect.remote_url.clone(),
        timeout: cfg.detect.remote_timeout,
    });

    let pipeline_cfg = PipelineConfig {
        process_every: cfg.detect.process_every,
        ocr_every: cfg.text.ocr_every,
        window_size: cfg.detect.window_size,
        stability_ratio: cfg.detect.stability_ratio,
        similarity_threshold: cfg.text.similarity_threshold,
        stability_count: cfg.text.stability_count,
        min_words: cfg.text.min_words,
        min_avg_word_len: cfg.text.min_avg_word_len,
        skip_sleep: cfg.capture.skip_sleep,
        retry_backoff: cfg.capture.retry_backoff,
        max_consecutive_capture_failures: cfg.capture.max_consecutive_failures,
    };

    let mut pipeline = Pipeline::new(
        source,
        Box::new(local),
        Box::new(remote),
        Box::new(percept_relay::NoopExtractor),
        build_corrector(cfg.text.spell_correction),
        sink,
        flag.reader(),
        pipeline_cfg,
    );

    let shutdown = pipeline.shutdown_handle();
    ctrlc::set_handler(move || {
        log::info!("shutdown requested");
        shutdown.store(true, Ordering::Relaxed);
    })?;

    pipeline.run()
}

/// Spell correction per the `text.spell_correction` toggle. `NoopCorrector`
/// holds the slot until a dictionary engine is wired in; the toggle decides
/// whether the OCR path runs a correction stage at all.
fn build_corrector(enabled: bool) -> Option<Box<dyn SpellCorrector>> {
    if enabled {
        Some(Box::new(NoopCorrector))
    } else {
        None
    }
}

fn build_source(cfg: &PerceptConfig) -> Result<Box<dyn percept_relay::FrameSource>> {
    if cfg.source.url.starts_with("stub://") {
        Ok(Box::new(SyntheticSource::new(SyntheticConfig {
            url: cfg.source.url.clone(),
            width: cfg.source.width,
            height: cfg.source.height,
        })))
    } else {
        Err(anyhow!(
            "unsupported source url '{}'; this build supports stub:// sources",
            cfg.source.url
        ))
    }
}

/// Battery thread: own interval, own change gate so repeats are suppressed.
fn spawn_battery_monitor(cfg: &PerceptConfig, sink: Arc<dyn NotifySink>) {
    let interval = cfg.battery.interval;
    let capacity = cfg.battery.capacity_mah;
    std::thread::spawn(move || {
        let mut monitor = BatteryMonitor::new(Box::new(StubBatteryProbe::new()), capacity);
        let mut gate = ChangeGate::new();
        loop {
            let status = monitor.status_string();
            if gate.changed(BATTERY_CHANNEL, &status) {
                match sink.send(BATTERY_CHANNEL, &status) {
                    Ok(()) => gate.record(BATTERY_CHANNEL, &status),
                    Err(e) => log::warn!("battery publish failed, will retry: {:#}", e),
                }
            }
            std::thread::sleep(interval);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spell_correction_toggle_selects_a_corrector() {
        assert!(build_corrector(true).is_some());
        assert!(build_corrector(false).is_none());
    }
}
