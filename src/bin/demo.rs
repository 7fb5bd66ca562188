//! demo - scripted end-to-end run of the stabilization pipeline
//!
//! Drives the pipeline with scripted classifier and OCR sequences (noisy on
//! purpose) and prints exactly what a connected peer would have received,
//! cycle by cycle. Nothing leaves the process.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use percept_relay::{
    Classifier, ConnectivityFlag, CycleOutcome, Frame, FrameSource, LocalBackend, MemorySink,
    Pipeline, PipelineConfig, SourceStats, TextExtractor, TextLine,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scripted end-to-end pipeline run")]
struct Args {
    /// Number of capture cycles to drive.
    #[arg(long, default_value_t = 40)]
    cycles: u32,
}

/// Source that always captures a small blank frame.
struct ScriptedSource {
    count: u64,
}

impl FrameSource for ScriptedSource {
    fn connect(&mut self) -> Result<()> {
        Ok(())
    }

    fn next_frame(&mut self) -> Result<Frame> {
        self.count += 1;
        Ok(Frame::new(vec![0u8; 48], 4, 4, self.count))
    }

    fn is_healthy(&self) -> bool {
        true
    }

    fn stats(&self) -> SourceStats {
        SourceStats {
            frames_captured: self.count,
            url: "scripted://demo".to_string(),
        }
    }
}

/// Classifier that replays a fixed jittery label sequence.
struct ScriptedClassifier {
    frames: Vec<Vec<&'static str>>,
    cursor: usize,
}

impl Classifier for ScriptedClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Vec<(String, f32)>> {
        let labels = self
            .frames
            .get(self.cursor)
            .cloned()
            .unwrap_or_default();
        self.cursor += 1;
        Ok(labels.into_iter().map(|l| (l.to_string(), 0.9)).collect())
    }
}

/// Extractor that replays fixed OCR readings, one per processed cycle.
struct ScriptedExtractor {
    readings: Vec<Vec<TextLine>>,
    cursor: usize,
}

impl TextExtractor for ScriptedExtractor {
    fn extract(&mut self, _frame: &Frame) -> Result<Vec<TextLine>> {
        let reading = self
            .readings
            .get(self.cursor)
            .cloned()
            .unwrap_or_default();
        self.cursor += 1;
        Ok(reading)
    }
}

fn line(words: &[&str]) -> TextLine {
    words.iter().map(|w| w.to_string()).collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // A car flickering in and out for a few frames, then a person joining,
    // then an empty street.
    let object_script = vec![
        vec!["car"],
        vec![],
        vec!["car", "person"],
        vec!["car"],
        vec!["car", "person"],
        vec!["car", "person"],
        vec!["person"],
        vec!["car", "person"],
        vec![],
        vec![],
        vec![],
        vec![],
        vec![],
    ];

    // A sign read three times (once with an OCR error), then gone.
    let ocr_script = vec![
        vec![line(&["saida", "de", "emergencia"])],
        vec![line(&["saida", "de", "emergencla"])],
        vec![line(&["saida", "de", "emergencia"])],
        vec![line(&["x"])], // garbage, filtered before the stabilizer
        vec![],
        vec![],
    ];

    let sink = Arc::new(MemorySink::new());
    let flag = ConnectivityFlag::new(); // offline: local backend throughout

    let config = PipelineConfig {
        process_every: 1,
        skip_sleep: std::time::Duration::ZERO,
        retry_backoff: std::time::Duration::ZERO,
        ..PipelineConfig::default()
    };

    let mut pipeline = Pipeline::new(
        Box::new(ScriptedSource { count: 0 }),
        Box::new(LocalBackend::new(
            Box::new(ScriptedClassifier {
                frames: object_script,
                cursor: 0,
            }),
            0.5,
        )),
        Box::new(LocalBackend::new(
            Box::new(ScriptedClassifier {
                frames: Vec::new(),
                cursor: 0,
            }),
            0.5,
        )),
        Box::new(ScriptedExtractor {
            readings: ocr_script,
            cursor: 0,
        }),
        None,
        Arc::clone(&sink) as Arc<dyn percept_relay::NotifySink>,
        flag.reader(),
        config,
    );

    let mut processed = 0u32;
    for _ in 0..args.cycles {
        if pipeline.step()? == CycleOutcome::Processed {
            processed += 1;
        }
    }

    println!("demo summary:");
    println!("  cycles driven: {}", args.cycles);
    println!("  cycles processed: {}", processed);
    println!("  published updates:");
    for (channel, value) in sink.sent() {
        println!("    [{}] {:?}", channel, value);
    }
    println!("next steps:");
    println!("  RUST_LOG=debug cargo run --bin perceptd -- --log-sink");

    Ok(())
}
