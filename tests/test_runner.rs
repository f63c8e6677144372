//! Integration tests for background conversion jobs, cancellation and the progress relay

#![cfg(unix)]

mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::*;
use soxconv::pipeline::*;

fn job_for(paths: &[PathBuf], label: &str) -> ConversionJob {
    let preset = PresetCatalog::builtin().find(label).unwrap().clone();
    ConversionJob::new(Selection::from_paths(paths.iter().cloned()), preset)
}

fn options_with(tool: PathBuf) -> RunnerOptions {
    RunnerOptions {
        tool: tool.to_string_lossy().into_owned(),
        wait_interval: Duration::from_millis(5),
        ..Default::default()
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl ProgressIndicator for Recorder {
    fn show(&mut self, label: &str) {
        self.events.push(format!("show:{label}"));
    }
    fn pulse(&mut self, label: &str) {
        self.events.push(format!("pulse:{label}"));
    }
    fn hide(&mut self) {
        self.events.push("hide".into());
    }
}

#[test]
fn test_three_files_three_done_then_end() {
    let (dir, inputs) = create_inputs(&["one.wav", "two.wav", "three.wav"]);
    let tool = fake_converter(dir.path());

    let slot = JobSlot::new();
    let mut running = slot
        .start(job_for(&inputs, "r16000c1i16"), options_with(tool))
        .unwrap();
    let mut relay = ProgressRelay::new(running.receiver(), Recorder::default());

    assert_eq!(relay.state(), RelayState::Idle);
    relay.start();
    assert_eq!(relay.state(), RelayState::Running);
    relay.run_until_end(Duration::from_millis(1), || {});
    running.join();

    assert_eq!(relay.state(), RelayState::Idle);
    assert_eq!(
        relay.indicator().events,
        [
            "show:Converting",
            "pulse:Converting one.wav",
            "pulse:Converting two.wav",
            "pulse:Converting three.wav",
            "hide",
        ]
    );

    let (_, tally) = relay.into_parts();
    let outputs: Vec<PathBuf> = tally.converted().map(|(_, o)| o.to_path_buf()).collect();
    assert_eq!(
        outputs,
        [
            dir.path().join("one_r16000_c1_i16.wav"),
            dir.path().join("two_r16000_c1_i16.wav"),
            dir.path().join("three_r16000_c1_i16.wav"),
        ]
    );
    assert!(outputs.iter().all(|o| o.exists()));
    assert!(!slot.is_busy());
}

#[test]
fn test_converter_receives_preset_arguments() {
    let (dir, inputs) = create_inputs(&["voice.pcm", "music.wav"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    run(
        &job_for(&inputs, "r8000c2i16"),
        &options_with(tool),
        &tx,
        &JobControl::new(),
    );
    assert_eq!(rx.try_iter().count(), 3);

    let d = dir.path().display();
    assert_eq!(
        recorded_calls(dir.path()),
        [
            format!(
                "-r 8000 -c 2 -e signed-integer -b 16 -t raw {d}/voice.pcm {d}/voice_r8000_c2_i16.wav"
            ),
            format!(
                "{d}/music.wav -r 8000 -c 2 -e signed-integer -b 16 {d}/music_r8000_c2_i16.wav"
            ),
        ]
    );
}

#[test]
fn test_raw_export_arguments() {
    let (dir, inputs) = create_inputs(&["clip.wav"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    run(&job_for(&inputs, "raw"), &options_with(tool), &tx, &JobControl::new());

    let d = dir.path().display();
    assert_eq!(
        recorded_calls(dir.path()),
        [format!("--magic {d}/clip.wav -t raw {d}/clip.raw")]
    );
    assert_eq!(
        rx.try_iter().next(),
        Some(ProgressMessage::Done {
            name: "clip.wav".into(),
            output: dir.path().join("clip.raw"),
        })
    );
}

#[test]
fn test_existing_output_gets_disambiguated() {
    let (dir, inputs) = create_inputs(&["take.wav", "take_r8000_c1_i16.wav"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    run(
        &job_for(&inputs[..1], "r8000c1i16"),
        &options_with(tool),
        &tx,
        &JobControl::new(),
    );

    assert_eq!(
        rx.try_iter().next(),
        Some(ProgressMessage::Done {
            name: "take.wav".into(),
            output: dir.path().join("take_r8000_c1_i16_1.wav"),
        })
    );
}

#[test]
fn test_reconverting_replaces_previous_suffix() {
    let (dir, inputs) = create_inputs(&["song_r8000_c1_i16.wav"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    run(
        &job_for(&inputs, "r16000c2i16"),
        &options_with(tool),
        &tx,
        &JobControl::new(),
    );

    assert_eq!(
        rx.try_iter().next(),
        Some(ProgressMessage::Done {
            name: "song_r8000_c1_i16.wav".into(),
            output: dir.path().join("song_r16000_c2_i16.wav"),
        })
    );
}

#[test]
fn test_failed_file_does_not_stop_batch() {
    let (dir, inputs) = create_inputs(&["a.wav", "broken.wav", "c.wav"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    run(
        &job_for(&inputs, "r44100c1i16"),
        &options_with(tool),
        &tx,
        &JobControl::new(),
    );

    let messages: Vec<ProgressMessage> = rx.try_iter().collect();
    assert_eq!(messages.len(), 4);
    assert!(matches!(&messages[0], ProgressMessage::Done { name, .. } if name == "a.wav"));
    match &messages[1] {
        ProgressMessage::Failed { name, reason } => {
            assert_eq!(name, "broken.wav");
            assert!(reason.contains("status 2"), "unexpected reason: {reason}");
            assert!(reason.contains("can't open input file"), "unexpected reason: {reason}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(&messages[2], ProgressMessage::Done { name, .. } if name == "c.wav"));
    assert_eq!(messages[3], ProgressMessage::End);
    assert_eq!(recorded_calls(dir.path()).len(), 3);
}

#[test]
fn test_cancel_mid_batch_stops_further_messages() {
    let (dir, inputs) = create_inputs(&["first.wav", "second_slow.wav", "third.wav"]);
    let tool = fake_converter(dir.path());

    let slot = JobSlot::new();
    let mut running = slot
        .start(job_for(&inputs, "r8000c1i16"), options_with(tool))
        .unwrap();
    let receiver = running.receiver();

    let first = receiver.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(matches!(first, ProgressMessage::Done { ref name, .. } if name == "first.wav"));

    // the slow converter is running now
    let in_flight = running.control().in_flight().clone();
    assert!(wait_for(Duration::from_secs(10), || {
        !in_flight.is_empty() && recorded_calls(dir.path()).len() == 2
    }));

    running.cancel();

    assert!(in_flight.is_empty());
    let rest: Vec<ProgressMessage> = receiver.try_iter().collect();
    assert_eq!(rest, [ProgressMessage::End]);
    assert_eq!(recorded_calls(dir.path()).len(), 2);
    assert!(!dir.path().join("third_r8000_c1_i16.wav").exists());
    assert!(!slot.is_busy());
}

#[test]
fn test_second_job_is_rejected_while_running() {
    let (dir, inputs) = create_inputs(&["slow.wav"]);
    let tool = fake_converter(dir.path());

    let slot = JobSlot::new();
    let job = job_for(&inputs, "r8000c1i16");
    let mut running = slot.start(job.clone(), options_with(tool.clone())).unwrap();
    assert!(slot.is_busy());

    assert!(matches!(
        slot.start(job.clone(), options_with(tool.clone())),
        Err(ConvertError::JobAlreadyRunning)
    ));

    running.cancel();
    assert!(running.is_finished());

    let mut again = slot
        .start(job, RunnerOptions { dry_run: true, ..options_with(tool) })
        .unwrap();
    again.join();
    let messages: Vec<ProgressMessage> = again.receiver().try_iter().collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], ProgressMessage::End);
}

#[test]
fn test_dry_run_launches_nothing() {
    let (dir, inputs) = create_inputs(&["a.wav", "b.pcm"]);
    let tool = fake_converter(dir.path());

    let (tx, rx) = crossbeam_channel::unbounded();
    let options = RunnerOptions {
        dry_run: true,
        ..options_with(tool)
    };
    run(&job_for(&inputs, "r48000c2i16"), &options, &tx, &JobControl::new());

    assert_eq!(rx.try_iter().count(), 3);
    assert!(recorded_calls(dir.path()).is_empty());
    assert!(!dir.path().join("a_r48000_c2_i16.wav").exists());
}
