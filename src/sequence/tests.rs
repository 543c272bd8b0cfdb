// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{
    collections::HashSet,
    io::BufReader,
    sync::atomic::{AtomicUsize, Ordering},
};

use image::{codecs::gif::GifDecoder, AnimationDecoder, Rgb, RgbImage};
use tempfile::TempDir;

use super::*;

fn start() -> Epoch {
    Epoch::from_gregorian_utc_hms(2024, 6, 4, 22, 0, 0)
}

fn ten_minutes() -> Duration {
    Duration::from_seconds(600.0)
}

/// Writes a tiny PNG whose red channel encodes the frame index. Frames in
/// `fail` aren't written.
struct TestRenderer {
    schedule: FrameSchedule,
    fail: HashSet<usize>,
    calls: AtomicUsize,
}

impl TestRenderer {
    fn new(schedule: FrameSchedule, fail: &[usize]) -> TestRenderer {
        TestRenderer {
            schedule,
            fail: fail.iter().copied().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    fn red(&self, index: usize) -> u8 {
        (index * 255 / self.schedule.num_frames.max(2).saturating_sub(1)) as u8
    }
}

impl FrameRenderer for TestRenderer {
    fn render_frame(&self, epoch: Epoch, path: &Path) -> Result<(), FrameError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let index = ((epoch - self.schedule.start).to_seconds() / self.schedule.step.to_seconds())
            .round() as usize;
        if self.fail.contains(&index) {
            return Err(FrameError::Render(RenderError::BadDpi));
        }
        let image = RgbImage::from_pixel(8, 8, Rgb([self.red(index), 40, 80]));
        image
            .save(path)
            .map_err(|e| RenderError::Plotters(Box::new(e)))?;
        Ok(())
    }
}

#[test]
fn test_frame_filename() {
    let dir = Path::new("gif");
    assert_eq!(frame_filename(dir, 0, 144), PathBuf::from("gif/frame_000.png"));
    assert_eq!(frame_filename(dir, 143, 144), PathBuf::from("gif/frame_143.png"));
    assert_eq!(frame_filename(dir, 7, 1), PathBuf::from("gif/frame_007.png"));
    assert_eq!(frame_filename(dir, 999, 1000), PathBuf::from("gif/frame_999.png"));
    assert_eq!(frame_filename(dir, 12, 1001), PathBuf::from("gif/frame_0012.png"));
}

#[test]
fn test_schedule_timestamps() {
    let schedule = FrameSchedule::new(start(), ten_minutes(), 144).unwrap();
    let timestamps = schedule.timestamps().unwrap();
    assert_eq!(timestamps.len(), 144);
    assert_eq!(*timestamps.first(), start());
    for (i, t) in timestamps.iter().enumerate() {
        assert_eq!(*t, start() + ten_minutes() * i as i64);
    }
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*timestamps.last(), schedule.end());
    assert_eq!(
        schedule.end(),
        Epoch::from_gregorian_utc_hms(2024, 6, 5, 21, 50, 0)
    );
}

#[test]
fn test_bad_schedules() {
    assert!(matches!(
        FrameSchedule::new(start(), ten_minutes(), 0),
        Err(SequenceError::Time(TimeError::ZeroTimestamps))
    ));
    assert!(matches!(
        FrameSchedule::new(start(), Duration::from_seconds(0.0), 10),
        Err(SequenceError::Time(TimeError::NonPositiveStep(_)))
    ));
}

#[test]
fn test_sequence_and_animation() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let output_dir = tmp_dir.path().join("gif");
    let schedule = FrameSchedule::new(start(), ten_minutes(), 144).unwrap();
    let renderer = TestRenderer::new(schedule, &[]);

    let outcome = run_sequence(
        &schedule,
        &output_dir,
        &renderer,
        FailurePolicy::Skip,
        &ProgressBar::hidden(),
    )
    .unwrap();
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 144);
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.frames.len(), 144);
    for (i, frame) in outcome.frames.iter().enumerate() {
        assert_eq!(frame.index, i);
        assert_eq!(frame.epoch, start() + ten_minutes() * i as i64);
        assert_eq!(frame.path, frame_filename(&output_dir, i, 144));
        assert!(frame.path.exists());
    }

    let gif = output_dir.join("night_sky_animation.gif");
    write_gif(&outcome.frame_paths(), &gif, Duration::from_seconds(0.2)).unwrap();

    let decoder = GifDecoder::new(BufReader::new(File::open(&gif).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 144);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.delay().numer_denom_ms(), (200, 1));
        // Colours are quantised, so allow a little slack.
        let red = frame.buffer().get_pixel(4, 4)[0] as i32;
        let expected = renderer.red(i) as i32;
        assert!((red - expected).abs() <= 8, "frame {i}: {red} vs {expected}");
    }
}

#[test]
fn test_failed_frames_are_skipped() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let schedule = FrameSchedule::new(start(), ten_minutes(), 20).unwrap();
    let renderer = TestRenderer::new(schedule, &[7, 3]);

    let outcome = run_sequence(
        &schedule,
        tmp_dir.path(),
        &renderer,
        FailurePolicy::default(),
        &ProgressBar::hidden(),
    )
    .unwrap();
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 20);
    assert_eq!(outcome.frames.len(), 18);
    let skipped: Vec<usize> = outcome.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, [3, 7]);
    assert_eq!(outcome.skipped[0].epoch, start() + ten_minutes() * 3);
    let indices: Vec<usize> = outcome.frames.iter().map(|f| f.index).collect();
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
    assert!(!indices.contains(&3) && !indices.contains(&7));

    // The animation is made from what rendered.
    let gif = tmp_dir.path().join("out.gif");
    write_gif(&outcome.frame_paths(), &gif, Duration::from_seconds(0.2)).unwrap();
    let decoder = GifDecoder::new(BufReader::new(File::open(&gif).unwrap())).unwrap();
    assert_eq!(decoder.into_frames().count(), 18);
}

#[test]
fn test_fail_fast() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let schedule = FrameSchedule::new(start(), ten_minutes(), 10).unwrap();
    let renderer = TestRenderer::new(schedule, &[4]);
    let progress = ProgressBar::hidden();

    let result = run_sequence(
        &schedule,
        tmp_dir.path(),
        &renderer,
        FailurePolicy::Abort,
        &progress,
    );
    match result {
        Err(SequenceError::Frame { index, epoch, .. }) => {
            assert_eq!(index, 4);
            assert_eq!(epoch, start() + ten_minutes() * 4);
        }
        other => panic!("Expected a frame error, got {other:?}"),
    }
    // The progress bar isn't left running.
    assert!(progress.is_finished());
    assert_eq!(progress.message(), "Rendering stopped");
}

#[test]
fn test_no_frames_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let schedule = FrameSchedule::new(start(), ten_minutes(), 3).unwrap();
    let renderer = TestRenderer::new(schedule, &[0, 1, 2]);
    let result = run_sequence(
        &schedule,
        tmp_dir.path(),
        &renderer,
        FailurePolicy::Skip,
        &ProgressBar::hidden(),
    );
    assert!(matches!(
        result,
        Err(SequenceError::NoFrames { num_skipped: 3 })
    ));
}

#[test]
fn test_bad_frame_duration() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let gif = tmp_dir.path().join("out.gif");
    let no_frames: [&Path; 0] = [];
    for bad in [0.0, -0.2, 0.0001] {
        assert!(matches!(
            write_gif(&no_frames, &gif, Duration::from_seconds(bad)),
            Err(SequenceError::BadFrameDuration(_))
        ));
    }
}
