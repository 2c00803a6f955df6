use crate::cli::Settings;
use crate::export;
use crate::render::{render, RenderOptions};
use crate::stats::{status_line, RunReport};
use crate::theme::Theme;
use anyhow::{bail, Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use maze_core::{DisplaySignal, Maze, MazeGenerator};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// How long `--show` holds the carved maze and its solution on screen.
const SHOW_PAUSE: Duration = Duration::from_secs(1);
/// How often the display task checks whether generation has finished.
const POLL: Duration = Duration::from_millis(50);

/// One run of the terminal front-end: generate on the calling thread while a
/// display task redraws whenever the engine asks for it.
pub struct App {
    settings: Settings,
    theme: Theme,
}

impl App {
    pub fn new(settings: Settings, theme: Theme) -> Self {
        Self { settings, theme }
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            blank: self.settings.blank,
            show_checks: self.settings.look,
        }
    }

    /// Generate, draw and save the maze. `out` is only written to by the
    /// display task until generation ends.
    pub fn run<W: Write + Send>(&self, out: &mut W) -> Result<RunReport> {
        let settings = &self.settings;

        let (signal, rx) = DisplaySignal::channel(settings.frame_delay);
        let signal = if settings.show { signal.with_pause(SHOW_PAUSE) } else { signal };
        let solve_delay = if settings.view { settings.frame_delay } else { Duration::ZERO };
        let solve_display = signal.with_delay(solve_delay);
        let generator = MazeGenerator::new(settings.config.clone())
            .context("invalid maze configuration")?
            .with_display(signal.with_checks(settings.look))
            .with_solve_display(solve_display);
        let maze = generator.maze();

        let done = AtomicBool::new(false);
        let (result, drawn) = thread::scope(|s| {
            let display = s.spawn(|| self.draw_until(&mut *out, maze, &rx, &done));
            let result = generator.generate();
            done.store(true, Ordering::Release);
            (result, display.join())
        });
        let mut frames = match drawn {
            Ok(frames) => frames.context("drawing maze")?,
            Err(_) => bail!("display task panicked"),
        };
        let report = result.context("generating maze")?;

        frames += 1;
        self.draw(out, maze, frames).context("drawing maze")?;
        info!(frames, attempts = report.attempts, "run finished");

        if let Some(path) = &settings.output {
            export::save(maze.grid(), path)?;
            debug!(path = %path.display(), "maze exported");
        }

        let run = RunReport {
            config: settings.config.clone(),
            result: report,
            frames,
        };
        if let Some(path) = &settings.report {
            run.save(path)?;
            debug!(path = %path.display(), "report written");
        }
        Ok(run)
    }

    /// Redraw on every request until `done` is set. Returns the frame count.
    fn draw_until<W: Write>(
        &self,
        out: &mut W,
        maze: &Maze,
        rx: &Receiver<()>,
        done: &AtomicBool,
    ) -> io::Result<usize> {
        let mut frames = 0;
        while !done.load(Ordering::Acquire) {
            match rx.recv_timeout(POLL) {
                Ok(()) => {
                    frames += 1;
                    self.draw(out, maze, frames)?;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(frames)
    }

    fn draw<W: Write>(&self, out: &mut W, maze: &Maze, frames: usize) -> io::Result<()> {
        let grid = maze.grid();
        let status = status_line(&maze.stats().snapshot(), grid.height(), grid.width(), frames);
        render(out, grid, self.options(), &self.theme, &status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Args, Limits};
    use clap::Parser;

    fn settings(args: &[&str]) -> Settings {
        Args::try_parse_from(std::iter::once("maze").chain(args.iter().copied()))
            .unwrap()
            .into_settings(Limits {
                max_height: 30,
                max_width: 30,
            })
    }

    #[test]
    fn test_run_draws_final_frame() {
        let app = App::new(settings(&["-h", "4", "-w", "6", "-r", "9"]), Theme::ansi());
        let mut out = Vec::new();
        let run = app.run(&mut out).unwrap();

        assert!(run.frames >= 1);
        assert_eq!(run.result.seed, 9);
        assert!(run.result.solution.path_length >= 1);
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("height=4, width=6, seed=9"));
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = std::env::temp_dir().join(format!("maze-tui-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let ascii = dir.join("maze.txt");
        let json = dir.join("report.json");
        let app = App::new(
            settings(&[
                "-h",
                "3",
                "-w",
                "5",
                "-r",
                "4",
                "-t",
                "2",
                "-o",
                ascii.to_str().unwrap(),
                "--report",
                json.to_str().unwrap(),
            ]),
            Theme::ansi(),
        );
        let mut out = Vec::new();
        let run = app.run(&mut out).unwrap();

        let text = std::fs::read_to_string(&ascii).unwrap();
        assert_eq!(export::parse_header(text.lines().next().unwrap()), Some((3, 5)));
        assert!(text.contains('*'));

        let saved: RunReport = serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(saved.result, run.result);
        assert_eq!(saved.frames, run.frames);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_animated_run_counts_frames() {
        let app = App::new(settings(&["-h", "2", "-w", "3", "-r", "1", "-f", "1000", "-v", "-l"]), Theme::ansi());
        let mut out = Vec::new();
        let run = app.run(&mut out).unwrap();
        // Carving alone asks for a paced redraw per carved room
        assert!(run.frames > 1);
        assert!(app.options().show_checks);
    }
}
