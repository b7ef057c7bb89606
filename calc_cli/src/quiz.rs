//! Interactive quiz in the terminal.
//!
//! A ticker thread and a stdin thread feed one channel; the main thread owns
//! the controller and is the only one that touches it.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use calc_core::session::{
    Phase, ProblemPool, SessionConfig, SessionController, SessionEvent, SessionSnapshot, SharePayload, ShareTarget,
};
use rand::Rng;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

enum QuizInput {
    Line(String),
    Eof,
    Tick { epoch: u64, elapsed: Duration },
}

/// Prints the share text to stdout
struct StdoutShare;

impl ShareTarget for StdoutShare {
    type Error = io::Error;

    fn share(&mut self, payload: &SharePayload) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "\nShare: {}", payload.text)?;
        out.flush()
    }
}

fn spawn_ticker(tx: mpsc::Sender<QuizInput>, epoch: Arc<AtomicU64>) {
    thread::spawn(move || loop {
        thread::sleep(TICK_INTERVAL);
        let tick = QuizInput::Tick {
            epoch: epoch.load(Ordering::Relaxed),
            elapsed: TICK_INTERVAL,
        };
        if tx.send(tick).is_err() {
            return;
        }
    });
}

fn spawn_stdin(tx: mpsc::Sender<QuizInput>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(QuizInput::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(QuizInput::Eof);
    });
}

fn render(snapshot: &SessionSnapshot, previous: Option<&SessionSnapshot>) {
    let changed = previous.map_or(true, |p| {
        p.phase != snapshot.phase || p.current != snapshot.current || p.answered != snapshot.answered
    });
    if !changed {
        return;
    }

    match snapshot.phase {
        Phase::Introduction => println!("Press Enter to start, 'q' to quit."),
        Phase::Active => {
            if let Some(q) = &snapshot.current {
                println!();
                println!(
                    "[{}s left | {}/{} answered | score {}]",
                    snapshot.time_left_secs, snapshot.answered, snapshot.total, snapshot.score
                );
                println!("{}", q.prompt);
                for (i, option) in q.options.iter().enumerate() {
                    println!("  {}) {}", i + 1, option);
                }
                print!("> ");
                let _ = io::stdout().flush();
            }
        }
        Phase::Feedback => {
            if let Some(f) = &snapshot.last_feedback {
                if f.is_correct {
                    println!("Correct!");
                } else {
                    println!("Wrong. The answer was option {}.", f.correct_index + 1);
                }
            }
            if let Some(explanation) = &snapshot.explanation {
                println!("  {}", explanation);
            }
        }
        Phase::Finished => {
            if let Some(r) = &snapshot.result {
                println!();
                println!("═══════════════════════════════════════");
                println!("  {} {}", r.emoji, r.rank_label);
                println!("  Score: {}/{} ({} answered, {:?})", r.score, r.total, r.answered, r.reason);
                println!("═══════════════════════════════════════");
            }
        }
    }
}

/// Run a quiz until it finishes, stdin closes, or the player quits.
pub fn run<R: Rng>(pool: ProblemPool, config: SessionConfig, rng: R) -> Result<()> {
    println!("{} ({} questions, {})", pool.title, pool.len(), pool.locale);

    let mut session = SessionController::new(pool, config, rng);
    let epoch = Arc::new(AtomicU64::new(session.epoch()));
    let (tx, rx) = mpsc::channel();
    spawn_ticker(tx.clone(), Arc::clone(&epoch));
    spawn_stdin(tx);

    let mut last = session.snapshot();
    render(&last, None);

    while let Ok(input) = rx.recv() {
        let event = match input {
            QuizInput::Eof => break,
            QuizInput::Tick { epoch, elapsed } => SessionEvent::Tick { epoch, elapsed },
            QuizInput::Line(line) => {
                let line = line.trim();
                match (line, session.phase()) {
                    ("q", _) => break,
                    ("r", _) => SessionEvent::Reset,
                    (_, Phase::Introduction) => SessionEvent::Start,
                    (_, Phase::Active) => match line.parse::<usize>() {
                        Ok(n) if n >= 1 => SessionEvent::Answer(n - 1),
                        _ => {
                            print!("Type an option number> ");
                            let _ = io::stdout().flush();
                            continue;
                        }
                    },
                    _ => continue,
                }
            }
        };

        let snapshot = session.handle(event);
        epoch.store(snapshot.epoch, Ordering::Relaxed);
        render(&snapshot, Some(&last));
        let finished = snapshot.phase == Phase::Finished;
        last = snapshot;

        if finished {
            if let Some(result) = session.result() {
                StdoutShare.share(&SharePayload::from_result(session.pool(), result))?;
            }
            break;
        }
    }

    Ok(())
}
