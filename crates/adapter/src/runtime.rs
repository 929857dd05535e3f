//! Adapter runtime - drives a game from a line reader and reports to a writer
//!
//! A reader thread forwards input lines over a channel so the tick loop never
//! blocks on I/O while a move is animating. The loop runs at the configured tick
//! period; with `tick_ms == 0` it runs unpaced and takes one input line at a time,
//! only once the previous command has fully settled.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::AdapterConfig;
use crate::core::{GameSnapshot, GameState};
use crate::protocol::{
    build_observation, create_ack, create_error, create_move, extract_seq_best_effort, parse_line,
    AckStatus, ActionName, ErrorCode, Inbound, ParseError,
};

/// Events delivered by the reader thread
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Line(String),
    Error(String),
    Closed,
}

/// What happened over one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks: u64,
    /// Commands accepted into the queue
    pub commands: u64,
    /// Commands refused because the queue was full
    pub dropped: u64,
    /// Lines that could not be parsed
    pub errors: u64,
    /// Settled moves that changed the board
    pub moves: u64,
    /// Settled moves that changed nothing
    pub noops: u64,
    pub episode_id: u32,
    pub max_value: u32,
    pub game_over: bool,
}

/// Line writer with the outbound sequence counter
struct Outbound<'a, W: Write> {
    out: &'a mut W,
    seq: u64,
}

impl<'a, W: Write> Outbound<'a, W> {
    fn new(out: &'a mut W) -> Self {
        Self { out, seq: 0 }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn send<T: Serialize>(&mut self, msg: &T) -> Result<()> {
        serde_json::to_writer(&mut *self.out, msg).context("encode outbound message")?;
        self.out.write_all(b"\n").context("write outbound message")?;
        self.out.flush().context("flush output")?;
        Ok(())
    }
}

/// Spawn the reader thread
pub fn spawn_reader<R>(input: R) -> Receiver<InboundEvent>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<InboundEvent>();
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    let _ = tx.send(InboundEvent::Error(format!("read error: {}", e)));
                    let _ = tx.send(InboundEvent::Closed);
                    return;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(InboundEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(InboundEvent::Closed);
    });
    rx
}

/// Run one session until input ends (EOF or `quit`) and queued work has settled
pub fn run<R, W>(config: &AdapterConfig, input: R, output: &mut W) -> Result<RunSummary>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let mut game = GameState::with_policy(config.seed, config.spawn_policy());
    let mut snapshot = GameSnapshot::default();
    let mut out = Outbound::new(output);
    let mut summary = RunSummary::default();

    info!(
        "session start: seed={} tick_ms={} four_percent={}",
        config.seed, config.tick_ms, config.four_percent
    );

    game.snapshot_into(&mut snapshot);
    let seq = out.next_seq();
    out.send(&build_observation(&snapshot, seq))?;

    let rx = spawn_reader(input);
    let period = config.tick_duration();
    let mut input_open = true;
    let mut next_tick = Instant::now();

    loop {
        if input_open {
            match period {
                Some(_) => loop {
                    match rx.try_recv() {
                        Ok(event) => {
                            if !handle_event(event, &mut game, &mut out, &mut summary)? {
                                input_open = false;
                                break;
                            }
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            input_open = false;
                            break;
                        }
                    }
                },
                None if game.is_idle() => match rx.recv() {
                    Ok(event) => {
                        input_open = handle_event(event, &mut game, &mut out, &mut summary)?;
                    }
                    Err(_) => input_open = false,
                },
                None => {}
            }
        }

        if !input_open && game.is_idle() {
            break;
        }

        if let Some(period) = period {
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            }
            next_tick += period;
        }

        let changed = game.tick();
        summary.ticks += 1;

        if let Some(outcome) = game.take_last_outcome() {
            if outcome.moved {
                summary.moves += 1;
            } else {
                summary.noops += 1;
            }
            let spawned = if outcome.moved { game.last_spawn() } else { None };
            let seq = out.next_seq();
            out.send(&create_move(
                seq,
                &outcome,
                game.move_id(),
                spawned,
                game.game_over(),
            ))?;
        }

        if changed {
            game.snapshot_into(&mut snapshot);
            let seq = out.next_seq();
            out.send(&build_observation(&snapshot, seq))?;
        }
    }

    summary.episode_id = game.episode_id();
    summary.max_value = game.grid().max_value();
    summary.game_over = game.game_over();
    info!(
        "session end: {} ticks, {} moves, max tile {}",
        summary.ticks, summary.moves, summary.max_value
    );
    Ok(summary)
}

/// Apply one reader event. Returns false once input should stop being read.
fn handle_event<W: Write>(
    event: InboundEvent,
    game: &mut GameState,
    out: &mut Outbound<'_, W>,
    summary: &mut RunSummary,
) -> Result<bool> {
    let line = match event {
        InboundEvent::Line(line) => line,
        InboundEvent::Error(message) => {
            warn!("{}", message);
            return Ok(false);
        }
        InboundEvent::Closed => {
            debug!("input closed");
            return Ok(false);
        }
    };

    match parse_line(&line) {
        Ok(Inbound::Action { seq, action }) => {
            let status = if game.enqueue(action) {
                summary.commands += 1;
                AckStatus::Queued
            } else {
                summary.dropped += 1;
                AckStatus::Rejected
            };
            let out_seq = out.next_seq();
            out.send(&create_ack(out_seq, seq, ActionName::from(action), status))?;
            Ok(true)
        }
        Ok(Inbound::Quit { seq }) => {
            debug!("quit requested (seq {:?})", seq);
            let out_seq = out.next_seq();
            out.send(&create_ack(out_seq, seq, ActionName::Quit, AckStatus::Queued))?;
            Ok(false)
        }
        Err(ParseError::Empty) => Ok(true),
        Err(e) => {
            debug!("rejecting input line {:?}: {}", line, e);
            summary.errors += 1;
            let out_seq = out.next_seq();
            out.send(&create_error(
                out_seq,
                extract_seq_best_effort(&line),
                ErrorCode::InvalidCommand,
                &e.to_string(),
            ))?;
            Ok(true)
        }
    }
}
