//! Driver cadence, shutdown, and status line output.

mod common;

use std::time::Duration;

use common::{
    AFTER_E4, Call, Fetch, Harness, Reply, START, SharedBuf, calls, count, my_turn, snapshot,
};
use lichess_pilot::{
    BoardWidget, Color, ControllerError, GameOutcome, GameStatus, LoopEvent, LoopExit, Phase,
    Speed, StatusPrinter, StatusWriter, TerminalBoardRenderer, run_loop,
};
use tokio::sync::mpsc;

const TICK: Duration = Duration::from_millis(1);

fn discard(events: mpsc::UnboundedReceiver<LoopEvent>) -> StatusWriter<Vec<u8>> {
    StatusWriter::new(events, StatusPrinter::default(), Vec::new())
}

#[tokio::test]
async fn test_run_loop_stops_on_draw() {
    let (mut controller, log, events) = Harness::script(vec![
        Fetch::Nothing,
        Fetch::Snapshot(snapshot(START, false, Color::White, Speed::Rapid, GameStatus::Started, None)),
        Fetch::Snapshot(snapshot(START, false, Color::White, Speed::Rapid, GameStatus::Draw, None)),
        Fetch::Snapshot(my_turn(AFTER_E4, Color::White, Speed::Rapid)),
    ])
    .build();

    let mut status = discard(events);
    let exit = run_loop(&mut controller, &mut status, TICK, std::future::pending())
        .await
        .expect("loop");

    assert_eq!(exit, LoopExit::Finished(GameOutcome::Draw(GameStatus::Draw)));
    let fetches = calls(&log).iter().filter(|c| matches!(c, Call::Fetch)).count();
    assert_eq!(fetches, 3, "no fetch after the terminal snapshot");
}

#[tokio::test]
async fn test_run_loop_honors_shutdown_before_first_cycle() {
    let (mut controller, log, events) =
        Harness::script(vec![Fetch::Snapshot(my_turn(START, Color::White, Speed::Rapid))]).build();
    let mut status = discard(events);

    let exit = run_loop(&mut controller, &mut status, TICK, std::future::ready(()))
        .await
        .expect("loop");

    assert_eq!(exit, LoopExit::Cancelled);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_run_loop_cancels_during_sleep() {
    let (mut controller, log, events) = Harness::default().build();
    let mut status = discard(events);

    let exit = run_loop(
        &mut controller,
        &mut status,
        Duration::from_secs(3600),
        tokio::time::sleep(Duration::from_millis(50)),
    )
    .await
    .expect("loop");

    assert_eq!(exit, LoopExit::Cancelled);
    assert_eq!(calls(&log), vec![Call::Fetch]);
}

#[tokio::test]
async fn test_run_loop_propagates_fatal_errors() {
    let mut harness = Harness::script(vec![Fetch::Snapshot(my_turn(START, Color::White, Speed::Rapid))]);
    harness.reply = Reply::Crash;
    let (mut controller, _log, events) = harness.build();
    let mut status = discard(events);

    let result = run_loop(&mut controller, &mut status, TICK, std::future::pending()).await;

    assert!(matches!(result, Err(ControllerError::Engine(_))));
}

#[tokio::test]
async fn test_shutdown_during_cycle_lets_the_cycle_finish() {
    let mut harness = Harness::script(vec![Fetch::Snapshot(my_turn(
        START,
        Color::White,
        Speed::Rapid,
    ))]);
    harness.reply = Reply::Move("e2e4");
    harness.submit_delay = Duration::from_millis(200);
    let (mut controller, log, events) = harness.build();
    let mut status = discard(events);

    let exit = run_loop(
        &mut controller,
        &mut status,
        Duration::from_secs(3600),
        tokio::time::sleep(Duration::from_millis(20)),
    )
    .await
    .expect("loop");

    assert_eq!(exit, LoopExit::Cancelled);
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(count(&log, |c| matches!(c, Call::Submit { .. })), 1);
    let out = String::from_utf8(status.into_inner()).expect("utf8");
    assert!(out.contains("Move e2e4 played successfully."), "{out}");
}

#[tokio::test]
async fn test_boards_and_status_lines_do_not_interleave() {
    let screen = SharedBuf::default();
    let mut harness = Harness::script(vec![
        Fetch::Snapshot(my_turn(START, Color::White, Speed::Rapid)),
        Fetch::Snapshot(snapshot(START, false, Color::White, Speed::Rapid, GameStatus::Draw, None)),
    ]);
    harness.reply = Reply::Move("e2e4");
    harness.renderer = Some(Box::new(TerminalBoardRenderer::new(screen.clone())));
    let (mut controller, _log, events) = harness.build();
    let mut status = StatusWriter::new(events, StatusPrinter::default(), screen.clone());

    run_loop(&mut controller, &mut status, TICK, std::future::pending())
        .await
        .expect("loop");

    let out = screen.contents();
    let lines: Vec<&str> = out.lines().collect();
    let rows = 2 * BoardWidget::HEIGHT as usize;
    assert!(
        lines[..rows].iter().all(|l| l.contains('\x1b')),
        "plain and highlighted boards come first, whole"
    );
    let status_lines = &lines[rows..];
    assert!(status_lines.iter().all(|l| !l.contains('\x1b')));
    assert!(status_lines[0].starts_with("FEN: "));
    assert_eq!(
        status_lines[1..],
        [
            "Suggested move: e2e4",
            "Explanation: stub analysis",
            "Move e2e4 played successfully.",
            "Game over: Draw (draw)",
        ]
    );
}

#[test]
fn test_status_writer_writes_queued_lines_without_waiting() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut status = StatusWriter::new(rx, StatusPrinter::new(2), Vec::new());
    assert_eq!(status.flush().expect("flush"), 0);

    for _ in 0..5 {
        tx.send(LoopEvent::Waiting).expect("send");
    }
    tx.send(LoopEvent::AnalysisFailed).expect("send");

    assert_eq!(status.flush().expect("flush"), 3);
    let out = String::from_utf8(status.into_inner()).expect("utf8");
    assert_eq!(
        out,
        "Waiting for your turn...\nWaiting for your turn...\nCould not analyze the position.\n"
    );
}

#[test]
fn test_status_printer_collapses_repeated_waiting_lines() {
    let mut printer = StatusPrinter::default();

    let shown = (0..10)
        .filter_map(|_| printer.line(&LoopEvent::Waiting))
        .count();
    assert_eq!(shown, StatusPrinter::DEFAULT_REPEAT_LIMIT);
    assert_eq!(printer.line(&LoopEvent::Waiting), None);
}

#[test]
fn test_status_printer_resets_on_other_events() {
    let mut printer = StatusPrinter::new(1);

    assert_eq!(
        printer.line(&LoopEvent::Waiting).as_deref(),
        Some("Waiting for your turn...")
    );
    assert_eq!(printer.line(&LoopEvent::Waiting), None);

    assert!(printer.line(&LoopEvent::AnalysisFailed).is_some());
    assert!(printer.line(&LoopEvent::Waiting).is_some());

    // A different idle notice starts its own run.
    assert!(printer.line(&LoopEvent::WaitingForTurn).is_some());
    assert_eq!(printer.line(&LoopEvent::WaitingForTurn), None);
}

#[test]
fn test_status_printer_never_suppresses_progress() {
    let mut printer = StatusPrinter::new(0);
    let event = LoopEvent::Submitted {
        game_id: "abcd1234".to_string(),
        uci: "e2e4".to_string(),
    };

    for _ in 0..5 {
        assert_eq!(
            printer.line(&event).as_deref(),
            Some("Move e2e4 played successfully.")
        );
    }
    assert_eq!(printer.line(&LoopEvent::Waiting), None);
}

#[test]
fn test_manual_move_line_names_speed_and_move() {
    let event = LoopEvent::ManualMoveRequired {
        speed: Speed::Blitz,
        uci: "g1f3".to_string(),
    };
    assert_eq!(
        event.to_string(),
        "blitz game detected. Please make the move g1f3 manually."
    );
}
