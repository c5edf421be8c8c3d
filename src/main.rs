//! Blockwave runner (default binary).
//!
//! Uses crossterm for keyboard and mouse input and the framebuffer-based
//! isometric renderer for output. The simulation advances in fixed ticks.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use blockwave::core::{FrameSnapshot, GameState};
use blockwave::engine::{cell_center, hover_at_screen, place_at_screen, FixedTimestep};
use blockwave::input::{
    camera_pan, handle_key_event, handle_mouse_event, should_quit, CursorRepeat, PointerAction,
};
use blockwave::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use blockwave::types::{GameAction, TICK_MS};
use blockwave::{init_logging, AppConfig};

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;
    log::info!("starting with {:?}", config.world);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Err(e) = &result {
        log::error!("exited with error: {e:#}");
    }
    result
}

fn run(term: &mut TerminalRenderer, config: &AppConfig) -> Result<()> {
    let mut game_state = GameState::new(config.world);
    let mut snapshot = FrameSnapshot::default();

    let mut view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut cursor = CursorRepeat::new();
    let mut timestep = FixedTimestep::new(TICK_MS);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_frame = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        game_state.snapshot_into(&mut snapshot);
        view.render_into(&snapshot, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            log::info!("quit after {} frames", game_state.frame());
                            return Ok(());
                        }

                        if let Some((dx, dy)) = camera_pan(key) {
                            view.pan_by(dx, dy);
                        }

                        if let Some(action) = cursor.handle_key_press(key.code) {
                            game_state.apply_action(action);
                        }

                        match handle_key_event(key) {
                            // Cursor moves are handled by the repeat handler above.
                            Some(GameAction::MoveCursor(_)) | None => {}
                            Some(action) => {
                                if action == GameAction::Pause {
                                    timestep.reset();
                                }
                                game_state.apply_action(action);
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Ignore terminal auto-repeat; DAS/ARR handles repeats internally.
                    }
                    KeyEventKind::Release => {
                        cursor.handle_key_release(key.code);
                    }
                },
                Event::Mouse(mouse) => {
                    let projection = view.projection(viewport);
                    match handle_mouse_event(mouse) {
                        Some(PointerAction::Hover { col, row }) => {
                            hover_at_screen(&mut game_state, &projection, cell_center(col, row));
                        }
                        Some(PointerAction::Click { col, row }) => {
                            if let Err(e) = place_at_screen(
                                &mut game_state,
                                &projection,
                                cell_center(col, row),
                            ) {
                                log::debug!("click rejected ({}): {}", e.code(), e.message());
                            }
                        }
                        None => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_frame.elapsed();
        if elapsed >= tick_duration {
            last_frame = Instant::now();
            let elapsed_ms = elapsed.as_millis().min(u32::MAX as u128) as u32;

            for action in cursor.update(elapsed_ms) {
                game_state.apply_action(action);
            }

            for _ in 0..timestep.advance(elapsed_ms) {
                game_state.tick(TICK_MS);
            }
        }
    }
}
